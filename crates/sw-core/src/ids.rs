//! Agent and partition identities.
//!
//! IDs carry no geometry.  An `AgentId` is unique across every partition so
//! an agent keeps its identity through a handoff, and ordering by `AgentId`
//! is the processing order inside a step.

use std::fmt;

/// Newtype over an integer with an all-ones sentinel.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Never assigned; the `Default`.
            pub const INVALID: $name = $name(<$inner>::MAX);

            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

typed_id! {
    /// Globally unique agent identity.  Survives partition handoffs.
    pub struct AgentId(u32);
}

typed_id! {
    /// Identity of an independently executed simulation partition ("shard").
    pub struct PartitionId(u16);
}
