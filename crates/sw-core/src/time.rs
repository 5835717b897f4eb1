//! Simulation step counter.
//!
//! The world advances in discrete, serialized steps.  Every position change
//! requested during a step is applied at the step boundary, so `Tick` is the
//! only notion of time the movement subsystem needs.  Partitions keep their
//! own `Tick`; there is no shared clock between them.

use std::fmt;

/// A step number, local to one partition.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// The tick `n` steps later.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    #[inline]
    pub fn next(self) -> Tick {
        self.offset(1)
    }

    /// Whether this step falls on a reporting interval of `every` steps.
    /// An interval of zero never fires.
    #[inline]
    pub fn on_interval(self, every: u64) -> bool {
        every > 0 && self.0 % every == 0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}
