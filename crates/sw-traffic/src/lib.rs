//! `sw-traffic` — who steps aside when two agents want the same tile.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                     |
//! |----------------|--------------------------------------------------------------|
//! | [`rules`]      | `YieldSubject`, `YieldRule`, `YieldTable` and built-in rules |
//! | [`negotiator`] | `Negotiator`, `SwapRequest`, `Negotiation`, `NegotiationStats` |
//! | [`holders`]    | `PositionHolders` (agents the cost matrices mark as obstacles) |
//!
//! The negotiator only decides.  Applying an accepted swap (both agents
//! moving in the same step) is the partition's job.

pub mod holders;
pub mod negotiator;
pub mod rules;

#[cfg(test)]
mod tests;

pub use holders::PositionHolders;
pub use negotiator::{Negotiation, NegotiationStats, Negotiator, SwapRequest};
pub use rules::{always_yield, default_rule, hold_while_carrying, YieldRule, YieldSubject, YieldTable};
