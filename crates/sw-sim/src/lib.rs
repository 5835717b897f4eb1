//! `sw-sim` — the per-partition step loop.
//!
//! # Step loop
//!
//! ```text
//! for each step:
//!   ① Inbox     — take this partition's messages from the ShardBus and
//!                 install each arriving agent at its portal exit tile.
//!   ② Orders    — for each agent in ascending AgentId order, ask the
//!                 Controller for an Order and execute it:
//!                   MoveTo / FollowMarkers / FollowWaypoints
//!                     → MovementEngine::advance → next tile
//!                     → portal?     hand off (record + path state to outbox)
//!                     → occupied?   negotiate a swap with the occupant
//!                     → otherwise   register the move
//!                   Hold → nothing
//!   ③ Boundary  — apply registered moves atomically; a move fails if its
//!                 tile is held by an agent that is not itself leaving.
//!                 Fatigue recovers, swamp adds fatigue.
//!   ④ Outbox    — post queued transfers to the ShardBus.
//! ```
//!
//! # Crate layout
//!
//! | Module        | Contents                                               |
//! |---------------|--------------------------------------------------------|
//! | [`partition`] | `Partition<R>`, `StepReport`                           |
//! | [`builder`]   | `PartitionBuilder<R>`                                  |
//! | [`control`]   | `Controller`, `Order`, `StepOutcome`, `HoldAll`        |
//! | [`observer`]  | `StepObserver`, `NoopObserver`                         |
//! | [`error`]     | `SimError`, `SimResult<T>`                             |

pub mod builder;
pub mod control;
pub mod error;
pub mod observer;
pub mod partition;


pub use builder::PartitionBuilder;
pub use control::{Controller, HoldAll, Order, StepOutcome};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, StepObserver};
pub use partition::{Partition, StepReport};
