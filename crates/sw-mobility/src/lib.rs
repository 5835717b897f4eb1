//! `sw-mobility` — path reuse, waypoint sequencing, and per-step movement.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                       |
//! |-----------------|----------------------------------------------------------------|
//! | [`route_cache`] | `RouteCache`, `route_key`, `RouteListing`                      |
//! | [`state`]       | `PathState`, `PersistedPathState`, `fingerprint`               |
//! | [`waypoint`]    | `Journey`, `MarkerBook`, `next_marker_name`                    |
//! | [`options`]     | `MoveOptions`, `ReuseBudget`                                   |
//! | [`fallback`]    | `FallbackStrategy`, `FallbackChain`, built-in strategies       |
//! | [`planner`]     | `plan_leg`, `MoveEnv`                                          |
//! | [`engine`]      | `MovementEngine<R>`, `NextStep`                                |
//! | [`error`]       | `MobilityError`, `MobilityResult<T>`                           |
//!
//! # Step model
//!
//! Each step the owning partition calls [`MovementEngine::advance`] once per
//! agent that wants to move:
//!
//! 1. The journey resolves the current leg target; legs already in range are
//!    skipped, and running out of legs means the agent has arrived.
//! 2. The stored path is reused if its fingerprint matches the leg, its reuse
//!    budget is not spent, and it can be rebased onto the agent's position.
//!    Otherwise the leg is planned again: route cache, then search, then the
//!    fallback chain.
//! 3. The head direction is popped and returned as the intended move.
//!
//! Whether the move actually happened is detected on the following call by
//! comparing positions.

pub mod engine;
pub mod error;
pub mod fallback;
pub mod options;
pub mod planner;
pub mod route_cache;
pub mod state;
pub mod waypoint;

#[cfg(test)]
mod tests;

pub use engine::{MovementEngine, NextStep};
pub use error::{MobilityError, MobilityResult};
pub use fallback::{
    AcceptPartial, Fallback, FallbackChain, FallbackContext, FallbackStrategy, Idle, PushThrough,
};
pub use options::{MoveOptions, ReuseBudget};
pub use planner::{plan_leg, MoveEnv, Planned};
pub use route_cache::{route_key, CachedRoute, RouteCache, RouteListing};
pub use state::{fingerprint, PathState, PersistedPathState};
pub use waypoint::{next_marker_name, Journey, Marker, MarkerBook};
