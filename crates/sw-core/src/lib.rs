//! `sw-core` — foundational types for the `shardwalk` movement framework.
//!
//! This crate is a dependency of every other `sw-*` crate.  It has no
//! `sw-*` dependencies and only `thiserror` (plus optional `serde`) from the
//! outside world.
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `AgentId`, `PartitionId`                                  |
//! | [`tile`]    | `RegionId`, `TilePos`, `Direction`, `REGION_SIZE`         |
//! | [`time`]    | `Tick`                                                    |
//! | [`role`]    | `Role`, `Job`                                             |
//! | [`occupancy`] | `Occupancy` (tile → agent lookup)                       |
//! | [`config`]  | `CostTable`, `MovementConfig`, `SimConfig`                |
//! | [`error`]   | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!           | Required by `sw-handoff` and `sw-mobility`'s persistence.  |

pub mod config;
pub mod error;
pub mod ids;
pub mod occupancy;
pub mod role;
pub mod tile;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{CostTable, MovementConfig, SimConfig};
pub use error::{CoreError, CoreResult};
pub use ids::{AgentId, PartitionId};
pub use occupancy::Occupancy;
pub use role::{Job, Role};
pub use tile::{Direction, RegionId, TilePos, REGION_SIZE};
pub use time::Tick;
