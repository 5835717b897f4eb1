//! `sw-spatial` — terrain, cost matrices, compressed paths, and routing.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                      |
//! |-----------------|---------------------------------------------------------------|
//! | [`terrain`]     | `Terrain`, `Structure`, `RegionMap` + builder, `WorldMap`, portals |
//! | [`cost_matrix`] | `CostMatrix`, `CostMatrixCache`, `AgentObstacles`             |
//! | [`path`]        | `CompressedPath` (direction digits, replay, rebase)           |
//! | [`router`]      | `Router` trait, `SearchRequest`, `GridRouter` (A*)            |
//! | [`error`]       | `SpatialError`, `SpatialResult<T>`                            |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod cost_matrix;
pub mod error;
pub mod path;
pub mod router;
pub mod terrain;


pub use cost_matrix::{AgentObstacles, CostMatrix, CostMatrixCache, IMPASSABLE};
pub use error::{SpatialError, SpatialResult};
pub use path::CompressedPath;
pub use router::{CostHook, GridRouter, Router, SearchContext, SearchOutcome, SearchRequest};
pub use terrain::{PortalTarget, RegionMap, RegionMapBuilder, Structure, Terrain, WorldMap};
