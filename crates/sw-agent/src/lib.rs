//! `sw-agent` — the authoritative agent set of one partition.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`record`] | `AgentRecord` (id, role, position, work/carry flags, fatigue) |
//! | [`store`]  | `AgentStore` (records + tile occupancy index), `Merge`     |
//! | [`error`]  | `AgentError`, `AgentResult<T>`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `AgentRecord`.        |
//!
//! `AgentStore` implements [`sw_core::Occupancy`], so the movement
//! engine reads occupancy straight from the store.

pub mod error;
pub mod record;
pub mod store;


pub use error::{AgentError, AgentResult};
pub use record::AgentRecord;
pub use store::{AgentStore, Merge};
