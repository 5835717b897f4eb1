//! Who stands where.
//!
//! The agent store owns positions; the movement engine only reads them.
//! This trait is the seam between the two, so neither crate depends on the
//! other.

use crate::{AgentId, TilePos};

/// Where agents currently stand.
pub trait Occupancy {
    fn occupant(&self, tile: TilePos) -> Option<AgentId>;

    /// Every occupied tile in the partition.
    fn occupied_tiles(&self) -> Vec<TilePos>;
}

/// Nobody anywhere.
impl Occupancy for () {
    fn occupant(&self, _tile: TilePos) -> Option<AgentId> {
        None
    }

    fn occupied_tiles(&self) -> Vec<TilePos> {
        Vec::new()
    }
}
