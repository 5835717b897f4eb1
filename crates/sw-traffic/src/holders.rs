//! Which agents the shared cost matrices treat as obstacles.

use sw_agent::AgentStore;
use sw_core::{RegionId, TilePos};
use sw_spatial::AgentObstacles;

use crate::rules::{YieldSubject, YieldTable};

/// Agents in `store` that would refuse a peer under `table`.
pub struct PositionHolders<'a> {
    pub store: &'a AgentStore,
    pub table: &'a YieldTable,
}

impl AgentObstacles for PositionHolders<'_> {
    fn stationary_tiles(&self, region: RegionId) -> Vec<TilePos> {
        let mut tiles: Vec<_> = self
            .store
            .iter()
            .filter(|r| r.position.region == region)
            .filter(|r| self.table.holds_position(&YieldSubject::of(r)))
            .map(|r| r.position)
            .collect();
        tiles.sort_unstable();
        tiles
    }
}
