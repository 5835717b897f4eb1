//! Movement and simulation configuration.
//!
//! Plain structs with `Default` impls.  Applications typically load them
//! from a JSON file (with the `serde` feature) and pass them to the
//! partition builder; every field has a `serde(default)` so partial files
//! are accepted.

use crate::{CoreError, CoreResult, Tick};

// ── CostTable ─────────────────────────────────────────────────────────────────

/// Traversal costs used when building a region's cost matrix.
///
/// `255` is the impassable sentinel; every other value is a finite cost.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CostTable {
    /// Plain terrain.  Also the per-tile unit of the search heuristic.
    pub plain: u8,
    pub swamp: u8,
    /// Road structures.  Must be the smallest cost in the table.
    pub road: u8,
    /// Blocking structures and blocking construction sites.
    pub structure: u8,
    /// Tiles held by agents that would refuse to step aside.
    pub stationary_agent: u8,
    /// Fatigue added when an agent steps onto swamp.
    pub swamp_fatigue: u32,
}

impl Default for CostTable {
    fn default() -> Self {
        Self {
            plain:            2,
            swamp:            10,
            road:             1,
            structure:        255,
            stationary_agent: 254,
            swamp_fatigue:    2,
        }
    }
}

// ── MovementConfig ────────────────────────────────────────────────────────────

/// Tunables for the movement subsystem of one partition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MovementConfig {
    pub costs: CostTable,

    /// Default target proximity for move requests.
    pub proximity_range: u8,

    /// Default node budget for a single search.
    pub max_search_nodes: u32,

    /// Consecutive blocked steps after which an agent drops its path and the
    /// region's cost matrix.
    pub stuck_threshold: u32,

    /// Fatigue recovered by every agent at each step boundary.
    pub fatigue_recovery: u32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            costs:            CostTable::default(),
            proximity_range:  1,
            max_search_nodes: 4_000,
            stuck_threshold:  2,
            fatigue_recovery: 1,
        }
    }
}

impl MovementConfig {
    /// Reject configurations the search cannot work with.
    pub fn validate(&self) -> CoreResult<()> {
        let c = &self.costs;
        if c.plain == 0 || c.swamp == 0 || c.road == 0 {
            return Err(CoreError::Config("terrain costs must be non-zero".into()));
        }
        if c.road > c.plain || c.road > c.swamp {
            return Err(CoreError::Config(format!(
                "road cost {} must not exceed plain ({}) or swamp ({})",
                c.road, c.plain, c.swamp
            )));
        }
        if self.max_search_nodes == 0 {
            return Err(CoreError::Config("max_search_nodes must be positive".into()));
        }
        if self.stuck_threshold == 0 {
            return Err(CoreError::Config("stuck_threshold must be positive".into()));
        }
        Ok(())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level configuration for running a partition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Steps to simulate.
    pub total_ticks: u64,

    /// Report a route-cache snapshot every N steps (`0` disables).
    pub output_interval_ticks: u64,

    pub movement: MovementConfig,
}

impl SimConfig {
    /// The exclusive upper bound tick for the run.
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }
}
