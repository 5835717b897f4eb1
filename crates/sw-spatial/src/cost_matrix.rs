//! Per-region traversal costs and the cache that owns them.
//!
//! # Lifecycle
//!
//! A region's [`CostMatrix`] is built the first time a search touches the
//! region and then shared (`Arc`) with every later search until something
//! invalidates it: a detected collision, a persistent block, or a structure
//! change.  The cache never hands out a mutable reference; searches that need
//! per-caller costs clone the matrix first.
//!
//! Every build stamps the matrix with a fresh `version`, so a caller holding
//! an old `Arc` can tell that the region has been rebuilt since.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use sw_core::{CostTable, RegionId, TilePos, REGION_SIZE};

use crate::terrain::{RegionMap, Structure, Terrain, WorldMap};

/// Cost value meaning "never traversable".
pub const IMPASSABLE: u8 = 255;

const CELLS: usize = REGION_SIZE as usize * REGION_SIZE as usize;

// ── CostMatrix ────────────────────────────────────────────────────────────────

/// A 50×50 grid of per-tile traversal costs for one region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CostMatrix {
    region:  RegionId,
    version: u64,
    costs:   Box<[u8]>,
}

impl CostMatrix {
    /// A matrix with every tile at `cost`.
    pub fn filled(region: RegionId, cost: u8) -> Self {
        Self { region, version: 0, costs: vec![cost; CELLS].into_boxed_slice() }
    }

    /// Build from terrain, structures, and tiles held by agents that will not
    /// step aside.
    ///
    /// Terrain is laid down first, then roads lower non-wall tiles to the road
    /// cost, then blocking structures and stationary agents raise tiles.
    /// Stationary agents never lower a tile already marked higher.
    pub fn build(map: &RegionMap, costs: &CostTable, stationary: &[TilePos], version: u64) -> Self {
        let mut m = Self::filled(map.region(), 0);
        m.version = version;

        for y in 0..REGION_SIZE {
            for x in 0..REGION_SIZE {
                let c = match map.terrain(x, y) {
                    Terrain::Plain => costs.plain,
                    Terrain::Swamp => costs.swamp,
                    Terrain::Wall  => IMPASSABLE,
                };
                m.set(x, y, c);
            }
        }

        for ((x, y), s) in map.structures() {
            match s {
                Structure::Road if m.get(x, y) != IMPASSABLE => m.set(x, y, costs.road),
                s if s.blocks() => m.set(x, y, costs.structure),
                _ => {}
            }
        }

        for tile in stationary.iter().filter(|t| t.region == map.region()) {
            if m.get(tile.x, tile.y) < costs.stationary_agent {
                m.set(tile.x, tile.y, costs.stationary_agent);
            }
        }
        m
    }

    #[inline]
    pub fn region(&self) -> RegionId {
        self.region
    }

    /// Build stamp.  Strictly increases across rebuilds of the same cache.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[inline]
    pub fn get(&self, x: u8, y: u8) -> u8 {
        self.costs[y as usize * REGION_SIZE as usize + x as usize]
    }

    #[inline]
    pub fn set(&mut self, x: u8, y: u8, cost: u8) {
        self.costs[y as usize * REGION_SIZE as usize + x as usize] = cost;
    }

    /// Cost at `tile`, which must be in this matrix's region.
    #[inline]
    pub fn at(&self, tile: TilePos) -> u8 {
        debug_assert_eq!(tile.region, self.region);
        self.get(tile.x, tile.y)
    }

    #[inline]
    pub fn is_passable(&self, x: u8, y: u8) -> bool {
        self.get(x, y) != IMPASSABLE
    }
}

// ── Stationary agents ─────────────────────────────────────────────────────────

/// Source of tiles held by agents that would refuse to yield.
///
/// The owning partition implements this over its agent store and yield
/// table.  `()` is the empty source.
pub trait AgentObstacles {
    /// Tiles in `region` held by agents that would refuse passage.
    fn stationary_tiles(&self, region: RegionId) -> Vec<TilePos>;
}

impl AgentObstacles for () {
    fn stationary_tiles(&self, _region: RegionId) -> Vec<TilePos> {
        Vec::new()
    }
}

// ── CostMatrixCache ───────────────────────────────────────────────────────────

/// Lazily built, explicitly invalidated per-region cost matrices.
#[derive(Debug)]
pub struct CostMatrixCache {
    costs:        CostTable,
    matrices:     FxHashMap<RegionId, Arc<CostMatrix>>,
    next_version: u64,
    builds:       u64,
}

impl CostMatrixCache {
    pub fn new(costs: CostTable) -> Self {
        Self {
            costs,
            matrices:     FxHashMap::default(),
            next_version: 1,
            builds:       0,
        }
    }

    pub fn costs(&self) -> &CostTable {
        &self.costs
    }

    /// Matrix for `region`, building it on a miss.
    ///
    /// Returns `None` for regions the world map does not contain; callers
    /// treat those as impassable.
    pub fn get(
        &mut self,
        region: RegionId,
        world: &WorldMap,
        obstacles: &dyn AgentObstacles,
    ) -> Option<Arc<CostMatrix>> {
        if let Some(m) = self.matrices.get(&region) {
            trace!(target: "shardwalk::cost_matrix", %region, version = m.version(), "cost_matrix.hit");
            return Some(Arc::clone(m));
        }

        let map = world.region(region)?;
        let version = self.next_version;
        self.next_version += 1;
        self.builds += 1;

        let stationary = obstacles.stationary_tiles(region);
        let m = Arc::new(CostMatrix::build(map, &self.costs, &stationary, version));
        debug!(
            target: "shardwalk::cost_matrix",
            %region,
            version,
            stationary = stationary.len(),
            "cost_matrix.built"
        );
        self.matrices.insert(region, Arc::clone(&m));
        Some(m)
    }

    /// Cached matrix for `region` without building.
    pub fn peek(&self, region: RegionId) -> Option<&Arc<CostMatrix>> {
        self.matrices.get(&region)
    }

    /// Drop `region`'s matrix.  Returns `true` if one was cached.
    pub fn invalidate(&mut self, region: RegionId) -> bool {
        let dropped = self.matrices.remove(&region).is_some();
        if dropped {
            debug!(target: "shardwalk::cost_matrix", %region, "cost_matrix.invalidated");
        }
        dropped
    }

    pub fn invalidate_all(&mut self) {
        debug!(target: "shardwalk::cost_matrix", dropped = self.matrices.len(), "cost_matrix.cleared");
        self.matrices.clear();
    }

    #[inline]
    pub fn contains(&self, region: RegionId) -> bool {
        self.matrices.contains_key(&region)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    /// Total matrices built over the cache's lifetime.
    #[inline]
    pub fn builds(&self) -> u64 {
        self.builds
    }
}
