//! Static world description: terrain, structures, and portals.
//!
//! A [`RegionMap`] holds one region's terrain grid and the structures placed
//! on it.  A [`WorldMap`] is the set of regions a partition can see plus the
//! portal tiles that lead out of the partition.  Regions absent from the
//! `WorldMap` are treated as solid wall by every consumer.

use rustc_hash::FxHashMap;

use sw_core::{PartitionId, RegionId, TilePos, REGION_SIZE};

use crate::{SpatialError, SpatialResult};

const CELLS: usize = REGION_SIZE as usize * REGION_SIZE as usize;

// ── Terrain & structures ──────────────────────────────────────────────────────

/// Natural terrain of a tile.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Terrain {
    #[default]
    Plain,
    Swamp,
    /// Never traversable.
    Wall,
}

/// Something built on a tile.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Structure {
    /// Lowers traversal cost to the minimum.
    Road,
    /// Any structure agents cannot stand on (spawn, tower, wall segment...).
    Blocking,
    /// Construction site; blocks movement only if the finished structure will.
    Site { blocking: bool },
}

impl Structure {
    #[inline]
    pub fn blocks(self) -> bool {
        matches!(self, Structure::Blocking | Structure::Site { blocking: true })
    }
}

/// Where a portal tile leads.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortalTarget {
    pub partition: PartitionId,
    /// Tile the agent appears on in the destination partition.
    pub exit: TilePos,
}

// ── RegionMap ─────────────────────────────────────────────────────────────────

/// Terrain grid and structures of one region.
///
/// Build with [`RegionMapBuilder`].  Structures can be changed afterwards
/// through [`WorldMap::place_structure`], which is the hook the owning
/// partition uses before invalidating the region's cost matrix.
#[derive(Clone, Debug)]
pub struct RegionMap {
    region:     RegionId,
    terrain:    Box<[Terrain]>,
    structures: FxHashMap<(u8, u8), Structure>,
}

impl RegionMap {
    /// An all-plain region with no structures.
    pub fn plain(region: RegionId) -> Self {
        RegionMapBuilder::new(region).build()
    }

    #[inline]
    pub fn region(&self) -> RegionId {
        self.region
    }

    #[inline]
    pub fn terrain(&self, x: u8, y: u8) -> Terrain {
        self.terrain[y as usize * REGION_SIZE as usize + x as usize]
    }

    #[inline]
    pub fn structure(&self, x: u8, y: u8) -> Option<Structure> {
        self.structures.get(&(x, y)).copied()
    }

    /// All structures, in unspecified order.
    pub fn structures(&self) -> impl Iterator<Item = ((u8, u8), Structure)> + '_ {
        self.structures.iter().map(|(&xy, &s)| (xy, s))
    }

    /// `true` if an agent can stand on `(x, y)`.
    pub fn is_walkable(&self, x: u8, y: u8) -> bool {
        self.terrain(x, y) != Terrain::Wall
            && !self.structure(x, y).is_some_and(Structure::blocks)
    }
}

// ── RegionMapBuilder ──────────────────────────────────────────────────────────

/// Construct a [`RegionMap`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use sw_core::RegionId;
/// use sw_spatial::{RegionMapBuilder, Structure, Terrain};
///
/// let map = RegionMapBuilder::new(RegionId::new(0, 0))
///     .fill(0, 0, 49, 0, Terrain::Wall)
///     .structure(10, 10, Structure::Road)
///     .build();
/// assert_eq!(map.terrain(5, 0), Terrain::Wall);
/// assert!(map.is_walkable(10, 10));
/// ```
pub struct RegionMapBuilder {
    region:     RegionId,
    terrain:    Vec<Terrain>,
    structures: FxHashMap<(u8, u8), Structure>,
}

impl RegionMapBuilder {
    pub fn new(region: RegionId) -> Self {
        Self {
            region,
            terrain:    vec![Terrain::Plain; CELLS],
            structures: FxHashMap::default(),
        }
    }

    /// Parse rows of ASCII art, top row first.
    ///
    /// | Char | Meaning                    |
    /// |------|----------------------------|
    /// | `.`  | plain                      |
    /// | `~`  | swamp                      |
    /// | `#`  | wall                       |
    /// | `=`  | road on plain              |
    /// | `X`  | blocking structure         |
    /// | `s`  | non-blocking construction site |
    /// | `S`  | blocking construction site |
    ///
    /// Rows and columns beyond those given stay plain.
    pub fn from_rows(region: RegionId, rows: &[&str]) -> SpatialResult<Self> {
        let mut b = Self::new(region);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                if x >= REGION_SIZE as usize || y >= REGION_SIZE as usize {
                    return Err(SpatialError::OutOfBounds { x, y });
                }
                let (x, y) = (x as u8, y as u8);
                b = match c {
                    '.' => b,
                    '~' => b.terrain(x, y, Terrain::Swamp),
                    '#' => b.terrain(x, y, Terrain::Wall),
                    '=' => b.structure(x, y, Structure::Road),
                    'X' => b.structure(x, y, Structure::Blocking),
                    's' => b.structure(x, y, Structure::Site { blocking: false }),
                    'S' => b.structure(x, y, Structure::Site { blocking: true }),
                    other => return Err(SpatialError::BadMapChar(other)),
                };
            }
        }
        Ok(b)
    }

    pub fn terrain(mut self, x: u8, y: u8, t: Terrain) -> Self {
        self.terrain[y as usize * REGION_SIZE as usize + x as usize] = t;
        self
    }

    /// Set terrain on the inclusive rectangle `(x0, y0)..=(x1, y1)`.
    pub fn fill(mut self, x0: u8, y0: u8, x1: u8, y1: u8, t: Terrain) -> Self {
        for y in y0..=y1 {
            for x in x0..=x1 {
                self.terrain[y as usize * REGION_SIZE as usize + x as usize] = t;
            }
        }
        self
    }

    pub fn structure(mut self, x: u8, y: u8, s: Structure) -> Self {
        self.structures.insert((x, y), s);
        self
    }

    pub fn build(self) -> RegionMap {
        RegionMap {
            region:     self.region,
            terrain:    self.terrain.into_boxed_slice(),
            structures: self.structures,
        }
    }
}

// ── WorldMap ──────────────────────────────────────────────────────────────────

/// The regions visible to one partition and the portals leading out of it.
#[derive(Clone, Debug, Default)]
pub struct WorldMap {
    regions: FxHashMap<RegionId, RegionMap>,
    portals: FxHashMap<TilePos, PortalTarget>,
}

impl WorldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a region.  Fails if one with the same id is already present.
    pub fn insert_region(&mut self, map: RegionMap) -> SpatialResult<()> {
        let id = map.region();
        if self.regions.contains_key(&id) {
            return Err(SpatialError::DuplicateRegion(id));
        }
        self.regions.insert(id, map);
        Ok(())
    }

    /// Builder-style [`insert_region`](Self::insert_region).
    pub fn with_region(mut self, map: RegionMap) -> SpatialResult<Self> {
        self.insert_region(map)?;
        Ok(self)
    }

    #[inline]
    pub fn region(&self, id: RegionId) -> Option<&RegionMap> {
        self.regions.get(&id)
    }

    #[inline]
    pub fn contains_region(&self, id: RegionId) -> bool {
        self.regions.contains_key(&id)
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Region ids in ascending order.
    pub fn region_ids(&self) -> Vec<RegionId> {
        let mut ids: Vec<_> = self.regions.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Terrain at `tile`; tiles in unknown regions read as wall.
    pub fn terrain_at(&self, tile: TilePos) -> Terrain {
        self.regions
            .get(&tile.region)
            .map_or(Terrain::Wall, |r| r.terrain(tile.x, tile.y))
    }

    pub fn structure_at(&self, tile: TilePos) -> Option<Structure> {
        self.regions.get(&tile.region)?.structure(tile.x, tile.y)
    }

    pub fn is_walkable(&self, tile: TilePos) -> bool {
        self.regions
            .get(&tile.region)
            .is_some_and(|r| r.is_walkable(tile.x, tile.y))
    }

    /// Place (or replace) a structure.  Returns the previous one.
    ///
    /// The caller is responsible for invalidating the region's cost matrix.
    pub fn place_structure(&mut self, tile: TilePos, s: Structure) -> SpatialResult<Option<Structure>> {
        let region = self
            .regions
            .get_mut(&tile.region)
            .ok_or(SpatialError::UnknownRegion(tile.region))?;
        Ok(region.structures.insert((tile.x, tile.y), s))
    }

    pub fn remove_structure(&mut self, tile: TilePos) -> SpatialResult<Option<Structure>> {
        let region = self
            .regions
            .get_mut(&tile.region)
            .ok_or(SpatialError::UnknownRegion(tile.region))?;
        Ok(region.structures.remove(&(tile.x, tile.y)))
    }

    // ── Portals ───────────────────────────────────────────────────────────

    /// Mark `tile` as a portal.  The tile must be walkable in a known region.
    pub fn add_portal(&mut self, tile: TilePos, target: PortalTarget) -> SpatialResult<()> {
        if !self.is_walkable(tile) {
            return Err(SpatialError::PortalNotWalkable(tile));
        }
        self.portals.insert(tile, target);
        Ok(())
    }

    #[inline]
    pub fn portal_at(&self, tile: TilePos) -> Option<PortalTarget> {
        self.portals.get(&tile).copied()
    }

    pub fn portal_count(&self) -> usize {
        self.portals.len()
    }
}
