//! `AgentStore`: the authoritative set of agents in one partition.
//!
//! Agents enter and leave a partition through handoffs, so unlike a
//! fixed-population store this is keyed by `AgentId` rather than indexed by
//! it.  A second map from tile to agent answers "who stands here" in O(1);
//! both maps are kept in lockstep by every mutating method.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use sw_core::{AgentId, CoreError, Occupancy, RegionId, TilePos};

use crate::{AgentError, AgentRecord, AgentResult};

/// How an incoming record was installed by [`AgentStore::merge`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Merge {
    Inserted,
    /// An agent with the same id was already present and was overwritten.
    Replaced,
}

#[derive(Default, Debug)]
pub struct AgentStore {
    agents: BTreeMap<AgentId, AgentRecord>,
    at:     FxHashMap<TilePos, AgentId>,
}

impl AgentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.agents.contains_key(&id)
    }

    pub fn get(&self, id: AgentId) -> Option<&AgentRecord> {
        self.agents.get(&id)
    }

    /// The record for `id`, or `AgentNotFound`.
    pub fn record(&self, id: AgentId) -> AgentResult<&AgentRecord> {
        self.agents.get(&id).ok_or(AgentError::Core(CoreError::AgentNotFound(id)))
    }

    /// Ids in ascending order; the partition's processing order.
    pub fn ids(&self) -> Vec<AgentId> {
        self.agents.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentRecord> + '_ {
        self.agents.values()
    }

    /// Agent standing on `tile`.
    #[inline]
    pub fn at(&self, tile: TilePos) -> Option<AgentId> {
        self.at.get(&tile).copied()
    }

    // ── Membership ────────────────────────────────────────────────────────

    /// Add a new agent.  Fails if the id is already present or the tile is
    /// held by someone else.
    pub fn insert(&mut self, record: AgentRecord) -> AgentResult<()> {
        if self.agents.contains_key(&record.id) {
            return Err(AgentError::AlreadyPresent(record.id));
        }
        if let Some(holder) = self.at(record.position) {
            return Err(AgentError::TileOccupied { tile: record.position, holder });
        }
        self.at.insert(record.position, record.id);
        self.agents.insert(record.id, record);
        Ok(())
    }

    /// Install an arriving agent, overwriting any record with the same id.
    ///
    /// The incoming position, role, and flags win.  The tile must be free
    /// or already held by this same agent.
    pub fn merge(&mut self, record: AgentRecord) -> AgentResult<Merge> {
        if let Some(holder) = self.at(record.position).filter(|&h| h != record.id) {
            return Err(AgentError::TileOccupied { tile: record.position, holder });
        }
        let outcome = match self.agents.remove(&record.id) {
            Some(old) => {
                self.at.remove(&old.position);
                Merge::Replaced
            }
            None => Merge::Inserted,
        };
        self.at.insert(record.position, record.id);
        self.agents.insert(record.id, record);
        Ok(outcome)
    }

    pub fn remove(&mut self, id: AgentId) -> AgentResult<AgentRecord> {
        let record = self
            .agents
            .remove(&id)
            .ok_or(AgentError::Core(CoreError::AgentNotFound(id)))?;
        self.at.remove(&record.position);
        Ok(record)
    }

    // ── Per-agent state ───────────────────────────────────────────────────

    pub fn set_working(&mut self, id: AgentId, working: bool) -> AgentResult<()> {
        self.record_mut(id)?.working = working;
        Ok(())
    }

    pub fn set_carrying(&mut self, id: AgentId, carrying: bool) -> AgentResult<()> {
        self.record_mut(id)?.carrying = carrying;
        Ok(())
    }

    pub fn add_fatigue(&mut self, id: AgentId, amount: u32) -> AgentResult<()> {
        let r = self.record_mut(id)?;
        r.fatigue = r.fatigue.saturating_add(amount);
        Ok(())
    }

    /// Reduce every agent's fatigue by `amount`, stopping at zero.
    pub fn recover_fatigue(&mut self, amount: u32) {
        for r in self.agents.values_mut() {
            r.fatigue = r.fatigue.saturating_sub(amount);
        }
    }

    fn record_mut(&mut self, id: AgentId) -> AgentResult<&mut AgentRecord> {
        self.agents
            .get_mut(&id)
            .ok_or(AgentError::Core(CoreError::AgentNotFound(id)))
    }

    // ── Movement ──────────────────────────────────────────────────────────

    /// Apply a batch of position changes atomically.
    ///
    /// Every mover leaves its tile before any mover arrives, so swaps and
    /// chains succeed.  The batch is rejected without changes if an id is
    /// unknown, two movers share a destination, or a destination is held by
    /// an agent that is not itself moving.
    pub fn apply_moves(&mut self, moves: &[(AgentId, TilePos)]) -> AgentResult<()> {
        let mut arriving: FxHashMap<TilePos, AgentId> = FxHashMap::default();
        for &(id, to) in moves {
            if !self.agents.contains_key(&id) {
                return Err(AgentError::Core(CoreError::AgentNotFound(id)));
            }
            if let Some(holder) = arriving.insert(to, id) {
                return Err(AgentError::TileOccupied { tile: to, holder });
            }
        }
        for &(_, to) in moves {
            if let Some(holder) = self.at(to) {
                if !moves.iter().any(|&(id, _)| id == holder) {
                    return Err(AgentError::TileOccupied { tile: to, holder });
                }
            }
        }

        for &(id, _) in moves {
            if let Some(r) = self.agents.get(&id) {
                self.at.remove(&r.position);
            }
        }
        for &(id, to) in moves {
            if let Some(r) = self.agents.get_mut(&id) {
                r.position = to;
                self.at.insert(to, id);
            }
        }
        Ok(())
    }

    /// Tiles in `region` held by agents, in tile order.
    pub fn tiles_in(&self, region: RegionId) -> Vec<TilePos> {
        let mut tiles: Vec<_> = self.at.keys().copied().filter(|t| t.region == region).collect();
        tiles.sort_unstable();
        tiles
    }
}

impl Occupancy for AgentStore {
    fn occupant(&self, tile: TilePos) -> Option<AgentId> {
        self.at(tile)
    }

    fn occupied_tiles(&self) -> Vec<TilePos> {
        let mut tiles: Vec<_> = self.at.keys().copied().collect();
        tiles.sort_unstable();
        tiles
    }
}
