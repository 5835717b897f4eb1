//! The movement engine: per-agent path state driven one step at a time.

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use sw_core::{AgentId, Direction, MovementConfig, RegionId, TilePos};
use sw_spatial::{CostMatrixCache, Router};

use crate::planner::{plan_leg, MoveEnv, Planned};
use crate::route_cache::RouteCache;
use crate::state::{fingerprint, PathState, PersistedPathState};
use crate::waypoint::Journey;
use crate::{MobilityError, MobilityResult, MoveOptions};

/// Upper bound on legs skipped in one `advance` when several consecutive
/// leg targets are already in range.  Guards against cyclic marker chains.
const MAX_LEG_HOPS: usize = 64;

/// What an agent should do this step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NextStep {
    Move(Direction),
    /// In range of the final leg; path state has been cleared.
    Arrived,
    /// No usable path this step; the next step retries.
    NoPath,
    /// A fallback strategy chose to stand still.
    Wait,
}

/// Owns the movement caches and every agent's [`PathState`].
///
/// # Type parameter
///
/// `R` must implement [`Router`] (e.g. [`sw_spatial::GridRouter`]).
pub struct MovementEngine<R: Router> {
    /// The search algorithm.
    pub router: R,

    /// Per-region cost matrices.
    pub matrices: CostMatrixCache,

    /// Trip-keyed complete paths.
    pub routes: RouteCache,

    states:          FxHashMap<AgentId, PathState>,
    stuck_threshold: u32,
}

impl<R: Router> MovementEngine<R> {
    pub fn new(router: R, cfg: &MovementConfig) -> Self {
        Self {
            router,
            matrices:        CostMatrixCache::new(cfg.costs.clone()),
            routes:          RouteCache::new(),
            states:          FxHashMap::default(),
            stuck_threshold: cfg.stuck_threshold,
        }
    }

    // ── Per-step driver ───────────────────────────────────────────────────

    /// Decide `agent`'s move for this step.
    ///
    /// `journey` is what the caller wants; if it does not continue the
    /// journey already in progress, the agent is retargeted.  The returned
    /// direction is an intent: the caller applies it (or not) at the step
    /// boundary and the next call detects whether it happened.
    pub fn advance(
        &mut self,
        agent:    AgentId,
        position: TilePos,
        journey:  Journey,
        opts:     &MoveOptions,
        env:      &MoveEnv<'_>,
    ) -> NextStep {
        let mut state = match self.states.remove(&agent) {
            Some(mut s) => {
                if !s.journey.continues(&journey) {
                    trace!(target: "shardwalk::engine", %agent, "path.retarget");
                    s.journey = journey;
                    s.drop_path();
                    s.blocked_steps = 0;
                }
                s
            }
            None => PathState::new(journey, position),
        };

        self.detect_failed_move(agent, position, &mut state, env);

        let range = opts.proximity_range;
        let mut hops = 0;
        let leg = loop {
            let Some(target) = state.journey.leg_target(env.markers) else {
                if state.journey.is_exhausted() {
                    trace!(target: "shardwalk::engine", %agent, %position, "path.arrived");
                    return NextStep::Arrived;
                }
                self.states.insert(agent, state);
                return NextStep::NoPath;
            };
            if !position.in_range_to(target, range) {
                break target;
            }
            hops += 1;
            if hops > MAX_LEG_HOPS || !state.journey.next_leg(env.markers) {
                trace!(target: "shardwalk::engine", %agent, %position, "path.arrived");
                return NextStep::Arrived;
            }
            state.drop_path();
        };

        let fp = fingerprint(leg, range);
        let mut search = state.path.is_empty()
            || state.target_fingerprint.as_deref() != Some(fp.as_str())
            || opts.reuse.is_spent(state.reused_steps);

        if !search && state.expected != position {
            match state.path.rebase(state.expected, position) {
                Some(p) if !p.is_empty() => {
                    state.path = p;
                    state.expected = position;
                }
                _ => search = true,
            }
        }

        if search {
            state.drop_path();
            let planned = plan_leg(
                &self.router,
                &mut self.matrices,
                &mut self.routes,
                position,
                leg,
                state.stale,
                opts,
                env,
            );
            match planned {
                Planned::Path { path, incomplete, .. } => {
                    state.path = path;
                    state.incomplete = incomplete;
                    state.stale = false;
                    state.target_fingerprint = Some(fp);
                    state.expected = position;
                }
                Planned::Wait => {
                    state.previous_position = None;
                    self.states.insert(agent, state);
                    return NextStep::Wait;
                }
                Planned::Nothing => {
                    state.previous_position = None;
                    self.states.insert(agent, state);
                    return NextStep::NoPath;
                }
            }
        }

        let Some(dir) = state.path.pop_front() else {
            state.previous_position = None;
            self.states.insert(agent, state);
            return NextStep::NoPath;
        };
        state.reused_steps += 1;
        state.previous_position = Some(position);
        state.expected = position.step(dir);
        self.states.insert(agent, state);
        NextStep::Move(dir)
    }

    /// Compare the position with the one the last move started from.
    ///
    /// Unchanged with a friendly agent on the intended tile is a block; the
    /// counter grows and at the stuck threshold the path and that region's
    /// matrix are dropped.  Unchanged with nobody there is a collision with
    /// something the matrix does not know about, so the matrix is dropped at
    /// once.
    fn detect_failed_move(
        &mut self,
        agent:    AgentId,
        position: TilePos,
        state:    &mut PathState,
        env:      &MoveEnv<'_>,
    ) {
        if state.previous_position != Some(position) {
            state.blocked_steps = 0;
            return;
        }
        if state.expected == position {
            return;
        }
        let intended = state.expected;
        match env.occupancy.occupant(intended) {
            Some(occupant) if occupant != agent => {
                state.blocked_steps += 1;
                if state.blocked_steps >= self.stuck_threshold {
                    debug!(
                        target: "shardwalk::engine",
                        %agent,
                        %occupant,
                        tile = %intended,
                        blocked = state.blocked_steps,
                        "path.stuck"
                    );
                    self.matrices.invalidate(intended.region);
                    state.drop_path();
                    state.stale = true;
                    state.blocked_steps = 0;
                }
            }
            _ => {
                debug!(target: "shardwalk::engine", %agent, tile = %intended, "path.collision");
                self.matrices.invalidate(intended.region);
                state.drop_path();
                state.stale = true;
            }
        }
    }

    // ── State management ──────────────────────────────────────────────────

    pub fn path_state(&self, agent: AgentId) -> Option<&PathState> {
        self.states.get(&agent)
    }

    /// Number of agents with live path state.
    pub fn tracked(&self) -> usize {
        self.states.len()
    }

    /// Drop `agent`'s path state.
    pub fn forget(&mut self, agent: AgentId) -> Option<PathState> {
        self.states.remove(&agent)
    }

    /// Persisted copy of `agent`'s path state.
    pub fn persist(&self, agent: AgentId) -> Option<PersistedPathState> {
        self.states.get(&agent).map(PathState::to_persisted)
    }

    /// Remove `agent`'s path state and return it in persisted form.
    pub fn take_persisted(&mut self, agent: AgentId) -> Option<PersistedPathState> {
        self.states.remove(&agent).map(|s| s.to_persisted())
    }

    /// Install `agent`'s path state from its persisted form, replacing any
    /// existing state.
    pub fn restore(&mut self, agent: AgentId, persisted: PersistedPathState) -> MobilityResult<()> {
        let state = persisted.into_state()?;
        self.states.insert(agent, state);
        Ok(())
    }

    /// Install `agent`'s state, replacing any existing one.
    pub fn install(&mut self, agent: AgentId, state: PathState) {
        self.states.insert(agent, state);
    }

    /// `agent` was moved by someone else (it stepped aside for a swap), so
    /// its next position says nothing about whether its own last move
    /// worked.
    pub fn displace(&mut self, agent: AgentId) {
        if let Some(state) = self.states.get_mut(&agent) {
            state.previous_position = None;
            state.blocked_steps = 0;
        }
    }

    /// Install `agent`'s state; fails if it already has one.
    pub fn insert_state(&mut self, agent: AgentId, state: PathState) -> MobilityResult<()> {
        if self.states.contains_key(&agent) {
            return Err(MobilityError::AlreadyTracked(agent));
        }
        self.states.insert(agent, state);
        Ok(())
    }

    /// Drop the cost matrix for `region` (e.g. after a structure change).
    pub fn invalidate_region(&mut self, region: RegionId) -> bool {
        self.matrices.invalidate(region)
    }
}
