//! The `Partition` struct and its step loop.

use rustc_hash::FxHashSet;
use tracing::{debug, info, trace, warn};

use sw_agent::{AgentRecord, AgentStore};
use sw_core::{AgentId, PartitionId, SimConfig, Tick, TilePos};
use sw_handoff::{message_name, AgentTransfer, Outbox, ShardBus, TransferMessage};
use sw_mobility::{Journey, MarkerBook, MoveEnv, MoveOptions, MovementEngine, NextStep};
use sw_spatial::{Router, Terrain, WorldMap};
use sw_traffic::{Negotiation, Negotiator, PositionHolders, SwapRequest, YieldSubject};

use crate::{Controller, Order, SimResult, StepObserver, StepOutcome};

/// A registered move, applied at the step boundary.
#[derive(Copy, Clone, Debug)]
struct MoveIntent {
    agent: AgentId,
    to:    TilePos,
}

/// Summary of one [`Partition::run_step`].
#[derive(Clone, Debug, Default)]
pub struct StepReport {
    pub tick:     Tick,
    /// Agents installed from the inbox.
    pub received: usize,
    /// Outcome per ordered agent, in processing order.
    pub outcomes: Vec<(AgentId, StepOutcome)>,
    /// Agents whose position changed at the boundary.
    pub moved:    usize,
    /// Messages posted to the bus.
    pub sent:     usize,
}

// ── Partition ─────────────────────────────────────────────────────────────────

/// One independently stepped shard of the world.
///
/// Holds the authoritative agent set, the movement engine with its caches,
/// and the traffic negotiator.  Agents leave through portals into the
/// [`Outbox`] and arrive through the [`ShardBus`] inbox.
///
/// Create via [`PartitionBuilder`][crate::PartitionBuilder].
pub struct Partition<R: Router> {
    pub id:         PartitionId,
    pub config:     SimConfig,
    pub world:      WorldMap,
    pub agents:     AgentStore,
    pub engine:     MovementEngine<R>,
    pub negotiator: Negotiator,
    pub markers:    MarkerBook,

    pub(crate) tick: Tick,
    pub(crate) outbox: Outbox,
    intents: Vec<MoveIntent>,
    /// Agents with an entry in `intents`.
    committed: FxHashSet<AgentId>,
}

impl<R: Router> Partition<R> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn assemble(
        id:         PartitionId,
        config:     SimConfig,
        world:      WorldMap,
        agents:     AgentStore,
        engine:     MovementEngine<R>,
        negotiator: Negotiator,
        markers:    MarkerBook,
        tick:       Tick,
    ) -> Self {
        Self {
            id,
            config,
            world,
            agents,
            engine,
            negotiator,
            markers,
            tick,
            outbox:    Outbox::new(id),
            intents:   Vec::new(),
            committed: FxHashSet::default(),
        }
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    /// Messages queued this step and not yet posted.
    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    /// Default options from this partition's movement config.
    pub fn default_options(&self) -> MoveOptions {
        MoveOptions::from_config(&self.config.movement)
    }

    // ── Movement requests ─────────────────────────────────────────────────

    /// Step `agent` towards `destination`.
    pub fn move_towards(
        &mut self,
        agent:       AgentId,
        destination: TilePos,
        opts:        &MoveOptions,
    ) -> SimResult<StepOutcome> {
        self.travel(agent, Journey::Direct(destination), opts)
    }

    /// Step `agent` along the marker chain starting at `start`.
    pub fn follow_markers(
        &mut self,
        agent: AgentId,
        start: &str,
        opts:  &MoveOptions,
    ) -> SimResult<StepOutcome> {
        self.travel(agent, Journey::markers(start), opts)
    }

    /// Step `agent` through `tiles` in order.
    pub fn follow_waypoints(
        &mut self,
        agent: AgentId,
        tiles: &[TilePos],
        opts:  &MoveOptions,
    ) -> SimResult<StepOutcome> {
        self.travel(agent, Journey::Waypoints(tiles.iter().copied().collect()), opts)
    }

    fn travel(&mut self, agent: AgentId, journey: Journey, opts: &MoveOptions) -> SimResult<StepOutcome> {
        let record = self.agents.record(agent)?;
        if self.committed.contains(&agent) {
            // Already moving this step (it stepped aside for someone).
            return Ok(StepOutcome::Moved);
        }
        if record.is_fatigued() {
            return Ok(StepOutcome::RateLimited);
        }
        let position = record.position;

        let holders = PositionHolders { store: &self.agents, table: self.negotiator.table() };
        let env = MoveEnv {
            world:     &self.world,
            markers:   &self.markers,
            obstacles: &holders,
            occupancy: &self.agents,
        };
        let dir = match self.engine.advance(agent, position, journey, opts, &env) {
            NextStep::Move(dir) => dir,
            NextStep::Arrived => return Ok(StepOutcome::Arrived),
            NextStep::NoPath => return Ok(StepOutcome::NoPath),
            NextStep::Wait => return Ok(StepOutcome::Idle),
        };
        let to = position.step(dir);

        if let Some(portal) = self.world.portal_at(to).filter(|p| p.partition != self.id) {
            self.handoff(agent, portal.partition, portal.exit)?;
            return Ok(StepOutcome::HandedOff(portal.partition));
        }
        if !self.world.is_walkable(to) || self.claimed(to) {
            return Ok(StepOutcome::BlockedByObstacle);
        }

        let Some(occupant) = self.agents.at(to) else {
            self.commit(agent, to);
            return Ok(StepOutcome::Moved);
        };
        if self.committed.contains(&occupant) {
            // Follow into the tile it is leaving.
            self.commit(agent, to);
            return Ok(StepOutcome::Moved);
        }
        if !opts.allow_pass_through_friendlies {
            return Ok(StepOutcome::BlockedByObstacle);
        }

        let occ = self.agents.record(occupant)?;
        if occ.is_fatigued() {
            return Ok(StepOutcome::BlockedByRefusal);
        }
        let req = SwapRequest {
            requester: YieldSubject::of(self.agents.record(agent)?),
            occupant:  YieldSubject::of(occ),
            heading:   dir,
        };
        match self.negotiator.negotiate(&req) {
            Negotiation::Accepted { vacate } => {
                self.engine.displace(occupant);
                self.commit(occupant, to.step(vacate));
                self.commit(agent, to);
                Ok(StepOutcome::Moved)
            }
            Negotiation::Refused => Ok(StepOutcome::BlockedByRefusal),
        }
    }

    fn claimed(&self, tile: TilePos) -> bool {
        self.intents.iter().any(|i| i.to == tile)
    }

    fn commit(&mut self, agent: AgentId, to: TilePos) {
        self.committed.insert(agent);
        self.intents.push(MoveIntent { agent, to });
    }

    // ── Handoff ───────────────────────────────────────────────────────────

    /// Move `agent` out of this partition: serialize, queue, delete.
    fn handoff(&mut self, agent: AgentId, target: PartitionId, exit: TilePos) -> SimResult<()> {
        let mut record = self.agents.remove(agent)?;
        record.position = exit;
        let transfer = AgentTransfer {
            agent:   record,
            path:    self.engine.take_persisted(agent),
            sent_at: self.tick,
        };
        let name = message_name(self.id, agent, self.tick);
        self.outbox.push(name.clone(), TransferMessage::agent_transfer(target, &transfer)?)?;
        info!(
            target: "shardwalk::sim",
            partition = %self.id,
            %agent,
            to = %target,
            %exit,
            %name,
            "handoff.sent"
        );
        Ok(())
    }

    /// Install every agent waiting in this partition's inbox.
    ///
    /// Messages are handled one at a time and never abort the drain.  An
    /// agent whose exit tile is held by someone else, or that cannot be
    /// merged, is re-queued for the next step.  A payload that does not
    /// decode names no agent and is dropped with a warning.  A path state
    /// that does not decode is dropped and the agent arrives without one.
    pub fn drain_inbox(&mut self, bus: &mut ShardBus) -> usize {
        let mut installed = 0;
        for (name, message) in bus.take(self.id).drain() {
            let AgentTransfer { agent: record, path, .. } = match message.decode() {
                Ok(transfer) => transfer,
                Err(e) => {
                    warn!(target: "shardwalk::sim", partition = %self.id, %name, error = %e, "handoff.undecodable");
                    continue;
                }
            };
            let id = record.id;
            if self.agents.at(record.position).is_some_and(|holder| holder != id) {
                debug!(target: "shardwalk::sim", partition = %self.id, %id, %name, "handoff.exit_busy");
                self.requeue(bus, name, message);
                continue;
            }

            let state = path.and_then(|p| match p.into_state() {
                Ok(state) => Some(state),
                Err(e) => {
                    warn!(target: "shardwalk::sim", partition = %self.id, %id, %name, error = %e, "handoff.path_dropped");
                    None
                }
            });
            let merge = match self.agents.merge(record) {
                Ok(merge) => merge,
                Err(e) => {
                    warn!(target: "shardwalk::sim", partition = %self.id, %id, %name, error = %e, "handoff.merge_failed");
                    self.requeue(bus, name, message);
                    continue;
                }
            };
            match state {
                Some(state) => self.engine.install(id, state),
                None => {
                    self.engine.forget(id);
                }
            }
            debug!(target: "shardwalk::sim", partition = %self.id, agent = %id, ?merge, %name, "handoff.received");
            installed += 1;
        }
        installed
    }

    fn requeue(&self, bus: &mut ShardBus, name: String, message: TransferMessage) {
        if let Err(e) = bus.deliver(self.id, name, message) {
            warn!(target: "shardwalk::sim", partition = %self.id, error = %e, "handoff.requeue_failed");
        }
    }

    // ── Step boundary ─────────────────────────────────────────────────────

    /// Apply this step's registered moves and advance fatigue.
    ///
    /// A move fails if its tile is unwalkable or held by an agent that is not
    /// itself leaving; failures propagate until nothing changes.  Returns the
    /// number of agents that moved.
    pub fn end_step(&mut self) -> SimResult<usize> {
        let intents = std::mem::take(&mut self.intents);
        self.committed.clear();

        let mut failed: FxHashSet<AgentId> = intents
            .iter()
            .filter(|i| !self.world.is_walkable(i.to))
            .map(|i| i.agent)
            .collect();
        let movers: FxHashSet<AgentId> = intents.iter().map(|i| i.agent).collect();
        loop {
            let before = failed.len();
            for i in &intents {
                if failed.contains(&i.agent) {
                    continue;
                }
                if let Some(holder) = self.agents.at(i.to) {
                    if holder != i.agent && (!movers.contains(&holder) || failed.contains(&holder)) {
                        failed.insert(i.agent);
                    }
                }
            }
            if failed.len() == before {
                break;
            }
        }
        for i in intents.iter().filter(|i| failed.contains(&i.agent)) {
            trace!(target: "shardwalk::sim", agent = %i.agent, to = %i.to, "move.failed");
        }

        let moves: Vec<(AgentId, TilePos)> = intents
            .iter()
            .filter(|i| !failed.contains(&i.agent))
            .map(|i| (i.agent, i.to))
            .collect();
        self.agents.apply_moves(&moves)?;

        let movement = &self.config.movement;
        self.agents.recover_fatigue(movement.fatigue_recovery);
        for &(agent, to) in &moves {
            if self.world.terrain_at(to) == Terrain::Swamp {
                self.agents.add_fatigue(agent, movement.costs.swamp_fatigue)?;
            }
        }
        Ok(moves.len())
    }

    // ── Step driver ───────────────────────────────────────────────────────

    /// Run one full step: drain the inbox, execute each agent's order in
    /// ascending id order, apply moves, and post the outbox to `bus`.
    pub fn run_step<C, O>(
        &mut self,
        bus:        &mut ShardBus,
        controller: &mut C,
        observer:   &mut O,
    ) -> SimResult<StepReport>
    where
        C: Controller + ?Sized,
        O: StepObserver + ?Sized,
    {
        let now = self.tick;
        observer.on_step_start(self.id, now);

        let received = self.drain_inbox(bus);
        let mut outcomes = Vec::with_capacity(self.agents.len());
        for agent in self.agents.ids() {
            let Some(record) = self.agents.get(agent) else {
                continue;
            };
            let outcome = match controller.order(now, record) {
                Order::MoveTo { destination, options } => self.move_towards(agent, destination, &options)?,
                Order::FollowMarkers { start, options } => self.follow_markers(agent, &start, &options)?,
                Order::FollowWaypoints { tiles, options } => {
                    self.follow_waypoints(agent, &tiles, &options)?
                }
                Order::Hold => StepOutcome::Idle,
            };
            observer.on_outcome(self.id, now, agent, outcome);
            outcomes.push((agent, outcome));
        }

        let moved = self.end_step()?;
        let sent = bus.post(&mut self.outbox)?;

        if now.on_interval(self.config.output_interval_ticks) {
            observer.on_snapshot(self.id, now, &self.engine.routes);
        }
        observer.on_step_end(self.id, now, moved);
        self.tick = now.next();

        Ok(StepReport { tick: now, received, outcomes, moved, sent })
    }

    /// Step until `config.end_tick()`.
    pub fn run<C, O>(&mut self, bus: &mut ShardBus, controller: &mut C, observer: &mut O) -> SimResult<()>
    where
        C: Controller + ?Sized,
        O: StepObserver + ?Sized,
    {
        while self.tick < self.config.end_tick() {
            self.run_step(bus, controller, observer)?;
        }
        observer.on_run_end(self.id, self.tick);
        Ok(())
    }

    /// Record for `agent`, if it is in this partition.
    pub fn agent(&self, agent: AgentId) -> Option<&AgentRecord> {
        self.agents.get(agent)
    }
}
