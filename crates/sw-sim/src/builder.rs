//! Fluent builder for constructing a [`Partition`].

use sw_agent::{AgentRecord, AgentStore};
use sw_core::{PartitionId, SimConfig, Tick};
use sw_mobility::{MarkerBook, MovementEngine};
use sw_spatial::{Router, WorldMap};
use sw_traffic::{Negotiator, YieldTable};

use crate::{Partition, SimError, SimResult};

/// Fluent builder for [`Partition<R>`].
///
/// # Required inputs
///
/// - `PartitionId`, [`SimConfig`], the partition's [`WorldMap`]
/// - `R: Router`: the search algorithm (e.g. [`sw_spatial::GridRouter`])
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                   |
/// |-------------------|---------------------------|
/// | `.agent(r)`       | no agents                 |
/// | `.markers(b)`     | empty `MarkerBook`        |
/// | `.yield_table(t)` | `YieldTable::standard()`  |
/// | `.start_tick(t)`  | `Tick::ZERO`              |
///
/// # Example
///
/// ```rust,ignore
/// let mut part = PartitionBuilder::new(PartitionId(1), config, world, GridRouter)
///     .agent(AgentRecord::new(AgentId(1), Role::Hauler, start))
///     .build()?;
/// part.run(&mut bus, &mut controller, &mut NoopObserver)?;
/// ```
pub struct PartitionBuilder<R: Router> {
    id:          PartitionId,
    config:      SimConfig,
    world:       WorldMap,
    router:      R,
    agents:      Vec<AgentRecord>,
    markers:     MarkerBook,
    yield_table: Option<YieldTable>,
    start_tick:  Tick,
}

impl<R: Router> PartitionBuilder<R> {
    pub fn new(id: PartitionId, config: SimConfig, world: WorldMap, router: R) -> Self {
        Self {
            id,
            config,
            world,
            router,
            agents:      Vec::new(),
            markers:     MarkerBook::new(),
            yield_table: None,
            start_tick:  Tick::ZERO,
        }
    }

    pub fn agent(mut self, record: AgentRecord) -> Self {
        self.agents.push(record);
        self
    }

    pub fn agents(mut self, records: impl IntoIterator<Item = AgentRecord>) -> Self {
        self.agents.extend(records);
        self
    }

    pub fn markers(mut self, markers: MarkerBook) -> Self {
        self.markers = markers;
        self
    }

    pub fn yield_table(mut self, table: YieldTable) -> Self {
        self.yield_table = Some(table);
        self
    }

    pub fn start_tick(mut self, tick: Tick) -> Self {
        self.start_tick = tick;
        self
    }

    /// Validate inputs, place agents, and return a ready-to-step
    /// [`Partition`].
    pub fn build(self) -> SimResult<Partition<R>> {
        if !self.id.is_valid() {
            return Err(SimError::Config("partition id must not be INVALID".into()));
        }
        self.config.movement.validate()?;

        let mut store = AgentStore::new();
        for record in self.agents {
            if !self.world.is_walkable(record.position) {
                return Err(SimError::Config(format!(
                    "agent {} placed on unwalkable tile {}",
                    record.id, record.position
                )));
            }
            store.insert(record)?;
        }

        let engine = MovementEngine::new(self.router, &self.config.movement);
        let negotiator = Negotiator::new(self.yield_table.unwrap_or_default());

        Ok(Partition::assemble(
            self.id,
            self.config,
            self.world,
            store,
            engine,
            negotiator,
            self.markers,
            self.start_tick,
        ))
    }
}
