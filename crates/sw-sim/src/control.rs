//! What external code tells agents to do, and what came of it.

use sw_agent::AgentRecord;
use sw_core::{PartitionId, Tick, TilePos};
use sw_mobility::MoveOptions;

/// Result of one movement request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Move registered; applied at the step boundary.
    Moved,
    /// Next tile is unwalkable or already claimed this step.
    BlockedByObstacle,
    /// The occupant of the next tile refused to step aside.
    BlockedByRefusal,
    Arrived,
    NoPath,
    /// Still recovering from fatigue.
    RateLimited,
    /// Left through a portal; now in the other partition's inbox.
    HandedOff(PartitionId),
    /// Held position this step.
    Idle,
}

impl StepOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            StepOutcome::Moved             => "moved",
            StepOutcome::BlockedByObstacle => "blocked_by_obstacle",
            StepOutcome::BlockedByRefusal  => "blocked_by_refusal",
            StepOutcome::Arrived           => "arrived",
            StepOutcome::NoPath            => "no_path",
            StepOutcome::RateLimited       => "rate_limited",
            StepOutcome::HandedOff(_)      => "handed_off",
            StepOutcome::Idle              => "idle",
        }
    }
}

/// One agent's instruction for one step.
#[derive(Clone, Debug)]
pub enum Order {
    MoveTo {
        destination: TilePos,
        options:     MoveOptions,
    },
    FollowMarkers {
        start:   String,
        options: MoveOptions,
    },
    FollowWaypoints {
        tiles:   Vec<TilePos>,
        options: MoveOptions,
    },
    Hold,
}

/// Decides each agent's order, once per agent per step, in ascending
/// `AgentId` order.
pub trait Controller {
    fn order(&mut self, tick: Tick, agent: &AgentRecord) -> Order;
}

impl<F> Controller for F
where
    F: FnMut(Tick, &AgentRecord) -> Order,
{
    fn order(&mut self, tick: Tick, agent: &AgentRecord) -> Order {
        self(tick, agent)
    }
}

/// Orders every agent to hold.
pub struct HoldAll;

impl Controller for HoldAll {
    fn order(&mut self, _tick: Tick, _agent: &AgentRecord) -> Order {
        Order::Hold
    }
}
