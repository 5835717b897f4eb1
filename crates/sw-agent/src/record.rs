//! One agent's authoritative state inside a partition.

use sw_core::{AgentId, Role, TilePos};

/// Everything the partition knows about an agent apart from its path state,
/// which the movement engine owns.
///
/// `working` means the agent is doing stationary work (harvesting, upgrading,
/// building) and should not be pushed off its tile by a peer.  `carrying`
/// means it holds a resource load.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AgentRecord {
    pub id:       AgentId,
    pub role:     Role,
    pub position: TilePos,
    #[cfg_attr(feature = "serde", serde(default))]
    pub working:  bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub carrying: bool,
    /// Steps of cooldown left before the agent may move again.
    #[cfg_attr(feature = "serde", serde(default))]
    pub fatigue:  u32,
}

impl AgentRecord {
    pub fn new(id: AgentId, role: Role, position: TilePos) -> Self {
        Self { id, role, position, working: false, carrying: false, fatigue: 0 }
    }

    pub fn working(mut self, working: bool) -> Self {
        self.working = working;
        self
    }

    pub fn carrying(mut self, carrying: bool) -> Self {
        self.carrying = carrying;
        self
    }

    #[inline]
    pub fn is_fatigued(&self) -> bool {
        self.fatigue > 0
    }
}
