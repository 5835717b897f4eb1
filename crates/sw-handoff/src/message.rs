//! Wire shape of a cross-partition message.
//!
//! ```json
//! "1:7:120": {
//!   "targetPartition": 2,
//!   "kind": "agentTransfer",
//!   "payload": { "agent": { ... }, "path": { ... }, "sentAt": 120 }
//! }
//! ```

use serde::{Deserialize, Serialize};

use sw_agent::AgentRecord;
use sw_core::{AgentId, PartitionId, Tick};
use sw_mobility::PersistedPathState;

use crate::HandoffResult;

/// Unique message name: `"{source partition}:{agent}:{tick}"`.
pub fn message_name(source: PartitionId, agent: AgentId, tick: Tick) -> String {
    format!("{}:{}:{}", source.0, agent.0, tick.0)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageKind {
    AgentTransfer,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferMessage {
    pub target_partition: PartitionId,
    pub kind:             MessageKind,
    pub payload:          serde_json::Value,
}

/// Everything needed to rebuild an agent on the other side.
///
/// `agent.position` is already the portal's exit tile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentTransfer {
    pub agent:   AgentRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path:    Option<PersistedPathState>,
    pub sent_at: Tick,
}

impl TransferMessage {
    pub fn agent_transfer(target: PartitionId, transfer: &AgentTransfer) -> HandoffResult<Self> {
        Ok(Self {
            target_partition: target,
            kind:             MessageKind::AgentTransfer,
            payload:          serde_json::to_value(transfer)?,
        })
    }

    pub fn decode(&self) -> HandoffResult<AgentTransfer> {
        Ok(serde_json::from_value(self.payload.clone())?)
    }
}
