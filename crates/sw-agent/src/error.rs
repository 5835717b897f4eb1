use thiserror::Error;

use sw_core::{AgentId, CoreError, TilePos};

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent {0} is already in this partition")]
    AlreadyPresent(AgentId),

    #[error("tile {tile} is already held by {holder}")]
    TileOccupied { tile: TilePos, holder: AgentId },

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type AgentResult<T> = Result<T, AgentError>;
