use thiserror::Error;

use sw_agent::AgentError;
use sw_core::CoreError;
use sw_handoff::HandoffError;
use sw_mobility::MobilityError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("partition configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Handoff(#[from] HandoffError),

    #[error(transparent)]
    Mobility(#[from] MobilityError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type SimResult<T> = Result<T, SimError>;
