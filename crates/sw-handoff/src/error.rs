use thiserror::Error;

use sw_core::PartitionId;

#[derive(Debug, Error)]
pub enum HandoffError {
    #[error("message {0:?} already queued")]
    DuplicateName(String),

    #[error("message {name:?} addressed to {addressed} posted to {inbox}")]
    Misaddressed {
        name:      String,
        addressed: PartitionId,
        inbox:     PartitionId,
    },

    #[error("transfer payload: {0}")]
    Payload(#[from] serde_json::Error),
}

pub type HandoffResult<T> = Result<T, HandoffError>;
