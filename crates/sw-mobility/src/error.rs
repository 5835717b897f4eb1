//! Mobility-subsystem error type.

use thiserror::Error;

use sw_core::{AgentId, CoreError};
use sw_spatial::SpatialError;

/// Errors produced by `sw-mobility`.
///
/// Failing to find a path is never an error; it surfaces as
/// [`NextStep::NoPath`](crate::NextStep::NoPath).
#[derive(Debug, Error)]
pub enum MobilityError {
    #[error("agent {0} has no path state")]
    NoPathState(AgentId),

    #[error("agent {0} already has path state")]
    AlreadyTracked(AgentId),

    #[error("invalid persisted path state: {0}")]
    BadPersistedState(String),

    #[error("spatial error: {0}")]
    Spatial(#[from] SpatialError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type MobilityResult<T> = Result<T, MobilityError>;
