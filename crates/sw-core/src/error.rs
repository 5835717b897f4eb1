//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.  Movement failures (no path, blocked, refused) are
//! step outcomes, never errors; this type only covers setup mistakes and
//! malformed input.

use thiserror::Error;

use crate::AgentId;

/// The top-level error type for `sw-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for `sw-core`.
pub type CoreResult<T> = Result<T, CoreError>;
