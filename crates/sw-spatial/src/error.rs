//! Spatial-subsystem error type.

use thiserror::Error;

use sw_core::{CoreError, RegionId, TilePos};

/// Errors produced by `sw-spatial`.
///
/// Searches never fail with an error; an unreachable goal is `None` from the
/// router.  These cover map construction and path decoding.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("region {0} not in world map")]
    UnknownRegion(RegionId),

    #[error("region {0} already in world map")]
    DuplicateRegion(RegionId),

    #[error("map cell ({x}, {y}) outside the region")]
    OutOfBounds { x: usize, y: usize },

    #[error("unknown map character {0:?}")]
    BadMapChar(char),

    #[error("portal tile {0} is not walkable")]
    PortalNotWalkable(TilePos),

    #[error("invalid path encoding {0:?}")]
    BadPath(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
