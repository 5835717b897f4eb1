//! Per-agent path state and its persisted form.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use sw_core::TilePos;
use sw_spatial::CompressedPath;

use crate::waypoint::Journey;
use crate::{MobilityError, MobilityResult};

/// Target fingerprint: `"{tile}~{range}"`.
pub fn fingerprint(target: TilePos, range: u32) -> String {
    format!("{target}~{range}")
}

// ── PathState ─────────────────────────────────────────────────────────────────

/// One agent's cursor into its current path and journey.
///
/// Created on the first travel request and removed on arrival.  A path is
/// dropped (left empty) on retarget, when it can no longer be rebased onto
/// the agent's position, or when the agent has been blocked too long.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathState {
    /// Remaining directions; the head starts at `expected`.
    pub path: CompressedPath,

    /// Tile the agent should be standing on for the head to apply.
    pub expected: TilePos,

    /// Fingerprint of the leg target `path` was computed for.
    pub target_fingerprint: Option<String>,

    pub journey: Journey,

    /// Position at the last `advance` that produced a move.
    pub previous_position: Option<TilePos>,

    /// Consecutive steps the agent failed to leave `previous_position`.
    pub blocked_steps: u32,

    /// Directions consumed since the last search.
    pub reused_steps: u32,

    /// `path` came from an incomplete search.
    pub incomplete: bool,

    /// The last path ran into something the matrices did not show; the next
    /// plan skips the route cache.
    pub stale: bool,
}

impl PathState {
    pub fn new(journey: Journey, position: TilePos) -> Self {
        Self {
            path:               CompressedPath::new(),
            expected:           position,
            target_fingerprint: None,
            journey,
            previous_position:  None,
            blocked_steps:      0,
            reused_steps:       0,
            incomplete:         false,
            stale:              false,
        }
    }

    /// Forget the path but keep the journey.
    pub fn drop_path(&mut self) {
        self.path = CompressedPath::new();
        self.target_fingerprint = None;
        self.reused_steps = 0;
        self.incomplete = false;
    }

    pub fn to_persisted(&self) -> PersistedPathState {
        let (target, waypoints, marker_chain, next_marker_name) = match &self.journey {
            Journey::Direct(t) => (Some(t.to_string()), None, None, None),
            Journey::Waypoints(w) => {
                (None, Some(w.iter().map(|t| t.to_string()).collect()), None, None)
            }
            Journey::Markers { chain, current } => {
                (None, None, Some(chain.clone()), Some(current.clone()))
            }
        };
        PersistedPathState {
            path:               self.path.to_string(),
            expected:           self.expected.to_string(),
            target_fingerprint: self.target_fingerprint.clone(),
            target,
            waypoints,
            marker_chain,
            next_marker_name,
            previous_position:  self.previous_position.map(|p| p.to_string()),
            blocked_steps:      self.blocked_steps,
            reused_steps:       self.reused_steps,
            incomplete:         self.incomplete,
            stale:              self.stale,
        }
    }
}

// ── Persisted form ────────────────────────────────────────────────────────────

/// Serializable [`PathState`]: directions as a digit string, tiles as
/// `E0S0:10:10` strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedPathState {
    pub path: String,
    pub expected: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_fingerprint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waypoints: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker_chain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_marker_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_position: Option<String>,
    #[serde(default)]
    pub blocked_steps: u32,
    #[serde(default)]
    pub reused_steps: u32,
    #[serde(default)]
    pub incomplete: bool,
    #[serde(default)]
    pub stale: bool,
}

impl PersistedPathState {
    pub fn into_state(self) -> MobilityResult<PathState> {
        let tile = |s: &str| s.parse::<TilePos>().map_err(MobilityError::from);

        let journey = match (self.target, self.waypoints, self.marker_chain, self.next_marker_name) {
            (Some(t), None, None, None) => Journey::Direct(tile(t.as_str())?),
            (None, Some(w), None, None) => Journey::Waypoints(
                w.iter().map(|s| tile(s.as_str())).collect::<MobilityResult<VecDeque<_>>>()?,
            ),
            (None, None, chain, Some(current)) => Journey::Markers {
                chain: chain.unwrap_or_else(|| current.clone()),
                current,
            },
            _ => return Err(MobilityError::BadPersistedState("exactly one journey kind required".into())),
        };

        Ok(PathState {
            path:               self.path.parse()?,
            expected:           tile(self.expected.as_str())?,
            target_fingerprint: self.target_fingerprint,
            journey,
            previous_position:  self.previous_position.as_deref().map(tile).transpose()?,
            blocked_steps:      self.blocked_steps,
            reused_steps:       self.reused_steps,
            incomplete:         self.incomplete,
            stale:              self.stale,
        })
    }
}
