//! Long-journey sequencing: explicit waypoint lists and marker chains.
//!
//! The router only ever solves one leg.  A [`Journey`] turns a long trip
//! into a current leg target and knows how to move on once the agent is in
//! range of it.

use std::collections::{BTreeMap, VecDeque};

use sw_core::TilePos;

// ── Markers ───────────────────────────────────────────────────────────────────

/// A named, positioned reference point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Marker {
    pub pos:  TilePos,
    /// Explicit successor.  `None` means "auto-increment the name".
    pub next: Option<String>,
}

/// The name that follows `name` when a marker declares no successor.
///
/// A trailing number is incremented (`"flag9"` → `"flag10"`); a name with no
/// trailing digits gets `1` appended (`"route"` → `"route1"`).
pub fn next_marker_name(name: &str) -> String {
    let stem = name.trim_end_matches(|c: char| c.is_ascii_digit());
    let digits = &name[stem.len()..];
    match digits.parse::<u64>().ok().and_then(|n| n.checked_add(1)) {
        Some(n) => format!("{stem}{n}"),
        None => format!("{name}1"),
    }
}

/// All markers visible to a partition.
#[derive(Clone, Debug, Default)]
pub struct MarkerBook {
    markers: BTreeMap<String, Marker>,
}

impl MarkerBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place (or move) a marker with no explicit successor.
    pub fn place(&mut self, name: impl Into<String>, pos: TilePos) {
        self.markers.insert(name.into(), Marker { pos, next: None });
    }

    pub fn place_linked(&mut self, name: impl Into<String>, pos: TilePos, next: impl Into<String>) {
        self.markers.insert(name.into(), Marker { pos, next: Some(next.into()) });
    }

    pub fn remove(&mut self, name: &str) -> Option<Marker> {
        self.markers.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Marker> {
        self.markers.get(name)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// The marker after `name` in its chain, if it exists.
    pub fn successor(&self, name: &str) -> Option<String> {
        let next = match self.markers.get(name)?.next.as_deref() {
            Some(explicit) => explicit.to_owned(),
            None => next_marker_name(name),
        };
        self.markers.contains_key(&next).then_some(next)
    }
}

// ── Journey ───────────────────────────────────────────────────────────────────

/// What an agent is travelling toward.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Journey {
    /// A single target supplied by the caller.
    Direct(TilePos),
    /// Remaining waypoints, current leg first.
    Waypoints(VecDeque<TilePos>),
    /// A marker chain started at `chain`, currently heading for `current`.
    Markers { chain: String, current: String },
}

impl Journey {
    pub fn markers(start: impl Into<String>) -> Self {
        let start = start.into();
        Journey::Markers { chain: start.clone(), current: start }
    }

    /// Target tile of the current leg.  `None` for an exhausted waypoint list
    /// or a marker that does not exist.
    pub fn leg_target(&self, book: &MarkerBook) -> Option<TilePos> {
        match self {
            Journey::Direct(t) => Some(*t),
            Journey::Waypoints(w) => w.front().copied(),
            Journey::Markers { current, .. } => book.get(current).map(|m| m.pos),
        }
    }

    /// A waypoint list with nothing left to visit.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Journey::Waypoints(w) if w.is_empty())
    }

    /// Move on to the next leg.  Returns `false` when there is none.
    pub fn next_leg(&mut self, book: &MarkerBook) -> bool {
        match self {
            Journey::Direct(_) => false,
            Journey::Waypoints(w) => {
                w.pop_front();
                !w.is_empty()
            }
            Journey::Markers { current, .. } => match book.successor(current) {
                Some(next) => {
                    *current = next;
                    true
                }
                None => false,
            },
        }
    }

    /// `true` if a fresh request for `requested` describes this journey
    /// already in progress, so the current leg should be kept.
    pub fn continues(&self, requested: &Journey) -> bool {
        match (self, requested) {
            (Journey::Direct(a), Journey::Direct(b)) => a == b,
            (Journey::Waypoints(left), Journey::Waypoints(all)) => {
                !left.is_empty()
                    && left.len() <= all.len()
                    && all.iter().skip(all.len() - left.len()).eq(left.iter())
            }
            (Journey::Markers { chain: a, .. }, Journey::Markers { chain: b, .. }) => a == b,
            _ => false,
        }
    }
}
