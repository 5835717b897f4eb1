//! Direction-sequence path encoding.
//!
//! A [`CompressedPath`] stores the directions of a walk, not its positions.
//! Positions are implied by a known origin plus the directions consumed so
//! far, so advancing is a `pop_front` and persisting is a short digit string
//! (`"3332"`).

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use sw_core::{Direction, TilePos};

use crate::SpatialError;

/// An ordered walk of single-tile steps relative to an origin.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "String", try_from = "String")
)]
pub struct CompressedPath {
    dirs: VecDeque<Direction>,
}

impl CompressedPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_dirs(dirs: impl IntoIterator<Item = Direction>) -> Self {
        Self { dirs: dirs.into_iter().collect() }
    }

    /// Encode a walk of consecutive positions.
    ///
    /// Returns `None` if two consecutive positions are not neighbours.
    pub fn from_positions(positions: &[TilePos]) -> Option<Self> {
        positions
            .windows(2)
            .map(|w| {
                if w[0].range_to(w[1]) == 1 { w[0].direction_to(w[1]) } else { None }
            })
            .collect::<Option<VecDeque<_>>>()
            .map(|dirs| Self { dirs })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    #[inline]
    pub fn head(&self) -> Option<Direction> {
        self.dirs.front().copied()
    }

    #[inline]
    pub fn pop_front(&mut self) -> Option<Direction> {
        self.dirs.pop_front()
    }

    pub fn push_front(&mut self, dir: Direction) {
        self.dirs.push_front(dir);
    }

    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        self.dirs.iter().copied()
    }

    /// Tile reached by walking the whole path from `origin`.
    pub fn replay(&self, origin: TilePos) -> TilePos {
        self.dirs.iter().fold(origin, |pos, &d| pos.step(d))
    }

    /// Every tile on the walk, `origin` included.
    pub fn positions(&self, origin: TilePos) -> Vec<TilePos> {
        let mut out = Vec::with_capacity(self.dirs.len() + 1);
        out.push(origin);
        let mut pos = origin;
        for &d in &self.dirs {
            pos = pos.step(d);
            out.push(pos);
        }
        out
    }

    /// Keep steps up to and including the first one that leaves `origin`'s
    /// region.
    pub fn truncate_at_region_exit(&mut self, origin: TilePos) {
        let mut pos = origin;
        for (i, &d) in self.dirs.iter().enumerate() {
            pos = pos.step(d);
            if pos.region != origin.region {
                self.dirs.truncate(i + 1);
                return;
            }
        }
    }

    /// Re-derive this path for an agent standing at `current` when the path
    /// was recorded from `origin`.
    ///
    /// Picks the furthest tile on the walk that `current` is on or next to.
    /// If `current` is on the walk the remaining suffix is returned; if it is
    /// next to it, one step onto the walk is prefixed.  Returns `None` when
    /// `current` is not within one tile of any point on the walk.
    pub fn rebase(&self, origin: TilePos, current: TilePos) -> Option<CompressedPath> {
        if origin == current {
            return Some(self.clone());
        }
        let positions = self.positions(origin);
        let (i, &join) = positions
            .iter()
            .enumerate()
            .rev()
            .find(|(_, p)| p.is_near_to(current))?;

        let mut rest = CompressedPath { dirs: self.dirs.iter().skip(i).copied().collect() };
        if join != current {
            rest.push_front(current.direction_to(join)?);
        }
        Some(rest)
    }
}

impl fmt::Display for CompressedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in &self.dirs {
            write!(f, "{}", d.as_digit())?;
        }
        Ok(())
    }
}

impl FromStr for CompressedPath {
    type Err = SpatialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .map(|c| Direction::from_digit(c).ok_or_else(|| SpatialError::BadPath(s.to_owned())))
            .collect::<Result<VecDeque<_>, _>>()
            .map(|dirs| Self { dirs })
    }
}

impl From<CompressedPath> for String {
    fn from(p: CompressedPath) -> String {
        p.to_string()
    }
}

impl TryFrom<String> for CompressedPath {
    type Error = SpatialError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
