//! Tile positions, regions, and compass directions.
//!
//! # Coordinate model
//!
//! The world is an unbounded grid of square regions, each `REGION_SIZE`
//! tiles wide.  A region is addressed by its grid coordinate `(x, y)` and
//! named the Screeps way:
//!
//! ```text
//!   x >= 0 → "E{x}"      x < 0 → "W{-x-1}"
//!   y >= 0 → "S{y}"      y < 0 → "N{-y-1}"
//! ```
//!
//! so `RegionId { x: 0, y: 0 }` is `E0S0` and `RegionId { x: -1, y: -3 }`
//! is `W0N2`.  A tile is `(x, y)` local to its region; every geometric
//! operation goes through *world* coordinates (`region.x * 50 + x`), which
//! makes adjacency across a region boundary an ordinary integer test.
//!
//! `y` grows downward: `North` is `y - 1`.

use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// Width and height of a region, in tiles.
pub const REGION_SIZE: u8 = 50;

const SIZE: i32 = REGION_SIZE as i32;

// ── RegionId ──────────────────────────────────────────────────────────────────

/// Grid coordinate of a region.  Displayed and parsed as `E0S0`-style names.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "String", try_from = "String")
)]
pub struct RegionId {
    pub x: i16,
    pub y: i16,
}

impl RegionId {
    #[inline]
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    /// The region one step away in `dir` (diagonals included).
    pub fn neighbor(self, dir: Direction) -> RegionId {
        let (dx, dy) = dir.offset();
        RegionId::new(self.x + dx as i16, self.y + dy as i16)
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.x >= 0 {
            write!(f, "E{}", self.x)?;
        } else {
            write!(f, "W{}", -(self.x as i32) - 1)?;
        }
        if self.y >= 0 {
            write!(f, "S{}", self.y)
        } else {
            write!(f, "N{}", -(self.y as i32) - 1)
        }
    }
}

impl FromStr for RegionId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || CoreError::Parse(format!("invalid region name {s:?}"));

        let split = s
            .get(1..)
            .and_then(|rest| rest.find(['N', 'S']))
            .map(|i| i + 1)
            .ok_or_else(bad)?;
        let (horiz, vert) = s.split_at(split);

        let axis = |part: &str, pos: char, neg: char| -> Result<i16, CoreError> {
            let mut chars = part.chars();
            let head = chars.next().ok_or_else(bad)?;
            let digits = chars.as_str();
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(bad());
            }
            let n: i32 = digits.parse::<u16>().map_err(|_| bad())?.into();
            let coord = match head {
                c if c == pos => n,
                c if c == neg => -n - 1,
                _ => return Err(bad()),
            };
            i16::try_from(coord).map_err(|_| bad())
        };

        Ok(RegionId::new(axis(horiz, 'E', 'W')?, axis(vert, 'S', 'N')?))
    }
}

impl From<RegionId> for String {
    fn from(region: RegionId) -> String {
        region.to_string()
    }
}

impl TryFrom<String> for RegionId {
    type Error = CoreError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

// ── Direction ─────────────────────────────────────────────────────────────────

/// One of the eight compass directions.
///
/// The discriminants (`1..=8`, clockwise from north) are the digits used by
/// the compressed path encoding.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Direction {
    North     = 1,
    NorthEast = 2,
    East      = 3,
    SouthEast = 4,
    South     = 5,
    SouthWest = 6,
    West      = 7,
    NorthWest = 8,
}

impl Direction {
    /// All directions, orthogonals first.
    ///
    /// Neighbour expansion iterates in this order, so on equal cost a search
    /// settles orthogonal steps before diagonal ones.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::NorthWest,
    ];

    /// `(dx, dy)` unit offset; `y` grows southward.
    #[inline]
    pub fn offset(self) -> (i8, i8) {
        match self {
            Direction::North     => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East      => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South     => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West      => (-1, 0),
            Direction::NorthWest => (-1, -1),
        }
    }

    /// Direction for a unit offset, or `None` for `(0, 0)` / non-unit offsets.
    pub fn from_offset(dx: i32, dy: i32) -> Option<Direction> {
        match (dx, dy) {
            (0, -1)  => Some(Direction::North),
            (1, -1)  => Some(Direction::NorthEast),
            (1, 0)   => Some(Direction::East),
            (1, 1)   => Some(Direction::SouthEast),
            (0, 1)   => Some(Direction::South),
            (-1, 1)  => Some(Direction::SouthWest),
            (-1, 0)  => Some(Direction::West),
            (-1, -1) => Some(Direction::NorthWest),
            _        => None,
        }
    }

    #[inline]
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North     => Direction::South,
            Direction::NorthEast => Direction::SouthWest,
            Direction::East      => Direction::West,
            Direction::SouthEast => Direction::NorthWest,
            Direction::South     => Direction::North,
            Direction::SouthWest => Direction::NorthEast,
            Direction::West      => Direction::East,
            Direction::NorthWest => Direction::SouthEast,
        }
    }

    #[inline]
    pub fn is_diagonal(self) -> bool {
        let (dx, dy) = self.offset();
        dx != 0 && dy != 0
    }

    /// Path-encoding digit (`'1'..='8'`).
    #[inline]
    pub fn as_digit(self) -> char {
        (b'0' + self as u8) as char
    }

    pub fn from_digit(c: char) -> Option<Direction> {
        match c {
            '1' => Some(Direction::North),
            '2' => Some(Direction::NorthEast),
            '3' => Some(Direction::East),
            '4' => Some(Direction::SouthEast),
            '5' => Some(Direction::South),
            '6' => Some(Direction::SouthWest),
            '7' => Some(Direction::West),
            '8' => Some(Direction::NorthWest),
            _   => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::North     => "north",
            Direction::NorthEast => "north_east",
            Direction::East      => "east",
            Direction::SouthEast => "south_east",
            Direction::South     => "south",
            Direction::SouthWest => "south_west",
            Direction::West      => "west",
            Direction::NorthWest => "north_west",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── TilePos ───────────────────────────────────────────────────────────────────

/// A tile: local `(x, y)` inside `region`.
///
/// Field order makes the derived `Ord` sort by region first, which keeps
/// `BTreeMap<TilePos, _>` iteration grouped by region.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TilePos {
    pub region: RegionId,
    pub x: u8,
    pub y: u8,
}

impl TilePos {
    #[inline]
    pub fn new(region: RegionId, x: u8, y: u8) -> Self {
        debug_assert!(x < REGION_SIZE && y < REGION_SIZE, "tile ({x},{y}) out of region bounds");
        Self { region, x, y }
    }

    /// Absolute world coordinate.
    #[inline]
    pub fn world(self) -> (i32, i32) {
        (
            self.region.x as i32 * SIZE + self.x as i32,
            self.region.y as i32 * SIZE + self.y as i32,
        )
    }

    /// Inverse of [`world`](Self::world).
    #[inline]
    pub fn from_world(wx: i32, wy: i32) -> Self {
        Self {
            region: RegionId::new(wx.div_euclid(SIZE) as i16, wy.div_euclid(SIZE) as i16),
            x: wx.rem_euclid(SIZE) as u8,
            y: wy.rem_euclid(SIZE) as u8,
        }
    }

    /// Row-major index into a region-sized array.
    #[inline]
    pub fn local_index(self) -> usize {
        self.y as usize * REGION_SIZE as usize + self.x as usize
    }

    /// Chebyshev distance in tiles (one diagonal step counts as one).
    #[inline]
    pub fn range_to(self, other: TilePos) -> u32 {
        let (ax, ay) = self.world();
        let (bx, by) = other.world();
        (ax - bx).unsigned_abs().max((ay - by).unsigned_abs())
    }

    #[inline]
    pub fn in_range_to(self, other: TilePos, range: u32) -> bool {
        self.range_to(other) <= range
    }

    /// `true` if `other` is this tile or one of its eight neighbours.
    #[inline]
    pub fn is_near_to(self, other: TilePos) -> bool {
        self.range_to(other) <= 1
    }

    /// General compass direction toward `other`; `None` if they are equal.
    pub fn direction_to(self, other: TilePos) -> Option<Direction> {
        let (ax, ay) = self.world();
        let (bx, by) = other.world();
        Direction::from_offset((bx - ax).signum(), (by - ay).signum())
    }

    /// The neighbouring tile in `dir`, crossing into the adjacent region
    /// when stepping off an edge.
    #[inline]
    pub fn step(self, dir: Direction) -> TilePos {
        let (wx, wy) = self.world();
        let (dx, dy) = dir.offset();
        TilePos::from_world(wx + dx as i32, wy + dy as i32)
    }

    /// `true` on the outermost ring of the region.
    #[inline]
    pub fn is_region_edge(self) -> bool {
        self.x == 0 || self.y == 0 || self.x == REGION_SIZE - 1 || self.y == REGION_SIZE - 1
    }
}

impl fmt::Display for TilePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.region, self.x, self.y)
    }
}

impl FromStr for TilePos {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || CoreError::Parse(format!("invalid tile {s:?}"));
        let mut parts = s.split(':');
        let region: RegionId = parts.next().ok_or_else(bad)?.parse()?;
        let x: u8 = parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
        let y: u8 = parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
        if parts.next().is_some() || x >= REGION_SIZE || y >= REGION_SIZE {
            return Err(bad());
        }
        Ok(TilePos::new(region, x, y))
    }
}
