//! Grid cells and positions

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// A grid coordinate, `x` is the column and `y` the row
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance `|dx| + |dy|`
    pub const fn manhattan(self, other: Pos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Pos {
        Pos::new(self.x + dx, self.y + dy)
    }

    /// The eight surrounding cells, row by row
    pub fn neighbours8(self) -> impl Iterator<Item = Pos> {
        (-1..=1)
            .flat_map(move |dy| (-1..=1).map(move |dx| (dx, dy)))
            .filter(|&(dx, dy)| dx != 0 || dy != 0)
            .map(move |(dx, dy)| self.offset(dx, dy))
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Pos {
    fn from((x, y): (i32, i32)) -> Self {
        Pos::new(x, y)
    }
}

/// What occupies a cell
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum TileKind {
    #[default]
    Void,
    Floor,
    Grass,
    Wall,
    Door,
    Ladder,
}

impl TileKind {
    /// Only walls are removed from the navigation graph
    pub const fn is_blocking(&self) -> bool {
        matches!(self, TileKind::Wall)
    }

    /// Kinds a hallway path may be made of
    pub const fn is_corridor(&self) -> bool {
        matches!(self, TileKind::Floor | TileKind::Grass)
    }

    /// ASCII symbol used for headless rendering
    pub const fn symbol(&self) -> char {
        match self {
            TileKind::Void => ' ',
            TileKind::Floor => '.',
            TileKind::Grass => '"',
            TileKind::Wall => '#',
            TileKind::Door => '+',
            TileKind::Ladder => '>',
        }
    }
}

/// A single grid cell.
///
/// Equality and hashing cover the kind as well as the position, so two tiles
/// at the same spot with different kinds are different values. Maps in this
/// crate are keyed by [`Pos`]; changing a kind means inserting a new tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub kind: TileKind,
    pub x: i32,
    pub y: i32,
}

impl Tile {
    pub const fn new(kind: TileKind, x: i32, y: i32) -> Self {
        Self { kind, x, y }
    }

    pub const fn at(kind: TileKind, pos: Pos) -> Self {
        Self::new(kind, pos.x, pos.y)
    }

    pub const fn pos(&self) -> Pos {
        Pos::new(self.x, self.y)
    }

    /// Same position, different kind
    pub const fn with_kind(self, kind: TileKind) -> Self {
        Self { kind, ..self }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.kind, self.pos())
    }
}
