//! Hallway construction
//!
//! A hallway is a 4-connected run of floor (or grass) cells from `start` to
//! `end`, either one straight segment or two segments meeting at a bend.
//! Segments may carry a wall border one cell to each side.

use std::collections::{BTreeMap, VecDeque};

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::error::GenerationError;
use crate::rng::GameRng;

use super::{Pos, Tile, TileKind};

/// Which leg of an L-shaped hallway comes first, starting from `start`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Bend {
    HorizontalFirst,
    VerticalFirst,
}

/// How segments are carved
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarveOptions {
    pub grass_chance: f64,
    pub add_border: bool,
}

impl Default for CarveOptions {
    fn default() -> Self {
        Self {
            grass_chance: 0.0,
            add_border: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hallway {
    start: Pos,
    end: Pos,
    path: BTreeMap<Pos, Tile>,
    border: BTreeMap<Pos, Tile>,
}

impl Hallway {
    /// An empty hallway between two points, to be carved
    pub fn new(start: Pos, end: Pos) -> Self {
        Self {
            start,
            end,
            path: BTreeMap::new(),
            border: BTreeMap::new(),
        }
    }

    /// Build a hallway from an explicit list of path tiles.
    ///
    /// Every tile must be Floor or Grass, and the tiles must join `start` to
    /// `end` through 4-adjacent steps.
    pub fn from_tiles(
        start: Pos,
        end: Pos,
        tiles: impl IntoIterator<Item = Tile>,
    ) -> Result<Self, GenerationError> {
        let mut hallway = Self::new(start, end);
        for tile in tiles {
            if !tile.kind.is_corridor() {
                return Err(GenerationError::InvalidHallwayTile {
                    pos: tile.pos(),
                    kind: tile.kind,
                });
            }
            hallway.path.insert(tile.pos(), tile);
        }
        if !hallway.is_connected() {
            return Err(GenerationError::DisconnectedHallway { start, end });
        }
        Ok(hallway)
    }

    /// One straight segment; `start` and `end` must share a row or a column
    pub fn straight(
        start: Pos,
        end: Pos,
        opts: CarveOptions,
        rng: &mut GameRng,
    ) -> Result<Self, GenerationError> {
        let mut hallway = Self::new(start, end);
        if start.y == end.y {
            hallway.carve_horizontal(start, end, opts, rng);
        } else if start.x == end.x {
            hallway.carve_vertical(start, end, opts, rng);
        } else {
            return Err(GenerationError::NotAxisAligned { start, end });
        }
        Ok(hallway)
    }

    /// Two segments joined at a corner
    pub fn l_shaped(
        start: Pos,
        end: Pos,
        bend: Bend,
        opts: CarveOptions,
        rng: &mut GameRng,
    ) -> Self {
        let mut hallway = Self::new(start, end);
        match bend {
            Bend::HorizontalFirst => {
                let corner = Pos::new(end.x, start.y);
                hallway.carve_horizontal(start, corner, opts, rng);
                hallway.carve_vertical(corner, end, opts, rng);
            }
            Bend::VerticalFirst => {
                let corner = Pos::new(start.x, end.y);
                hallway.carve_vertical(start, corner, opts, rng);
                hallway.carve_horizontal(corner, end, opts, rng);
            }
        }
        hallway
    }

    /// Carve along `from.y` between the two columns, inclusive
    pub fn carve_horizontal(&mut self, from: Pos, to: Pos, opts: CarveOptions, rng: &mut GameRng) {
        let y = from.y;
        for x in from.x.min(to.x)..=from.x.max(to.x) {
            self.carve_cell(Pos::new(x, y), opts.grass_chance, rng);
            if opts.add_border {
                self.add_border_cell(Pos::new(x, y - 1));
                self.add_border_cell(Pos::new(x, y + 1));
            }
        }
    }

    /// Carve along `from.x` between the two rows, inclusive
    pub fn carve_vertical(&mut self, from: Pos, to: Pos, opts: CarveOptions, rng: &mut GameRng) {
        let x = from.x;
        for y in from.y.min(to.y)..=from.y.max(to.y) {
            self.carve_cell(Pos::new(x, y), opts.grass_chance, rng);
            if opts.add_border {
                self.add_border_cell(Pos::new(x - 1, y));
                self.add_border_cell(Pos::new(x + 1, y));
            }
        }
    }

    fn carve_cell(&mut self, pos: Pos, grass_chance: f64, rng: &mut GameRng) {
        let kind = if rng.chance(grass_chance) {
            TileKind::Grass
        } else {
            TileKind::Floor
        };
        self.border.remove(&pos);
        self.path.insert(pos, Tile::at(kind, pos));
    }

    fn add_border_cell(&mut self, pos: Pos) {
        if !self.path.contains_key(&pos) {
            self.border.insert(pos, Tile::at(TileKind::Wall, pos));
        }
    }

    pub fn start(&self) -> Pos {
        self.start
    }

    pub fn end(&self) -> Pos {
        self.end
    }

    pub fn path(&self) -> &BTreeMap<Pos, Tile> {
        &self.path
    }

    pub fn border(&self) -> &BTreeMap<Pos, Tile> {
        &self.border
    }

    /// Border walls followed by path tiles, so path wins when stamped in order
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        self.border.values().chain(self.path.values()).copied()
    }

    /// Whether `end` is reachable from `start` through path cells alone
    pub fn is_connected(&self) -> bool {
        if !self.path.contains_key(&self.start) || !self.path.contains_key(&self.end) {
            return false;
        }
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([self.start]);
        seen.insert(self.start);
        while let Some(pos) = queue.pop_front() {
            if pos == self.end {
                return true;
            }
            for next in [
                pos.offset(1, 0),
                pos.offset(-1, 0),
                pos.offset(0, 1),
                pos.offset(0, -1),
            ] {
                if self.path.contains_key(&next) && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        false
    }
}
