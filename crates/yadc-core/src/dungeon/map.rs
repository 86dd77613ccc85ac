//! The dungeon aggregate: a total tile grid plus the rooms and hallways
//! stamped into it.

use serde::{Deserialize, Serialize};

use crate::config::DungeonConfig;
use crate::error::GenerationError;
use crate::rng::GameRng;

use super::generation::Generator;
use super::{Hallway, Pos, Room, Tile, TileKind};

/// Symbol used to mark a route in [`Dungeon::render_with_path`]
pub const PATH_MARK: char = 'x';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dungeon {
    width: i32,
    height: i32,
    /// Row-major, exactly `width * height` tiles
    tiles: Vec<Tile>,
    pub(crate) rooms: Vec<Room>,
    pub(crate) hallways: Vec<Hallway>,
    pub(crate) spawn_room: usize,
    pub(crate) ladder: Option<Pos>,
}

impl Dungeon {
    /// A grid of Void tiles with no rooms
    pub fn blank(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let tiles = (0..height)
            .flat_map(|y| (0..width).map(move |x| Tile::new(TileKind::Void, x, y)))
            .collect();
        Self {
            width,
            height,
            tiles,
            rooms: Vec::new(),
            hallways: Vec::new(),
            spawn_room: 0,
            ladder: None,
        }
    }

    /// Generate a full level: BSP rooms, hallways, hallway walls and ladder
    pub fn generate(config: &DungeonConfig, rng: &mut GameRng) -> Result<Self, GenerationError> {
        config.validate()?;
        Generator::new(config, rng).run()
    }

    /// Generate with default room settings and a fixed seed
    pub fn with_size(width: i32, height: i32, seed: u64) -> Result<Self, GenerationError> {
        let config = DungeonConfig {
            seed: Some(seed),
            ..DungeonConfig::with_size(width, height)
        };
        Self::generate(&config, &mut GameRng::new(seed))
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub const fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        self.in_bounds(pos).then(|| (pos.y * self.width + pos.x) as usize)
    }

    /// Tile at a cell, `None` outside the grid
    pub fn tile_at(&self, x: i32, y: i32) -> Option<Tile> {
        self.tile(Pos::new(x, y))
    }

    pub fn tile(&self, pos: Pos) -> Option<Tile> {
        self.index(pos).map(|i| self.tiles[i])
    }

    /// Replace the tile at its own position. Out-of-bounds tiles are ignored.
    pub fn set_tile(&mut self, tile: Tile) -> bool {
        match self.index(tile.pos()) {
            Some(i) => {
                self.tiles[i] = tile;
                true
            }
            None => false,
        }
    }

    /// Every tile, row by row
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn hallways(&self) -> &[Hallway] {
        &self.hallways
    }

    pub fn ladder_position(&self) -> Option<Pos> {
        self.ladder
    }

    pub fn spawn_room_index(&self) -> usize {
        self.spawn_room
    }

    pub fn spawn_room(&self) -> Option<&Room> {
        self.rooms.get(self.spawn_room)
    }

    /// Where the player starts: the middle of the spawn room
    pub fn spawn_point(&self) -> Option<Pos> {
        self.spawn_room().map(Room::midpoint)
    }

    /// Exact cell match with the ladder
    pub fn is_ladder_reached(&self, pos: Pos) -> bool {
        self.ladder == Some(pos)
    }

    /// Index of a random room
    pub fn pick_random_room(&self, rng: &mut GameRng) -> Option<usize> {
        if self.rooms.is_empty() {
            None
        } else {
            Some(rng.rn2(self.rooms.len() as u32) as usize)
        }
    }

    /// Rooms other than the listed indices
    pub fn filter_rooms<'a>(
        &'a self,
        exclude: &'a [usize],
    ) -> impl Iterator<Item = (usize, &'a Room)> + 'a {
        self.rooms
            .iter()
            .enumerate()
            .filter(move |(i, _)| !exclude.contains(i))
    }

    /// In-bounds cells around `pos`, diagonals included
    pub fn neighbours(&self, pos: Pos) -> impl Iterator<Item = Pos> + '_ {
        pos.neighbours8().filter(|p| self.in_bounds(*p))
    }

    /// Index of the room whose center is farthest from `from`'s center.
    ///
    /// Only a strictly positive distance counts, so a lone room yields `None`.
    pub fn farthest_room(from: &Room, rooms: &[Room]) -> Option<usize> {
        let origin = from.center();
        let mut best = None;
        let mut max_dist = 0;
        for (i, room) in rooms.iter().enumerate() {
            let dist = origin.manhattan(room.center());
            if dist > max_dist {
                max_dist = dist;
                best = Some(i);
            }
        }
        best
    }

    /// The pair `(a, b)`, `a` from `first` and `b` from `second`, whose
    /// centers are closest. Ties keep the earliest pair.
    pub fn closest_room_pair(
        rooms: &[Room],
        first: &[usize],
        second: &[usize],
    ) -> Option<(usize, usize)> {
        let mut best = None;
        let mut min_dist = u32::MAX;
        for &a in first {
            for &b in second {
                let (Some(ra), Some(rb)) = (rooms.get(a), rooms.get(b)) else {
                    continue;
                };
                let dist = ra.center().manhattan(rb.center());
                if dist < min_dist {
                    min_dist = dist;
                    best = Some((a, b));
                }
            }
        }
        best
    }

    /// ASCII picture of the grid, one line per row
    pub fn render(&self) -> String {
        self.render_with_path(&[])
    }

    /// ASCII picture with `path` cells drawn as [`PATH_MARK`]
    pub fn render_with_path(&self, path: &[Pos]) -> String {
        let mut out = String::with_capacity(((self.width + 1) * self.height) as usize);
        for row in self.tiles.chunks(self.width.max(1) as usize) {
            for tile in row {
                if path.contains(&tile.pos()) {
                    out.push(PATH_MARK);
                } else {
                    out.push(tile.kind.symbol());
                }
            }
            out.push('\n');
        }
        out
    }
}
