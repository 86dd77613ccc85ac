//! Rectangular rooms
//!
//! A room is a wall ring around a walkable interior. Doors are border cells
//! that hallways punch through; they are tracked separately so the border
//! itself always stays the full wall ring.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::config::{MIN_ROOM_DIM, RoomLimits};
use crate::error::GenerationError;
use crate::rng::GameRng;

use super::{Pos, Region, Tile, TileKind};

/// A room with its interior, border and door tiles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    interior: BTreeMap<Pos, Tile>,
    border: BTreeMap<Pos, Tile>,
    doors: BTreeMap<Pos, Tile>,
}

impl Room {
    /// Create a room with a plain floor interior.
    ///
    /// Both sides must be at least [`MIN_ROOM_DIM`].
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Result<Self, GenerationError> {
        Self::build(x, y, width, height, |_| TileKind::Floor)
    }

    /// Create a room whose interior cells turn to grass with probability `grass_chance`
    pub fn with_grass(
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        grass_chance: f64,
        rng: &mut GameRng,
    ) -> Result<Self, GenerationError> {
        Self::build(x, y, width, height, |_| {
            if rng.chance(grass_chance) {
                TileKind::Grass
            } else {
                TileKind::Floor
            }
        })
    }

    fn build(
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        mut floor: impl FnMut(Pos) -> TileKind,
    ) -> Result<Self, GenerationError> {
        if width < MIN_ROOM_DIM || height < MIN_ROOM_DIM {
            return Err(GenerationError::RoomTooSmall {
                x,
                y,
                width,
                height,
            });
        }

        let mut interior = BTreeMap::new();
        let mut border = BTreeMap::new();
        for row in y..y + height {
            for col in x..x + width {
                let pos = Pos::new(col, row);
                let on_edge =
                    row == y || row == y + height - 1 || col == x || col == x + width - 1;
                if on_edge {
                    border.insert(pos, Tile::at(TileKind::Wall, pos));
                } else {
                    interior.insert(pos, Tile::at(floor(pos), pos));
                }
            }
        }

        Ok(Self {
            x,
            y,
            width,
            height,
            interior,
            border,
            doors: BTreeMap::new(),
        })
    }

    /// Place a room inside `region`, leaving at least one void cell on every side.
    ///
    /// Fails if the region is smaller than the smallest room plus its margin.
    pub fn generate_in_region(
        region: Region,
        limits: &RoomLimits,
        grass_chance: f64,
        rng: &mut GameRng,
    ) -> Result<Self, GenerationError> {
        let min_region_w = limits.min_width + 2;
        let min_region_h = limits.min_height + 2;
        if !region.fits(min_region_w, min_region_h) {
            return Err(GenerationError::RegionTooSmall {
                width: region.width,
                height: region.height,
                min_width: min_region_w,
                min_height: min_region_h,
            });
        }

        let (x, width) = place_span(
            region.x,
            region.width,
            limits.min_width,
            limits.max_width,
            rng,
        );
        let (y, height) = place_span(
            region.y,
            region.height,
            limits.min_height,
            limits.max_height,
            rng,
        );
        Self::with_grass(x, y, width, height, grass_chance, rng)
    }

    /// Reference point for room-to-room distances.
    ///
    /// This is `((x + width - 1) / 2, (y + height - 1) / 2)`, which is not the
    /// geometric middle of the room. Use [`Room::midpoint`] for a cell that is
    /// guaranteed to be inside.
    pub const fn center(&self) -> Pos {
        Pos::new((self.x + self.width - 1) / 2, (self.y + self.height - 1) / 2)
    }

    /// Middle cell of the room, always part of the interior
    pub const fn midpoint(&self) -> Pos {
        Pos::new(self.x + (self.width - 1) / 2, self.y + (self.height - 1) / 2)
    }

    /// Columns covered by the interior
    pub const fn interior_cols(&self) -> RangeInclusive<i32> {
        self.x + 1..=self.x + self.width - 2
    }

    /// Rows covered by the interior
    pub const fn interior_rows(&self) -> RangeInclusive<i32> {
        self.y + 1..=self.y + self.height - 2
    }

    pub const fn right(&self) -> i32 {
        self.x + self.width - 1
    }

    pub const fn bottom(&self) -> i32 {
        self.y + self.height - 1
    }

    pub fn interior(&self) -> &BTreeMap<Pos, Tile> {
        &self.interior
    }

    pub fn border(&self) -> &BTreeMap<Pos, Tile> {
        &self.border
    }

    pub fn doors(&self) -> &BTreeMap<Pos, Tile> {
        &self.doors
    }

    pub fn contains_interior(&self, pos: Pos) -> bool {
        self.interior.contains_key(&pos)
    }

    /// Promote a border cell to a door
    pub fn add_door(&mut self, pos: Pos) -> Result<(), GenerationError> {
        if !self.border.contains_key(&pos) {
            return Err(GenerationError::DoorNotOnBorder { pos });
        }
        self.doors.insert(pos, Tile::at(TileKind::Door, pos));
        Ok(())
    }

    /// Random interior cell
    pub fn pick_interior_point(&self, rng: &mut GameRng) -> Pos {
        let idx = rng.rn2(self.interior.len() as u32) as usize;
        // interior is never empty: both sides are at least MIN_ROOM_DIM
        self.interior
            .keys()
            .nth(idx)
            .copied()
            .unwrap_or_else(|| self.midpoint())
    }

    /// Random interior cell for which `keep` holds, if there is one
    pub fn pick_interior_point_where(
        &self,
        rng: &mut GameRng,
        keep: impl Fn(Pos) -> bool,
    ) -> Option<Pos> {
        let candidates: Vec<Pos> = self.interior.keys().copied().filter(|p| keep(*p)).collect();
        rng.choose(&candidates).copied()
    }

    /// Every tile of the room as it should be stamped into a grid, doors
    /// replacing the wall they sit on.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        self.interior.values().copied().chain(
            self.border
                .iter()
                .map(|(pos, wall)| self.doors.get(pos).copied().unwrap_or(*wall)),
        )
    }
}

/// Pick a size in `[min, min(region - 2, max)]` and an offset leaving a
/// one-cell margin on both ends.
fn place_span(start: i32, extent: i32, min: i32, max: i32, rng: &mut GameRng) -> (i32, i32) {
    if extent == min + 2 {
        return (start + 1, min);
    }
    let size = rng.range_inclusive(min, (extent - 2).min(max));
    let offset = rng.range_inclusive(start + 1, start + extent - 1 - size);
    (offset, size)
}
