//! Binary space partitioning level generator
//!
//! The map is cut recursively into regions until no region can be split
//! without leaving a half too small for a room. Each leaf gets one room.
//! Walking back up, the two halves of every cut are joined by a hallway
//! between their closest rooms, which connects the whole level:
//! - a subtree's hallways never leave its region, so later rooms never
//!   overwrite them
//! - every stamp after a room only adds walkable cells
//!
//! The traversal runs on an explicit stack instead of recursing.

use tracing::{debug, info, trace};

use crate::config::DungeonConfig;
use crate::error::GenerationError;
use crate::rng::GameRng;

use super::hallway::{Bend, CarveOptions, Hallway};
use super::{Dungeon, Pos, Region, Room, SplitAxis, Tile, TileKind};

enum Frame {
    /// Split the region or place a room in it
    Visit(Region),
    /// Both halves are done: connect them and merge their room lists
    Join,
}

/// Direction of a single-segment corridor
#[derive(Clone, Copy)]
enum Run {
    Horizontal,
    Vertical,
}

/// A hallway plan plus the wall cell it opens on each room
struct Link {
    hallway: Hallway,
    door_a: Pos,
    door_b: Pos,
}

pub(crate) struct Generator<'a> {
    config: &'a DungeonConfig,
    rng: &'a mut GameRng,
    dungeon: Dungeon,
}

impl<'a> Generator<'a> {
    pub(crate) fn new(config: &'a DungeonConfig, rng: &'a mut GameRng) -> Self {
        Self {
            config,
            rng,
            dungeon: Dungeon::blank(config.width, config.height),
        }
    }

    pub(crate) fn run(mut self) -> Result<Dungeon, GenerationError> {
        let root = Region::new(0, 0, self.config.width, self.config.height);
        let rooms = self.partition(root)?;
        debug!(rooms = rooms.len(), "partition finished");

        self.open_crossed_walls()?;
        self.add_hallway_walls();
        self.place_ladder();

        let d = self.dungeon;
        info!(
            width = d.width(),
            height = d.height(),
            rooms = d.rooms.len(),
            hallways = d.hallways.len(),
            seed = self.rng.seed(),
            "dungeon generated"
        );
        Ok(d)
    }

    /// Run the BSP over `root`, returning the indices of every room placed
    fn partition(&mut self, root: Region) -> Result<Vec<usize>, GenerationError> {
        let (min_w, min_h) = self.config.rooms.min_region();
        if !root.fits(min_w, min_h) {
            return Err(GenerationError::RegionTooSmall {
                width: root.width,
                height: root.height,
                min_width: min_w,
                min_height: min_h,
            });
        }

        let mut work = vec![Frame::Visit(root)];
        let mut done: Vec<Vec<usize>> = Vec::new();

        while let Some(frame) = work.pop() {
            match frame {
                Frame::Visit(region) => {
                    let axes = region.feasible_splits(min_w, min_h);
                    let Some(&axis) = self.rng.choose(&axes) else {
                        let index = self.add_room(region)?;
                        done.push(vec![index]);
                        continue;
                    };
                    let min = match axis {
                        SplitAxis::Horizontal => min_h,
                        SplitAxis::Vertical => min_w,
                    };
                    let offset = self.rng.range_inclusive(min, region.extent(axis) - min);
                    let (first, second) = region.split(axis, offset);
                    trace!(?region, %axis, offset, "split");
                    work.push(Frame::Join);
                    work.push(Frame::Visit(second));
                    work.push(Frame::Visit(first));
                }
                Frame::Join => {
                    let second = done.pop().unwrap_or_default();
                    let mut first = done.pop().unwrap_or_default();
                    if let Some((a, b)) =
                        Dungeon::closest_room_pair(&self.dungeon.rooms, &first, &second)
                    {
                        self.connect(a, b)?;
                    }
                    first.extend(second);
                    done.push(first);
                }
            }
        }

        Ok(done.pop().unwrap_or_default())
    }

    fn add_room(&mut self, region: Region) -> Result<usize, GenerationError> {
        let room = Room::generate_in_region(
            region,
            &self.config.rooms,
            self.config.grass_chance,
            self.rng,
        )?;
        for tile in room.tiles() {
            self.dungeon.set_tile(tile);
        }
        trace!(x = room.x, y = room.y, w = room.width, h = room.height, "room placed");
        self.dungeon.rooms.push(room);
        Ok(self.dungeon.rooms.len() - 1)
    }

    /// Join two rooms with a hallway and open a door in each
    pub(crate) fn connect(&mut self, a: usize, b: usize) -> Result<(), GenerationError> {
        if a == b {
            return Err(GenerationError::SelfConnection { index: a });
        }
        let count = self.dungeon.rooms.len();
        let (Some(r1), Some(r2)) = (self.dungeon.rooms.get(a), self.dungeon.rooms.get(b)) else {
            return Err(GenerationError::UnknownRoom {
                index: a.max(b),
                count,
            });
        };

        let opts = CarveOptions {
            grass_chance: self.config.grass_chance,
            add_border: false,
        };
        let overlap_rows = overlap(r1.interior_rows(), r2.interior_rows());
        let overlap_cols = overlap(r1.interior_cols(), r2.interior_cols());

        let mut straight = Vec::with_capacity(2);
        if !overlap_rows.is_empty() {
            straight.push(Run::Horizontal);
        }
        if !overlap_cols.is_empty() {
            straight.push(Run::Vertical);
        }

        let link = match self.rng.choose(&straight).copied() {
            Some(Run::Horizontal) => {
                let row = self.rng.choose(&overlap_rows).copied().unwrap_or(r1.y + 1);
                horizontal_link(r1, r2, row, opts, self.rng)?
            }
            Some(Run::Vertical) => {
                let col = self.rng.choose(&overlap_cols).copied().unwrap_or(r1.x + 1);
                vertical_link(r1, r2, col, opts, self.rng)?
            }
            None => {
                let bend = if self.rng.coin() {
                    Bend::HorizontalFirst
                } else {
                    Bend::VerticalFirst
                };
                let (p1, p2) = elbow_points(r1, r2, bend, self.rng);
                elbow_link(r1, r2, p1, p2, bend, opts, self.rng)
            }
        };

        debug!(
            from = a,
            to = b,
            start = %link.hallway.start(),
            end = %link.hallway.end(),
            "rooms connected"
        );

        self.dungeon.rooms[a].add_door(link.door_a)?;
        self.dungeon.rooms[b].add_door(link.door_b)?;
        for tile in link.hallway.path().values() {
            self.dungeon.set_tile(*tile);
        }
        // doors go in last so no path tile can cover them
        self.dungeon.set_tile(Tile::at(TileKind::Door, link.door_a));
        self.dungeon.set_tile(Tile::at(TileKind::Door, link.door_b));
        self.dungeon.hallways.push(link.hallway);
        Ok(())
    }

    /// Promote every room wall cell that a later hallway cut through to a
    /// door, keeping the tile map and each room's door list in step
    fn open_crossed_walls(&mut self) -> Result<(), GenerationError> {
        let d = &mut self.dungeon;
        for i in 0..d.rooms.len() {
            let crossed: Vec<Pos> = d.rooms[i]
                .border()
                .keys()
                .copied()
                .filter(|p| d.tile(*p).is_some_and(|t| t.kind.is_corridor()))
                .collect();
            for pos in crossed {
                trace!(room = i, %pos, "wall opened");
                d.rooms[i].add_door(pos)?;
                d.set_tile(Tile::at(TileKind::Door, pos));
            }
        }
        Ok(())
    }

    /// Wall in every void cell touching a hallway, diagonals included
    fn add_hallway_walls(&mut self) {
        let d = &mut self.dungeon;
        let cells: Vec<Pos> = d
            .hallways
            .iter()
            .flat_map(|h| h.path().keys().copied())
            .collect();
        for pos in cells {
            let around: Vec<Pos> = d.neighbours(pos).collect();
            for n in around {
                if d.tile(n).is_some_and(|t| t.kind == TileKind::Void) {
                    d.set_tile(Tile::at(TileKind::Wall, n));
                }
            }
        }
    }

    /// Choose the spawn room and put the ladder in the room farthest from it
    fn place_ladder(&mut self) {
        let Some(spawn) = self.dungeon.pick_random_room(self.rng) else {
            return;
        };
        let rooms = &self.dungeon.rooms;
        let target = Dungeon::farthest_room(&rooms[spawn], rooms).unwrap_or(spawn);
        let ladder = rooms[target].pick_interior_point(self.rng);

        self.dungeon.spawn_room = spawn;
        self.dungeon.ladder = Some(ladder);
        self.dungeon.set_tile(Tile::at(TileKind::Ladder, ladder));
        debug!(spawn, target, %ladder, "ladder placed");
    }
}

fn overlap(a: std::ops::RangeInclusive<i32>, b: std::ops::RangeInclusive<i32>) -> Vec<i32> {
    let lo = *a.start().max(b.start());
    let hi = *a.end().min(b.end());
    (lo..=hi).collect()
}

/// Straight corridor along `row` between the facing side walls
fn horizontal_link(
    r1: &Room,
    r2: &Room,
    row: i32,
    opts: CarveOptions,
    rng: &mut GameRng,
) -> Result<Link, GenerationError> {
    let (door_a, door_b, start, end) = if r1.x < r2.x {
        let (da, db) = (Pos::new(r1.right(), row), Pos::new(r2.x, row));
        (da, db, da.offset(1, 0), db.offset(-1, 0))
    } else {
        let (da, db) = (Pos::new(r1.x, row), Pos::new(r2.right(), row));
        (da, db, da.offset(-1, 0), db.offset(1, 0))
    };
    Ok(Link {
        hallway: Hallway::straight(start, end, opts, rng)?,
        door_a,
        door_b,
    })
}

/// Straight corridor along `col` between the facing top/bottom walls
fn vertical_link(
    r1: &Room,
    r2: &Room,
    col: i32,
    opts: CarveOptions,
    rng: &mut GameRng,
) -> Result<Link, GenerationError> {
    let (door_a, door_b, start, end) = if r1.y < r2.y {
        let (da, db) = (Pos::new(col, r1.bottom()), Pos::new(col, r2.y));
        (da, db, da.offset(0, 1), db.offset(0, -1))
    } else {
        let (da, db) = (Pos::new(col, r1.y), Pos::new(col, r2.bottom()));
        (da, db, da.offset(0, -1), db.offset(0, 1))
    };
    Ok(Link {
        hallway: Hallway::straight(start, end, opts, rng)?,
        door_a,
        door_b,
    })
}

/// Interior points for an L-shaped link whose legs stay off both rooms.
///
/// The first leg runs along `p1`'s row (or column) and must miss every row (or
/// column) of `r2`; the second runs along `p2`'s column (or row) and must miss
/// `r1`. Rooms that share no interior row or column overlap in at most one
/// wall line on each axis, and every interior spans at least two lines, so
/// both filters always leave a candidate.
fn elbow_points(r1: &Room, r2: &Room, bend: Bend, rng: &mut GameRng) -> (Pos, Pos) {
    let (r1_rows, r1_cols) = (r1.y..=r1.bottom(), r1.x..=r1.right());
    let (r2_rows, r2_cols) = (r2.y..=r2.bottom(), r2.x..=r2.right());
    let (p1, p2) = match bend {
        Bend::HorizontalFirst => (
            r1.pick_interior_point_where(rng, |p| !r2_rows.contains(&p.y)),
            r2.pick_interior_point_where(rng, |p| !r1_cols.contains(&p.x)),
        ),
        Bend::VerticalFirst => (
            r1.pick_interior_point_where(rng, |p| !r2_cols.contains(&p.x)),
            r2.pick_interior_point_where(rng, |p| !r1_rows.contains(&p.y)),
        ),
    };
    (
        p1.unwrap_or_else(|| r1.midpoint()),
        p2.unwrap_or_else(|| r2.midpoint()),
    )
}

/// L-shaped corridor between interior points `p1` of `r1` and `p2` of `r2`.
///
/// The first leg leaves `r1` through the wall facing along that leg; the
/// second leg enters `r2` through the wall facing back along it.
fn elbow_link(
    r1: &Room,
    r2: &Room,
    p1: Pos,
    p2: Pos,
    bend: Bend,
    opts: CarveOptions,
    rng: &mut GameRng,
) -> Link {
    let right = p2.x > p1.x;
    let down = p2.y > p1.y;

    let (door_a, start, door_b, end) = match bend {
        Bend::HorizontalFirst => {
            let (door_a, start) = if right {
                let d = Pos::new(r1.right(), p1.y);
                (d, d.offset(1, 0))
            } else {
                let d = Pos::new(r1.x, p1.y);
                (d, d.offset(-1, 0))
            };
            let (door_b, end) = if down {
                let d = Pos::new(p2.x, r2.y);
                (d, d.offset(0, -1))
            } else {
                let d = Pos::new(p2.x, r2.bottom());
                (d, d.offset(0, 1))
            };
            (door_a, start, door_b, end)
        }
        Bend::VerticalFirst => {
            let (door_a, start) = if down {
                let d = Pos::new(p1.x, r1.bottom());
                (d, d.offset(0, 1))
            } else {
                let d = Pos::new(p1.x, r1.y);
                (d, d.offset(0, -1))
            };
            let (door_b, end) = if right {
                let d = Pos::new(r2.x, p2.y);
                (d, d.offset(-1, 0))
            } else {
                let d = Pos::new(r2.right(), p2.y);
                (d, d.offset(1, 0))
            };
            (door_a, start, door_b, end)
        }
    };

    Link {
        hallway: Hallway::l_shaped(start, end, bend, opts, rng),
        door_a,
        door_b,
    }
}
