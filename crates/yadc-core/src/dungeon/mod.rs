//! Level model and generation
//!
//! Tiles, rooms and hallways, and the BSP generator that stamps them into a
//! [`Dungeon`].

mod generation;
mod hallway;
mod map;
mod rect;
mod room;
mod tile;

pub use hallway::{Bend, CarveOptions, Hallway};
pub use map::{Dungeon, PATH_MARK};
pub use rect::{Region, SplitAxis};
pub use room::Room;
pub use tile::{Pos, Tile, TileKind};
