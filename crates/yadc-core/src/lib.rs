//! yadc-core: dungeon generation and pathfinding for YetAnotherDungeonCrawler
//!
//! Builds levels by binary space partitioning, exposes them as a weighted
//! navigation grid, and runs the searches that drive enemy movement. No I/O
//! beyond optional config loading; everything random goes through a seeded
//! [`GameRng`].

pub mod chase;
pub mod config;
pub mod dungeon;
pub mod error;
pub mod nav;
pub mod rng;
pub mod session;

pub use chase::{ChaseAction, Enemy, PixelPos};
pub use config::{DungeonConfig, RoomLimits};
pub use dungeon::{Dungeon, Hallway, Pos, Room, Tile, TileKind};
pub use error::{ConfigError, GenerationError, PathError};
pub use nav::{Algorithm, CameFrom, CostReads, NavGrid, reconstruct_path};
pub use rng::GameRng;
pub use session::{GameSession, TickReport};
