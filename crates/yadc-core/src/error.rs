//! Error types for generation, configuration and path reconstruction

use thiserror::Error;

use crate::dungeon::{Pos, TileKind};

/// Precondition failures raised while building a dungeon
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("region {width}x{height} is smaller than the minimum {min_width}x{min_height}")]
    RegionTooSmall {
        width: i32,
        height: i32,
        min_width: i32,
        min_height: i32,
    },

    #[error("room {width}x{height} at {x},{y} is below the minimum room size")]
    RoomTooSmall { x: i32, y: i32, width: i32, height: i32 },

    #[error("cannot connect room {index} to itself")]
    SelfConnection { index: usize },

    #[error("room index {index} out of range ({count} rooms)")]
    UnknownRoom { index: usize, count: usize },

    #[error("hallway tile at {pos} is {kind}, expected Floor or Grass")]
    InvalidHallwayTile { pos: Pos, kind: TileKind },

    #[error("hallway path does not join {start} to {end}")]
    DisconnectedHallway { start: Pos, end: Pos },

    #[error("hallway from {start} to {end} is not axis-aligned")]
    NotAxisAligned { start: Pos, end: Pos },

    #[error("{pos} is not on the border of the room")]
    DoorNotOnBorder { pos: Pos },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Invalid or unreadable configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must be {expected}, got {value}")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("map {width}x{height} cannot hold a {min_width}x{min_height} region")]
    MapTooSmall {
        width: i32,
        height: i32,
        min_width: i32,
        min_height: i32,
    },

    #[error("no chase strategies enabled")]
    NoStrategies,

    #[error("could not read config '{path}': {reason}")]
    Io { path: String, reason: String },

    #[error("could not parse config: {0}")]
    Parse(String),
}

/// Failures while walking a predecessor map
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("{0} is not in the predecessor map")]
    MissingKey(Pos),

    #[error("predecessor chain ended at {at} before reaching {start}")]
    BrokenChain { at: Pos, start: Pos },
}
