//! Dungeon configuration
//!
//! Everything the core consumes from outside: map and room dimensions, grass
//! probability, tile scaling for the chase policy, and the seed. Loaded from
//! JSON with missing fields falling back to the defaults below.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::error::ConfigError;
use crate::nav::{Algorithm, CostReads};
use crate::rng::GameRng;

/// Smallest room edge, walls included
pub const MIN_ROOM_DIM: i32 = 4;

/// Default room edge bounds
pub const DEFAULT_MAX_ROOM_DIM: i32 = 10;

/// Pixels per tile
pub const TILE_SIZE: u32 = 30;

/// Default map size in tiles
pub const MAP_WIDTH: i32 = 30;
pub const MAP_HEIGHT: i32 = 30;

/// Probability that a floor cell is generated as grass
pub const CHANCE_GEN_GRASS: f64 = 0.3;

/// Room size bounds, walls included
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomLimits {
    pub min_width: i32,
    pub max_width: i32,
    pub min_height: i32,
    pub max_height: i32,
}

impl Default for RoomLimits {
    fn default() -> Self {
        Self {
            min_width: MIN_ROOM_DIM,
            max_width: DEFAULT_MAX_ROOM_DIM,
            min_height: MIN_ROOM_DIM,
            max_height: DEFAULT_MAX_ROOM_DIM,
        }
    }
}

impl RoomLimits {
    /// Smallest region a room fits in: the room plus a void margin each side
    pub const fn min_region(&self) -> (i32, i32) {
        (self.min_width + 2, self.min_height + 2)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    /// Pixels per tile, only used to map sprite positions onto cells
    pub tile_size: u32,
    /// Map width in tiles
    pub width: i32,
    /// Map height in tiles
    pub height: i32,
    pub rooms: RoomLimits,
    pub grass_chance: f64,
    /// Fixed seed; `None` draws one from the OS
    pub seed: Option<u64>,
    pub cost_reads: CostReads,
    /// Strategies enemies may be assigned at spawn
    pub strategies: Vec<Algorithm>,
    /// Pixels an enemy moves per tick
    pub enemy_speed: i32,
    /// Enemies spawned on each level
    pub enemy_count: usize,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            width: MAP_WIDTH,
            height: MAP_HEIGHT,
            rooms: RoomLimits::default(),
            grass_chance: CHANCE_GEN_GRASS,
            seed: None,
            cost_reads: CostReads::default(),
            strategies: Algorithm::iter().collect(),
            enemy_speed: 1,
            enemy_count: 1,
        }
    }
}

impl DungeonConfig {
    /// Default configuration with a different map size
    pub fn with_size(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&text)
    }

    /// RNG for this configuration, seeded if a seed is set
    pub fn rng(&self) -> GameRng {
        match self.seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        }
    }

    /// Check every generation precondition
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tile_size == 0 {
            return Err(out_of_range("tile_size", "positive", self.tile_size));
        }
        let r = &self.rooms;
        if r.min_width < MIN_ROOM_DIM {
            return Err(out_of_range("rooms.min_width", "at least 4", r.min_width));
        }
        if r.min_height < MIN_ROOM_DIM {
            return Err(out_of_range("rooms.min_height", "at least 4", r.min_height));
        }
        if r.max_width < r.min_width {
            return Err(out_of_range(
                "rooms.max_width",
                "at least rooms.min_width",
                r.max_width,
            ));
        }
        if r.max_height < r.min_height {
            return Err(out_of_range(
                "rooms.max_height",
                "at least rooms.min_height",
                r.max_height,
            ));
        }
        if !(0.0..=1.0).contains(&self.grass_chance) {
            return Err(out_of_range(
                "grass_chance",
                "between 0 and 1",
                self.grass_chance,
            ));
        }

        let (min_width, min_height) = r.min_region();
        if self.width < min_width || self.height < min_height {
            return Err(ConfigError::MapTooSmall {
                width: self.width,
                height: self.height,
                min_width,
                min_height,
            });
        }

        if self.strategies.is_empty() {
            return Err(ConfigError::NoStrategies);
        }
        if self.enemy_speed <= 0 {
            return Err(out_of_range("enemy_speed", "positive", self.enemy_speed));
        }
        Ok(())
    }
}

fn out_of_range(field: &'static str, expected: &'static str, value: impl ToString) -> ConfigError {
    ConfigError::OutOfRange {
        field,
        expected,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = DungeonConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.width, 30);
        assert_eq!(config.rooms.min_width, 4);
        assert_eq!(config.strategies.len(), 5);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = DungeonConfig::from_json(r#"{ "width": 40, "seed": 7 }"#).unwrap();
        assert_eq!(config.width, 40);
        assert_eq!(config.height, MAP_HEIGHT);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.rooms, RoomLimits::default());
    }

    #[test]
    fn test_nested_room_limits() {
        let config =
            DungeonConfig::from_json(r#"{ "rooms": { "max_width": 6, "max_height": 5 } }"#)
                .unwrap();
        assert_eq!(config.rooms.max_width, 6);
        assert_eq!(config.rooms.min_width, MIN_ROOM_DIM);
    }

    #[test]
    fn test_map_too_small() {
        let config = DungeonConfig::with_size(5, 30);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MapTooSmall { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = DungeonConfig::default();
        config.grass_chance = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { field: "grass_chance", .. })
        ));

        let mut config = DungeonConfig::default();
        config.rooms.max_height = 3;
        assert!(config.validate().is_err());

        let mut config = DungeonConfig::default();
        config.strategies.clear();
        assert_eq!(config.validate(), Err(ConfigError::NoStrategies));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            DungeonConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_seeded_rng() {
        let config = DungeonConfig {
            seed: Some(11),
            ..DungeonConfig::default()
        };
        assert_eq!(config.rng().seed(), 11);
    }
}
