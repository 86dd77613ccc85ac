//! Enemy chase policy
//!
//! Enemies live in pixel space. Each tick they map themselves and their
//! target onto grid cells, run their search, and take one `speed`-sized step
//! along the first edge of the route.

use serde::{Deserialize, Serialize};

use crate::dungeon::Pos;
use crate::error::ConfigError;
use crate::nav::{Algorithm, NavGrid, reconstruct_path};
use crate::rng::GameRng;

/// A continuous (sprite) position in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PixelPos {
    pub x: i32,
    pub y: i32,
}

impl PixelPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Top-left pixel of a cell
    pub const fn of_cell(cell: Pos, tile_size: u32) -> Self {
        let t = tile_size as i32;
        Self::new(cell.x * t, cell.y * t)
    }

    /// Grid cell by ceiling division of each axis by the tile size
    pub fn to_cell(self, tile_size: u32) -> Pos {
        let t = tile_size.max(1) as i32;
        Pos::new(ceil_div(self.x, t), ceil_div(self.y, t))
    }
}

fn ceil_div(value: i32, divisor: i32) -> i32 {
    -(-value).div_euclid(divisor)
}

/// What an enemy did on a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChaseAction {
    /// Moved by `(dx, dy) * speed` pixels
    Stepped { dx: i32, dy: i32 },
    /// Adjacent to or on the target's cell
    Holding,
    /// No route to the target
    Unreachable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: PixelPos,
    pub speed: i32,
    strategy: Algorithm,
}

impl Enemy {
    pub fn new(pos: PixelPos, speed: i32, strategy: Algorithm) -> Self {
        Self {
            pos,
            speed,
            strategy,
        }
    }

    /// Spawn with a strategy drawn uniformly from `enabled`
    pub fn spawn(
        pos: PixelPos,
        speed: i32,
        enabled: &[Algorithm],
        rng: &mut GameRng,
    ) -> Result<Self, ConfigError> {
        let strategy = *rng.choose(enabled).ok_or(ConfigError::NoStrategies)?;
        Ok(Self::new(pos, speed, strategy))
    }

    /// The search this enemy uses for its whole life
    pub fn strategy(&self) -> Algorithm {
        self.strategy
    }

    pub fn cell(&self, tile_size: u32) -> Pos {
        self.pos.to_cell(tile_size)
    }

    /// Current route from this enemy's cell to the target's, if any
    pub fn route(&self, grid: &NavGrid, target: PixelPos, tile_size: u32) -> Option<Vec<Pos>> {
        let start = self.cell(tile_size);
        let goal = target.to_cell(tile_size);
        let came_from = self.strategy.search(grid, start, goal);
        reconstruct_path(&came_from, start, goal).ok()
    }

    /// Advance one tick toward `target`
    pub fn chase(&mut self, grid: &NavGrid, target: PixelPos, tile_size: u32) -> ChaseAction {
        let Some(path) = self.route(grid, target, tile_size) else {
            return ChaseAction::Unreachable;
        };
        // two nodes or fewer means adjacent or on top; stepping would jitter
        if path.len() <= 2 {
            return ChaseAction::Holding;
        }
        let dx = (path[1].x - path[0].x).signum();
        let dy = (path[1].y - path[0].y).signum();
        self.pos.x += dx * self.speed;
        self.pos.y += dy * self.speed;
        ChaseAction::Stepped { dx, dy }
    }
}
