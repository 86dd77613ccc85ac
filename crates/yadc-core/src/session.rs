//! Level session: one dungeon at a time, its nav grid, the enemies on it,
//! and descent to a fresh level when the player reaches the ladder.

use tracing::{debug, info};

use crate::chase::{ChaseAction, Enemy, PixelPos};
use crate::config::DungeonConfig;
use crate::dungeon::Dungeon;
use crate::error::GenerationError;
use crate::nav::NavGrid;
use crate::rng::GameRng;

/// Result of advancing the session by one tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    /// One entry per enemy, in spawn order
    pub actions: Vec<ChaseAction>,
    /// The player stood on the ladder and a new level was generated
    pub descended: bool,
}

#[derive(Debug)]
pub struct GameSession {
    config: DungeonConfig,
    rng: GameRng,
    depth: u32,
    dungeon: Dungeon,
    nav: NavGrid,
    enemies: Vec<Enemy>,
    player: PixelPos,
}

impl GameSession {
    /// Validate the config and generate the first level
    pub fn new(config: DungeonConfig) -> Result<Self, GenerationError> {
        config.validate()?;
        let mut rng = config.rng();
        let level = Level::build(&config, &mut rng)?;
        info!(seed = rng.seed(), "session started");
        Ok(Self {
            config,
            rng,
            depth: 1,
            dungeon: level.dungeon,
            nav: level.nav,
            enemies: level.enemies,
            player: level.player,
        })
    }

    pub fn config(&self) -> &DungeonConfig {
        &self.config
    }

    /// Current level, starting at 1
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn dungeon(&self) -> &Dungeon {
        &self.dungeon
    }

    pub fn nav(&self) -> &NavGrid {
        &self.nav
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn player(&self) -> PixelPos {
        self.player
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Move the player sprite; the core does no collision checks
    pub fn set_player(&mut self, pos: PixelPos) {
        self.player = pos;
    }

    /// Whether the player's cell is exactly the ladder cell
    pub fn on_ladder(&self) -> bool {
        let cell = self.player.to_cell(self.config.tile_size);
        self.dungeon.is_ladder_reached(cell)
    }

    /// Regenerate the level if the player is on the ladder
    pub fn try_descend(&mut self) -> Result<bool, GenerationError> {
        if !self.on_ladder() {
            return Ok(false);
        }
        let level = Level::build(&self.config, &mut self.rng)?;
        self.dungeon = level.dungeon;
        self.nav = level.nav;
        self.enemies = level.enemies;
        self.player = level.player;
        self.depth += 1;
        info!(depth = self.depth, "descended");
        Ok(true)
    }

    /// Every enemy takes one chase step, then the ladder is checked
    pub fn tick(&mut self) -> Result<TickReport, GenerationError> {
        let tile_size = self.config.tile_size;
        let actions = self
            .enemies
            .iter_mut()
            .map(|enemy| enemy.chase(&self.nav, self.player, tile_size))
            .collect();
        let descended = self.try_descend()?;
        Ok(TickReport { actions, descended })
    }
}

/// Everything that is replaced wholesale on descent
struct Level {
    dungeon: Dungeon,
    nav: NavGrid,
    enemies: Vec<Enemy>,
    player: PixelPos,
}

impl Level {
    fn build(config: &DungeonConfig, rng: &mut GameRng) -> Result<Self, GenerationError> {
        let dungeon = Dungeon::generate(config, rng)?;
        let nav = NavGrid::from_dungeon(&dungeon).with_cost_reads(config.cost_reads);
        let spawn = dungeon.spawn_room_index();
        let player = dungeon
            .spawn_point()
            .map(|cell| PixelPos::of_cell(cell, config.tile_size))
            .unwrap_or_default();

        // enemies start in other rooms when there are any
        let others: Vec<usize> = dungeon.filter_rooms(&[spawn]).map(|(i, _)| i).collect();
        let mut enemies = Vec::with_capacity(config.enemy_count);
        for _ in 0..config.enemy_count {
            let room = rng.choose(&others).copied().unwrap_or(spawn);
            let cell = dungeon.rooms()[room].midpoint();
            let enemy = Enemy::spawn(
                PixelPos::of_cell(cell, config.tile_size),
                config.enemy_speed,
                &config.strategies,
                rng,
            )?;
            debug!(room, strategy = %enemy.strategy(), "enemy spawned");
            enemies.push(enemy);
        }

        Ok(Self {
            dungeon,
            nav,
            enemies,
            player,
        })
    }
}
