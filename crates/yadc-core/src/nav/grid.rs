//! Weighted 4-connected grid for pathfinding
//!
//! Walls are the only cells removed from the graph. Every step costs the
//! default of 1 unless the destination carries an override in the weight
//! table.

use std::cell::RefCell;

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::dungeon::{Dungeon, Pos};

/// Cost of a step onto a cell without an override
pub const DEFAULT_COST: u32 = 1;

/// What reading a cost override does to it
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum CostReads {
    /// Overrides stay put; `cost` is idempotent
    #[default]
    Persistent,
    /// An override is removed by the first `cost` call that reads it
    ConsumeOnce,
}

/// Navigation view of a dungeon
#[derive(Debug, Clone)]
pub struct NavGrid {
    width: i32,
    height: i32,
    walls: HashSet<Pos>,
    weights: RefCell<HashMap<Pos, u32>>,
    default_cost: u32,
    cost_reads: CostReads,
}

impl NavGrid {
    /// An open grid with no walls and no overrides
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            walls: HashSet::new(),
            weights: RefCell::new(HashMap::new()),
            default_cost: DEFAULT_COST,
            cost_reads: CostReads::Persistent,
        }
    }

    /// Scan a dungeon for wall tiles
    pub fn from_dungeon(dungeon: &Dungeon) -> Self {
        let mut grid = Self::new(dungeon.width(), dungeon.height());
        grid.walls = dungeon
            .tiles()
            .iter()
            .filter(|t| t.kind.is_blocking())
            .map(|t| t.pos())
            .collect();
        grid
    }

    /// Build from ASCII rows: `#` is a wall, a digit is an override cost,
    /// anything else is open floor.
    pub fn from_ascii(rows: &[&str]) -> Self {
        let height = rows.len() as i32;
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as i32;
        let mut grid = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                let pos = Pos::new(x as i32, y as i32);
                match c {
                    '#' => grid.add_wall(pos),
                    _ => {
                        if let Some(cost) = c.to_digit(10) {
                            grid.set_weight(pos, cost);
                        }
                    }
                }
            }
        }
        grid
    }

    pub fn with_cost_reads(mut self, cost_reads: CostReads) -> Self {
        self.cost_reads = cost_reads;
        self
    }

    pub fn cost_reads(&self) -> CostReads {
        self.cost_reads
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn walls(&self) -> &HashSet<Pos> {
        &self.walls
    }

    pub fn add_wall(&mut self, pos: Pos) {
        self.walls.insert(pos);
    }

    pub fn is_wall(&self, pos: Pos) -> bool {
        self.walls.contains(&pos)
    }

    /// Override the cost of stepping onto `pos`
    pub fn set_weight(&mut self, pos: Pos, cost: u32) {
        self.weights.get_mut().insert(pos, cost);
    }

    /// Current override for `pos`, without consuming it
    pub fn weight(&self, pos: Pos) -> Option<u32> {
        self.weights.borrow().get(&pos).copied()
    }

    pub const fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    pub fn passable(&self, pos: Pos) -> bool {
        !self.walls.contains(&pos)
    }

    /// In-bounds, non-wall cells one step away.
    ///
    /// Order is east, west, north, south, reversed on cells where `x + y` is
    /// even. Search results depend on this order when paths tie.
    pub fn neighbors(&self, pos: Pos) -> Vec<Pos> {
        let mut out: Vec<Pos> = [
            pos.offset(1, 0),
            pos.offset(-1, 0),
            pos.offset(0, -1),
            pos.offset(0, 1),
        ]
        .into_iter()
        .filter(|p| self.in_bounds(*p) && self.passable(*p))
        .collect();
        if (pos.x + pos.y).rem_euclid(2) == 0 {
            out.reverse();
        }
        out
    }

    /// Cost of stepping from `_from` onto `to`
    pub fn cost(&self, _from: Pos, to: Pos) -> u32 {
        match self.cost_reads {
            CostReads::Persistent => self.weight(to).unwrap_or(self.default_cost),
            CostReads::ConsumeOnce => self
                .weights
                .borrow_mut()
                .remove(&to)
                .unwrap_or(self.default_cost),
        }
    }
}
