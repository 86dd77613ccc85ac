//! Graph searches over a [`NavGrid`]
//!
//! Every search starts at `start`, stops as soon as `goal` is taken off the
//! frontier, and returns a predecessor map with `start -> None`. A goal that
//! cannot be reached is not an error: the map simply lacks the goal key.
//!
//! | Search     | Frontier            | Edge cost | Heuristic |
//! |------------|---------------------|-----------|-----------|
//! | BFS        | FIFO queue          | no        | no        |
//! | DFS        | LIFO stack          | no        | no        |
//! | Dijkstra   | min-heap on g       | yes       | no        |
//! | Best-First | min-heap on h       | no        | yes       |
//! | A*         | min-heap on g + h   | yes       | yes       |
//!
//! The heuristic is Manhattan distance. It is only admissible while every
//! step costs at least 1; lower override costs void A*'s optimality.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use tracing::trace;

use crate::dungeon::Pos;
use crate::error::PathError;

use super::grid::NavGrid;
use super::path::reconstruct_path;

/// Predecessor map: each reached cell and the cell it was reached from
pub type CameFrom = HashMap<Pos, Option<Pos>>;

/// Accumulated cost to each reached cell
pub type CostSoFar = HashMap<Pos, u32>;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Algorithm {
    Bfs,
    Dfs,
    Dijkstra,
    BestFirst,
    AStar,
}

impl Algorithm {
    /// Whether step costs influence the search
    pub const fn uses_cost(self) -> bool {
        matches!(self, Algorithm::Dijkstra | Algorithm::AStar)
    }

    pub const fn uses_heuristic(self) -> bool {
        matches!(self, Algorithm::BestFirst | Algorithm::AStar)
    }

    /// Whether the returned path is a shortest one (edge count for BFS, total
    /// cost for Dijkstra and A*)
    pub const fn is_optimal(self) -> bool {
        matches!(self, Algorithm::Bfs | Algorithm::Dijkstra | Algorithm::AStar)
    }

    /// Run the search and keep only the predecessor map
    pub fn search(self, grid: &NavGrid, start: Pos, goal: Pos) -> CameFrom {
        self.explore(grid, start, goal).came_from
    }

    /// Run the search and keep everything it learned
    pub fn explore(self, grid: &NavGrid, start: Pos, goal: Pos) -> SearchReport {
        let report = match self {
            Algorithm::Bfs => breadth_first(grid, start, goal),
            Algorithm::Dfs => depth_first(grid, start, goal),
            Algorithm::Dijkstra => weighted(grid, start, goal, false),
            Algorithm::BestFirst => greedy(grid, start, goal),
            Algorithm::AStar => weighted(grid, start, goal, true),
        };
        trace!(
            algorithm = %self,
            %start,
            %goal,
            expanded = report.expanded,
            reached = report.reached(goal),
            "search finished"
        );
        SearchReport {
            algorithm: self,
            ..report
        }
    }
}

/// Everything a search produced
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub algorithm: Algorithm,
    pub came_from: CameFrom,
    /// Filled only by searches that use step costs
    pub cost_so_far: CostSoFar,
    /// Cells taken off the frontier and expanded
    pub expanded: usize,
}

impl SearchReport {
    fn new(algorithm: Algorithm, start: Pos) -> Self {
        let mut came_from = CameFrom::new();
        came_from.insert(start, None);
        Self {
            algorithm,
            came_from,
            cost_so_far: CostSoFar::new(),
            expanded: 0,
        }
    }

    pub fn reached(&self, pos: Pos) -> bool {
        self.came_from.contains_key(&pos)
    }

    pub fn path(&self, start: Pos, goal: Pos) -> Result<Vec<Pos>, PathError> {
        reconstruct_path(&self.came_from, start, goal)
    }
}

pub fn search_bfs(grid: &NavGrid, start: Pos, goal: Pos) -> CameFrom {
    Algorithm::Bfs.search(grid, start, goal)
}

pub fn search_dfs(grid: &NavGrid, start: Pos, goal: Pos) -> CameFrom {
    Algorithm::Dfs.search(grid, start, goal)
}

pub fn search_dijkstra(grid: &NavGrid, start: Pos, goal: Pos) -> CameFrom {
    Algorithm::Dijkstra.search(grid, start, goal)
}

pub fn search_best_first(grid: &NavGrid, start: Pos, goal: Pos) -> CameFrom {
    Algorithm::BestFirst.search(grid, start, goal)
}

pub fn search_astar(grid: &NavGrid, start: Pos, goal: Pos) -> CameFrom {
    Algorithm::AStar.search(grid, start, goal)
}

/// Manhattan distance heuristic
pub fn heuristic(a: Pos, b: Pos) -> u32 {
    a.manhattan(b)
}

fn breadth_first(grid: &NavGrid, start: Pos, goal: Pos) -> SearchReport {
    let mut report = SearchReport::new(Algorithm::Bfs, start);
    let mut frontier = VecDeque::from([start]);

    while let Some(current) = frontier.pop_front() {
        if current == goal {
            break;
        }
        report.expanded += 1;
        for next in grid.neighbors(current) {
            if !report.came_from.contains_key(&next) {
                report.came_from.insert(next, Some(current));
                frontier.push_back(next);
            }
        }
    }
    report
}

fn depth_first(grid: &NavGrid, start: Pos, goal: Pos) -> SearchReport {
    let mut report = SearchReport::new(Algorithm::Dfs, start);
    let mut frontier = vec![start];

    while let Some(current) = frontier.pop() {
        if current == goal {
            break;
        }
        report.expanded += 1;
        for next in grid.neighbors(current) {
            if !report.came_from.contains_key(&next) {
                report.came_from.insert(next, Some(current));
                frontier.push(next);
            }
        }
    }
    report
}

/// Priority queue entry; lower priority pops first, then earlier pushes
#[derive(Clone, Copy, PartialEq, Eq)]
struct Node {
    priority: u32,
    order: u64,
    cost: u32,
    pos: Pos,
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Default)]
struct Frontier {
    heap: BinaryHeap<Node>,
    pushed: u64,
}

impl Frontier {
    fn push(&mut self, pos: Pos, priority: u32, cost: u32) {
        self.heap.push(Node {
            priority,
            order: self.pushed,
            cost,
            pos,
        });
        self.pushed += 1;
    }

    fn pop(&mut self) -> Option<Node> {
        self.heap.pop()
    }
}

fn greedy(grid: &NavGrid, start: Pos, goal: Pos) -> SearchReport {
    let mut report = SearchReport::new(Algorithm::BestFirst, start);
    let mut frontier = Frontier::default();
    frontier.push(start, heuristic(start, goal), 0);

    while let Some(Node { pos: current, .. }) = frontier.pop() {
        if current == goal {
            break;
        }
        report.expanded += 1;
        for next in grid.neighbors(current) {
            if !report.came_from.contains_key(&next) {
                report.came_from.insert(next, Some(current));
                frontier.push(next, heuristic(next, goal), 0);
            }
        }
    }
    report
}

/// Dijkstra, or A* when `guided` adds the heuristic to the priority
fn weighted(grid: &NavGrid, start: Pos, goal: Pos, guided: bool) -> SearchReport {
    let algorithm = if guided {
        Algorithm::AStar
    } else {
        Algorithm::Dijkstra
    };
    let h = |pos: Pos| if guided { heuristic(pos, goal) } else { 0 };

    let mut report = SearchReport::new(algorithm, start);
    report.cost_so_far.insert(start, 0);
    let mut frontier = Frontier::default();
    frontier.push(start, h(start), 0);

    while let Some(node) = frontier.pop() {
        let current = node.pos;
        if current == goal {
            break;
        }
        // lazy deletion: a cheaper route to this cell was queued after this one
        if report
            .cost_so_far
            .get(&current)
            .is_some_and(|&best| node.cost > best)
        {
            continue;
        }
        report.expanded += 1;
        for next in grid.neighbors(current) {
            let new_cost = node.cost.saturating_add(grid.cost(current, next));
            let improves = report
                .cost_so_far
                .get(&next)
                .is_none_or(|&known| new_cost < known);
            if improves {
                report.cost_so_far.insert(next, new_cost);
                report.came_from.insert(next, Some(current));
                frontier.push(next, new_cost.saturating_add(h(next)), new_cost);
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_start_is_root() {
        let grid = NavGrid::new(3, 3);
        for algorithm in Algorithm::iter() {
            let map = algorithm.search(&grid, Pos::new(1, 1), Pos::new(2, 2));
            assert_eq!(map[&Pos::new(1, 1)], None, "{algorithm}");
            assert!(map.contains_key(&Pos::new(2, 2)), "{algorithm}");
        }
    }

    #[test]
    fn test_start_equals_goal() {
        let grid = NavGrid::new(4, 4);
        for algorithm in Algorithm::iter() {
            let report = algorithm.explore(&grid, Pos::new(2, 2), Pos::new(2, 2));
            assert_eq!(report.came_from.len(), 1);
            assert_eq!(report.expanded, 0);
        }
    }

    #[test]
    fn test_early_exit_bfs() {
        let grid = NavGrid::new(20, 20);
        let report = Algorithm::Bfs.explore(&grid, Pos::new(0, 0), Pos::new(1, 0));
        // goal is found on the first ring; the far corner is never touched
        assert!(report.expanded < 5);
        assert!(!report.reached(Pos::new(19, 19)));
    }

    #[test]
    fn test_dfs_reaches_goal() {
        let grid = NavGrid::from_ascii(&[".....", ".###.", "....."]);
        let map = search_dfs(&grid, Pos::new(0, 0), Pos::new(4, 2));
        assert!(map.contains_key(&Pos::new(4, 2)));
    }

    #[test]
    fn test_best_first_heads_for_goal() {
        let grid = NavGrid::new(30, 30);
        let report = Algorithm::BestFirst.explore(&grid, Pos::new(0, 0), Pos::new(10, 0));
        assert!(report.reached(Pos::new(10, 0)));
        let path = report.path(Pos::new(0, 0), Pos::new(10, 0)).unwrap();
        assert_eq!(path.len(), 11);
        assert!(report.expanded <= 10);
    }

    #[test]
    fn test_astar_expands_no_more_than_dijkstra() {
        let grid = NavGrid::new(15, 15);
        let start = Pos::new(0, 7);
        let goal = Pos::new(14, 7);
        let a = Algorithm::AStar.explore(&grid, start, goal);
        let d = Algorithm::Dijkstra.explore(&grid, start, goal);
        assert_eq!(a.cost_so_far[&goal], d.cost_so_far[&goal]);
        assert!(a.expanded <= d.expanded);
    }

    #[test]
    fn test_dijkstra_relaxes_to_cheaper_route() {
        // stepping onto the 9 is expensive; the route below is longer but cheaper
        let grid = NavGrid::from_ascii(&["..9..", ".###.", "....."]);
        let start = Pos::new(0, 0);
        let goal = Pos::new(4, 0);
        let report = Algorithm::Dijkstra.explore(&grid, start, goal);
        assert_eq!(report.cost_so_far[&goal], 8);
        let path = report.path(start, goal).unwrap();
        assert!(!path.contains(&Pos::new(2, 0)));
    }

    #[test]
    fn test_algorithm_names() {
        assert_eq!(Algorithm::AStar.to_string(), "a-star");
        assert_eq!(Algorithm::from_str("best-first").unwrap(), Algorithm::BestFirst);
        assert_eq!(Algorithm::from_str("BFS").unwrap(), Algorithm::Bfs);
        assert!(Algorithm::Bfs.is_optimal());
        assert!(!Algorithm::Dfs.is_optimal());
        assert!(Algorithm::AStar.uses_cost() && Algorithm::AStar.uses_heuristic());
    }

    #[test]
    fn test_node_order_is_min_heap() {
        let mut frontier = Frontier::default();
        frontier.push(Pos::new(0, 0), 5, 0);
        frontier.push(Pos::new(1, 0), 2, 0);
        frontier.push(Pos::new(2, 0), 2, 0);
        assert_eq!(frontier.pop().unwrap().pos, Pos::new(1, 0));
        assert_eq!(frontier.pop().unwrap().pos, Pos::new(2, 0));
        assert_eq!(frontier.pop().unwrap().pos, Pos::new(0, 0));
    }
}
