//! Pathfinding over generated levels

mod grid;
mod path;
mod search;

pub use grid::{CostReads, DEFAULT_COST, NavGrid};
pub use path::{path_cost, reconstruct_path};
pub use search::{
    Algorithm, CameFrom, CostSoFar, SearchReport, heuristic, search_astar, search_best_first,
    search_bfs, search_dfs, search_dijkstra,
};
