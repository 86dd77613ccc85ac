use hashbrown::HashSet;
use strum::IntoEnumIterator;

use yadc_core::dungeon::{Dungeon, Pos};
use yadc_core::nav::{
    Algorithm, CostReads, NavGrid, path_cost, reconstruct_path, search_astar, search_best_first,
    search_bfs, search_dfs, search_dijkstra,
};
use yadc_core::{GameRng, PathError};

/// Shortest edge count by trying every simple path
fn exhaustive_shortest(grid: &NavGrid, start: Pos, goal: Pos) -> Option<usize> {
    fn walk(
        grid: &NavGrid,
        at: Pos,
        goal: Pos,
        seen: &mut HashSet<Pos>,
        depth: usize,
        best: &mut Option<usize>,
    ) {
        if best.is_some_and(|b| depth >= b) {
            return;
        }
        if at == goal {
            *best = Some(depth);
            return;
        }
        for next in grid.neighbors(at) {
            if seen.insert(next) {
                walk(grid, next, goal, seen, depth + 1, best);
                seen.remove(&next);
            }
        }
    }

    let mut best = None;
    let mut seen = HashSet::from([start]);
    walk(grid, start, goal, &mut seen, 0, &mut best);
    best
}

fn maze_5x5() -> NavGrid {
    NavGrid::from_ascii(&[
        ".....", //
        ".###.", //
        ".#...", //
        ".#.#.", //
        "...#.",
    ])
}

#[test]
fn test_bfs_shortest_on_5x5() {
    let grid = maze_5x5();
    let start = Pos::new(0, 0);
    let goal = Pos::new(2, 2);
    let came_from = search_bfs(&grid, start, goal);
    let path = reconstruct_path(&came_from, start, goal).unwrap();

    assert_eq!(path.len() - 1, 8);
    assert_eq!(Some(path.len() - 1), exhaustive_shortest(&grid, start, goal));
    for step in path.windows(2) {
        assert_eq!(step[0].manhattan(step[1]), 1);
        assert!(!grid.is_wall(step[1]));
    }
}

#[test]
fn test_bfs_matches_exhaustive_everywhere() {
    let grid = maze_5x5();
    let start = Pos::new(0, 0);
    for y in 0..5 {
        for x in 0..5 {
            let goal = Pos::new(x, y);
            if grid.is_wall(goal) {
                continue;
            }
            let came_from = search_bfs(&grid, start, goal);
            let path = reconstruct_path(&came_from, start, goal).unwrap();
            assert_eq!(
                Some(path.len() - 1),
                exhaustive_shortest(&grid, start, goal),
                "goal {goal}"
            );
        }
    }
}

/// Row 0 is the straight route and costs 4 + 4 + 2 = 10; dropping to row 1
/// and coming back up costs 1 + 1 + 1 + 1 + 2 = 6.
fn weighted_4x4() -> NavGrid {
    NavGrid::from_ascii(&[
        ".442", //
        "....", //
        "....", //
        "....",
    ])
}

#[test]
fn test_dijkstra_and_astar_take_cheap_detour() {
    let grid = weighted_4x4();
    let start = Pos::new(0, 0);
    let goal = Pos::new(3, 0);

    let straight = [start, Pos::new(1, 0), Pos::new(2, 0), goal];
    assert_eq!(path_cost(&grid, &straight), 10);

    let dijkstra = reconstruct_path(&search_dijkstra(&grid, start, goal), start, goal).unwrap();
    let astar = reconstruct_path(&search_astar(&grid, start, goal), start, goal).unwrap();

    assert_eq!(path_cost(&grid, &dijkstra), 6);
    assert_eq!(path_cost(&grid, &astar), 6);
    assert!(!dijkstra.contains(&Pos::new(1, 0)));
    assert!(!astar.contains(&Pos::new(1, 0)));
}

#[test]
fn test_bfs_ignores_costs() {
    let grid = weighted_4x4();
    let start = Pos::new(0, 0);
    let goal = Pos::new(3, 0);
    let path = reconstruct_path(&search_bfs(&grid, start, goal), start, goal).unwrap();
    assert_eq!(path.len(), 4);
}

fn random_grid(rng: &mut GameRng, width: i32, height: i32) -> NavGrid {
    let mut grid = NavGrid::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let pos = Pos::new(x, y);
            if rng.chance(0.2) {
                grid.add_wall(pos);
            } else if rng.chance(0.3) {
                grid.set_weight(pos, 1 + rng.rn2(9));
            }
        }
    }
    grid
}

#[test]
fn test_astar_cost_equals_dijkstra_cost() {
    let mut rng = GameRng::new(2718);
    for _ in 0..60 {
        let grid = random_grid(&mut rng, 12, 9);
        let start = Pos::new(0, 0);
        let goal = Pos::new(11, 8);
        let d = Algorithm::Dijkstra.explore(&grid, start, goal);
        let a = Algorithm::AStar.explore(&grid, start, goal);
        assert_eq!(d.reached(goal), a.reached(goal));
        if !d.reached(goal) {
            continue;
        }
        let dp = d.path(start, goal).unwrap();
        let ap = a.path(start, goal).unwrap();
        assert_eq!(path_cost(&grid, &dp), path_cost(&grid, &ap));
        assert_eq!(d.cost_so_far[&goal], path_cost(&grid, &dp));
        assert!(a.expanded <= d.expanded);
    }
}

#[test]
fn test_astar_matches_dijkstra_on_dungeons() {
    for seed in 0..8 {
        let d = Dungeon::with_size(30, 30, seed).unwrap();
        let grid = NavGrid::from_dungeon(&d);
        let start = d.spawn_point().unwrap();
        let goal = d.ladder_position().unwrap();
        let dp = reconstruct_path(&search_dijkstra(&grid, start, goal), start, goal).unwrap();
        let ap = reconstruct_path(&search_astar(&grid, start, goal), start, goal).unwrap();
        let bp = reconstruct_path(&search_bfs(&grid, start, goal), start, goal).unwrap();
        assert_eq!(dp.len(), ap.len());
        // unit costs: cheapest is also fewest steps
        assert_eq!(dp.len(), bp.len());
    }
}

#[test]
fn test_every_algorithm_returns_a_valid_route() {
    let grid = maze_5x5();
    let start = Pos::new(4, 4);
    let goal = Pos::new(0, 4);
    let searches: [fn(&NavGrid, Pos, Pos) -> _; 5] = [
        search_bfs,
        search_dfs,
        search_dijkstra,
        search_best_first,
        search_astar,
    ];
    for search in searches {
        let came_from = search(&grid, start, goal);
        let path = reconstruct_path(&came_from, start, goal).unwrap();
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
        for step in path.windows(2) {
            assert!(grid.neighbors(step[0]).contains(&step[1]));
        }
    }
}

#[test]
fn test_reconstruction_is_idempotent() {
    let grid = maze_5x5();
    let start = Pos::new(0, 0);
    let goal = Pos::new(4, 4);
    for algorithm in Algorithm::iter() {
        let came_from = algorithm.search(&grid, start, goal);
        let first = reconstruct_path(&came_from, start, goal).unwrap();
        let second = reconstruct_path(&came_from, start, goal).unwrap();
        assert_eq!(first, second, "{algorithm}");
    }
}

#[test]
fn test_unreachable_goal_is_absent() {
    let grid = NavGrid::from_ascii(&[
        "..#..", //
        "..#..", //
        "..#..", //
        "..#..",
    ]);
    let start = Pos::new(0, 0);
    let goal = Pos::new(4, 3);
    for algorithm in Algorithm::iter() {
        let report = algorithm.explore(&grid, start, goal);
        assert!(!report.reached(goal), "{algorithm}");
        // everything on the start side was explored
        assert_eq!(report.came_from.len(), 8, "{algorithm}");
        assert_eq!(
            reconstruct_path(&report.came_from, start, goal),
            Err(PathError::MissingKey(goal))
        );
    }
}

#[test]
fn test_consume_once_changes_second_search() {
    let grid = NavGrid::from_ascii(&["9.", ".."]).with_cost_reads(CostReads::ConsumeOnce);
    let start = Pos::new(1, 0);
    let goal = Pos::new(0, 0);

    // the direct step reads (and spends) the 9, so the goal is later
    // reached around the block at default cost
    let first = Algorithm::Dijkstra.explore(&grid, start, goal);
    assert_eq!(first.cost_so_far[&goal], 3);
    let second = Algorithm::Dijkstra.explore(&grid, start, goal);
    assert_eq!(second.cost_so_far[&goal], 1);
}

#[test]
fn test_persistent_costs_repeat() {
    let grid = NavGrid::from_ascii(&["9.", ".."]);
    let start = Pos::new(1, 0);
    let goal = Pos::new(0, 0);
    for _ in 0..3 {
        let report = Algorithm::Dijkstra.explore(&grid, start, goal);
        assert_eq!(report.cost_so_far[&goal], 9);
    }
}
