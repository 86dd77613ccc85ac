//! Turning a predecessor map into a route

use crate::dungeon::Pos;
use crate::error::PathError;

use super::grid::NavGrid;
use super::search::CameFrom;

/// Walk `came_from` back from `goal` to `start`, returning `[start, .., goal]`.
///
/// Fails with [`PathError::MissingKey`] when the goal (or any link on the way
/// back) was never reached, and with [`PathError::BrokenChain`] when the
/// chain ends somewhere other than `start`. Callers that want "no route" as a
/// plain value should check `came_from.contains_key(&goal)` first.
pub fn reconstruct_path(
    came_from: &CameFrom,
    start: Pos,
    goal: Pos,
) -> Result<Vec<Pos>, PathError> {
    let mut path = Vec::new();
    let mut current = goal;
    while current != start {
        path.push(current);
        // a chain longer than the map itself has looped
        if path.len() > came_from.len() {
            return Err(PathError::BrokenChain { at: current, start });
        }
        match came_from.get(&current) {
            None => return Err(PathError::MissingKey(current)),
            Some(None) => return Err(PathError::BrokenChain { at: current, start }),
            Some(Some(prev)) => current = *prev,
        }
    }
    path.push(start);
    path.reverse();
    Ok(path)
}

/// Total step cost of a route.
///
/// Reads costs through [`NavGrid::cost`], so a consume-once grid gives up its
/// overrides along the way.
pub fn path_cost(grid: &NavGrid, path: &[Pos]) -> u32 {
    path.windows(2)
        .map(|step| grid.cost(step[0], step[1]))
        .fold(0u32, u32::saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(links: &[((i32, i32), Option<(i32, i32)>)]) -> CameFrom {
        links
            .iter()
            .map(|&(k, v)| (Pos::from(k), v.map(Pos::from)))
            .collect()
    }

    #[test]
    fn test_reconstruct_simple() {
        let map = chain(&[
            ((0, 0), None),
            ((1, 0), Some((0, 0))),
            ((1, 1), Some((1, 0))),
        ]);
        let path = reconstruct_path(&map, Pos::new(0, 0), Pos::new(1, 1)).unwrap();
        assert_eq!(path, vec![Pos::new(0, 0), Pos::new(1, 0), Pos::new(1, 1)]);
    }

    #[test]
    fn test_start_equals_goal() {
        let map = chain(&[((3, 3), None)]);
        let path = reconstruct_path(&map, Pos::new(3, 3), Pos::new(3, 3)).unwrap();
        assert_eq!(path, vec![Pos::new(3, 3)]);
    }

    #[test]
    fn test_missing_goal() {
        let map = chain(&[((0, 0), None)]);
        assert_eq!(
            reconstruct_path(&map, Pos::new(0, 0), Pos::new(5, 5)),
            Err(PathError::MissingKey(Pos::new(5, 5)))
        );
    }

    #[test]
    fn test_wrong_start() {
        let map = chain(&[((0, 0), None), ((1, 0), Some((0, 0)))]);
        assert_eq!(
            reconstruct_path(&map, Pos::new(9, 9), Pos::new(1, 0)),
            Err(PathError::BrokenChain {
                at: Pos::new(0, 0),
                start: Pos::new(9, 9)
            })
        );
    }

    #[test]
    fn test_cycle_is_reported() {
        let map = chain(&[((0, 0), Some((1, 0))), ((1, 0), Some((0, 0)))]);
        assert!(matches!(
            reconstruct_path(&map, Pos::new(5, 5), Pos::new(0, 0)),
            Err(PathError::BrokenChain { .. })
        ));
    }

    #[test]
    fn test_path_cost() {
        let mut grid = NavGrid::new(3, 1);
        grid.set_weight(Pos::new(2, 0), 4);
        let path = [Pos::new(0, 0), Pos::new(1, 0), Pos::new(2, 0)];
        assert_eq!(path_cost(&grid, &path), 5);
        assert_eq!(path_cost(&grid, &path[..1]), 0);
    }
}
