//! Generator properties over random seeds and map sizes

use proptest::prelude::*;

use yadc_core::dungeon::{Dungeon, Pos, TileKind};
use yadc_core::nav::{Algorithm, NavGrid, reconstruct_path};

fn dungeon(width: i32, height: i32, seed: u64) -> Dungeon {
    Dungeon::with_size(width, height, seed).expect("size is above the minimum region")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_all_rooms_connected(seed in any::<u64>(), width in 6..60i32, height in 6..60i32) {
        let d = dungeon(width, height, seed);
        prop_assert!(!d.rooms().is_empty());
        let grid = NavGrid::from_dungeon(&d);
        let origin = d.rooms()[0].midpoint();
        let reached = Algorithm::Bfs.search(&grid, origin, Pos::new(-1, -1));
        for room in d.rooms() {
            prop_assert!(reached.contains_key(&room.midpoint()), "\n{}", d.render());
        }
    }

    #[test]
    fn prop_grid_is_total(seed in any::<u64>(), width in 6..60i32, height in 6..60i32) {
        let d = dungeon(width, height, seed);
        prop_assert_eq!(d.tiles().len(), (width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                let tile = d.tile_at(x, y);
                prop_assert!(tile.is_some_and(|t| t.x == x && t.y == y));
            }
        }
        prop_assert!(d.tile_at(width, 0).is_none());
        prop_assert!(d.tile_at(0, -1).is_none());
    }

    #[test]
    fn prop_rooms_inside_map(seed in any::<u64>(), width in 6..60i32, height in 6..60i32) {
        let d = dungeon(width, height, seed);
        for room in d.rooms() {
            prop_assert!(room.x >= 1 && room.y >= 1);
            prop_assert!(room.right() <= width - 2 && room.bottom() <= height - 2);
            for pos in room.interior().keys() {
                prop_assert!(pos.x > room.x && pos.x < room.right());
                prop_assert!(pos.y > room.y && pos.y < room.bottom());
            }
        }
    }

    #[test]
    fn prop_walls_open_at_doors(seed in any::<u64>(), width in 6..60i32, height in 6..60i32) {
        let d = dungeon(width, height, seed);
        for room in d.rooms() {
            for pos in room.border().keys() {
                let kind = d.tile(*pos).map(|t| t.kind);
                if room.doors().contains_key(pos) {
                    prop_assert_eq!(kind, Some(TileKind::Door));
                } else {
                    prop_assert_eq!(kind, Some(TileKind::Wall));
                }
            }
        }
    }

    #[test]
    fn prop_ladder_reachable_from_spawn(seed in any::<u64>(), width in 6..60i32, height in 6..60i32) {
        let d = dungeon(width, height, seed);
        let ladder = d.ladder_position().expect("every level has a ladder");
        prop_assert_eq!(d.tile(ladder).map(|t| t.kind), Some(TileKind::Ladder));

        let grid = NavGrid::from_dungeon(&d);
        let start = d.spawn_point().expect("every level has a spawn room");
        let path = reconstruct_path(&Algorithm::AStar.search(&grid, start, ladder), start, ladder);
        prop_assert!(path.is_ok());
    }

    #[test]
    fn prop_generation_is_deterministic(seed in any::<u64>(), width in 6..40i32, height in 6..40i32) {
        prop_assert_eq!(dungeon(width, height, seed), dungeon(width, height, seed));
    }
}
