#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::connectivity::PortFault;
    use crate::direction::{Direction, PortMask};
    use crate::level::LevelData;
    use crate::levels::campaign;
    use crate::solver::SolverFailure;
    use crate::{generator, Board, LevelBuilder, Location, Reveal};

    use Direction::{Down, Left, Right, Up};

    fn level(size: usize, masks: &[(usize, PortMask)], sources: &[usize], targets: &[usize]) -> LevelData {
        LevelData {
            size,
            masks: masks.iter().copied().collect::<BTreeMap<_, _>>(),
            sources: sources.iter().copied().collect::<BTreeSet<_>>(),
            targets: targets.iter().copied().collect::<BTreeSet<_>>(),
            locked: BTreeSet::new(),
        }
    }

    /// Source at 1 feeding down through 6 into the up-right corner at 11, which turns into the target at 12.
    fn corner_board() -> Board {
        let mut board = Board::new(&level(5, &[
            (1, Down.into()),
            (6, Up | Down),
            (11, Up | Right),
            (12, Left.into()),
        ], &[1], &[12])).unwrap();
        board.start();
        board
    }

    /// Down the left edge from 0, then along the bottom row to 24.
    fn l_path_board() -> Board {
        let mut board = Board::new(&level(5, &[
            (0, Down.into()),
            (5, Up | Down),
            (10, Up | Down),
            (15, Up | Down),
            (20, Up | Right),
            (21, Left | Right),
            (22, Left | Right),
            (23, Left | Right),
            (24, Left.into()),
        ], &[0], &[24])).unwrap();
        board.start();
        board
    }

    #[test]
    fn half_turned_corner_points_into_blank() {
        let mut board = corner_board();
        assert!(board.is_locally_valid());
        assert!(board.is_solved());

        assert!(board.rotate_tile(11));
        assert!(board.rotate_tile(11));
        assert_eq!(board.tile(11).unwrap().current_mask(), Down | Left);
        assert!(!board.is_locally_valid());
        assert!(board.faults().contains(&PortFault::Unanswered { tile: 11, direction: Left, neighbor: 10 }));
        assert!(!board.is_solved());
    }

    #[test]
    fn off_grid_ports_are_faults() {
        let mut board = corner_board();
        board.rotate_tile(6);
        // 6 is now a horizontal straight; nothing answers it and the source's down port is unanswered too
        let faults = board.faults();
        assert!(faults.contains(&PortFault::Unanswered { tile: 1, direction: Down, neighbor: 6 }));
        assert!(faults.contains(&PortFault::Unanswered { tile: 6, direction: Left, neighbor: 5 }));

        let edge = Board::new(&level(2, &[(0, Up.into()), (1, Left.into())], &[0], &[1])).unwrap();
        assert_eq!(edge.faults(), vec![
            PortFault::OffGrid { tile: 0, direction: Up },
            PortFault::Unanswered { tile: 1, direction: Left, neighbor: 0 },
        ]);
    }

    #[test]
    fn quarter_turns_break_and_full_turns_restore() {
        let board = l_path_board();
        assert!(board.is_solved());

        let movable = board.movable_indices();
        assert_eq!(movable, vec![5, 10, 15, 20, 21, 22, 23]);
        for index in movable {
            let mut turned = board.clone();
            for turns in 1..=4 {
                assert!(turned.rotate_tile(index));
                match turns {
                    // straights look the same after a half turn
                    2 => assert_eq!(turned.is_solved(), board.tile(index).unwrap().base_mask().is_straight()),
                    4 => assert!(turned.is_solved(), "tile {index} after a full turn"),
                    _ => assert!(!turned.is_solved(), "tile {index} after {turns} turns"),
                }
            }
        }
    }

    #[test]
    fn linked_directions_report_answered_ports() {
        let mut board = corner_board();
        assert!(board.is_started());
        assert_eq!(board.linked_directions(6), vec![Up, Down]);
        assert_eq!(board.linked_directions(11), vec![Up, Right]);
        assert_eq!(board.linked_directions(0), vec![]);

        // half turned, the corner faces down and left; neither is answered, and 6 loses its lower link
        board.rotate_tile(11);
        board.rotate_tile(11);
        assert_eq!(board.linked_directions(11), vec![]);
        assert_eq!(board.linked_directions(6), vec![Up]);

        // a quarter turn faces right and down; only the target answers
        board.rotate_tile(11);
        board.rotate_tile(11);
        board.rotate_tile(11);
        assert_eq!(board.tile(11).unwrap().current_mask(), Right | Down);
        assert_eq!(board.linked_directions(11), vec![Right]);
        assert_eq!(board.linked_directions(1000), vec![]);
    }

    #[test]
    fn locations_follow_row_major_indices() {
        let board = l_path_board();
        assert_eq!(board.location_of(0), Location(0, 0));
        assert_eq!(board.location_of(7), Location(2, 1));
        assert_eq!(board.location_of(24), Location(4, 4));
        for index in 0..25 {
            assert_eq!(board.tile_at(board.location_of(index)).map(|tile| tile.index()), Some(index));
        }
    }

    #[test]
    fn solve_order_walks_out_from_the_source() {
        let board = l_path_board();
        let order = board.solve_order().unwrap();

        assert_eq!(order.first(), Some(&Reveal { index: 0, distance: 0 }));
        assert!(order.windows(2).all(|pair| pair[0].distance <= pair[1].distance));
        assert_eq!(
            order.iter().map(|reveal| reveal.index).collect::<Vec<_>>(),
            vec![0, 5, 10, 15, 20, 21, 22, 23, 24],
        );
        assert_eq!(order.last().unwrap().distance, 8);
    }

    #[test]
    fn solve_order_needs_a_solved_board() {
        let mut board = l_path_board();
        board.rotate_tile(10);
        assert_eq!(board.solve_order(), None);
    }

    #[test]
    fn rotations_ignored_until_started_and_on_fixed_tiles() {
        let mut board = Board::new(&level(5, &[(1, Down.into()), (6, Up | Down), (11, Up.into())], &[1], &[11])).unwrap();
        let before = board.clone();

        assert!(!board.is_started());
        assert!(!board.rotate_tile(6));
        board.start();
        assert!(board.is_started());
        for index in [0, 1, 11, 24, 25, 1000] {
            assert!(!board.rotate_tile(index), "tile {index}");
        }
        assert_eq!(board, {
            let mut started = before.clone();
            started.start();
            started
        });

        assert!(board.rotate_tile(6));
        assert_eq!(board.tile(6).unwrap().current_mask(), Left | Right);
        assert_eq!(board.tile(6).unwrap().base_mask(), Up | Down);
    }

    #[test]
    fn islands_keep_a_board_unsolved() {
        // the circuit 0 -> 1 is complete, but a closed pair sits apart from it
        let board = Board::new(&level(4, &[
            (0, Right.into()),
            (1, Left.into()),
            (10, Right.into()),
            (11, Left.into()),
        ], &[0], &[1])).unwrap();
        assert!(board.is_locally_valid());
        assert!(!board.is_solved());
    }

    #[test]
    fn networks_need_every_target() {
        let twin = campaign().into_iter().find(|level| level.name == "Twin Feed").unwrap();
        let mut board = Board::new(&twin.data).unwrap();
        assert_eq!(board.sources().len(), 2);
        assert!(board.is_solved());

        board.start();
        // index 9 is the top wire of the right-hand column
        board.rotate_tile(9);
        assert!(!board.is_solved());
    }

    #[test]
    fn reset_restores_canonical_orientation() {
        let mut board = l_path_board();
        board.scramble(&mut StdRng::seed_from_u64(11));
        assert!(!board.is_solved());
        board.reset();
        assert!(board.is_solved());
    }

    #[test]
    fn campaign_levels_are_solved_when_unscrambled() {
        let levels = campaign();
        assert_eq!(levels.len(), 8);
        assert_eq!(crate::levels::len(), 8);
        for level in levels {
            let board = Board::new(&level.data).unwrap();
            assert!(board.is_solved(), "{}\n{}", level.name, board);
        }
    }

    #[test]
    fn campaign_layout_renders_back() {
        let board = Board::new(&crate::levels::level(3).unwrap().data).unwrap();
        assert_eq!(format!("{}", board), "..S..
..|..
..L-J
....|
....T
");
    }

    #[test]
    fn solver_recovers_scrambled_campaign() {
        for (number, level) in campaign().into_iter().enumerate() {
            let mut board = Board::new(&level.data).unwrap();
            board.scramble(&mut StdRng::seed_from_u64(number as u64));
            assert!(!board.is_solved());

            let solution = board.solution().unwrap();
            board.apply_rotations(solution);
            assert!(board.is_solved(), "{}", level.name);
        }
    }

    #[test]
    fn solver_rejects_sealed_loops() {
        // the corner block at the bottom right can only ever close on itself
        let sealed = LevelBuilder::from_layout(&[
            "S-T.",
            "....",
            "..RJ",
            "..L7",
        ]).build().unwrap();
        let board = Board::new(&sealed).unwrap();
        assert!(board.is_locally_valid());
        assert!(!board.is_solved());
        assert_eq!(board.solution(), Err(SolverFailure::Inconsistent));
    }

    #[test]
    fn solver_threads_a_corner_block() {
        let snake = LevelBuilder::from_layout(&[
            "S...",
            "LJ..",
            "R7..",
            "T...",
        ]).build().unwrap();
        let mut board = Board::new(&snake).unwrap();
        assert!(board.is_solved());

        board.scramble(&mut StdRng::seed_from_u64(5));
        let solution = board.solution().unwrap();
        board.apply_rotations(solution);
        assert!(board.is_solved());
    }

    #[test]
    fn hints_point_at_misplaced_tiles() {
        let mut board = l_path_board();
        assert_eq!(board.hint(), None);

        board.rotate_tile(21);
        let hint = board.hint().unwrap();
        assert_eq!(hint.index, 21);
        assert_eq!(hint.turns, 1);
        for _ in 0..hint.turns {
            board.rotate_tile(hint.index);
        }
        assert!(board.is_solved());
    }

    #[test]
    fn hundred_generated_boards_solve_unscrambled_and_not_scrambled() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let level = generator::generate(5, &mut rng).unwrap();
            let mut board = Board::new(&level.data).unwrap();
            assert!(board.is_solved());
            board.scramble(&mut rng);
            assert!(!board.is_solved());
        }
    }

    proptest! {
        #[test]
        fn fixed_tiles_never_turn(seed in any::<u64>(), index in 0usize..30) {
            let level = generator::generate(5, &mut StdRng::seed_from_u64(seed)).unwrap();
            let mut board = Board::new(&level.data).unwrap();
            board.start();

            let fixed = board.tile(index).map_or(true, |tile| !tile.is_movable());
            let before = board.tiles().map(|tile| tile.current_mask()).collect::<Vec<_>>();
            let turned = board.rotate_tile(index);
            let after = board.tiles().map(|tile| tile.current_mask()).collect::<Vec<_>>();

            prop_assert_eq!(turned, !fixed);
            if fixed {
                prop_assert_eq!(before, after);
            } else {
                let changed = before.iter().zip(&after).filter(|(a, b)| a != b).count();
                prop_assert_eq!(changed, 1);
            }
        }

        #[test]
        fn scrambled_campaign_is_never_solved(seed in any::<u64>(), number in 1usize..=8) {
            let level = crate::levels::level(number).unwrap();
            let mut board = Board::new(&level.data).unwrap();
            board.scramble(&mut StdRng::seed_from_u64(seed));
            prop_assert!(!board.is_solved());
        }
    }
}
