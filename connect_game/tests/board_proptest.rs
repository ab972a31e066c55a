//! Property-based tests for board invariants and replay determinism.
//!
//! These tests drive boards of arbitrary shape with arbitrary column
//! streams and check the invariants that hold for every game: occupancy
//! bookkeeping, rejection purity, and replay round-trips.

use connect_game::game::replay;
use connect_game::{Board, BoardSpec, MutationGate, ReplayCursor, Team};
use proptest::prelude::*;

// Strategy for a valid board shape plus a stream of column picks. Shapes
// stay small enough to fill within a few hundred picks.
fn spec_and_moves() -> impl Strategy<Value = (BoardSpec, Vec<usize>)> {
    (3usize..=9, 3usize..=9, 2u8..=4)
        .prop_flat_map(|(columns, rows, team_count)| {
            (
                Just(columns),
                Just(rows),
                3usize..=columns.max(rows),
                Just(team_count),
            )
        })
        .prop_flat_map(|(columns, rows, connect, team_count)| {
            let spec = BoardSpec {
                columns,
                rows,
                connect,
                team_count,
                no_middle_start: false,
            };
            let moves = prop::collection::vec(0..columns, 0..=columns * rows + 8);
            (Just(spec), moves)
        })
}

// Drive a board with a pick stream, ignoring rejections, stopping when
// the game ends.
fn play_out(spec: &BoardSpec, moves: &[usize]) -> (Board, MutationGate) {
    let (mut board, gate) = Board::new(spec.clone(), Team::first()).unwrap();
    for &column in moves {
        if !board.in_progress() {
            break;
        }
        let _ = board.apply_move(column);
    }
    (board, gate)
}

proptest! {
    #[test]
    fn test_history_length_matches_occupancy((spec, moves) in spec_and_moves()) {
        let (board, _gate) = play_out(&spec, &moves);
        let occupied: usize = (0..spec.columns).map(|c| board.column_height(c)).sum();
        prop_assert_eq!(board.move_history().len(), occupied);
        for column in 0..spec.columns {
            prop_assert!(board.column_height(column) <= spec.rows);
        }
    }

    #[test]
    fn test_victor_implies_match_over((spec, moves) in spec_and_moves()) {
        let (board, _gate) = play_out(&spec, &moves);
        if board.victor().is_some() {
            prop_assert!(!board.in_progress());
        }
        if let Some(victor) = board.victor() {
            prop_assert!(victor.number() >= 1);
            prop_assert!(victor.number() <= spec.team_count);
        }
    }

    #[test]
    fn test_rejected_moves_never_mutate((spec, moves) in spec_and_moves()) {
        let (mut board, _gate) = play_out(&spec, &moves);
        let history = board.move_history().to_vec();
        let heights: Vec<usize> = (0..spec.columns).map(|c| board.column_height(c)).collect();
        let team = board.current_team();
        let victor = board.victor();

        // Out of range is always a rejection; a full column (when one
        // exists) likewise.
        let _ = board.apply_move(spec.columns + 1).unwrap_err();
        if let Some(full) = (0..spec.columns).find(|&c| board.column_height(c) == spec.rows) {
            if board.in_progress() {
                let _ = board.apply_move(full).unwrap_err();
            }
        }

        prop_assert_eq!(board.move_history(), history.as_slice());
        let heights_after: Vec<usize> =
            (0..spec.columns).map(|c| board.column_height(c)).collect();
        prop_assert_eq!(heights, heights_after);
        prop_assert_eq!(board.current_team(), team);
        prop_assert_eq!(board.victor(), victor);
    }

    #[test]
    fn test_replay_round_trip_reproduces_terminal_state((spec, moves) in spec_and_moves()) {
        let (board, _gate) = play_out(&spec, &moves);

        let encoded = replay::encode(board.move_history());
        prop_assert_eq!(encoded.len(), board.move_history().len());

        let (mut fresh, _fresh_gate) = Board::new(spec.clone(), Team::first()).unwrap();
        let mut cursor = ReplayCursor::new(&encoded);
        while let Some(step) = cursor.next_column() {
            let column = step.unwrap();
            fresh.apply_move(column).unwrap();
        }

        prop_assert_eq!(fresh.victor(), board.victor());
        prop_assert_eq!(fresh.in_progress(), board.in_progress());
        prop_assert_eq!(fresh.move_history(), board.move_history());
        for column in 0..spec.columns {
            for row in 0..spec.rows {
                prop_assert_eq!(fresh.cell(column, row), board.cell(column, row));
            }
        }
    }
}
