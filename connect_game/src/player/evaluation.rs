//! Column scoring heuristics shared by the scripted bots and the assist
//! flow.

use crate::game::{Board, Team};

// === Column score anchors ===

/// Score for a column that wins the match outright.
pub const SCORE_WIN: i32 = 1_000;

/// Bonus for occupying a column an opponent would otherwise win with.
pub const SCORE_BLOCK: i32 = 600;

/// Penalty for a move that hands an opponent a winning reply directly on
/// top of it.
pub const SCORE_GIFT: i32 = -700;

/// Scores above this are treated as near-certain wins by the assist flow;
/// scores below zero as near-certain losses.
pub const NEAR_WIN_THRESHOLD: i32 = 500;

/// First index holding the maximum score, with the score itself. Columns
/// scoring `None` never win the comparison.
#[must_use]
pub fn argmax(scores: &[Option<i32>]) -> Option<(usize, i32)> {
    let mut best: Option<(usize, i32)> = None;
    for (column, score) in scores.iter().enumerate() {
        let Some(score) = score else { continue };
        if best.is_none_or(|(_, current)| *score > current) {
            best = Some((column, *score));
        }
    }
    best
}

/// Stateless scorer for every legal column of a position.
///
/// The scale is anchored by the constants above: anything at or above
/// [`SCORE_WIN`] ends the match this turn, positive mid-range scores are
/// blocks or well-placed markers, and negative scores set an opponent up.
#[derive(Clone, Copy, Debug, Default)]
pub struct ColumnEvaluator;

impl ColumnEvaluator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Score every column for the team currently to move. Columns that
    /// cannot legally be played score `None`.
    #[must_use]
    pub fn score_columns(&self, board: &Board) -> Vec<Option<i32>> {
        (0..board.columns())
            .map(|column| self.score_column(board, column))
            .collect()
    }

    fn score_column(&self, board: &Board, column: usize) -> Option<i32> {
        if !board.is_legal_move(column) {
            return None;
        }
        let mover = board.current_team();
        if board.would_win(column, mover) {
            return Some(SCORE_WIN);
        }

        let mut score = center_bias(board.columns(), column);
        if self.opponents(board, mover).any(|team| board.would_win(column, team)) {
            score += SCORE_BLOCK;
        }
        if self.opens_reply_win(board, column, mover) {
            score += SCORE_GIFT;
        }
        Some(score)
    }

    /// Whether dropping into `column` leaves the cell above it as an
    /// immediate win for some opponent. The surrounding cells are read
    /// as-is: the only run through both the dropped cell and the cell
    /// above is vertical, and a vertical opponent run can never cross the
    /// mover's own marker.
    fn opens_reply_win(&self, board: &Board, column: usize, mover: Team) -> bool {
        let reply_row = board.column_height(column) + 1;
        if reply_row >= board.rows() {
            return false;
        }
        self.opponents(board, mover)
            .any(|team| board.wins_at(column, reply_row, team))
    }

    fn opponents(&self, board: &Board, mover: Team) -> impl Iterator<Item = Team> {
        (1..=board.team_count())
            .filter_map(Team::new)
            .filter(move |team| *team != mover)
    }
}

/// Small bonus for central columns, where more runs intersect.
fn center_bias(columns: usize, column: usize) -> i32 {
    let twice_from_center = (2 * column as i32 - (columns as i32 - 1)).abs();
    (columns as i32 - twice_from_center) / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{BoardSpec, MutationGate, Team};

    fn quickplay() -> (Board, MutationGate) {
        Board::new(BoardSpec::default(), Team::first()).unwrap()
    }

    #[test]
    fn test_immediate_win_scores_highest() {
        let (mut board, _gate) = quickplay();
        // Team 1 has three on the bottom row; column 3 completes it.
        for column in [0, 6, 1, 6, 2, 5] {
            board.apply_move(column).unwrap();
        }
        let scores = ColumnEvaluator::new().score_columns(&board);
        assert_eq!(scores[3], Some(SCORE_WIN));
        let (best, score) = argmax(&scores).unwrap();
        assert_eq!(best, 3);
        assert_eq!(score, SCORE_WIN);
    }

    #[test]
    fn test_blocking_an_opponent_win_scores_high() {
        let (mut board, _gate) = quickplay();
        // Team 2 to move, team 1 threatening at column 3.
        for column in [0, 6, 1, 6, 2] {
            board.apply_move(column).unwrap();
        }
        assert_eq!(board.current_team().number(), 2);
        let scores = ColumnEvaluator::new().score_columns(&board);
        assert!(scores[3].unwrap() >= SCORE_BLOCK);
        assert_eq!(argmax(&scores).unwrap().0, 3);
    }

    #[test]
    fn test_gifting_a_reply_win_scores_negative() {
        let (mut board, _gate) = quickplay();
        // Team 1 ends up owning row 1 across columns 1..=3, so both (0,1)
        // and (4,1) complete a four. Neither is reachable yet: columns 0
        // and 4 are empty, and dropping into either hands team 1 the cell
        // above as a winning reply.
        for column in [3, 1, 3, 2, 2, 6, 1] {
            board.apply_move(column).unwrap();
        }
        assert_eq!(board.current_team().number(), 2);
        assert!(!board.would_win(0, Team::first()));
        let scores = ColumnEvaluator::new().score_columns(&board);
        assert!(
            scores[0].unwrap() < 0,
            "column 0 should carry the gift penalty, got {:?}",
            scores[0]
        );
        assert!(
            scores[4].unwrap() < 0,
            "column 4 should carry the gift penalty, got {:?}",
            scores[4]
        );
        // A quiet column stays non-negative.
        assert!(scores[5].unwrap() >= 0);
    }

    #[test]
    fn test_full_columns_score_none() {
        let (mut board, _gate) = quickplay();
        for _ in 0..6 {
            board.apply_move(0).unwrap();
        }
        let scores = ColumnEvaluator::new().score_columns(&board);
        assert_eq!(scores[0], None);
        assert!(scores[1].is_some());
    }

    #[test]
    fn test_center_bias_prefers_middle_on_quiet_board() {
        let (board, _gate) = quickplay();
        let scores = ColumnEvaluator::new().score_columns(&board);
        let (best, _) = argmax(&scores).unwrap();
        assert_eq!(best, 3);
        assert!(scores[3] > scores[0]);
    }

    #[test]
    fn test_argmax_ignores_none_and_takes_first_maximum() {
        assert_eq!(argmax(&[None, Some(2), Some(5), Some(5)]), Some((2, 5)));
        assert_eq!(argmax(&[None, None]), None);
        assert_eq!(argmax(&[]), None);
    }
}
