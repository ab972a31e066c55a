//! Board state machine: move legality, placement, win and draw detection,
//! and the post-match mutation freeze.

use std::fmt::Write as _;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use thiserror::Error;

use super::entities::{BoardSpec, ConfigError, Team};

/// The four scan axes for win detection: horizontal, vertical, and the two
/// diagonals. Each axis is walked in both directions from the placed cell.
const AXES: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

/// Why a move was not applied. Every variant is a retryable caller error;
/// the board is unchanged when one is returned.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum MoveRejection {
    #[error("the match is already over")]
    MatchOver,
    #[error("the board is sealed for end-of-match notifications")]
    Sealed,
    #[error("column {column} is out of range, columns run 0..{columns}")]
    OutOfRange { column: usize, columns: usize },
    #[error("column {0} is full")]
    ColumnFull(usize),
    #[error("the first move of this match may not take the center column")]
    CenterOpening,
}

/// What a successful move did to the game.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MoveOutcome {
    /// Play continues with the next team.
    Continue,
    /// The placed marker completed a winning run.
    Win(Team),
    /// The board filled with no winning run.
    Draw,
}

/// A successfully applied move. Rows count from the bottom of the board.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Placement {
    pub column: usize,
    pub row: usize,
    pub team: Team,
    pub outcome: MoveOutcome,
}

/// Capability controlling the post-match mutation freeze.
///
/// Issued once per board at construction; only its holder can seal the
/// board, and the seal lasts exactly as long as the returned guard lives.
/// This brackets the window between a match ending and the last player
/// notification going out, so nothing can restart play on the board
/// mid-notification.
#[derive(Clone, Debug)]
pub struct MutationGate {
    sealed: Arc<AtomicBool>,
}

impl MutationGate {
    fn new() -> Self {
        Self {
            sealed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Freeze the board. Moves are rejected until the guard drops.
    #[must_use]
    pub fn seal(&self) -> GateSeal {
        self.sealed.store(true, Ordering::Release);
        GateSeal {
            sealed: Arc::clone(&self.sealed),
        }
    }
}

/// Guard returned by [`MutationGate::seal`]. Dropping it is the only way
/// to reopen the board.
#[derive(Debug)]
pub struct GateSeal {
    sealed: Arc<AtomicBool>,
}

impl Drop for GateSeal {
    fn drop(&mut self) {
        self.sealed.store(false, Ordering::Release);
    }
}

/// Grid state for one match.
///
/// The grid is stored row-major with row 0 at the bottom, so a dropped
/// marker lands at `column_heights[column]`. A board is exclusively owned
/// by the match driving it; the only shared piece is the seal flag behind
/// the [`MutationGate`].
#[derive(Debug)]
pub struct Board {
    spec: BoardSpec,
    cells: Vec<Option<Team>>,
    column_heights: Vec<usize>,
    current_team: Team,
    victor: Option<Team>,
    in_progress: bool,
    move_history: Vec<usize>,
    sealed: Arc<AtomicBool>,
}

impl Board {
    /// Build a board and the gate that controls its end-of-match freeze.
    pub fn new(spec: BoardSpec, starting_team: Team) -> Result<(Self, MutationGate), ConfigError> {
        spec.validate()?;
        if starting_team.number() > spec.team_count {
            return Err(ConfigError::StartingTeam(starting_team.number()));
        }
        let gate = MutationGate::new();
        let board = Self {
            cells: vec![None; spec.columns * spec.rows],
            column_heights: vec![0; spec.columns],
            current_team: starting_team,
            victor: None,
            in_progress: true,
            move_history: Vec::with_capacity(spec.columns * spec.rows),
            sealed: Arc::clone(&gate.sealed),
            spec,
        };
        Ok((board, gate))
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.spec.columns
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.spec.rows
    }

    #[must_use]
    pub fn connect(&self) -> usize {
        self.spec.connect
    }

    #[must_use]
    pub fn team_count(&self) -> u8 {
        self.spec.team_count
    }

    #[must_use]
    pub fn spec(&self) -> &BoardSpec {
        &self.spec
    }

    /// Team whose turn it is. Meaningless once the match is over.
    #[must_use]
    pub fn current_team(&self) -> Team {
        self.current_team
    }

    /// `None` until a win is detected, and forever `None` for draws and
    /// forfeits.
    #[must_use]
    pub fn victor(&self) -> Option<Team> {
        self.victor
    }

    #[must_use]
    pub fn in_progress(&self) -> bool {
        self.in_progress
    }

    /// Column indices in play order. One entry per occupied cell.
    #[must_use]
    pub fn move_history(&self) -> &[usize] {
        &self.move_history
    }

    /// Occupant of the cell at `(column, row)`, row 0 at the bottom.
    /// Out-of-range coordinates read as empty.
    #[must_use]
    pub fn cell(&self, column: usize, row: usize) -> Option<Team> {
        if column >= self.spec.columns || row >= self.spec.rows {
            return None;
        }
        self.cells[row * self.spec.columns + column]
    }

    #[must_use]
    pub fn column_height(&self, column: usize) -> usize {
        self.column_heights.get(column).copied().unwrap_or(0)
    }

    /// Whether `apply_move(column)` would currently be accepted.
    #[must_use]
    pub fn is_legal_move(&self, column: usize) -> bool {
        self.in_progress
            && !self.sealed.load(Ordering::Acquire)
            && column < self.spec.columns
            && self.column_heights[column] < self.spec.rows
            && !self.is_forbidden_opening(column)
    }

    /// Whether dropping a marker for `team` into `column` right now would
    /// complete a winning run. A pure query; the board is not touched.
    #[must_use]
    pub fn would_win(&self, column: usize, team: Team) -> bool {
        if column >= self.spec.columns || self.column_heights[column] >= self.spec.rows {
            return false;
        }
        self.wins_at(column, self.column_heights[column], team)
    }

    /// Drop the current team's marker into `column`.
    ///
    /// On success the marker is placed at the lowest empty row, the move is
    /// recorded, and the outcome (win, draw, or continue) is resolved from
    /// the placed cell. On rejection nothing changes.
    pub fn apply_move(&mut self, column: usize) -> Result<Placement, MoveRejection> {
        if !self.in_progress {
            return Err(MoveRejection::MatchOver);
        }
        if self.sealed.load(Ordering::Acquire) {
            return Err(MoveRejection::Sealed);
        }
        if column >= self.spec.columns {
            return Err(MoveRejection::OutOfRange {
                column,
                columns: self.spec.columns,
            });
        }
        if self.column_heights[column] >= self.spec.rows {
            return Err(MoveRejection::ColumnFull(column));
        }
        if self.is_forbidden_opening(column) {
            return Err(MoveRejection::CenterOpening);
        }

        let row = self.column_heights[column];
        let team = self.current_team;
        self.cells[row * self.spec.columns + column] = Some(team);
        self.column_heights[column] += 1;
        self.move_history.push(column);

        let outcome = if self.wins_at(column, row, team) {
            self.victor = Some(team);
            self.in_progress = false;
            MoveOutcome::Win(team)
        } else if self.move_history.len() == self.cells.len() {
            self.in_progress = false;
            MoveOutcome::Draw
        } else {
            self.current_team = team.next(self.spec.team_count);
            MoveOutcome::Continue
        };

        Ok(Placement {
            column,
            row,
            team,
            outcome,
        })
    }

    /// End the match early with no contest: `in_progress` drops, the victor
    /// stays undecided, and the move history keeps only completed moves.
    pub fn forfeit(&mut self) {
        self.in_progress = false;
    }

    /// Text rendering of the grid, top row first, with base-36 column
    /// headers matching the replay digit for each column.
    #[must_use]
    pub fn render(&self, round: u32) -> String {
        let mut out = String::new();
        if self.in_progress {
            let _ = writeln!(out, "Round {round}: {} to move.", self.current_team);
        }
        for column in 0..self.spec.columns {
            let digit = char::from_digit(column as u32, 36).unwrap_or('?');
            out.push(digit);
            out.push(' ');
        }
        out.push('\n');
        for row in (0..self.spec.rows).rev() {
            for column in 0..self.spec.columns {
                out.push(self.cell(column, row).map_or('.', Team::symbol));
                out.push(' ');
            }
            out.push('\n');
        }
        out
    }

    fn is_forbidden_opening(&self, column: usize) -> bool {
        self.spec.no_middle_start
            && self.move_history.is_empty()
            && column == self.spec.columns / 2
    }

    /// A new winning run must pass through the most recently placed cell,
    /// so scanning the four axes out from that cell is enough. The cell at
    /// `(column, row)` itself counts as 1 and may be hypothetical (empty).
    pub(crate) fn wins_at(&self, column: usize, row: usize, team: Team) -> bool {
        for (dc, dr) in AXES {
            let run = 1
                + self.run_length(column, row, team, dc, dr)
                + self.run_length(column, row, team, -dc, -dr);
            if run >= self.spec.connect {
                return true;
            }
        }
        false
    }

    /// Consecutive `team` cells along `(dc, dr)` starting next to
    /// `(column, row)`, stopping at the first gap or edge.
    fn run_length(&self, column: usize, row: usize, team: Team, dc: isize, dr: isize) -> usize {
        let mut count = 0;
        let mut c = column as isize + dc;
        let mut r = row as isize + dr;
        while c >= 0
            && r >= 0
            && (c as usize) < self.spec.columns
            && (r as usize) < self.spec.rows
            && self.cells[r as usize * self.spec.columns + c as usize] == Some(team)
        {
            count += 1;
            c += dc;
            r += dr;
        }
        count
    }
}
