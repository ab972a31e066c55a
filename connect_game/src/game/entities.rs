//! Core board entities and construction parameters.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Smallest board side the engine accepts.
pub const MIN_DIMENSION: usize = 3;
/// Largest board side the engine accepts. Also caps column indices to a
/// single base-36 digit for the replay codec.
pub const MAX_DIMENSION: usize = 16;
/// Smallest run length that can be required to win.
pub const MIN_CONNECT: usize = 3;
/// Fewest teams that make a game.
pub const MIN_TEAMS: u8 = 2;
/// Most teams a board can seat.
pub const MAX_TEAMS: u8 = 8;

/// One rendering symbol per team, indexed by team number minus one.
const TEAM_SYMBOLS: [char; MAX_TEAMS as usize] = ['x', 'o', '#', '@', '+', '*', '%', '&'];

/// Errors in board or session construction parameters. Always a caller
/// error: interactive setup re-prompts, programmatic setup gets the value
/// back in the variant.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum ConfigError {
    #[error("columns must be between 3 and 16, got {0}")]
    Columns(usize),
    #[error("rows must be between 3 and 16, got {0}")]
    Rows(usize),
    #[error("connect must be greater than 2 and no greater than the longer board side, got {0}")]
    Connect(usize),
    #[error("teams must be between 2 and 8, got {0}")]
    Teams(u8),
    #[error("the center opening can only be forbidden on a board with an odd number of columns")]
    CenterRule,
    #[error("starting team {0} is not seated on this board")]
    StartingTeam(u8),
    #[error("expected one player binding per team ({expected}), got {got}")]
    Bindings { expected: usize, got: usize },
}

/// A participant identifier. Team numbers run `1..=team_count`; an
/// unoccupied cell or an undecided match is `Option::<Team>::None`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Team(u8);

impl Team {
    /// Team numbers are 1-based; zero is not a team.
    #[must_use]
    pub fn new(number: u8) -> Option<Self> {
        (number >= 1).then_some(Self(number))
    }

    /// The team that opens a fresh series.
    #[must_use]
    pub const fn first() -> Self {
        Self(1)
    }

    #[must_use]
    pub const fn number(self) -> u8 {
        self.0
    }

    /// The team that moves after this one, wrapping back to team 1.
    #[must_use]
    pub fn next(self, team_count: u8) -> Self {
        if self.0 >= team_count {
            Self(1)
        } else {
            Self(self.0 + 1)
        }
    }

    /// Single-character marker used in board renderings.
    #[must_use]
    pub fn symbol(self) -> char {
        TEAM_SYMBOLS[(self.0 as usize - 1) % TEAM_SYMBOLS.len()]
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "team {}", self.0)
    }
}

/// Validated construction parameters for a [`Board`](super::Board).
///
/// The default is the quickplay setup: a classic 7 x 6 board, connect 4,
/// two teams, center opening allowed.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct BoardSpec {
    pub columns: usize,
    pub rows: usize,
    /// Run length (along any of the four axes) required to win.
    pub connect: usize,
    pub team_count: u8,
    /// Forbid the very first move of a match from taking the center
    /// column. Only meaningful when `columns` is odd.
    pub no_middle_start: bool,
}

impl Default for BoardSpec {
    fn default() -> Self {
        Self {
            columns: 7,
            rows: 6,
            connect: 4,
            team_count: 2,
            no_middle_start: false,
        }
    }
}

impl BoardSpec {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&self.columns) {
            return Err(ConfigError::Columns(self.columns));
        }
        if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&self.rows) {
            return Err(ConfigError::Rows(self.rows));
        }
        if self.connect < MIN_CONNECT || (self.connect > self.columns && self.connect > self.rows) {
            return Err(ConfigError::Connect(self.connect));
        }
        if !(MIN_TEAMS..=MAX_TEAMS).contains(&self.team_count) {
            return Err(ConfigError::Teams(self.team_count));
        }
        if self.no_middle_start && self.columns % 2 == 0 {
            return Err(ConfigError::CenterRule);
        }
        Ok(())
    }
}
