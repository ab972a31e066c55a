//! Session configuration.

use serde::{Deserialize, Serialize};

use crate::game::{BoardSpec, ConfigError};

/// Full configuration for a series of matches. Immutable once the session
/// starts running.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SessionConfig {
    pub board: BoardSpec,
    /// Player kind per team; index 0 binds team 1.
    pub bindings: Vec<String>,
    /// Replay string applied to the first match of the series.
    pub replay: Option<String>,
    /// Start the next match without the continue prompt. Only honored
    /// when no human player is bound; an interrupt stops the series.
    pub auto_continue: bool,
}

impl SessionConfig {
    /// Quickplay setup with the given bindings: classic board, no replay,
    /// prompting between matches.
    #[must_use]
    pub fn quickplay(bindings: Vec<String>) -> Self {
        Self {
            board: BoardSpec::default(),
            bindings,
            replay: None,
            auto_continue: false,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.board.validate()?;
        if self.bindings.len() != self.board.team_count as usize {
            return Err(ConfigError::Bindings {
                expected: self.board.team_count as usize,
                got: self.bindings.len(),
            });
        }
        Ok(())
    }
}
