//! The player abstraction: one async contract over bots and human proxies.
//!
//! This module implements:
//! - [`Player`]: the contract every participant satisfies
//! - [`ColumnEvaluator`](evaluation::ColumnEvaluator): the shared column
//!   scoring heuristic
//! - [`RandomBot`]/[`ProBot`]: scripted players
//! - [`HumanPlayer`]: a proxy whose prompts suspend on chat input
//! - [`AssistBot`]: a human proxy with evaluator-backed second opinions
//! - [`PlayerRegistry`]: the explicit name to factory table

pub mod assist;
pub mod bots;
pub mod evaluation;
pub mod human;
pub mod registry;

pub use assist::AssistBot;
pub use bots::{BotParams, ProBot, RandomBot};
pub use evaluation::ColumnEvaluator;
pub use human::{HumanPlayer, RESIGN_SENTINEL};
pub use registry::{PlayerRegistry, PlayerSpawn, SpawnError};

use async_trait::async_trait;
use thiserror::Error;

use crate::chat::{Announcer, TransportError};
use crate::game::{Board, Team};

/// What a player wants to do with their turn.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Choice {
    /// Drop a marker into the given column.
    Column(usize),
    /// Concede the match.
    Resign,
}

/// Faults raised out of a player. Every fault is isolated by the caller:
/// a prompt fault forfeits the faulting team's match, and a notification
/// fault is logged and skipped. Nothing a player does can take down the
/// session.
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("player input channel closed")]
    ChannelClosed,
    #[error(transparent)]
    Fault(#[from] anyhow::Error),
}

impl From<TransportError> for PlayerError {
    fn from(_: TransportError) -> Self {
        Self::ChannelClosed
    }
}

/// Contract every participant satisfies, bots and human proxies alike.
///
/// A player is bound to one team for as long as it lives and persists
/// across every match of a session.
#[async_trait]
pub trait Player: Send {
    /// Registry name of this player's kind.
    fn name(&self) -> &str;

    /// Team this player moves for.
    fn team(&self) -> Team;

    /// Whether prompts suspend on external input. Human-capable players
    /// get the board rendered to the channel before each prompt.
    fn is_human(&self) -> bool {
        false
    }

    /// Wires the sink used for unsolicited announcements. Called once per
    /// session, before the first match.
    async fn init(&mut self, announcer: Announcer) -> Result<(), PlayerError> {
        let _ = announcer;
        Ok(())
    }

    /// Produce a move for the current turn. Bots answer synchronously;
    /// human proxies suspend until their identity sends a choice.
    async fn prompt(&mut self, board: &Board, round: u32) -> Result<Choice, PlayerError>;

    /// Best-effort end-of-match notification.
    async fn match_end(&mut self, victor: Option<Team>, round: u32) -> Result<(), PlayerError> {
        let _ = (victor, round);
        Ok(())
    }

    /// Best-effort end-of-session notification, sent once per player.
    async fn game_end(&mut self) -> Result<(), PlayerError> {
        Ok(())
    }
}
