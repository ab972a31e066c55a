//! # Connect Game
//!
//! A generalized turn-based connection-game engine: arbitrary board
//! dimensions, win-run length, and team count, with bots and chat-driven
//! humans playing under one contract.
//!
//! ## Architecture
//!
//! The engine is a small stack of single-purpose layers:
//!
//! - **Board**: grid state machine with localized win detection. A new
//!   winning run must pass through the cell placed last, so each move
//!   scans four axes out from that cell instead of rescanning the board.
//! - **Replay codec**: a finished match serializes to one base-36 digit
//!   per move; replaying the string against a fresh board reproduces the
//!   exact terminal state.
//! - **Player**: one async contract over bots and human proxies. Bots
//!   answer prompts synchronously; a human prompt suspends its match's
//!   task until the bound identity sends a choice over the chat
//!   transport.
//! - **Match runner**: drives one game, isolating every player fault so
//!   a misbehaving player forfeits its own match and nothing else.
//! - **Session**: collects configuration, runs matches back to back, and
//!   tallies results. A [`MatchSlot`] guard keeps the engine
//!   single-writer across however many sessions share it.
//!
//! The chat platform itself stays behind the [`ChatTransport`] trait; the
//! engine only announces text and waits for filtered messages.
//!
//! ## Example
//!
//! ```
//! use connect_game::{Board, BoardSpec, MoveOutcome, Team};
//!
//! let (mut board, _gate) = Board::new(BoardSpec::default(), Team::first()).unwrap();
//! let placement = board.apply_move(3).unwrap();
//! assert_eq!(placement.outcome, MoveOutcome::Continue);
//! assert_eq!(board.move_history(), &[3]);
//! ```

/// Core game logic: board, entities, replay codec.
pub mod game;
pub use game::{
    Board, BoardSpec, ConfigError, GateSeal, MoveOutcome, MoveRejection, MutationGate, Placement,
    ReplayCursor, ReplayError, Team,
};

/// Chat platform boundary.
pub mod chat;
pub use chat::{
    Announcer, ChannelId, ChatTransport, InboundMessage, MemoryTransport, MessageFilter,
    TransportError, UserId,
};

/// Player contract, bots, human proxies, and the registry.
pub mod player;
pub use player::{
    AssistBot, Choice, HumanPlayer, Player, PlayerError, PlayerRegistry, PlayerSpawn, ProBot,
    RandomBot, SpawnError,
};

/// Match and series orchestration.
pub mod session;
pub use session::{
    GameSession, MatchReport, MatchRunner, MatchSlot, SeriesSummary, SessionConfig, SessionError,
    TeamRecord,
};
