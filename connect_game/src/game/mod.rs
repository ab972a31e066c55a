//! Core game logic: board entities, the board state machine, and the
//! replay codec.
//!
//! This module implements:
//! - [`Board`]: grid state, move legality, localized win detection, draw
//!   detection, and forfeits
//! - [`MutationGate`]/[`GateSeal`]: the RAII freeze that brackets the
//!   post-match notification window
//! - [`replay`]: the compact move-history string codec used for loading
//!   finished games

pub mod board;
pub mod entities;
pub mod replay;

pub use board::{Board, GateSeal, MoveOutcome, MoveRejection, MutationGate, Placement};
pub use entities::{
    BoardSpec, ConfigError, MAX_DIMENSION, MAX_TEAMS, MIN_CONNECT, MIN_DIMENSION, MIN_TEAMS, Team,
};
pub use replay::{ReplayCursor, ReplayError};
