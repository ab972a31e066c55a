//! Chat platform boundary.
//!
//! This module implements:
//! - [`InboundMessage`]/[`MessageFilter`]: the typed shape of platform
//!   input and the predicate bundle waits are parked on
//! - [`ChatTransport`]: the two primitives the engine consumes (announce,
//!   filtered wait)
//! - [`Announcer`]: a per-channel announcement sink for players
//! - [`MemoryTransport`]: an mpsc-backed transport for tests and embedding

pub mod messages;
pub mod transport;

pub use messages::{ChannelId, InboundMessage, MessageFilter, UserId};
pub use transport::{Announcer, ChatTransport, MemoryTransport, TransportError};
