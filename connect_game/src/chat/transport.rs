//! The transport boundary between the engine and its chat platform.
//!
//! The engine only ever needs two primitives from the outside world: a
//! fire-and-forget announcement into a channel, and a suspending wait for
//! the next message matching a filter. Everything else about the platform
//! stays on the other side of [`ChatTransport`].

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, mpsc};

use super::messages::{ChannelId, InboundMessage, MessageFilter};

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum TransportError {
    /// The inbound side of the transport is gone; no more messages will
    /// ever arrive.
    #[error("chat transport closed")]
    Closed,
}

/// What the engine consumes from the surrounding chat layer.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Fire-and-forget announcement. Delivery failures are the
    /// transport's problem, not the engine's.
    async fn announce(&self, channel: ChannelId, text: &str);

    /// Suspend until a message accepted by `filter` arrives. Only the
    /// waiting task is parked; the rest of the process keeps running.
    async fn wait_message(&self, filter: MessageFilter) -> Result<InboundMessage, TransportError>;
}

/// Cloneable announcement sink bound to one channel. Handed to players at
/// init so they can make unsolicited announcements without holding the
/// full transport surface.
#[derive(Clone)]
pub struct Announcer {
    transport: Arc<dyn ChatTransport>,
    channel: ChannelId,
}

impl Announcer {
    #[must_use]
    pub fn new(transport: Arc<dyn ChatTransport>, channel: ChannelId) -> Self {
        Self { transport, channel }
    }

    #[must_use]
    pub fn channel(&self) -> ChannelId {
        self.channel
    }

    pub async fn say(&self, text: &str) {
        self.transport.announce(self.channel, text).await;
    }
}

impl fmt::Debug for Announcer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Announcer")
            .field("channel", &self.channel)
            .finish()
    }
}

/// In-memory transport over tokio channels, for tests and for embedding
/// the engine in a host that already has its own message pump.
///
/// Messages that match no parked filter are dropped, mirroring a chat
/// stream where unrelated traffic simply flows past the engine.
pub struct MemoryTransport {
    inbox: Mutex<mpsc::UnboundedReceiver<InboundMessage>>,
    outbox: mpsc::UnboundedSender<(ChannelId, String)>,
}

impl MemoryTransport {
    /// Returns the transport plus the host's two ends: a sender for
    /// inbound messages and a receiver for everything announced.
    #[must_use]
    pub fn new() -> (
        Arc<Self>,
        mpsc::UnboundedSender<InboundMessage>,
        mpsc::UnboundedReceiver<(ChannelId, String)>,
    ) {
        let (in_tx, in_rx) = mpsc::unbounded_channel();
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let transport = Arc::new(Self {
            inbox: Mutex::new(in_rx),
            outbox: out_tx,
        });
        (transport, in_tx, out_rx)
    }
}

#[async_trait]
impl ChatTransport for MemoryTransport {
    async fn announce(&self, channel: ChannelId, text: &str) {
        // The host may have dropped its receiver; announcements are
        // fire-and-forget either way.
        let _ = self.outbox.send((channel, text.to_string()));
    }

    async fn wait_message(&self, filter: MessageFilter) -> Result<InboundMessage, TransportError> {
        let mut inbox = self.inbox.lock().await;
        loop {
            let Some(message) = inbox.recv().await else {
                return Err(TransportError::Closed);
            };
            if filter.accepts(&message) {
                return Ok(message);
            }
            log::debug!("ignoring message from {} in {}", message.author, message.channel);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::messages::MessageFilter;

    fn message(author: u64, channel: u64, text: &str) -> InboundMessage {
        InboundMessage {
            author,
            channel: ChannelId(channel),
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_wait_skips_non_matching_messages() {
        let (transport, inbound, _outbound) = MemoryTransport::new();
        inbound.send(message(9, 0, "noise")).unwrap();
        inbound.send(message(1, 0, "noise too")).unwrap();
        inbound.send(message(1, 0, "3")).unwrap();

        let filter =
            MessageFilter::from_author(1).matching(|text| text.trim().parse::<usize>().is_ok());
        let received = transport.wait_message(filter).await.unwrap();
        assert_eq!(received.text, "3");
    }

    #[tokio::test]
    async fn test_wait_errors_when_inbound_closes() {
        let (transport, inbound, _outbound) = MemoryTransport::new();
        drop(inbound);
        let result = transport.wait_message(MessageFilter::any()).await;
        assert_eq!(result.unwrap_err(), TransportError::Closed);
    }

    #[tokio::test]
    async fn test_announcements_reach_the_host() {
        let (transport, _inbound, mut outbound) = MemoryTransport::new();
        transport.announce(ChannelId(5), "hello").await;
        let (channel, text) = outbound.recv().await.unwrap();
        assert_eq!(channel, ChannelId(5));
        assert_eq!(text, "hello");
    }

    #[tokio::test]
    async fn test_announce_survives_dropped_host_receiver() {
        let (transport, _inbound, outbound) = MemoryTransport::new();
        drop(outbound);
        transport.announce(ChannelId(0), "shout into the void").await;
    }
}
