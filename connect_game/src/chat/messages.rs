//! Inbound message types and the filter used to wait for specific input.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a message author on the chat platform.
pub type UserId = u64;

/// A channel the engine may listen to or announce into.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct ChannelId(pub u64);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A message arriving from the chat platform.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct InboundMessage {
    pub author: UserId,
    pub channel: ChannelId,
    pub text: String,
}

/// Predicate bundle describing the message a waiter is parked on: an
/// optional author, a channel set, and an optional text predicate.
pub struct MessageFilter {
    author: Option<UserId>,
    channels: Vec<ChannelId>,
    predicate: Option<Box<dyn Fn(&str) -> bool + Send + Sync>>,
}

impl MessageFilter {
    /// Matches every message.
    #[must_use]
    pub fn any() -> Self {
        Self {
            author: None,
            channels: Vec::new(),
            predicate: None,
        }
    }

    /// Matches messages from one author only.
    #[must_use]
    pub fn from_author(author: UserId) -> Self {
        Self {
            author: Some(author),
            channels: Vec::new(),
            predicate: None,
        }
    }

    /// Restrict to a channel set. An empty set means any channel.
    #[must_use]
    pub fn in_channels(mut self, channels: &[ChannelId]) -> Self {
        self.channels = channels.to_vec();
        self
    }

    /// Require the message text to satisfy `predicate`.
    #[must_use]
    pub fn matching(mut self, predicate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        self.predicate = Some(Box::new(predicate));
        self
    }

    /// Whether `message` satisfies every constraint in this filter.
    #[must_use]
    pub fn accepts(&self, message: &InboundMessage) -> bool {
        if self.author.is_some_and(|author| author != message.author) {
            return false;
        }
        if !self.channels.is_empty() && !self.channels.contains(&message.channel) {
            return false;
        }
        self.predicate
            .as_ref()
            .is_none_or(|predicate| predicate(&message.text))
    }
}

impl fmt::Debug for MessageFilter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("MessageFilter")
            .field("author", &self.author)
            .field("channels", &self.channels)
            .field("has_predicate", &self.predicate.is_some())
            .finish()
    }
}
