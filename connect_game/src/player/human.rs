//! Human proxy: a player whose prompts suspend on chat input.

use async_trait::async_trait;
use std::sync::Arc;

use super::{Choice, Player, PlayerError};
use crate::chat::{Announcer, ChannelId, ChatTransport, MessageFilter, UserId};
use crate::game::{Board, Team};

/// The sentinel a human sends instead of a column number to concede.
pub const RESIGN_SENTINEL: &str = "end";

/// Proxy for a human moving through the chat transport.
///
/// A prompt suspends the owning match's task until the bound identity
/// sends a column number or the resignation sentinel in one of the
/// permitted channels. Other traffic flows past the filter untouched.
pub struct HumanPlayer {
    team: Team,
    id: UserId,
    channels: Vec<ChannelId>,
    transport: Arc<dyn ChatTransport>,
    announcer: Option<Announcer>,
}

impl HumanPlayer {
    #[must_use]
    pub fn new(
        team: Team,
        id: UserId,
        channels: Vec<ChannelId>,
        transport: Arc<dyn ChatTransport>,
    ) -> Self {
        Self {
            team,
            id,
            channels,
            transport,
            announcer: None,
        }
    }

    /// Identity whose messages this proxy listens for.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    pub(crate) async fn say(&self, text: &str) {
        if let Some(announcer) = &self.announcer {
            announcer.say(text).await;
        }
    }

    pub(crate) async fn announce_turn(&self, board: &Board) {
        self.say(&format!("Input move, {}.", board.current_team()))
            .await;
    }

    /// Wait for the next move-shaped message from the bound identity:
    /// either a column number or the resignation sentinel.
    pub(crate) async fn read_choice(&self) -> Result<Choice, PlayerError> {
        let filter = MessageFilter::from_author(self.id)
            .in_channels(&self.channels)
            .matching(|text| {
                let text = text.trim();
                text.eq_ignore_ascii_case(RESIGN_SENTINEL) || text.parse::<usize>().is_ok()
            });
        let message = self.transport.wait_message(filter).await?;
        let text = message.text.trim();
        Ok(text
            .parse::<usize>()
            .map(Choice::Column)
            .unwrap_or(Choice::Resign))
    }
}

#[async_trait]
impl Player for HumanPlayer {
    fn name(&self) -> &str {
        "human"
    }

    fn team(&self) -> Team {
        self.team
    }

    fn is_human(&self) -> bool {
        true
    }

    async fn init(&mut self, announcer: Announcer) -> Result<(), PlayerError> {
        self.announcer = Some(announcer);
        Ok(())
    }

    async fn prompt(&mut self, board: &Board, _round: u32) -> Result<Choice, PlayerError> {
        self.announce_turn(board).await;
        self.read_choice().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{InboundMessage, MemoryTransport};
    use crate::game::BoardSpec;

    const PLAYER_ID: UserId = 42;
    const CHANNEL: ChannelId = ChannelId(1);

    fn message(author: UserId, text: &str) -> InboundMessage {
        InboundMessage {
            author,
            channel: CHANNEL,
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_prompt_returns_first_parseable_column() {
        let (transport, inbound, _outbound) = MemoryTransport::new();
        let mut player = HumanPlayer::new(Team::first(), PLAYER_ID, vec![CHANNEL], transport);
        let (board, _gate) = Board::new(BoardSpec::default(), Team::first()).unwrap();

        inbound.send(message(99, "4")).unwrap(); // wrong author
        inbound.send(message(PLAYER_ID, "not a move")).unwrap();
        inbound.send(message(PLAYER_ID, " 4 ")).unwrap();

        let choice = player.prompt(&board, 1).await.unwrap();
        assert_eq!(choice, Choice::Column(4));
    }

    #[tokio::test]
    async fn test_resign_sentinel_is_case_insensitive() {
        let (transport, inbound, _outbound) = MemoryTransport::new();
        let mut player = HumanPlayer::new(Team::first(), PLAYER_ID, vec![CHANNEL], transport);
        let (board, _gate) = Board::new(BoardSpec::default(), Team::first()).unwrap();

        inbound.send(message(PLAYER_ID, "End")).unwrap();
        let choice = player.prompt(&board, 1).await.unwrap();
        assert_eq!(choice, Choice::Resign);
    }

    #[tokio::test]
    async fn test_closed_transport_is_a_channel_closed_fault() {
        let (transport, inbound, _outbound) = MemoryTransport::new();
        let mut player = HumanPlayer::new(Team::first(), PLAYER_ID, vec![CHANNEL], transport);
        let (board, _gate) = Board::new(BoardSpec::default(), Team::first()).unwrap();

        drop(inbound);
        let result = player.prompt(&board, 1).await;
        assert!(matches!(result, Err(PlayerError::ChannelClosed)));
    }

    #[tokio::test]
    async fn test_messages_in_foreign_channels_are_ignored() {
        let (transport, inbound, _outbound) = MemoryTransport::new();
        let mut player = HumanPlayer::new(Team::first(), PLAYER_ID, vec![CHANNEL], transport);
        let (board, _gate) = Board::new(BoardSpec::default(), Team::first()).unwrap();

        inbound
            .send(InboundMessage {
                author: PLAYER_ID,
                channel: ChannelId(999),
                text: "0".to_string(),
            })
            .unwrap();
        inbound.send(message(PLAYER_ID, "2")).unwrap();

        let choice = player.prompt(&board, 1).await.unwrap();
        assert_eq!(choice, Choice::Column(2));
    }
}
