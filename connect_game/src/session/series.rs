//! Series orchestration: configuration collection, back-to-back matches,
//! tallies, and the end-of-series report.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::config::SessionConfig;
use super::match_runner::MatchRunner;
use crate::chat::{Announcer, ChannelId, ChatTransport, MessageFilter, TransportError, UserId};
use crate::game::{
    Board, BoardSpec, ConfigError, MAX_DIMENSION, MAX_TEAMS, MIN_CONNECT, MIN_DIMENSION,
    MIN_TEAMS, ReplayCursor, Team,
};
use crate::player::{Player, PlayerRegistry, PlayerSpawn, SpawnError};

/// Exclusive right to run a match.
///
/// The engine is single-writer: whoever holds the guard owns the only
/// match in progress. Sessions sharing a slot serialize their matches;
/// the guard releases on every exit path, fault or not, because it is
/// just a dropped value.
#[derive(Clone, Debug, Default)]
pub struct MatchSlot(Arc<Mutex<()>>);

impl MatchSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot, failing fast when a match is already running.
    pub fn claim(&self) -> Result<OwnedMutexGuard<()>, SessionError> {
        self.0
            .clone()
            .try_lock_owned()
            .map_err(|_| SessionError::MatchInProgress)
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("a game is already in progress")]
    MatchInProgress,
    #[error("at least one channel is required")]
    NoChannels,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Spawn(#[from] SpawnError),
    #[error("chat transport closed")]
    TransportClosed,
}

impl From<TransportError> for SessionError {
    fn from(_: TransportError) -> Self {
        Self::TransportClosed
    }
}

/// Per-team line in a series summary.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TeamRecord {
    pub team: u8,
    pub player: String,
    pub wins: u32,
    pub win_rate: f64,
}

/// End-of-series accounting.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SeriesSummary {
    pub total_games: u32,
    pub draws: u32,
    pub teams: Vec<TeamRecord>,
}

impl fmt::Display for SeriesSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for record in &self.teams {
            writeln!(
                f,
                "Team {}, under {}, had {} wins, for a win rate of {:.2}%.",
                record.team,
                record.player,
                record.wins,
                record.win_rate * 100.0
            )?;
        }
        write!(f, "{} games ended in a draw.", self.draws)
    }
}

/// One series of matches: a board configuration, a player per team, and
/// the tallies across however many games get played.
///
/// Players persist across the whole series; the board and runner are
/// rebuilt for every match and the starting team rotates between matches.
pub struct GameSession {
    config: SessionConfig,
    transport: Arc<dyn ChatTransport>,
    /// Identity allowed to answer configuration queries.
    gamemaster: UserId,
    channels: Vec<ChannelId>,
    slot: MatchSlot,
    players: BTreeMap<Team, Box<dyn Player>>,
    wins: BTreeMap<Team, u32>,
    draws: u32,
    total_games: u32,
    interrupted: Arc<AtomicBool>,
}

impl GameSession {
    /// Build a session from explicit configuration, resolving every
    /// binding up front.
    pub fn new(
        config: SessionConfig,
        registry: &PlayerRegistry,
        transport: Arc<dyn ChatTransport>,
        gamemaster: UserId,
        human_ids: &[UserId],
        channels: Vec<ChannelId>,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        if channels.is_empty() {
            return Err(SessionError::NoChannels);
        }

        let mut players = BTreeMap::new();
        let mut wins = BTreeMap::new();
        let mut next_identity = 0;
        for (index, kind) in config.bindings.iter().enumerate() {
            let Some(team) = Team::new(index as u8 + 1) else {
                continue;
            };
            let spawn = PlayerSpawn {
                team,
                identity: human_ids.get(next_identity).copied(),
                channels: channels.clone(),
                transport: Arc::clone(&transport),
            };
            let player = registry.resolve(kind, &spawn)?;
            if player.is_human() {
                next_identity += 1;
            }
            players.insert(team, player);
            wins.insert(team, 0);
        }

        Ok(Self {
            config,
            transport,
            gamemaster,
            channels,
            slot: MatchSlot::new(),
            players,
            wins,
            draws: 0,
            total_games: 0,
            interrupted: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Collect configuration from the gamemaster over the transport, then
    /// build the session. Invalid answers re-prompt; nothing here faults.
    pub async fn configure(
        registry: PlayerRegistry,
        transport: Arc<dyn ChatTransport>,
        gamemaster: UserId,
        human_ids: &[UserId],
        channels: Vec<ChannelId>,
    ) -> Result<Self, SessionError> {
        if channels.is_empty() {
            return Err(SessionError::NoChannels);
        }
        let queries = Queries {
            transport: transport.as_ref(),
            gamemaster,
            channels: &channels,
        };

        let (board, replay) = if queries.bool_query("Quickplay? (y/n)").await? {
            (BoardSpec::default(), None)
        } else {
            let board = queries.board_query().await?;
            let replay = if queries.bool_query("Load game? (y/n)").await? {
                Some(
                    queries
                        .string_query("Enter replay string. (Move history of the desired game.)")
                        .await?,
                )
            } else {
                None
            };
            (board, replay)
        };

        let mut roster = String::from("Available players:");
        for name in registry.names() {
            roster.push('\n');
            roster.push_str(name);
        }
        queries.announce(&roster).await;

        let mut bindings = Vec::with_capacity(board.team_count as usize);
        for team_number in 1..=board.team_count {
            queries
                .announce(&format!("Which player should be team {team_number}?"))
                .await;
            loop {
                let answer = queries.any_answer().await?;
                if registry.contains(&answer) {
                    bindings.push(answer.trim().to_lowercase());
                    break;
                }
                queries
                    .announce(&format!("No player kind named '{}'.", answer.trim()))
                    .await;
            }
        }

        let config = SessionConfig {
            board,
            bindings,
            replay,
            auto_continue: false,
        };
        let mut session = Self::new(config, &registry, transport, gamemaster, human_ids, channels)?;
        if !session.has_human() {
            let auto = session
                .queries()
                .bool_query("Should the series repeat without player input? (y/n)")
                .await?;
            session.config.auto_continue = auto;
        }
        Ok(session)
    }

    /// Share this session's match slot, or install a process-wide one.
    pub fn set_slot(&mut self, slot: MatchSlot) {
        self.slot = slot;
    }

    /// Flag checked between auto-continued matches. Wire this to the
    /// host's interrupt signal to stop an unattended series.
    #[must_use]
    pub fn interrupt_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupted)
    }

    #[must_use]
    pub fn has_human(&self) -> bool {
        self.players.values().any(|player| player.is_human())
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Run matches back to back until the series is stopped, then report.
    ///
    /// This is the blocking entry point for the surrounding layer; it
    /// returns only when the controlling identity ends the series, the
    /// transport closes, or an unattended series is interrupted.
    pub async fn run(&mut self) -> Result<SeriesSummary, SessionError> {
        let announcer = Announcer::new(Arc::clone(&self.transport), self.channels[0]);
        for (team, player) in self.players.iter_mut() {
            if let Err(fault) = player.init(announcer.clone()).await {
                warn!("{team} faulted in init: {fault}");
            }
        }

        let mut starting_team = Team::first();
        let mut replay = self.config.replay.clone();
        loop {
            let guard = self.slot.claim()?;
            let (board, gate) = Board::new(self.config.board.clone(), starting_team)?;
            let mut runner = MatchRunner::new(board, gate, &mut self.players, announcer.clone());
            if let Some(encoded) = replay.take() {
                runner = runner.with_replay(ReplayCursor::new(&encoded));
            }
            let report = runner.run().await;
            drop(guard);

            self.total_games += 1;
            match report.victor {
                Some(team) => *self.wins.entry(team).or_insert(0) += 1,
                None => self.draws += 1,
            }
            info!(
                "match {} finished: victor {:?} after {} rounds",
                self.total_games, report.victor, report.rounds
            );
            if !report.replay.is_empty() {
                announcer
                    .say(&format!("Replay string: {}", report.replay))
                    .await;
            }

            if self.should_stop().await? {
                break;
            }
            starting_team = starting_team.next(self.config.board.team_count);
        }

        let summary = self.summary();
        self.report_summary(&announcer, &summary).await;
        Ok(summary)
    }

    /// Whether the series ends here. Attended series ask the channel;
    /// unattended auto-continue series only stop on interrupt.
    async fn should_stop(&self) -> Result<bool, SessionError> {
        if self.config.auto_continue && !self.has_human() {
            return Ok(self.interrupted.load(Ordering::Relaxed));
        }
        self.queries()
            .announce("Type \"next\" to continue or \"end\" to stop playing.")
            .await;
        let filter = MessageFilter::any()
            .in_channels(&self.channels)
            .matching(|text| {
                matches!(text.trim().to_lowercase().as_str(), "next" | "end")
            });
        let message = self.transport.wait_message(filter).await?;
        Ok(message.text.trim().eq_ignore_ascii_case("end"))
    }

    fn summary(&self) -> SeriesSummary {
        let teams = self
            .players
            .iter()
            .map(|(team, player)| {
                let wins = self.wins.get(team).copied().unwrap_or(0);
                let win_rate = if self.total_games == 0 {
                    0.0
                } else {
                    f64::from(wins) / f64::from(self.total_games)
                };
                TeamRecord {
                    team: team.number(),
                    player: player.name().to_string(),
                    wins,
                    win_rate,
                }
            })
            .collect();
        SeriesSummary {
            total_games: self.total_games,
            draws: self.draws,
            teams,
        }
    }

    /// Announce the summary and deliver `game_end` to every player, one
    /// fault never blocking the next delivery.
    async fn report_summary(&mut self, announcer: &Announcer, summary: &SeriesSummary) {
        for record in &summary.teams {
            announcer
                .say(&format!(
                    "Team {}, under {}, had {} wins, for a win rate of {:.2}%.",
                    record.team,
                    record.player,
                    record.wins,
                    record.win_rate * 100.0
                ))
                .await;
        }
        for (team, player) in self.players.iter_mut() {
            if let Err(fault) = player.game_end().await {
                warn!("{team} faulted in game_end: {fault}");
            }
        }
        announcer
            .say(&format!("{} games ended in a draw.", summary.draws))
            .await;
    }

    fn queries(&self) -> Queries<'_> {
        Queries {
            transport: self.transport.as_ref(),
            gamemaster: self.gamemaster,
            channels: &self.channels,
        }
    }
}

/// Interactive setup helpers: each query announces a prompt and waits for
/// the gamemaster's answer in the session's channels.
struct Queries<'a> {
    transport: &'a dyn ChatTransport,
    gamemaster: UserId,
    channels: &'a [ChannelId],
}

impl Queries<'_> {
    async fn announce(&self, text: &str) {
        self.transport.announce(self.channels[0], text).await;
    }

    async fn any_answer(&self) -> Result<String, SessionError> {
        let filter = MessageFilter::from_author(self.gamemaster).in_channels(self.channels);
        let message = self.transport.wait_message(filter).await?;
        Ok(message.text)
    }

    async fn string_query(&self, prompt: &str) -> Result<String, SessionError> {
        self.announce(prompt).await;
        Ok(self.any_answer().await?.trim().to_string())
    }

    async fn bool_query(&self, prompt: &str) -> Result<bool, SessionError> {
        self.announce(prompt).await;
        let filter = MessageFilter::from_author(self.gamemaster)
            .in_channels(self.channels)
            .matching(|text| matches!(text.trim().to_lowercase().as_str(), "y" | "n"));
        let message = self.transport.wait_message(filter).await?;
        Ok(message.text.trim().eq_ignore_ascii_case("y"))
    }

    async fn int_query(&self, prompt: &str) -> Result<i64, SessionError> {
        self.announce(prompt).await;
        let filter = MessageFilter::from_author(self.gamemaster)
            .in_channels(self.channels)
            .matching(|text| text.trim().parse::<i64>().is_ok());
        let message = self.transport.wait_message(filter).await?;
        Ok(message.text.trim().parse().unwrap_or(0))
    }

    /// Ask for each board dimension, re-prompting out-of-range answers
    /// with the constraint instead of the question.
    async fn board_query(&self) -> Result<BoardSpec, SessionError> {
        let mut columns = self
            .int_query("How many columns should the board have?")
            .await?;
        while !(MIN_DIMENSION as i64..=MAX_DIMENSION as i64).contains(&columns) {
            columns = self
                .int_query("Columns must be between 3 and 16.")
                .await?;
        }

        let mut rows = self.int_query("How many rows should the board have?").await?;
        while !(MIN_DIMENSION as i64..=MAX_DIMENSION as i64).contains(&rows) {
            rows = self.int_query("Rows must be between 3 and 16.").await?;
        }

        let mut connect = self
            .int_query("How many markers should a team have to connect?")
            .await?;
        while connect < MIN_CONNECT as i64 || (connect > columns && connect > rows) {
            connect = self
                .int_query(
                    "Connect must be greater than 2 and no greater than either columns or rows.",
                )
                .await?;
        }

        let mut team_count = self.int_query("How many teams are playing?").await?;
        while !(i64::from(MIN_TEAMS)..=i64::from(MAX_TEAMS)).contains(&team_count) {
            team_count = self.int_query("Teams must be between 2 and 8.").await?;
        }

        let no_middle_start = columns % 2 != 0
            && self
                .bool_query("Should the first player be forbidden from starting in the center? (y/n)")
                .await?;

        Ok(BoardSpec {
            columns: columns as usize,
            rows: rows as usize,
            connect: connect as usize,
            team_count: team_count as u8,
            no_middle_start,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_slot_is_exclusive() {
        let slot = MatchSlot::new();
        let guard = slot.claim().unwrap();
        assert!(matches!(
            slot.claim().err(),
            Some(SessionError::MatchInProgress)
        ));
        drop(guard);
        assert!(slot.claim().is_ok());
    }

    #[test]
    fn test_summary_display_matches_announcements() {
        let summary = SeriesSummary {
            total_games: 4,
            draws: 1,
            teams: vec![
                TeamRecord {
                    team: 1,
                    player: "probot".to_string(),
                    wins: 2,
                    win_rate: 0.5,
                },
                TeamRecord {
                    team: 2,
                    player: "randombot".to_string(),
                    wins: 1,
                    win_rate: 0.25,
                },
            ],
        };
        let text = summary.to_string();
        assert!(text.contains("Team 1, under probot, had 2 wins, for a win rate of 50.00%."));
        assert!(text.contains("1 games ended in a draw."));
    }

    #[test]
    fn test_summary_serializes() {
        let summary = SeriesSummary {
            total_games: 1,
            draws: 0,
            teams: Vec::new(),
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"total_games\":1"));
    }
}
