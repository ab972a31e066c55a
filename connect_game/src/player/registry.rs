//! Explicit player-kind registry.
//!
//! Session setup resolves each team's binding by name through this table.
//! Every kind is registered by hand; there is no runtime discovery.

use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

use super::assist::AssistBot;
use super::bots::{ProBot, RandomBot};
use super::human::HumanPlayer;
use super::Player;
use crate::chat::{ChannelId, ChatTransport, UserId};
use crate::game::Team;

/// Errors resolving a player binding. Both are caller errors: interactive
/// setup keeps prompting, programmatic setup gets them back verbatim.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SpawnError {
    #[error("player kind '{0}' is not registered")]
    UnknownKind(String),
    #[error("no free identity to bind for '{0}'")]
    NoIdentity(String),
}

/// Everything a factory needs to build a player for one team.
pub struct PlayerSpawn {
    pub team: Team,
    /// Next unclaimed identity, for human-capable kinds. Consumed by the
    /// session only when the spawned player turns out to be human.
    pub identity: Option<UserId>,
    /// Channels the player may listen in.
    pub channels: Vec<ChannelId>,
    pub transport: Arc<dyn ChatTransport>,
}

impl PlayerSpawn {
    fn claim_identity(&self, kind: &str) -> Result<UserId, SpawnError> {
        self.identity
            .ok_or_else(|| SpawnError::NoIdentity(kind.to_string()))
    }

    fn human(&self, kind: &str) -> Result<HumanPlayer, SpawnError> {
        Ok(HumanPlayer::new(
            self.team,
            self.claim_identity(kind)?,
            self.channels.clone(),
            Arc::clone(&self.transport),
        ))
    }
}

type PlayerFactory = Box<dyn Fn(&PlayerSpawn) -> Result<Box<dyn Player>, SpawnError> + Send + Sync>;

/// Name to factory table. Lookup is case-insensitive and whitespace
/// tolerant, since bindings arrive as chat text.
#[derive(Default)]
pub struct PlayerRegistry {
    factories: BTreeMap<String, PlayerFactory>,
}

impl PlayerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in roster.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register("randombot", |spawn| Ok(Box::new(RandomBot::new(spawn.team))));
        registry.register("easybot", |spawn| Ok(Box::new(ProBot::easy(spawn.team))));
        registry.register("probot", |spawn| Ok(Box::new(ProBot::sharp(spawn.team))));
        registry.register("human", |spawn| Ok(Box::new(spawn.human("human")?)));
        registry.register("assistbot", |spawn| {
            Ok(Box::new(AssistBot::new(spawn.human("assistbot")?)))
        });
        registry
    }

    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(&PlayerSpawn) -> Result<Box<dyn Player>, SpawnError> + Send + Sync + 'static,
    {
        self.factories
            .insert(Self::key(name), Box::new(factory));
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(&Self::key(name))
    }

    /// Registered kind names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Build a player of kind `name` for the given spawn context.
    pub fn resolve(&self, name: &str, spawn: &PlayerSpawn) -> Result<Box<dyn Player>, SpawnError> {
        let key = Self::key(name);
        let factory = self
            .factories
            .get(&key)
            .ok_or(SpawnError::UnknownKind(key))?;
        factory(spawn)
    }

    fn key(name: &str) -> String {
        name.trim().to_lowercase()
    }
}
