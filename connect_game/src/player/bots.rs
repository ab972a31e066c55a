//! Scripted players.

use async_trait::async_trait;
use rand::Rng;

use super::evaluation::ColumnEvaluator;
use super::{Choice, Player, PlayerError};
use crate::game::{Board, Team};

/// Difficulty knobs for [`ProBot`].
#[derive(Clone, Copy, Debug)]
pub struct BotParams {
    /// Chance of ignoring the evaluation and playing a random legal
    /// column instead.
    pub mistake_chance: f64,
}

impl BotParams {
    /// Loose play: one move in five is a blunder.
    #[must_use]
    pub fn easy() -> Self {
        Self {
            mistake_chance: 0.2,
        }
    }

    /// Always plays the evaluation's best column.
    #[must_use]
    pub fn sharp() -> Self {
        Self {
            mistake_chance: 0.0,
        }
    }
}

fn legal_columns(board: &Board) -> Vec<usize> {
    (0..board.columns())
        .filter(|&column| board.is_legal_move(column))
        .collect()
}

/// Uniformly random legal play.
#[derive(Debug)]
pub struct RandomBot {
    team: Team,
}

impl RandomBot {
    #[must_use]
    pub fn new(team: Team) -> Self {
        Self { team }
    }
}

#[async_trait]
impl Player for RandomBot {
    fn name(&self) -> &str {
        "randombot"
    }

    fn team(&self) -> Team {
        self.team
    }

    async fn prompt(&mut self, board: &Board, _round: u32) -> Result<Choice, PlayerError> {
        let open = legal_columns(board);
        if open.is_empty() {
            return Ok(Choice::Resign);
        }
        let pick = open[rand::rng().random_range(0..open.len())];
        Ok(Choice::Column(pick))
    }
}

/// Heuristic player built on [`ColumnEvaluator`]: wins when it can, blocks
/// when it must, and otherwise leans toward the center. Ties are broken at
/// random so repeated matches do not replay themselves.
#[derive(Debug)]
pub struct ProBot {
    name: &'static str,
    team: Team,
    params: BotParams,
    evaluator: ColumnEvaluator,
}

impl ProBot {
    /// Full-strength variant, registered as `probot`.
    #[must_use]
    pub fn sharp(team: Team) -> Self {
        Self {
            name: "probot",
            team,
            params: BotParams::sharp(),
            evaluator: ColumnEvaluator::new(),
        }
    }

    /// Blunder-prone variant, registered as `easybot`.
    #[must_use]
    pub fn easy(team: Team) -> Self {
        Self {
            name: "easybot",
            team,
            params: BotParams::easy(),
            evaluator: ColumnEvaluator::new(),
        }
    }
}

#[async_trait]
impl Player for ProBot {
    fn name(&self) -> &str {
        self.name
    }

    fn team(&self) -> Team {
        self.team
    }

    async fn prompt(&mut self, board: &Board, _round: u32) -> Result<Choice, PlayerError> {
        let mut rng = rand::rng();
        let scores = self.evaluator.score_columns(board);
        let legal = legal_columns(board);
        if legal.is_empty() {
            return Ok(Choice::Resign);
        }
        if self.params.mistake_chance > 0.0 && rng.random_bool(self.params.mistake_chance) {
            return Ok(Choice::Column(legal[rng.random_range(0..legal.len())]));
        }

        let Some(best) = scores.iter().flatten().max().copied() else {
            return Ok(Choice::Column(legal[rng.random_range(0..legal.len())]));
        };
        let candidates: Vec<usize> = scores
            .iter()
            .enumerate()
            .filter_map(|(column, score)| (*score == Some(best)).then_some(column))
            .collect();
        Ok(Choice::Column(candidates[rng.random_range(0..candidates.len())]))
    }
}
