//! Assistive composition: a human proxy with an evaluator looking over
//! the human's shoulder.

use async_trait::async_trait;

use super::evaluation::{ColumnEvaluator, NEAR_WIN_THRESHOLD, argmax};
use super::human::HumanPlayer;
use super::{Choice, Player, PlayerError};
use crate::chat::Announcer;
use crate::game::{Board, Team};

/// Human proxy that scores each submitted choice against the evaluation
/// and pushes back once on clearly dominated picks.
///
/// This is a decision-confirmation loop, not a game rule: a repeated
/// identical choice after the warning is always accepted, and the board
/// never sees the rejected attempts.
pub struct AssistBot {
    inner: HumanPlayer,
    evaluator: ColumnEvaluator,
}

impl AssistBot {
    #[must_use]
    pub fn new(inner: HumanPlayer) -> Self {
        Self {
            inner,
            evaluator: ColumnEvaluator::new(),
        }
    }

    /// Whether `column` is clearly dominated: the evaluation sees a
    /// near-certain win elsewhere, or this choice is near-certain losing
    /// while a safe alternative exists.
    fn is_dominated(&self, board: &Board, column: usize) -> Option<usize> {
        let scores = self.evaluator.score_columns(board);
        let (best, best_score) = argmax(&scores)?;
        // An illegal pick is the board's to reject, not ours.
        let chosen_score = scores.get(column).copied().flatten()?;
        let dominated = (best_score > NEAR_WIN_THRESHOLD && best != column)
            || (chosen_score < 0 && best_score > 0);
        dominated.then_some(best)
    }
}

#[async_trait]
impl Player for AssistBot {
    fn name(&self) -> &str {
        "assistbot"
    }

    fn team(&self) -> Team {
        self.inner.team()
    }

    fn is_human(&self) -> bool {
        true
    }

    async fn init(&mut self, announcer: Announcer) -> Result<(), PlayerError> {
        announcer.say("I'll help you out here.").await;
        self.inner.init(announcer).await
    }

    async fn prompt(&mut self, board: &Board, _round: u32) -> Result<Choice, PlayerError> {
        self.inner.announce_turn(board).await;

        let mut last_warned: Option<usize> = None;
        loop {
            let choice = self.inner.read_choice().await?;
            let Choice::Column(column) = choice else {
                return Ok(choice);
            };
            let Some(better) = self.is_dominated(board, column) else {
                return Ok(choice);
            };
            if last_warned == Some(column) {
                // The human insists; their call.
                return Ok(choice);
            }
            self.inner
                .say(&format!(
                    "Are you sure you want that? {better} may be a better option. Think carefully."
                ))
                .await;
            last_warned = Some(column);
        }
    }

    async fn match_end(&mut self, victor: Option<Team>, _round: u32) -> Result<(), PlayerError> {
        match victor {
            None => self.inner.say("Good stuff, human.").await,
            Some(team) if team == self.team() => self.inner.say("Good stuff, human.").await,
            Some(_) => self.inner.say("We'll get them next time.").await,
        }
        Ok(())
    }

    async fn game_end(&mut self) -> Result<(), PlayerError> {
        self.inner.say("I hope I was helpful.").await;
        Ok(())
    }
}
