//! The match state machine: one game from first move to the last
//! notification.

use log::{debug, error, warn};
use std::collections::BTreeMap;

use crate::chat::Announcer;
use crate::game::{Board, MutationGate, ReplayCursor, Team, replay};
use crate::player::{Choice, Player};

/// Final accounting for one finished match.
#[derive(Clone, Debug)]
pub struct MatchReport {
    /// `None` for draws and forfeits.
    pub victor: Option<Team>,
    /// Full cycles through the turn order, counting from 1.
    pub rounds: u32,
    pub moves: usize,
    /// Compact move-history string that reproduces this match.
    pub replay: String,
}

/// Drives one match to completion.
///
/// The runner owns the board exclusively for the match's duration and
/// borrows the session's players. Turns are strictly sequential; the only
/// suspension point is a human prompt. A replay cursor, when present,
/// feeds moves until it is spent or fails, after which play is live.
pub struct MatchRunner<'a> {
    board: Board,
    gate: MutationGate,
    players: &'a mut BTreeMap<Team, Box<dyn Player>>,
    replay: Option<ReplayCursor>,
    announcer: Announcer,
    round: u32,
}

impl<'a> MatchRunner<'a> {
    pub fn new(
        board: Board,
        gate: MutationGate,
        players: &'a mut BTreeMap<Team, Box<dyn Player>>,
        announcer: Announcer,
    ) -> Self {
        Self {
            board,
            gate,
            players,
            replay: None,
            announcer,
            round: 0,
        }
    }

    /// Feed the opening moves from a replay string.
    #[must_use]
    pub fn with_replay(mut self, cursor: ReplayCursor) -> Self {
        self.replay = Some(cursor);
        self
    }

    /// The board, terminal once [`run`](Self::run) has returned.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Run the match to completion and notify every player.
    pub async fn run(&mut self) -> MatchReport {
        self.round = 0;
        let starting_team = self.board.current_team();
        while self.board.in_progress() {
            let prompting_team = self.board.current_team();
            if prompting_team == starting_team {
                self.round += 1;
            }
            if self.try_replay_move().await {
                continue;
            }
            self.live_turn(prompting_team).await;
        }

        let report = MatchReport {
            victor: self.board.victor(),
            rounds: self.round,
            moves: self.board.move_history().len(),
            replay: replay::encode(self.board.move_history()),
        };
        self.notify_players(&report).await;
        report
    }

    /// Apply the next replayed move, if any. Returns false once replay is
    /// disabled or spent, handing the turn to live play. The first decode
    /// error or rejected move disables replay for the rest of the match.
    async fn try_replay_move(&mut self) -> bool {
        let Some(cursor) = self.replay.as_mut() else {
            return false;
        };
        if cursor.exhausted() {
            self.replay = None;
            return false;
        }
        let starting = cursor.position() == 0;
        let step = cursor.next_column();
        if starting {
            self.announcer.say("Replaying...").await;
        }
        let column = match step {
            Some(Ok(column)) => column,
            Some(Err(bad_digit)) => {
                warn!("replay aborted: {bad_digit}");
                self.abort_replay().await;
                return false;
            }
            None => {
                self.replay = None;
                return false;
            }
        };
        match self.board.apply_move(column) {
            Ok(placement) => {
                debug!(
                    "replayed {} into column {column}, row {}",
                    placement.team, placement.row
                );
                true
            }
            Err(rejection) => {
                warn!("replay aborted: {rejection}");
                self.abort_replay().await;
                false
            }
        }
    }

    async fn abort_replay(&mut self) {
        self.replay = None;
        self.announcer.say("Invalid replay string.").await;
    }

    /// One live turn: render for humans, prompt, and apply until the
    /// board accepts a move or the match ends. A fault out of a prompt is
    /// that team's forfeit, never the session's problem.
    async fn live_turn(&mut self, prompting_team: Team) {
        let round = self.round;
        let is_human = self
            .players
            .get(&prompting_team)
            .is_some_and(|player| player.is_human());
        if is_human {
            self.announcer.say(&self.board.render(round)).await;
        }

        loop {
            let Some(player) = self.players.get_mut(&prompting_team) else {
                error!("no player bound for {prompting_team}; forfeiting");
                self.board.forfeit();
                return;
            };
            let choice = match player.prompt(&self.board, round).await {
                Ok(choice) => choice,
                Err(fault) => {
                    error!("{prompting_team} prompt fault: {fault}");
                    self.announcer
                        .say(&format!("{prompting_team} errored and has ended the game."))
                        .await;
                    self.board.forfeit();
                    return;
                }
            };
            match choice {
                Choice::Resign => {
                    self.board.forfeit();
                    return;
                }
                Choice::Column(column) => match self.board.apply_move(column) {
                    Ok(placement) => {
                        debug!(
                            "{} played column {column}, row {}",
                            placement.team, placement.row
                        );
                        return;
                    }
                    Err(rejection) => {
                        warn!("{prompting_team} move rejected: {rejection}");
                        // Same player again until the board takes a move.
                    }
                },
            }
        }
    }

    /// Seal the board and deliver `match_end` to every player. One
    /// player's fault is reported and skipped; the rest still hear about
    /// the result. The seal drops only after the last delivery.
    async fn notify_players(&mut self, report: &MatchReport) {
        let _seal = self.gate.seal();
        for (team, player) in self.players.iter_mut() {
            if let Err(fault) = player.match_end(report.victor, report.rounds).await {
                warn!("{team} faulted in match_end: {fault}");
                self.announcer
                    .say(&format!(
                        "{team}, with player {}, errored in its match end hook.",
                        player.name()
                    ))
                    .await;
            }
        }
    }
}
