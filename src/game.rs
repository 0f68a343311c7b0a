//! Table-level orchestration: turn rotation, the final round, and the
//! peer-to-peer stake transfers.
//!
//! The engine ([`crate::turn::DiceSet`]) decides everything about a
//! single turn; this layer consumes its [`TurnEnd`] signal to apply
//! banked scores, rotate seats, trigger the final round once a player
//! crosses the target score, and move money:
//!
//! - full run: one stake from every opponent, doubled for the super
//!   variant, regardless of how the turn later ends
//! - dead roll ("Totale"): one stake to every opponent
//! - settlement: base stakes by final rank, an early-finish bonus
//!   through round 10, a clean-sheet bonus, and a low-score penalty

use im::Vector;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{PlayerId, PlayerMap};
use crate::scoring::KeepError;
use crate::turn::{DiceSet, KeepOutcome, TurnEnd};

/// Why the table rejected a move.
///
/// Engine-level rejections pass through unchanged; the two table-level
/// states get their own variants so callers can tell "roll the turn
/// first" apart from "the game is over".
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    /// The pending turn has not been rolled; call [`Game::begin_turn`].
    #[error("the turn has not been rolled yet; begin the turn first")]
    TurnPending,

    /// The game has been settled; no further moves are possible.
    #[error("the game is over")]
    GameOver,

    /// The engine rejected the keep.
    #[error(transparent)]
    Keep(#[from] KeepError),
}

/// Table configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of seats, 2 or more.
    pub player_count: usize,
    /// Score that triggers the final round.
    pub target_score: u32,
    /// Last round that still pays the early-finish bonus.
    pub early_finish_round: u32,
    /// The unit stake in cents.
    pub stake_cents: i64,
    /// Base stake the runner-up pays the winner.
    pub runner_up_stake: i64,
    /// Base stake every lower rank pays the winner.
    pub lower_rank_stake: i64,
    /// Losers below this total pay one extra stake to the winner.
    pub low_score_cutoff: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_count: 2,
            target_score: 10_000,
            early_finish_round: 10,
            stake_cents: 50,
            runner_up_stake: 50,
            lower_rank_stake: 70,
            low_score_cutoff: 5_000,
        }
    }
}

/// One seat at the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    /// Cumulative game score.
    pub total_score: u32,
    /// Running money balance in cents; may go negative.
    pub money_cents: i64,
    /// True until a turn of this game banks zero points.
    pub clean_sheet: bool,
    /// Round on which the player first crossed the target, if ever.
    pub crossed_on_round: Option<u32>,
}

impl Player {
    fn new(name: String) -> Self {
        Self {
            name,
            total_score: 0,
            money_cents: 0,
            clean_sheet: true,
            crossed_on_round: None,
        }
    }
}

/// One concluded turn, for the table history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub player: PlayerId,
    pub round: u32,
    pub banked: u32,
    pub end: TurnEnd,
}

/// Final standing once the game has been settled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub winner: PlayerId,
    /// All seats, best first.
    pub ranking: Vec<PlayerId>,
}

/// Builder for a table.
pub struct GameBuilder {
    config: GameConfig,
    names: Option<Vec<String>>,
}

impl Default for GameBuilder {
    fn default() -> Self {
        Self {
            config: GameConfig::default(),
            names: None,
        }
    }
}

impl GameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player_count(mut self, count: usize) -> Self {
        assert!(count >= 2, "Need at least 2 players");
        self.config.player_count = count;
        self
    }

    pub fn player_names(mut self, names: Vec<String>) -> Self {
        self.config.player_count = names.len();
        self.names = Some(names);
        self
    }

    pub fn target_score(mut self, target: u32) -> Self {
        self.config.target_score = target;
        self
    }

    pub fn stake_cents(mut self, stake: i64) -> Self {
        self.config.stake_cents = stake;
        self
    }

    /// Build the table. The first turn waits on [`Game::begin_turn`],
    /// so its opening roll can be forced like any other.
    #[must_use]
    pub fn build(self, seed: u64) -> Game {
        let count = self.config.player_count;
        let names = self
            .names
            .unwrap_or_else(|| (0..count).map(|i| format!("Player {}", i)).collect());
        assert!(names.len() == count, "One name per seat");

        Game {
            config: self.config,
            players: PlayerMap::new(count, |p| Player::new(names[p.index()].clone())),
            current: PlayerId::new(0),
            round: 1,
            dice: DiceSet::new(seed),
            finisher: None,
            outcome: None,
            turn_pending: true,
            history: Vector::new(),
        }
    }
}

/// A running multi-player game.
#[derive(Clone, Debug)]
pub struct Game {
    config: GameConfig,
    players: PlayerMap<Player>,
    current: PlayerId,
    round: u32,
    dice: DiceSet,
    /// First player to cross the target; their next turn never comes.
    finisher: Option<PlayerId>,
    outcome: Option<GameOutcome>,
    /// The previous turn resolved; the current player's dice wait on
    /// [`Game::begin_turn`].
    turn_pending: bool,
    history: Vector<TurnRecord>,
}

impl Game {
    /// The seat whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.current
    }

    /// Current round, starting at 1.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// The active turn's dice; stale while a turn is pending.
    #[must_use]
    pub fn dice(&self) -> &DiceSet {
        &self.dice
    }

    /// Table configuration.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// A seat's state.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id]
    }

    /// Mutable seat access, for adjudication and tests.
    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id]
    }

    /// Iterate over all seats.
    pub fn players(&self) -> impl Iterator<Item = (PlayerId, &Player)> {
        self.players.iter()
    }

    /// Whether the final round is in progress.
    #[must_use]
    pub fn final_round(&self) -> bool {
        self.finisher.is_some()
    }

    /// The settled standing, once the game is over.
    #[must_use]
    pub fn outcome(&self) -> Option<&GameOutcome> {
        self.outcome.as_ref()
    }

    /// Concluded turns, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<TurnRecord> {
        &self.history
    }

    /// Whether the table waits on [`Game::begin_turn`] to roll the
    /// current player's dice.
    #[must_use]
    pub fn turn_pending(&self) -> bool {
        self.turn_pending
    }

    /// Queue exact face values for the next roll of the dice.
    ///
    /// While a turn is pending this scripts its opening roll.
    pub fn force_next_roll(&mut self, faces: &[u8]) {
        self.dice.force_next_roll(faces);
    }

    /// Roll the pending turn's dice.
    ///
    /// No-op unless a turn is pending. A dead opening roll resolves the
    /// turn on the spot and leaves the next one pending in its place.
    pub fn begin_turn(&mut self) {
        if self.outcome.is_some() || !self.turn_pending {
            return;
        }
        self.turn_pending = false;
        self.dice.reset_for_new_turn();
        self.finish_turn_if_over();
    }

    /// Throw away the active turn's roll and start the turn over with
    /// forced faces. For fixed-scenario replays.
    pub fn restart_turn(&mut self, faces: &[u8]) {
        if self.outcome.is_some() {
            return;
        }
        self.turn_pending = false;
        self.dice.force_next_roll(faces);
        self.dice.reset_for_new_turn();
        self.finish_turn_if_over();
    }

    /// Forward a keep proposal to the active turn and resolve the turn
    /// when it concludes: scores applied, stakes moved, seat rotated.
    ///
    /// A pending turn must be rolled via [`Game::begin_turn`] first.
    pub fn attempt_keep(&mut self, values: &[u8], stop: bool) -> Result<KeepOutcome, GameError> {
        if self.outcome.is_some() {
            return Err(GameError::GameOver);
        }
        if self.turn_pending {
            return Err(GameError::TurnPending);
        }
        let outcome = self.dice.attempt_keep(values, stop)?;
        self.finish_turn_if_over();
        Ok(outcome)
    }

    /// Settle the game now: rank the table and move the end-of-game
    /// stakes. Called automatically when the final round completes;
    /// public for table adjudication.
    pub fn settle(&mut self) -> &GameOutcome {
        if self.outcome.is_none() {
            let ranking = self.ranking();
            let winner = ranking[0];
            let stake = self.config.stake_cents;

            // Base stakes by final rank.
            for (rank, &loser) in ranking.iter().enumerate().skip(1) {
                let base = if rank == 1 {
                    self.config.runner_up_stake
                } else {
                    self.config.lower_rank_stake
                };
                self.transfer(loser, winner, base);
            }

            // Early finish pays one extra stake from every loser.
            if self.round <= self.config.early_finish_round {
                for &loser in &ranking[1..] {
                    self.transfer(loser, winner, stake);
                }
            }

            // Every clean sheet collects from every marked sheet.
            let clean: Vec<PlayerId> = PlayerId::all(self.config.player_count)
                .filter(|&p| self.players[p].clean_sheet)
                .collect();
            let marked: Vec<PlayerId> = PlayerId::all(self.config.player_count)
                .filter(|&p| !self.players[p].clean_sheet)
                .collect();
            for &receiver in &clean {
                for &payer in &marked {
                    self.transfer(payer, receiver, stake);
                }
            }

            // Losers stuck below the cutoff pay the winner one more stake.
            for &loser in &ranking[1..] {
                if self.players[loser].total_score < self.config.low_score_cutoff {
                    self.transfer(loser, winner, stake);
                }
            }

            self.outcome = Some(GameOutcome { winner, ranking });
        }

        match &self.outcome {
            Some(outcome) => outcome,
            None => unreachable!("settlement recorded above"),
        }
    }

    // === Internals ===

    /// Seats ordered best first: score, then earlier target crossing,
    /// then seat order.
    fn ranking(&self) -> Vec<PlayerId> {
        let mut seats: Vec<PlayerId> = PlayerId::all(self.config.player_count).collect();
        seats.sort_by(|&a, &b| {
            let pa = &self.players[a];
            let pb = &self.players[b];
            pb.total_score
                .cmp(&pa.total_score)
                .then_with(|| {
                    let ca = pa.crossed_on_round.unwrap_or(u32::MAX);
                    let cb = pb.crossed_on_round.unwrap_or(u32::MAX);
                    ca.cmp(&cb)
                })
                .then_with(|| a.index().cmp(&b.index()))
        });
        seats
    }

    fn transfer(&mut self, from: PlayerId, to: PlayerId, cents: i64) {
        self.players[from].money_cents -= cents;
        self.players[to].money_cents += cents;
    }

    fn opponents(&self, of: PlayerId) -> Vec<PlayerId> {
        PlayerId::all(self.config.player_count)
            .filter(|&p| p != of)
            .collect()
    }

    fn finish_turn_if_over(&mut self) {
        if self.outcome.is_some() {
            return;
        }
        if let Some(end) = self.dice.end() {
            self.resolve_turn(end);
        }
    }

    fn resolve_turn(&mut self, end: TurnEnd) {
        let player = self.current;

        // Full-run stakes were earned mid-turn and survive a later bust.
        if self.dice.full_run_achieved() {
            let per_opponent = if self.dice.super_full_run_achieved() {
                self.config.stake_cents * 2
            } else {
                self.config.stake_cents
            };
            for opponent in self.opponents(player) {
                self.transfer(opponent, player, per_opponent);
            }
        }

        if end == TurnEnd::DeadRoll {
            for opponent in self.opponents(player) {
                self.transfer(player, opponent, self.config.stake_cents);
            }
        }

        let banked = end.banked_score();
        if banked == 0 {
            self.players[player].clean_sheet = false;
        }
        self.players[player].total_score += banked;

        let total = self.players[player].total_score;
        if total >= self.config.target_score && self.players[player].crossed_on_round.is_none() {
            self.players[player].crossed_on_round = Some(self.round);
            if self.finisher.is_none() {
                self.finisher = Some(player);
            }
        }

        self.history.push_back(TurnRecord {
            player,
            round: self.round,
            banked,
            end,
        });

        let next = PlayerId::new(((player.index() + 1) % self.config.player_count) as u8);
        if self.finisher == Some(next) {
            self.settle();
            return;
        }
        if next.index() == 0 {
            self.round += 1;
        }
        self.current = next;
        self.turn_pending = true;
    }
}
