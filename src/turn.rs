//! The per-turn dice state machine.
//!
//! A [`DiceSet`] owns one player's turn: which of the six dice are
//! still rollable, the grouping history of everything kept, the score
//! accumulated across full-exhaustion cycles, and the roll counter
//! that classifies the super full run.
//!
//! ## Entry point
//!
//! [`DiceSet::attempt_keep`] is the sole mutating operation. It
//! sequences, in order:
//!
//! 1. stop-with-all-six guard
//! 2. availability check against the rollable dice
//! 3. special-combination short-circuit, else the legality rules
//! 4. the 300-point stop gate on the current cycle
//! 5. commit (mark dice kept, merge into groups)
//! 6. terminal checks: three pairs > full-run flag > stop >
//!    exhaustion > re-roll + no-moves check
//!
//! Every rejection is an `Err` that leaves the state untouched; the
//! caller may retry with a different proposal.

use serde::{Deserialize, Serialize};

use crate::core::DiceRng;
use crate::scoring::{
    check_keep, completes_full_run, score_group, score_groups, three_pairs_score, FaceCounts,
    Group, KeepError, FULL_RUN_BONUS, SUPER_RUN_ROLL_COUNT,
};

/// Minimum score the current cycle must reach before a voluntary stop.
pub const MIN_STOP_SCORE: u32 = 300;

/// Result of a successful keep operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeepOutcome {
    /// Dice kept, remainder re-rolled, the turn goes on.
    Continuing,
    /// The kept union formed three pairs; the turn is over and the
    /// fixed payout replaces the group score.
    ThreePairs { score: u32 },
    /// The player stopped voluntarily and banks the turn total.
    Stopped { turn_total: u32 },
    /// All six dice were kept: the cycle score was banked into the
    /// accumulator and a fresh cycle was rolled. The turn continues
    /// unless the fresh roll was dead (see [`DiceSet::end`]).
    AllDiceExhausted { accumulated: u32 },
    /// The re-roll after this keep offered no legal move; the turn is
    /// over and scores nothing.
    NoMoves,
}

/// How a concluded turn ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnEnd {
    /// Voluntary stop; `total` is the banked turn score.
    Stopped { total: u32 },
    /// Three pairs ended the turn for a fixed payout.
    ThreePairs { score: u32 },
    /// No legal move mid-turn: the whole turn scores zero, including
    /// anything accumulated from earlier cycles.
    Bust,
    /// A freshly rolled cycle offered nothing keepable before any die
    /// of that cycle was kept ("Totale"). Scores zero like a bust, but
    /// the table layer attaches a stake penalty to it.
    DeadRoll,
}

impl TurnEnd {
    /// Points this end banks for the turn.
    #[must_use]
    pub fn banked_score(&self) -> u32 {
        match self {
            TurnEnd::Stopped { total } => *total,
            TurnEnd::ThreePairs { score } => *score,
            TurnEnd::Bust | TurnEnd::DeadRoll => 0,
        }
    }
}

/// One player's six dice and everything their turn has kept so far.
#[derive(Clone, Debug)]
pub struct DiceSet {
    faces: [u8; 6],
    kept: [bool; 6],
    groups: Vec<Group>,
    roll_count: u32,
    accumulated: u32,
    full_run: bool,
    super_full_run: bool,
    bonus_banked: bool,
    end: Option<TurnEnd>,
    rng: DiceRng,
}

impl DiceSet {
    /// Start a turn: roll all six dice and run the no-moves check.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_rng(DiceRng::new(seed))
    }

    /// Start a turn with a caller-supplied RNG (simulation forks).
    #[must_use]
    pub fn with_rng(rng: DiceRng) -> Self {
        let mut set = Self {
            faces: [0; 6],
            kept: [false; 6],
            groups: Vec::new(),
            roll_count: 0,
            accumulated: 0,
            full_run: false,
            super_full_run: false,
            bonus_banked: false,
            end: None,
            rng,
        };
        set.roll();
        set.check_dead_roll();
        set
    }

    /// Reset everything for a new player's turn and roll.
    pub fn reset_for_new_turn(&mut self) {
        self.kept = [false; 6];
        self.groups.clear();
        self.roll_count = 0;
        self.accumulated = 0;
        self.full_run = false;
        self.super_full_run = false;
        self.bonus_banked = false;
        self.end = None;
        self.roll();
        self.check_dead_roll();
    }

    /// Reset the dice for a fresh cycle within the same turn, keeping
    /// the accumulator and the achievement flags, and roll.
    pub fn reset_dice_only(&mut self) {
        self.kept = [false; 6];
        self.groups.clear();
        self.roll();
        self.check_dead_roll();
    }

    /// Queue exact face values for the next roll of rollable dice.
    ///
    /// Consumed by exactly one roll; unspecified slots fall back to the
    /// seeded stream.
    pub fn force_next_roll(&mut self, faces: &[u8]) {
        self.rng.force_next(faces);
    }

    // === Read-only queries ===

    /// Face values of the dice that can still be rolled.
    #[must_use]
    pub fn rollable_values(&self) -> Vec<u8> {
        (0..6)
            .filter(|&i| !self.kept[i])
            .map(|i| self.faces[i])
            .collect()
    }

    /// The grouping history of this cycle, in creation order.
    #[must_use]
    pub fn kept_groups(&self) -> &[Group] {
        &self.groups
    }

    /// Multiset union of every kept value this cycle.
    #[must_use]
    pub fn kept_union(&self) -> FaceCounts {
        self.groups
            .iter()
            .fold(FaceCounts::new(), |acc, g| acc.union(&g.counts()))
    }

    /// Rolls taken since the dice were last fully reset.
    #[must_use]
    pub fn roll_count(&self) -> u32 {
        self.roll_count
    }

    /// Points banked from prior full-exhaustion cycles this turn.
    #[must_use]
    pub fn accumulated_score(&self) -> u32 {
        self.accumulated
    }

    /// Score of the current cycle only. Three pairs override the group
    /// score; the full-run flat bonus is not part of the cycle.
    #[must_use]
    pub fn cycle_score(&self) -> u32 {
        if let Some(score) = three_pairs_score(&self.kept_union()) {
            return score;
        }
        score_groups(&self.groups)
    }

    /// Total turn score: accumulated + current cycle, plus the flat
    /// full-run bonus when it has been earned but not yet banked.
    #[must_use]
    pub fn turn_total(&self) -> u32 {
        self.accumulated + self.cycle_score() + self.pending_bonus()
    }

    /// Whether a full run (every face kept) was achieved this turn.
    #[must_use]
    pub fn full_run_achieved(&self) -> bool {
        self.full_run
    }

    /// Whether the full run completed on or after the third roll of
    /// its cycle.
    #[must_use]
    pub fn super_full_run_achieved(&self) -> bool {
        self.super_full_run
    }

    /// Whether the turn has concluded.
    #[must_use]
    pub fn is_turn_over(&self) -> bool {
        self.end.is_some()
    }

    /// How the turn ended, once it has.
    #[must_use]
    pub fn end(&self) -> Option<TurnEnd> {
        self.end
    }

    /// Whether any legal keep exists among the rollable dice.
    ///
    /// True when a 1 or 5 is rollable, a rollable face has three or
    /// more copies, a rollable face extends an already-kept triplet,
    /// or keeping every rollable die would complete the full run.
    /// Three pairs get no such allowance: a roll whose only conceivable
    /// keep would assemble them still ends the turn.
    #[must_use]
    pub fn can_keep_any(&self) -> bool {
        let rollable = FaceCounts::from_faces(&self.rollable_values());
        if rollable.is_empty() {
            return true;
        }
        if rollable.count(1) > 0 || rollable.count(5) > 0 {
            return true;
        }

        let kept = self.kept_union();
        if completes_full_run(&kept.union(&rollable)) {
            return true;
        }

        let keepable = rollable
            .iter()
            .any(|(face, count)| count >= 3 || kept.count(face) >= 3);
        keepable
    }

    // === The mutating entry point ===

    /// Attempt to keep `values` from the rollable dice, optionally
    /// stopping the turn afterwards.
    ///
    /// On `Err` nothing changed and the caller may retry. On `Ok` the
    /// returned outcome describes how the turn advanced; terminal
    /// outcomes also set [`DiceSet::end`].
    pub fn attempt_keep(&mut self, values: &[u8], stop: bool) -> Result<KeepOutcome, KeepError> {
        if self.end.is_some() {
            return Err(KeepError::TurnOver);
        }

        let kept_count = self.kept.iter().filter(|&&k| k).count();
        if stop && kept_count + values.len() == 6 {
            return Err(KeepError::StopWithAllDiceKept);
        }

        let proposed = Self::validated_counts(values, &FaceCounts::from_faces(&self.rollable_values()))?;

        let kept = self.kept_union();
        let union = kept.union(&proposed);
        let special = three_pairs_score(&union).is_some() || completes_full_run(&union);
        if !special {
            check_keep(&proposed, &kept)?;
        }

        if stop {
            // Projected cycle score with this keep appended as one
            // group; groups never interact, so the sum is exact.
            let projected = score_groups(&self.groups) + score_group(&Group::from_faces(values));
            if projected < MIN_STOP_SCORE {
                return Err(KeepError::StopBelowMinimum { projected });
            }
        }

        self.mark_kept(&proposed);
        self.merge_kept(&proposed);

        // Three pairs end the turn immediately, overriding a stop.
        if let Some(score) = three_pairs_score(&self.kept_union()) {
            self.end = Some(TurnEnd::ThreePairs { score });
            return Ok(KeepOutcome::ThreePairs { score });
        }

        if !self.full_run && completes_full_run(&self.kept_union()) {
            self.full_run = true;
            if self.roll_count >= SUPER_RUN_ROLL_COUNT {
                self.super_full_run = true;
            }
        }

        if stop {
            let total = self.turn_total();
            self.bonus_banked = self.bonus_banked || self.full_run;
            self.end = Some(TurnEnd::Stopped { total });
            return Ok(KeepOutcome::Stopped { turn_total: total });
        }

        if self.kept.iter().all(|&k| k) {
            let banked = self.cycle_score() + self.pending_bonus();
            self.bonus_banked = self.bonus_banked || self.full_run;
            self.accumulated += banked;
            self.reset_dice_only();
            self.roll_count = 0;
            return Ok(KeepOutcome::AllDiceExhausted {
                accumulated: self.accumulated,
            });
        }

        self.roll();
        if !self.can_keep_any() {
            self.end = Some(TurnEnd::Bust);
            return Ok(KeepOutcome::NoMoves);
        }

        Ok(KeepOutcome::Continuing)
    }

    // === Internals ===

    /// Build the proposal's count table, rejecting faces that are not
    /// available count-for-count among the rollable dice.
    fn validated_counts(values: &[u8], rollable: &FaceCounts) -> Result<FaceCounts, KeepError> {
        let mut proposed = FaceCounts::new();
        for &face in values {
            if !(1..=6).contains(&face) {
                return Err(KeepError::NotEnoughDice {
                    face,
                    available: 0,
                    requested: values.iter().filter(|&&f| f == face).count() as u8,
                });
            }
            proposed.add(face, 1);
        }
        for (face, requested) in proposed.iter() {
            let available = rollable.count(face);
            if available < requested {
                return Err(KeepError::NotEnoughDice {
                    face,
                    available,
                    requested,
                });
            }
        }
        Ok(proposed)
    }

    /// Mark die indices matching the proposal as kept.
    fn mark_kept(&mut self, proposed: &FaceCounts) {
        let mut remaining = *proposed;
        for i in 0..6 {
            if self.kept[i] {
                continue;
            }
            let face = self.faces[i];
            if remaining.count(face) > 0 {
                remaining.remove(face, 1);
                self.kept[i] = true;
            }
        }
        debug_assert!(remaining.is_empty());
    }

    /// Merge newly kept dice into the grouping history.
    ///
    /// Per face: extend an existing uniform triplet-or-better of that
    /// face; otherwise record a fresh group when three or more arrive
    /// together; otherwise record singletons so individually kept dice
    /// stay independently visible.
    fn merge_kept(&mut self, proposed: &FaceCounts) {
        for (face, count) in proposed.iter() {
            let target = self
                .groups
                .iter_mut()
                .find(|g| g.is_uniform(face) && g.len() >= 3);

            if let Some(group) = target {
                group.extend_with(face, count);
            } else if count >= 3 {
                self.groups.push(Group::of(face, count));
            } else {
                for _ in 0..count {
                    self.groups.push(Group::singleton(face));
                }
            }
        }
    }

    /// The flat full-run bonus, while earned but not yet banked.
    fn pending_bonus(&self) -> u32 {
        if self.full_run && !self.bonus_banked {
            FULL_RUN_BONUS
        } else {
            0
        }
    }

    /// Roll every non-kept die.
    fn roll(&mut self) {
        self.roll_count += 1;
        for i in 0..6 {
            if !self.kept[i] {
                self.faces[i] = self.rng.roll_face();
            }
        }
        self.rng.finish_roll();
    }

    /// After a roll with nothing kept this cycle, a dead roll ends the
    /// turn as a Totale; with groups on the table it is an ordinary bust.
    fn check_dead_roll(&mut self) {
        if self.end.is_none() && !self.can_keep_any() {
            self.end = Some(if self.groups.is_empty() {
                TurnEnd::DeadRoll
            } else {
                TurnEnd::Bust
            });
        }
    }
}
