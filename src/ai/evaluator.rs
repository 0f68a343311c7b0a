//! Heuristic move evaluation.
//!
//! Scores each candidate [`Action`] as a weighted sum of five
//! components: projected score, bust risk, special-combination upside,
//! endgame urgency, and the money attached to a full run. The weights
//! live in a name-keyed table so experiments can tune one component
//! without touching the formula.

use rustc_hash::FxHashMap;

use crate::game::Game;
use crate::scoring::{
    completes_full_run, score_group, score_groups, three_pairs_score, FaceCounts, Group,
    FULL_RUN_VALUE,
};
use crate::turn::DiceSet;

use super::actions::{generate_actions, Action};

/// Totals above this trigger the endgame adjustments.
const ENDGAME_THRESHOLD: u32 = 8_000;

/// What the evaluator needs to know about the table beyond the dice.
#[derive(Clone, Copy, Debug, Default)]
pub struct TableView {
    /// The acting player's banked game total.
    pub my_total: u32,
    /// The best opponent's banked game total.
    pub best_opponent_total: u32,
}

impl TableView {
    /// Extract the view for the player currently holding the dice.
    #[must_use]
    pub fn of(game: &Game) -> Self {
        let me = game.current_player();
        let my_total = game.player(me).total_score;
        let best_opponent_total = game
            .players()
            .filter(|(id, _)| *id != me)
            .map(|(_, p)| p.total_score)
            .max()
            .unwrap_or(0);
        Self {
            my_total,
            best_opponent_total,
        }
    }
}

/// Weighted-sum evaluator over candidate actions.
#[derive(Clone, Debug)]
pub struct MoveEvaluator {
    weights: FxHashMap<&'static str, f64>,
}

impl Default for MoveEvaluator {
    fn default() -> Self {
        let mut weights = FxHashMap::default();
        weights.insert("expected_score", 1.0);
        weights.insert("risk_factor", 0.5);
        weights.insert("special_bonus", 2.0);
        weights.insert("endgame_urgency", 1.5);
        weights.insert("money_opportunity", 0.3);
        Self { weights }
    }
}

impl MoveEvaluator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override one component weight.
    pub fn set_weight(&mut self, name: &'static str, value: f64) {
        self.weights.insert(name, value);
    }

    fn weight(&self, name: &str) -> f64 {
        self.weights.get(name).copied().unwrap_or(0.0)
    }

    /// Score one action; higher is better.
    #[must_use]
    pub fn evaluate(&self, dice: &DiceSet, view: &TableView, action: &Action) -> f64 {
        let mut score = 0.0;
        score += self.expected_score(dice, action) * self.weight("expected_score");
        score -= self.risk(dice, action) * self.weight("risk_factor");
        score += self.special_bonus(dice, action) * self.weight("special_bonus");
        score += self.endgame_urgency(view, action) * self.weight("endgame_urgency");
        score += self.money_opportunity(dice, action) * self.weight("money_opportunity");
        score
    }

    /// Cycle score after this keep. Specials dominate: three pairs pay
    /// their fixed amount, a completed run is valued at its standalone
    /// worth rather than the raw group sum.
    fn projected_cycle_score(dice: &DiceSet, action: &Action) -> u32 {
        let union = dice.kept_union().union(&FaceCounts::from_faces(&action.keep));
        if let Some(pairs) = three_pairs_score(&union) {
            return pairs;
        }
        if completes_full_run(&union) {
            return FULL_RUN_VALUE;
        }
        score_groups(dice.kept_groups()) + score_group(&Group::from_faces(&action.keep))
    }

    fn expected_score(&self, dice: &DiceSet, action: &Action) -> f64 {
        let immediate = f64::from(Self::projected_cycle_score(dice, action));
        if action.stop {
            f64::from(dice.accumulated_score()) + immediate
        } else {
            // Discounted continuation: expect roughly one more useful keep.
            immediate * 1.6
        }
    }

    /// Probability-flavored penalty for busting on the re-roll.
    fn risk(&self, dice: &DiceSet, action: &Action) -> f64 {
        if action.stop {
            return 0.0;
        }
        let remaining = dice.rollable_values().len().saturating_sub(action.keep.len());
        match remaining {
            0..=2 => 0.8,
            3 => 0.4,
            _ => 0.1,
        }
    }

    fn special_bonus(&self, dice: &DiceSet, action: &Action) -> f64 {
        let union = dice.kept_union().union(&FaceCounts::from_faces(&action.keep));
        let mut bonus = 0.0;
        if !dice.full_run_achieved() && completes_full_run(&union) {
            bonus += 500.0;
        }
        if three_pairs_score(&union).is_some() {
            bonus += 200.0;
        }
        bonus
    }

    fn endgame_urgency(&self, view: &TableView, action: &Action) -> f64 {
        let mut urgency = 0.0;
        // Opponents near the target: lock in what the table offers.
        if view.best_opponent_total >= ENDGAME_THRESHOLD && action.stop {
            urgency += 100.0;
        }
        // Near the target ourselves: prefer securing over gambling.
        if view.my_total >= ENDGAME_THRESHOLD && action.stop {
            urgency += 50.0;
        }
        urgency
    }

    fn money_opportunity(&self, dice: &DiceSet, action: &Action) -> f64 {
        let union = dice.kept_union().union(&FaceCounts::from_faces(&action.keep));
        if !dice.full_run_achieved() && completes_full_run(&union) {
            // One stake from each opponent at a two-player table.
            100.0
        } else {
            0.0
        }
    }
}

/// Greedy one-ply player: evaluate every legal action, submit the best.
#[derive(Clone, Debug, Default)]
pub struct SimpleAi {
    evaluator: MoveEvaluator,
}

impl SimpleAi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_evaluator(evaluator: MoveEvaluator) -> Self {
        Self { evaluator }
    }

    /// Pick the highest-scoring action for the current roll, or `None`
    /// when the turn is already over.
    #[must_use]
    pub fn choose(&self, game: &Game) -> Option<Action> {
        let view = TableView::of(game);
        self.choose_for(game.dice(), &view)
    }

    /// Same as [`SimpleAi::choose`], against a bare dice set.
    #[must_use]
    pub fn choose_for(&self, dice: &DiceSet, view: &TableView) -> Option<Action> {
        let mut best: Option<(f64, Action)> = None;
        for action in generate_actions(dice) {
            let score = self.evaluator.evaluate(dice, view, &action);
            let better = match &best {
                Some((best_score, _)) => score > *best_score,
                None => true,
            };
            if better {
                best = Some((score, action));
            }
        }
        best.map(|(_, action)| action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh(faces: &[u8]) -> DiceSet {
        let mut set = DiceSet::new(42);
        set.force_next_roll(faces);
        set.reset_for_new_turn();
        set
    }

    #[test]
    fn test_prefers_run_completion() {
        let mut dice = fresh(&[1, 5, 2, 3, 4, 6]);
        dice.force_next_roll(&[2, 3, 4, 6]);
        dice.attempt_keep(&[1, 5], false).unwrap();

        let ai = SimpleAi::new();
        let action = ai.choose_for(&dice, &TableView::default()).unwrap();
        assert_eq!(action.keep.as_slice(), [2, 3, 4, 6]);
    }

    #[test]
    fn test_prefers_triplet_over_lone_five() {
        let dice = fresh(&[5, 2, 2, 2, 3, 6]);

        let ai = SimpleAi::new();
        let action = ai.choose_for(&dice, &TableView::default()).unwrap();
        // The 200-point triplet plus the 5 beats any smaller keep.
        assert!(action.keep.contains(&2));
    }

    #[test]
    fn test_endgame_prefers_stopping() {
        // 200 on the table with an opponent near the target: the stop
        // variant picks up both urgency bonuses over continuing.
        let mut dice = fresh(&[1, 1, 1, 1, 3, 6]);
        dice.force_next_roll(&[1, 5, 3, 6]);
        dice.attempt_keep(&[1, 1], false).unwrap();

        let view = TableView {
            my_total: 9_000,
            best_opponent_total: 9_500,
        };
        let ai = SimpleAi::new();
        let action = ai.choose_for(&dice, &view).unwrap();
        assert!(action.stop, "expected a stop, got {}", action);
    }

    #[test]
    fn test_none_when_turn_over() {
        let mut dice = fresh(&[1, 1, 3, 3, 5, 5]);
        dice.attempt_keep(&[1, 1, 3, 3, 5, 5], false).unwrap();

        let ai = SimpleAi::new();
        assert!(ai.choose_for(&dice, &TableView::default()).is_none());
    }

    #[test]
    fn test_weight_override_changes_choice() {
        let dice = fresh(&[1, 1, 1, 1, 3, 6]);

        let mut evaluator = MoveEvaluator::new();
        evaluator.set_weight("risk_factor", 10_000.0);
        let timid = SimpleAi::with_evaluator(evaluator);

        // With risk priced absurdly high, any stop action wins out.
        let action = timid.choose_for(&dice, &TableView::default()).unwrap();
        assert!(action.stop);
    }
}
