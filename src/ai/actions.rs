//! Candidate-move generation for computer players.
//!
//! Enumerates every distinct sub-multiset of the rollable dice that the
//! engine would accept, once per shape regardless of which physical
//! dice carry the faces. Each legal keep yields one continuing action
//! and, when the stop gate allows it, one stopping action.

use std::fmt;

use smallvec::SmallVec;

use crate::scoring::{
    check_keep, completes_full_run, score_group, score_groups, three_pairs_score, FaceCounts, Group,
};
use crate::turn::{DiceSet, MIN_STOP_SCORE};

/// One move a player can submit: which faces to keep, and whether to
/// stop the turn afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Action {
    /// Face values to keep, sorted ascending.
    pub keep: SmallVec<[u8; 6]>,
    /// Whether to stop and bank after this keep.
    pub stop: bool,
}

impl Action {
    #[must_use]
    pub fn new(keep: &[u8], stop: bool) -> Self {
        let mut keep: SmallVec<[u8; 6]> = SmallVec::from_slice(keep);
        keep.sort_unstable();
        Self { keep, stop }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "keep")?;
        for face in &self.keep {
            write!(f, " {}", face)?;
        }
        if self.stop {
            write!(f, " stop")?;
        }
        Ok(())
    }
}

/// Every action the engine would accept for the current roll.
///
/// Empty when the turn is already over. The engine remains the
/// authority; this enumeration mirrors its checks so that submitting a
/// generated action never returns an error.
#[must_use]
pub fn generate_actions(dice: &DiceSet) -> Vec<Action> {
    if dice.is_turn_over() {
        return Vec::new();
    }

    let rollable = FaceCounts::from_faces(&dice.rollable_values());
    let kept = dice.kept_union();
    let kept_count = 6 - rollable.total();

    let mut actions = Vec::new();
    for candidate in sub_multisets(&rollable) {
        if candidate.is_empty() {
            continue;
        }

        let union = kept.union(&candidate);
        let special = three_pairs_score(&union).is_some() || completes_full_run(&union);
        if !special && check_keep(&candidate, &kept).is_err() {
            continue;
        }

        let faces = candidate.to_faces();
        actions.push(Action::new(&faces, false));

        if can_stop_after(dice, &candidate, kept_count) {
            actions.push(Action::new(&faces, true));
        }
    }
    actions
}

/// All sub-multisets of a count table, the empty one included.
fn sub_multisets(counts: &FaceCounts) -> Vec<FaceCounts> {
    let mut subsets = vec![FaceCounts::new()];
    for (face, count) in counts.iter() {
        let mut extended = Vec::with_capacity(subsets.len() * (count as usize + 1));
        for subset in &subsets {
            for take in 0..=count {
                let mut next = *subset;
                next.add(face, take);
                extended.push(next);
            }
        }
        subsets = extended;
    }
    subsets
}

/// Mirror of the engine's stop checks: never on a full six-dice keep,
/// and only once the cycle projects past the stop minimum.
fn can_stop_after(dice: &DiceSet, candidate: &FaceCounts, kept_count: u8) -> bool {
    if kept_count + candidate.total() == 6 {
        return false;
    }
    let projected = score_groups(dice.kept_groups())
        + score_group(&Group::from_faces(&candidate.to_faces()));
    projected >= MIN_STOP_SCORE
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
    fn test_display() {
        assert_eq!(Action::new(&[5, 1], false).to_string(), "keep 1 5");
        assert_eq!(Action::new(&[1, 1], true).to_string(), "keep 1 1 stop");
    }

    #[test]
    fn test_generated_actions_are_accepted_by_engine() {
        let dice = fresh(&[1, 5, 3, 3, 3, 6]);

        for action in generate_actions(&dice) {
            let mut trial = dice.clone();
            assert!(
                trial.attempt_keep(&action.keep, action.stop).is_ok(),
                "engine rejected generated action: {}",
                action
            );
        }
    }

    #[test]
    fn test_only_legal_faces_offered() {
        // Rollable: one 1, one 5, a pair of 3s, a 6. The pair and the
        // lone 6 must never appear outside a full-roll special.
        let dice = fresh(&[1, 5, 3, 3, 6, 6]);

        for action in generate_actions(&dice) {
            let counts = FaceCounts::from_faces(&action.keep);
            assert_eq!(counts.count(3) % 3, 0, "partial 3s in {}", action);
        }
    }

    #[test]
    fn test_no_duplicate_shapes() {
        // Two physical 1s yield "keep 1" once, not once per die.
        let dice = fresh(&[1, 1, 2, 3, 4, 6]);
        let actions = generate_actions(&dice);

        let singles = actions
            .iter()
            .filter(|a| !a.stop && a.keep.as_slice() == [1])
            .count();
        assert_eq!(singles, 1);
    }

    #[test]
    fn test_stop_variants_respect_gate() {
        // Keeping both 1s projects 200: no stop variant. A triplet of
        // 5s projects 500: stop offered.
        let dice = fresh(&[1, 1, 5, 5, 5, 6]);
        let actions = generate_actions(&dice);

        assert!(!actions.contains(&Action::new(&[1, 1], true)));
        assert!(actions.contains(&Action::new(&[5, 5, 5], true)));
        assert!(actions.contains(&Action::new(&[1, 1], false)));
    }

    #[test]
    fn test_no_stop_when_keeping_all_six() {
        let dice = fresh(&[1, 1, 1, 5, 5, 5]);
        let actions = generate_actions(&dice);

        assert!(actions.contains(&Action::new(&[1, 1, 1, 5, 5, 5], false)));
        assert!(!actions.contains(&Action::new(&[1, 1, 1, 5, 5, 5], true)));
    }

    #[test]
    fn test_full_run_completion_offered_despite_keep_rules() {
        let mut dice = fresh(&[1, 5, 2, 3, 4, 6]);
        dice.force_next_roll(&[2, 3, 4, 6]);
        dice.attempt_keep(&[1, 5], false).unwrap();

        // A lone 2-3-4-6 keep is illegal by the face rules but completes
        // the run against the kept 1 and 5.
        let actions = generate_actions(&dice);
        assert!(actions.contains(&Action::new(&[2, 3, 4, 6], false)));
    }

    #[test]
    fn test_no_actions_after_turn_over() {
        let mut dice = fresh(&[1, 1, 3, 3, 5, 5]);
        dice.attempt_keep(&[1, 1, 3, 3, 5, 5], false).unwrap();

        assert!(generate_actions(&dice).is_empty());
    }
}
