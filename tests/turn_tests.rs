//! End-to-end turn scenarios driven through the public API.
//!
//! Every scenario scripts its rolls with the forced-roll override, so
//! outcomes are exact.

use lange_strasse::{DiceSet, KeepError, KeepOutcome, TurnEnd, FULL_RUN_BONUS};
use proptest::prelude::*;

/// A turn whose first roll shows exactly `faces`.
fn scripted(faces: &[u8]) -> DiceSet {
    let mut set = DiceSet::new(42);
    set.force_next_roll(faces);
    set.reset_for_new_turn();
    set
}

#[test]
fn test_multi_cycle_turn_with_stop() {
    // Cycle 1: six scoring dice exhaust the set for 1500.
    let mut set = scripted(&[1, 1, 1, 5, 5, 5]);
    set.force_next_roll(&[1, 1, 1, 2, 3, 4]);
    let outcome = set.attempt_keep(&[1, 1, 1, 5, 5, 5], false).unwrap();
    assert_eq!(outcome, KeepOutcome::AllDiceExhausted { accumulated: 1500 });

    // Cycle 2: a fresh triplet of 1s, then a 5, stopping.
    set.force_next_roll(&[5, 2, 3]);
    let outcome = set.attempt_keep(&[1, 1, 1], false).unwrap();
    assert_eq!(outcome, KeepOutcome::Continuing);

    let outcome = set.attempt_keep(&[5], true).unwrap();
    assert_eq!(outcome, KeepOutcome::Stopped { turn_total: 2550 });
    assert_eq!(set.end(), Some(TurnEnd::Stopped { total: 2550 }));
    assert_eq!(set.end().map(|e| e.banked_score()), Some(2550));
}

#[test]
fn test_three_pairs_assembled_over_two_keeps() {
    let mut set = scripted(&[1, 3, 3, 4, 4, 6]);
    set.force_next_roll(&[1, 3, 3, 4, 4]);
    set.attempt_keep(&[1], false).unwrap();

    // The 3s and 4s are illegal keeps on their own; the three-pairs
    // union is not.
    let outcome = set.attempt_keep(&[1, 3, 3, 4, 4], false).unwrap();
    assert_eq!(outcome, KeepOutcome::ThreePairs { score: 500 });
    assert_eq!(set.end(), Some(TurnEnd::ThreePairs { score: 500 }));
}

#[test]
fn test_reroll_offering_only_three_pairs_ends_the_turn() {
    let mut set = scripted(&[1, 1, 2, 4, 2, 4]);
    set.force_next_roll(&[2, 2, 4, 4]);

    // Keeping everything rollable would assemble three pairs, but that
    // is not a keepable move on its own: the roll has no 1s, 5s,
    // triplets, or run completion, so the turn is over.
    let outcome = set.attempt_keep(&[1, 1], false).unwrap();
    assert_eq!(outcome, KeepOutcome::NoMoves);
    assert_eq!(set.end(), Some(TurnEnd::Bust));
}

#[test]
fn test_super_full_run_needs_three_rolls() {
    let mut set = scripted(&[1, 2, 3, 4, 5, 6]);
    set.force_next_roll(&[5, 2, 3, 4, 6]);
    set.attempt_keep(&[1], false).unwrap();

    set.force_next_roll(&[2, 3, 4, 6]);
    set.attempt_keep(&[5], false).unwrap();

    set.force_next_roll(&[1, 5, 2, 3, 4, 6]);
    let outcome = set.attempt_keep(&[2, 3, 4, 6], false).unwrap();
    assert_eq!(
        outcome,
        KeepOutcome::AllDiceExhausted { accumulated: 150 + FULL_RUN_BONUS }
    );
    assert!(set.full_run_achieved());
    assert!(set.super_full_run_achieved());

    // The run flag survives the fresh cycle; the bonus does not repeat.
    set.force_next_roll(&[1, 2, 3, 4]);
    let outcome = set.attempt_keep(&[1, 5], false).unwrap();
    assert_eq!(outcome, KeepOutcome::Continuing);
    assert_eq!(set.turn_total(), 150 + FULL_RUN_BONUS + 150);
}

#[test]
fn test_bust_forfeits_accumulated_score() {
    let mut set = scripted(&[1, 1, 1, 5, 5, 5]);
    set.force_next_roll(&[1, 2, 3, 4, 6, 6]);
    set.attempt_keep(&[1, 1, 1, 5, 5, 5], false).unwrap();
    assert_eq!(set.accumulated_score(), 1500);

    set.force_next_roll(&[2, 3, 4, 6, 6]);
    let outcome = set.attempt_keep(&[1], false).unwrap();
    assert_eq!(outcome, KeepOutcome::NoMoves);
    assert_eq!(set.end(), Some(TurnEnd::Bust));
    assert_eq!(set.end().map(|e| e.banked_score()), Some(0));
}

#[test]
fn test_dead_roll_on_fresh_cycle() {
    let set = scripted(&[2, 3, 4, 6, 2, 3]);
    assert_eq!(set.end(), Some(TurnEnd::DeadRoll));
}

#[test]
fn test_rejections_leave_the_turn_playable() {
    let mut set = scripted(&[1, 1, 3, 3, 4, 6]);

    assert!(matches!(
        set.attempt_keep(&[3, 3], false),
        Err(KeepError::InvalidKeep { .. })
    ));
    assert!(matches!(
        set.attempt_keep(&[1, 1, 1], false),
        Err(KeepError::NotEnoughDice { .. })
    ));
    assert!(matches!(
        set.attempt_keep(&[1, 1], true),
        Err(KeepError::StopBelowMinimum { .. })
    ));

    // The same dice still accept a legal keep afterwards.
    set.force_next_roll(&[5, 5, 5, 6]);
    assert_eq!(set.attempt_keep(&[1, 1], false), Ok(KeepOutcome::Continuing));
}

#[test]
fn test_stop_gate_boundary() {
    let mut set = scripted(&[1, 1, 1, 2, 3, 6]);

    // A pair of 1s projects 200, below the gate; the triplet clears it.
    assert!(set.attempt_keep(&[1, 1], true).is_err());
    let outcome = set.attempt_keep(&[1, 1, 1], true).unwrap();
    assert_eq!(outcome, KeepOutcome::Stopped { turn_total: 1000 });
}

proptest! {
    /// A freshly seeded turn is always coherent: six dice accounted
    /// for, one roll taken, and it is over only when no move exists.
    #[test]
    fn prop_new_turn_coherent(seed in any::<u64>()) {
        let set = DiceSet::new(seed);

        prop_assert_eq!(set.rollable_values().len(), 6);
        prop_assert_eq!(set.roll_count(), 1);
        prop_assert_eq!(set.accumulated_score(), 0);
        prop_assert_eq!(set.is_turn_over(), !set.can_keep_any());
        if set.is_turn_over() {
            prop_assert_eq!(set.end(), Some(TurnEnd::DeadRoll));
        }
    }

    /// Same seed, same turn.
    #[test]
    fn prop_seed_determinism(seed in any::<u64>()) {
        let a = DiceSet::new(seed);
        let b = DiceSet::new(seed);
        prop_assert_eq!(a.rollable_values(), b.rollable_values());
        prop_assert_eq!(a.end(), b.end());
    }
}
