//! Six-dice special combinations.
//!
//! Two patterns over the union of everything kept this turn override
//! the ordinary keep rules:
//!
//! - **Three pairs** ("Talheim"): exactly six dice, exactly three
//!   distinct faces, each appearing exactly twice. Ends the turn on
//!   the spot for a fixed payout: 1000 when the pair faces are
//!   consecutive, 500 otherwise.
//! - **Full run** ("Lange Strasse"): every face 1..=6 present at least
//!   once, possibly spread over several keeps within the cycle. Does
//!   not end the turn by itself; banking a full-run cycle adds a flat
//!   bonus on top of the per-group score.
//!
//! Three pairs is checked first. The two patterns cannot hold for the
//! same union, the ordering exists for clarity.

use super::legality::FaceCounts;

/// Flat bonus added once when a full-run turn banks a complete cycle
/// (all six dice kept) or stops.
pub const FULL_RUN_BONUS: u32 = 1100;

/// Standalone value of a completed full run, used by move evaluation
/// when estimating a candidate keep. The engine itself only ever pays
/// group score plus [`FULL_RUN_BONUS`].
pub const FULL_RUN_VALUE: u32 = 1250;

/// A full run completed on or after this many rolls of the current
/// cycle counts as the "super" variant.
pub const SUPER_RUN_ROLL_COUNT: u32 = 3;

/// Check the kept-union for three pairs and return the payout.
///
/// `Some(1000)` for consecutive pair faces, `Some(500)` otherwise,
/// `None` when the union is not exactly three pairs.
#[must_use]
pub fn three_pairs_score(union: &FaceCounts) -> Option<u32> {
    if union.total() != 6 || union.distinct() != 3 {
        return None;
    }
    if union.iter().any(|(_, count)| count != 2) {
        return None;
    }

    let faces: Vec<u8> = union.iter().map(|(face, _)| face).collect();
    let consecutive = faces[1] == faces[0] + 1 && faces[2] == faces[1] + 1;

    Some(if consecutive { 1000 } else { 500 })
}

/// Whether the kept-union contains at least one die of every face.
#[must_use]
pub fn completes_full_run(union: &FaceCounts) -> bool {
    union.has_all_faces()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_pairs_non_consecutive() {
        let union = FaceCounts::from_faces(&[1, 1, 3, 3, 5, 5]);
        assert_eq!(three_pairs_score(&union), Some(500));
    }

    #[test]
    fn test_three_pairs_consecutive() {
        let union = FaceCounts::from_faces(&[2, 2, 3, 3, 4, 4]);
        assert_eq!(three_pairs_score(&union), Some(1000));

        let union = FaceCounts::from_faces(&[4, 4, 5, 5, 6, 6]);
        assert_eq!(three_pairs_score(&union), Some(1000));
    }

    #[test]
    fn test_three_pairs_requires_exactly_six_dice() {
        assert_eq!(three_pairs_score(&FaceCounts::from_faces(&[2, 2, 3, 3])), None);
        assert_eq!(
            three_pairs_score(&FaceCounts::from_faces(&[2, 2, 3, 3, 4, 4, 5])),
            None
        );
    }

    #[test]
    fn test_three_pairs_rejects_other_shapes() {
        // Four of a kind plus a pair is not three pairs.
        assert_eq!(
            three_pairs_score(&FaceCounts::from_faces(&[2, 2, 2, 2, 3, 3])),
            None
        );
        // Two triplets neither.
        assert_eq!(
            three_pairs_score(&FaceCounts::from_faces(&[2, 2, 2, 5, 5, 5])),
            None
        );
    }

    #[test]
    fn test_full_run_detection() {
        assert!(completes_full_run(&FaceCounts::from_faces(&[1, 2, 3, 4, 5, 6])));
        assert!(!completes_full_run(&FaceCounts::from_faces(&[1, 2, 3, 4, 5])));

        // Extra copies of a face do not break detection.
        assert!(completes_full_run(&FaceCounts::from_faces(&[1, 1, 2, 3, 4, 5, 6])));
    }

    #[test]
    fn test_patterns_are_mutually_exclusive() {
        // Three pairs has three distinct faces; a full run needs six.
        let pairs = FaceCounts::from_faces(&[1, 1, 2, 2, 3, 3]);
        assert!(three_pairs_score(&pairs).is_some());
        assert!(!completes_full_run(&pairs));

        let run = FaceCounts::from_faces(&[1, 2, 3, 4, 5, 6]);
        assert!(three_pairs_score(&run).is_none());
        assert!(completes_full_run(&run));
    }
}
