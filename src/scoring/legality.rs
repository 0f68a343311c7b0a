//! Keep-legality rules.
//!
//! A proposed keep is checked face by face:
//! - 1s and 5s may always be kept, in any quantity
//! - any other face needs three or more in the proposal itself, or
//!   three or more of that face already kept this turn
//!
//! Six-dice special combinations bypass these rules entirely; that
//! short-circuit lives in the turn machine, not here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a proposed keep (or stop) was rejected.
///
/// Rejections never mutate state; the caller may retry with a
/// different proposal.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum KeepError {
    /// Fewer dice of the requested face are rollable than asked for.
    #[error("only {available} dice with value {face} available, but {requested} requested")]
    NotEnoughDice {
        face: u8,
        available: u8,
        requested: u8,
    },

    /// A non-1/5 face below the triplet threshold with no kept triplet
    /// of that face to extend.
    #[error("cannot keep {count} dice with value {face}: need at least 3 of the same value (except 1s and 5s)")]
    InvalidKeep { face: u8, count: u8 },

    /// Voluntary stop with less than 300 points from the current cycle.
    #[error("cannot stop with less than 300 points from the current dice set (would score {projected})")]
    StopBelowMinimum { projected: u32 },

    /// Stopping while a keep would exhaust all six dice.
    #[error("cannot stop when keeping all 6 dice; keep 5 or fewer")]
    StopWithAllDiceKept,

    /// Keep attempted after the turn already concluded.
    #[error("the turn is over; reset before keeping dice")]
    TurnOver,
}

/// Multiset of die faces as per-face counts.
///
/// Index 0 holds the count of 1s, index 5 the count of 6s. All multiset
/// arithmetic in the crate (availability, legality, special detection)
/// runs over this representation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceCounts([u8; 6]);

impl FaceCounts {
    /// Empty multiset.
    #[must_use]
    pub const fn new() -> Self {
        Self([0; 6])
    }

    /// Build from a slice of face values.
    ///
    /// Faces outside 1..=6 are ignored.
    #[must_use]
    pub fn from_faces(faces: &[u8]) -> Self {
        let mut counts = Self::new();
        for &face in faces {
            if (1..=6).contains(&face) {
                counts.add(face, 1);
            }
        }
        counts
    }

    /// Count of one face.
    #[must_use]
    pub fn count(&self, face: u8) -> u8 {
        debug_assert!((1..=6).contains(&face));
        self.0[face as usize - 1]
    }

    /// Add `n` dice of one face (saturating, so adversarially long
    /// proposals cannot wrap a count).
    pub fn add(&mut self, face: u8, n: u8) {
        debug_assert!((1..=6).contains(&face));
        let slot = &mut self.0[face as usize - 1];
        *slot = slot.saturating_add(n);
    }

    /// Remove up to `n` dice of one face (saturating).
    pub fn remove(&mut self, face: u8, n: u8) {
        debug_assert!((1..=6).contains(&face));
        let slot = &mut self.0[face as usize - 1];
        *slot = slot.saturating_sub(n);
    }

    /// Multiset union with another count table.
    #[must_use]
    pub fn union(&self, other: &FaceCounts) -> FaceCounts {
        let mut out = *self;
        for face in 1..=6 {
            out.add(face, other.count(face));
        }
        out
    }

    /// Total number of dice in the multiset (saturating).
    #[must_use]
    pub fn total(&self) -> u8 {
        self.0.iter().fold(0u8, |acc, &c| acc.saturating_add(c))
    }

    /// Number of distinct faces present.
    #[must_use]
    pub fn distinct(&self) -> u8 {
        self.0.iter().filter(|&&c| c > 0).count() as u8
    }

    /// Whether every face 1..=6 is present at least once.
    #[must_use]
    pub fn has_all_faces(&self) -> bool {
        self.0.iter().all(|&c| c > 0)
    }

    /// Whether no dice are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&c| c == 0)
    }

    /// Iterate over `(face, count)` pairs with nonzero count.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, &c)| c > 0)
            .map(|(i, &c)| (i as u8 + 1, c))
    }

    /// Expand back to a sorted list of face values.
    #[must_use]
    pub fn to_faces(&self) -> Vec<u8> {
        let mut faces = Vec::with_capacity(self.total() as usize);
        for (face, count) in self.iter() {
            faces.extend(std::iter::repeat(face).take(count as usize));
        }
        faces
    }
}

/// Check whether a proposed keep is admissible under the keep rules.
///
/// `kept` is the multiset of everything already kept this turn; it only
/// matters for extending an established triplet-or-better with fewer
/// than three new dice. An empty proposal is trivially legal.
pub fn check_keep(proposed: &FaceCounts, kept: &FaceCounts) -> Result<(), KeepError> {
    for (face, count) in proposed.iter() {
        if face == 1 || face == 5 {
            continue;
        }
        if count >= 3 {
            continue;
        }
        if kept.count(face) >= 3 {
            continue;
        }
        return Err(KeepError::InvalidKeep { face, count });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ones_and_fives_always_legal() {
        let kept = FaceCounts::new();
        for proposal in [&[1u8][..], &[5], &[1, 1], &[5, 5, 5, 5], &[1, 5, 5]] {
            assert_eq!(check_keep(&FaceCounts::from_faces(proposal), &kept), Ok(()));
        }
    }

    #[test]
    fn test_triplet_or_better_legal() {
        let kept = FaceCounts::new();
        assert_eq!(check_keep(&FaceCounts::from_faces(&[3, 3, 3]), &kept), Ok(()));
        assert_eq!(check_keep(&FaceCounts::from_faces(&[6, 6, 6, 6]), &kept), Ok(()));
    }

    #[test]
    fn test_below_triplet_rejected() {
        let kept = FaceCounts::new();
        assert_eq!(
            check_keep(&FaceCounts::from_faces(&[3, 3]), &kept),
            Err(KeepError::InvalidKeep { face: 3, count: 2 })
        );
        assert_eq!(
            check_keep(&FaceCounts::from_faces(&[6]), &kept),
            Err(KeepError::InvalidKeep { face: 6, count: 1 })
        );
    }

    #[test]
    fn test_extending_kept_triplet_legal() {
        let kept = FaceCounts::from_faces(&[4, 4, 4]);
        assert_eq!(check_keep(&FaceCounts::from_faces(&[4]), &kept), Ok(()));
        assert_eq!(check_keep(&FaceCounts::from_faces(&[4, 4]), &kept), Ok(()));

        // A kept pair is not enough to extend.
        let pair_kept = FaceCounts::from_faces(&[4, 4]);
        assert!(check_keep(&FaceCounts::from_faces(&[4]), &pair_kept).is_err());
    }

    #[test]
    fn test_mixed_proposal_fails_on_bad_face() {
        let kept = FaceCounts::new();
        let err = check_keep(&FaceCounts::from_faces(&[1, 5, 2, 2]), &kept);
        assert_eq!(err, Err(KeepError::InvalidKeep { face: 2, count: 2 }));
    }

    #[test]
    fn test_empty_proposal_legal() {
        assert_eq!(check_keep(&FaceCounts::new(), &FaceCounts::new()), Ok(()));
    }

    #[test]
    fn test_face_counts_basics() {
        let counts = FaceCounts::from_faces(&[2, 2, 5, 6]);

        assert_eq!(counts.count(2), 2);
        assert_eq!(counts.count(5), 1);
        assert_eq!(counts.count(1), 0);
        assert_eq!(counts.total(), 4);
        assert_eq!(counts.distinct(), 3);
        assert!(!counts.has_all_faces());
        assert_eq!(counts.to_faces(), vec![2, 2, 5, 6]);
    }

    #[test]
    fn test_face_counts_union() {
        let a = FaceCounts::from_faces(&[1, 2, 3]);
        let b = FaceCounts::from_faces(&[4, 5, 6]);

        assert!(a.union(&b).has_all_faces());
        assert_eq!(a.union(&b).total(), 6);
    }

    #[test]
    fn test_face_counts_ignores_out_of_range() {
        let counts = FaceCounts::from_faces(&[0, 7, 3]);
        assert_eq!(counts.total(), 1);
        assert_eq!(counts.count(3), 1);
    }

    #[test]
    fn test_face_counts_saturate_instead_of_wrapping() {
        let counts = FaceCounts::from_faces(&vec![5u8; 300]);
        assert_eq!(counts.count(5), u8::MAX);

        let doubled = counts.union(&counts);
        assert_eq!(doubled.count(5), u8::MAX);
    }

    #[test]
    fn test_keep_error_messages() {
        let err = KeepError::NotEnoughDice { face: 5, available: 1, requested: 2 };
        assert_eq!(
            err.to_string(),
            "only 1 dice with value 5 available, but 2 requested"
        );

        let err = KeepError::StopBelowMinimum { projected: 200 };
        assert!(err.to_string().contains("less than 300"));
    }
}
