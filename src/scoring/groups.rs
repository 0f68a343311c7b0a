//! Kept-dice groups and the point table.
//!
//! A group is the multiset of faces recorded by one merge decision
//! (see the turn machine's merge rule). Groups never interact for
//! scoring: a pair of 1s kept as two singleton groups scores 200, the
//! same pair inside a later triplet group would score as part of the
//! triplet instead.
//!
//! ## Point table
//!
//! - individual 1s: 100 each, individual 5s: 50 each
//! - triplet of 1s: 1000; triplet of any other face: face x 100
//! - each die beyond the third doubles the triplet base

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::legality::FaceCounts;

/// One kept group: the faces recorded together by a single merge
/// decision. At most six dice, so the storage stays inline.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    faces: SmallVec<[u8; 6]>,
}

impl Group {
    /// A group holding a single die.
    #[must_use]
    pub fn singleton(face: u8) -> Self {
        let mut faces = SmallVec::new();
        faces.push(face);
        Self { faces }
    }

    /// A group of `n` dice of the same face.
    #[must_use]
    pub fn of(face: u8, n: u8) -> Self {
        Self {
            faces: std::iter::repeat(face).take(n as usize).collect(),
        }
    }

    /// Build from explicit face values.
    #[must_use]
    pub fn from_faces(faces: &[u8]) -> Self {
        Self {
            faces: SmallVec::from_slice(faces),
        }
    }

    /// The faces in this group.
    #[must_use]
    pub fn faces(&self) -> &[u8] {
        &self.faces
    }

    /// Number of dice in the group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Whether the group holds no dice. The turn machine never records
    /// an empty group; this exists for completeness.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Whether every die in the group shows `face`.
    #[must_use]
    pub fn is_uniform(&self, face: u8) -> bool {
        !self.faces.is_empty() && self.faces.iter().all(|&f| f == face)
    }

    /// Append `n` more dice of `face` (merge-rule extension).
    pub fn extend_with(&mut self, face: u8, n: u8) {
        self.faces.extend(std::iter::repeat(face).take(n as usize));
    }

    /// The group's faces as a count table.
    #[must_use]
    pub fn counts(&self) -> FaceCounts {
        FaceCounts::from_faces(&self.faces)
    }
}

/// Base value of a triplet of `face`.
fn triplet_base(face: u8) -> u32 {
    if face == 1 {
        1000
    } else {
        u32::from(face) * 100
    }
}

/// Score one group in isolation.
#[must_use]
pub fn score_group(group: &Group) -> u32 {
    let mut score = 0;
    for (face, count) in group.counts().iter() {
        if count >= 3 {
            // Doubles for every die past the third.
            score += triplet_base(face) << (count - 3);
        } else if face == 1 {
            score += 100 * u32::from(count);
        } else if face == 5 {
            score += 50 * u32::from(count);
        }
        // Below-triplet counts of other faces are never legal to keep
        // and contribute nothing.
    }
    score
}

/// Score a full grouping history. Pure, order-invariant, and unaware of
/// the six-dice special combinations: the turn machine overrides this
/// result when one applies.
#[must_use]
pub fn score_groups(groups: &[Group]) -> u32 {
    groups.iter().map(score_group).sum()
}
