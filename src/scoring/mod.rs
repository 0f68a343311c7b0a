//! Keep legality, group scoring, and special-combination detection.
//!
//! Everything here is pure: the turn machine owns all mutable state and
//! composes these checks in its documented order.

pub mod groups;
pub mod legality;
pub mod special;

pub use groups::{score_group, score_groups, Group};
pub use legality::{check_keep, FaceCounts, KeepError};
pub use special::{
    completes_full_run, three_pairs_score, FULL_RUN_BONUS, FULL_RUN_VALUE, SUPER_RUN_ROLL_COUNT,
};
