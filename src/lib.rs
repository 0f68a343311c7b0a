//! # lange-strasse
//!
//! Rule engine for Lange Strasse, a six-dice accumulation game played
//! over multiple rounds for score and small stakes.
//!
//! ## Design Principles
//!
//! 1. **Engine Is the Authority**: Every keep, stop, and special
//!    combination is validated by [`turn::DiceSet`]; callers (UIs, AIs,
//!    the table orchestrator) only propose moves.
//!
//! 2. **Rejections Are No-Ops**: An illegal proposal returns a typed
//!    [`scoring::KeepError`] and leaves the turn untouched, so callers
//!    may always retry.
//!
//! 3. **Deterministic Dice**: Rolls come from a seeded ChaCha8 stream
//!    with a per-roll forced override, so every turn is replayable and
//!    every test scenario expressible.
//!
//! ## Architecture
//!
//! - The scoring layer is pure functions over face-count multisets; all
//!   mutable turn state lives in one place.
//! - The table layer consumes the engine's terminal [`turn::TurnEnd`]
//!   signal and owns rotation, stakes, and settlement.
//!
//! ## Modules
//!
//! - `core`: Player IDs, per-player storage, the dice RNG
//! - `scoring`: Keep legality, group scoring, special combinations
//! - `turn`: The per-turn dice state machine
//! - `game`: Turn rotation, stakes, and end-of-game settlement
//! - `ai`: Legal-move enumeration and a heuristic computer player

pub mod ai;
pub mod core;
pub mod game;
pub mod scoring;
pub mod turn;

// Re-export commonly used types
pub use crate::core::{DiceRng, PlayerId, PlayerMap};

pub use crate::scoring::{
    check_keep, completes_full_run, score_group, score_groups, three_pairs_score, FaceCounts,
    Group, KeepError, FULL_RUN_BONUS, FULL_RUN_VALUE, SUPER_RUN_ROLL_COUNT,
};

pub use crate::turn::{DiceSet, KeepOutcome, TurnEnd, MIN_STOP_SCORE};

pub use crate::game::{Game, GameBuilder, GameConfig, GameError, GameOutcome, Player, TurnRecord};

pub use crate::ai::{generate_actions, Action, MoveEvaluator, SimpleAi, TableView};
