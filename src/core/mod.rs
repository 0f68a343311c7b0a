//! Core types: player identity and deterministic dice rolling.

pub mod player;
pub mod rng;

pub use player::{PlayerId, PlayerMap};
pub use rng::DiceRng;
