//! Computer players: legal-move enumeration and a weighted heuristic
//! chooser.

pub mod actions;
pub mod evaluator;

pub use actions::{generate_actions, Action};
pub use evaluator::{MoveEvaluator, SimpleAi, TableView};
