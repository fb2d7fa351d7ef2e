//! Labeled training example store.

pub mod expression;
pub mod loader;

pub use expression::LabeledExample;
pub use loader::{load_training_data, parse_expressions};
