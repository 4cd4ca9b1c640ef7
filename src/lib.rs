pub mod config;
pub mod evaluator;
pub mod expression;
pub mod registry;
pub mod transform;
