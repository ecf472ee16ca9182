pub mod builtin;
pub mod engine;
pub mod types;

pub use engine::{AnalysisContext, RuleEngine};
pub use types::*;
