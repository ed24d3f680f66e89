pub mod comparison;

pub use comparison::{BackendOutcome, ComparisonEngine, ComparisonRecord, ScenarioComparison};
