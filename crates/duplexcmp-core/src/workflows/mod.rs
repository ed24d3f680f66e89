pub mod build;
pub mod compare;
pub mod config;

pub use build::{BuildError, BuildStep};
pub use compare::{DriftFinding, Scenario, ScenarioSet};
pub use config::{HarnessConfig, LibraryConfig, OracleConfig};
