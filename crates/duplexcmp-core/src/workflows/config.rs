use super::build::BuildStep;
use crate::backends::{
    Backend, BackendError, DylibCalculator, LibraryBackend, SubprocessBackend,
};
use crate::engine::ComparisonEngine;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Resolution of the in-process reference calculator.
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryConfig {
    pub enabled: bool,
    /// Shared-library path; `None` resolves the platform-conventional
    /// `thal` library name through the system search path.
    pub path: Option<PathBuf>,
    pub label: String,
}

/// One external oracle binary.
#[derive(Debug, Clone, PartialEq)]
pub struct OracleConfig {
    pub label: String,
    pub binary: PathBuf,
}

/// Everything a batch run needs: the backend roster, the build
/// precondition, and the per-invocation timeout.
#[derive(Debug, Clone, PartialEq)]
pub struct HarnessConfig {
    pub library: LibraryConfig,
    pub oracles: Vec<OracleConfig>,
    /// Fail-fast build step for the compiled oracles; `None` skips the
    /// precondition (pre-built binaries).
    pub build: Option<BuildStep>,
    pub timeout: Duration,
}

impl HarnessConfig {
    /// The conventional setup: the `thal` library backend plus the two
    /// salt-model oracle binaries built from `oracle_dir`.
    pub fn standard(oracle_dir: impl Into<PathBuf>) -> Self {
        let oracle_dir = oracle_dir.into();
        Self {
            library: LibraryConfig {
                enabled: true,
                path: None,
                label: "thal (library)".into(),
            },
            oracles: vec![
                OracleConfig {
                    label: "simplesalt".into(),
                    binary: oracle_dir.join("target/release/main_simplesalt"),
                },
                OracleConfig {
                    label: "fullsalt".into(),
                    binary: oracle_dir.join("target/release/main_fullsalt"),
                },
            ],
            build: Some(BuildStep::cargo_release_bins(oracle_dir)),
            timeout: crate::backends::subprocess::DEFAULT_TIMEOUT,
        }
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self::standard(".")
    }
}

/// Assembles the backend roster in report order: the library adapter first,
/// then the subprocess oracles in configured order.
///
/// A library that fails to resolve is returned as an unavailable entry,
/// reported to the user and absent for the whole run; the roster is built
/// from whatever remains. Missing oracle *binaries* are not probed here;
/// spawning fails per scenario and is retried fresh on the next one.
pub fn build_roster(config: &HarnessConfig) -> (ComparisonEngine, Vec<(String, BackendError)>) {
    let mut backends: Vec<Box<dyn Backend>> = Vec::new();
    let mut unavailable = Vec::new();

    if config.library.enabled {
        let loaded = match &config.library.path {
            Some(path) => DylibCalculator::load(path),
            None => DylibCalculator::load_default(),
        };
        match loaded {
            Ok(calculator) => {
                backends.push(Box::new(LibraryBackend::new(
                    config.library.label.clone(),
                    calculator,
                )));
            }
            Err(e) => {
                warn!(backend = %config.library.label, error = %e, "library backend unavailable");
                unavailable.push((config.library.label.clone(), e));
            }
        }
    }

    for oracle in &config.oracles {
        backends.push(Box::new(
            SubprocessBackend::new(oracle.label.clone(), oracle.binary.clone())
                .with_timeout(config.timeout),
        ));
    }

    (ComparisonEngine::new(backends), unavailable)
}
