use crate::error::{CliError, Result};
use duplexcmp::workflows::{HarnessConfig, OracleConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// TOML mirror of [`HarnessConfig`]: every field optional, merged over the
/// standard defaults so a config file only states what it changes.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialHarnessConfig {
    /// Directory holding the oracle sources; the build step runs here and
    /// the default binary paths resolve against it.
    #[serde(rename = "oracle-dir")]
    oracle_dir: Option<PathBuf>,

    #[serde(rename = "timeout-secs")]
    timeout_secs: Option<u64>,

    library: Option<PartialLibraryConfig>,
    build: Option<PartialBuildConfig>,
    oracles: Option<Vec<PartialOracleConfig>>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialLibraryConfig {
    enabled: Option<bool>,
    #[serde(rename = "dylib-path")]
    dylib_path: Option<PathBuf>,
    label: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialBuildConfig {
    enabled: Option<bool>,
    program: Option<String>,
    args: Option<Vec<String>>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct PartialOracleConfig {
    label: String,
    binary: PathBuf,
}

impl PartialHarnessConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        let partial: Self = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        debug!(path = %path.display(), "loaded harness configuration");
        Ok(partial)
    }

    /// Merges the file's overrides over [`HarnessConfig::standard`].
    pub fn resolve(self) -> HarnessConfig {
        let oracle_dir = self.oracle_dir.unwrap_or_else(|| PathBuf::from("."));
        let mut config = HarnessConfig::standard(oracle_dir);

        if let Some(secs) = self.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(library) = self.library {
            if let Some(enabled) = library.enabled {
                config.library.enabled = enabled;
            }
            if library.dylib_path.is_some() {
                config.library.path = library.dylib_path;
            }
            if let Some(label) = library.label {
                config.library.label = label;
            }
        }

        if let Some(build) = self.build {
            if build.enabled == Some(false) {
                config.build = None;
            } else if let Some(step) = config.build.as_mut() {
                if let Some(program) = build.program {
                    step.program = program;
                }
                if let Some(args) = build.args {
                    step.args = args;
                }
            }
        }

        if let Some(oracles) = self.oracles {
            config.oracles = oracles
                .into_iter()
                .map(|o| OracleConfig {
                    label: o.label,
                    binary: o.binary,
                })
                .collect();
        }

        config
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;

    #[test]
    fn empty_file_resolves_to_the_standard_config() {
        let partial: PartialHarnessConfig =
            toml::from_str("").expect("empty config should deserialize");
        assert_eq!(partial.resolve(), HarnessConfig::standard("."));
    }

    #[test]
    fn overrides_merge_over_defaults() {
        let partial: PartialHarnessConfig = toml::from_str(
            r#"
            oracle-dir = "/opt/oracles"
            timeout-secs = 30

            [library]
            enabled = true
            dylib-path = "/usr/local/lib/libthal.so"

            [[oracles]]
            label = "bruteforce"
            binary = "/opt/oracles/target/release/main_bruteforce_simplesalt"
            "#,
        )
        .expect("well-formed config should deserialize");

        let config = partial.resolve();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(
            config.library.path,
            Some(PathBuf::from("/usr/local/lib/libthal.so"))
        );
        assert_eq!(config.oracles.len(), 1);
        assert_eq!(config.oracles[0].label, "bruteforce");
        assert!(config.build.is_some());
        assert_eq!(
            config.build.as_ref().map(|b| b.dir.clone()),
            Some(PathBuf::from("/opt/oracles"))
        );
    }

    #[test]
    fn build_can_be_disabled_for_prebuilt_oracles() {
        let partial: PartialHarnessConfig = toml::from_str(
            r#"
            [build]
            enabled = false
            "#,
        )
        .expect("well-formed config should deserialize");
        assert!(partial.resolve().build.is_none());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: std::result::Result<PartialHarnessConfig, _> =
            toml::from_str("unknown-key = 1");
        assert!(result.is_err());
    }

    #[test]
    fn missing_file_is_a_parse_error() {
        let err = PartialHarnessConfig::from_file(Path::new("/nonexistent/harness.toml"))
            .expect_err("missing file should fail");
        assert!(matches!(err, CliError::FileParsing { .. }));
    }
}
