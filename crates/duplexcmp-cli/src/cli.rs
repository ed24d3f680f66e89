use clap::Parser;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

/// The whole surface is one batch run: no arguments are required, and no
/// flag changes comparison semantics. The process exits non-zero only when
/// the oracle build precondition fails.
#[derive(Parser, Debug)]
#[command(
    version,
    about = "duplexcmp - validates numerical agreement between independent implementations of nucleic-acid duplex thermodynamics (dG, Tm) across a reference library and external oracle binaries.",
    help_template = HELP_TEMPLATE,
)]
pub struct Cli {
    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to an optional harness configuration file in TOML format
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn parses_with_no_arguments() {
        let cli = Cli::try_parse_from(["duplexcmp"]).expect("bare invocation should parse");
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert!(cli.config.is_none());
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["duplexcmp", "-v", "-q"]).is_err());
    }

    #[test]
    fn accepts_config_path() {
        let cli = Cli::try_parse_from(["duplexcmp", "--config", "harness.toml"])
            .expect("config flag should parse");
        assert_eq!(cli.config, Some(PathBuf::from("harness.toml")));
    }
}
