mod cli;
mod config;
mod error;
mod logging;
mod report;

use crate::cli::Cli;
use crate::error::Result;
use clap::Parser;
use duplexcmp::workflows::{self, HarnessConfig, ScenarioSet};
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.clone())?;

    info!("duplexcmp v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let harness_config = match &cli.config {
        Some(path) => config::PartialHarnessConfig::from_file(path)?.resolve(),
        None => HarnessConfig::default(),
    };

    // The one fatal precondition: if the oracle build fails, abort before
    // any scenario and exit non-zero. Individual backend failures later on
    // never change the exit code.
    if let Some(build) = &harness_config.build {
        build.run()?;
    }

    let (engine, unavailable) = workflows::config::build_roster(&harness_config);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    report::render_unavailable(&mut out, &unavailable)?;

    let scenarios = ScenarioSet::standard();
    let findings = workflows::compare::run(&engine, &scenarios, |scenario, comparison| {
        if let Err(e) = report::render_scenario(&mut out, scenario, comparison) {
            error!("failed to render scenario report: {e}");
        }
    });
    report::render_findings(&mut out, &findings)?;

    info!("Comparison run completed.");
    Ok(())
}
