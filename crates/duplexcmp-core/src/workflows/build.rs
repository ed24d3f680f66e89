use std::path::PathBuf;
use std::process::Command;
use thiserror::Error;
use tracing::info;

/// The build precondition is the single fatal failure of a run: compiled
/// oracles that cannot be produced make every scenario meaningless, so the
/// runner aborts before the first comparison.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to run build command '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("build command '{command}' exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
}

/// One-time setup step that compiles the subprocess oracles before any
/// scenario executes. The wait is unbounded; only the outcome matters.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildStep {
    pub program: String,
    pub args: Vec<String>,
    pub dir: PathBuf,
}

impl BuildStep {
    /// The conventional oracle build: `cargo build --release --bins` in the
    /// oracle source directory.
    pub fn cargo_release_bins(dir: impl Into<PathBuf>) -> Self {
        Self {
            program: "cargo".into(),
            args: vec!["build".into(), "--release".into(), "--bins".into()],
            dir: dir.into(),
        }
    }

    fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    /// Runs the build to completion.
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] if the command cannot be spawned or exits
    /// non-zero; callers treat either as fatal for the whole run.
    pub fn run(&self) -> Result<(), BuildError> {
        info!(command = %self.command_line(), dir = %self.dir.display(), "building oracles");
        let output = Command::new(&self.program)
            .args(&self.args)
            .current_dir(&self.dir)
            .output()
            .map_err(|e| BuildError::Spawn {
                command: self.command_line(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(BuildError::Failed {
                command: self.command_line(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        info!("oracle build completed");
        Ok(())
    }
}
