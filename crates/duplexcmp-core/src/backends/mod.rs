pub mod dylib;
pub mod library;
pub mod subprocess;

use crate::core::models::{DuplexResult, ReactionConditions, SequencePair};
use std::time::Duration;
use thiserror::Error;

pub use dylib::DylibCalculator;
pub use library::{CalcError, DuplexCalculator, LibraryBackend, RawDuplex};
pub use subprocess::SubprocessBackend;

/// Failures a backend can produce for one invocation.
///
/// Every variant is caught at the adapter boundary, logged, and converted
/// into an absent result for the scenario; none of them unwinds through
/// the comparison engine. A parse failure never degrades into a fabricated
/// numeric record.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The in-process calculator library could not be resolved. The backend
    /// stays absent for the remainder of the run.
    #[error("dependency '{name}' is unavailable: {detail}")]
    DependencyMissing { name: String, detail: String },

    /// The invocation itself failed: spawn error, non-zero exit status
    /// (with captured stderr), or an in-process calculation error. Absent
    /// for this scenario only; the next scenario retries fresh.
    #[error("backend invocation failed: {detail}")]
    Invocation { detail: String },

    /// The external process exceeded the fixed wall-clock limit and was
    /// killed.
    #[error("backend timed out after {}s", limit.as_secs_f64())]
    Timeout { limit: Duration },

    /// Standard output did not match the expected shape (wrong field
    /// count, non-numeric fields, empty output).
    #[error("backend output could not be parsed: {detail}")]
    OutputParse { detail: String },

    /// Artifact or pipe I/O failed around the invocation.
    #[error("I/O error during backend invocation: {0}")]
    Io(#[from] std::io::Error),
}

/// Defines the interface every calculation backend is reached through.
///
/// A backend is one concrete implementation of the duplex thermodynamics
/// calculation under validation: an in-process library or an external
/// binary. The engine only ever sees this trait, so new oracles can be
/// added without touching the comparison logic.
pub trait Backend {
    /// Human-readable backend name used in reports and diff labels.
    fn label(&self) -> &str;

    /// Runs the calculation for one (sequence pair, conditions) input.
    ///
    /// # Arguments
    ///
    /// * `pair` - The primer/target sequences, passed through unvalidated.
    /// * `conditions` - The reaction condition scalars for this scenario.
    ///
    /// # Return
    ///
    /// Returns the fully normalized result record: ΔG in kcal/mol, Tm in
    /// °C, and ΔH/ΔS (kcal/mol, cal/mol/K) when the backend reports them.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] when the backend is unavailable, the
    /// invocation fails or times out, or its output cannot be parsed.
    /// Implementations must not return partial records in place of errors.
    fn invoke(
        &self,
        pair: &SequencePair,
        conditions: &ReactionConditions,
    ) -> Result<DuplexResult, BackendError>;
}
