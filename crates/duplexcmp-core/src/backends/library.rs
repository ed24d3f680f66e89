use super::{Backend, BackendError};
use crate::core::models::{DuplexResult, ReactionConditions, SequencePair};
use thiserror::Error;
use tracing::debug;

/// Raw record returned by an in-process calculator in its native milli-unit
/// convention: ΔG and ΔH in cal/mol. Tm (°C) and ΔS (cal/mol/K) already use
/// the harness convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawDuplex {
    pub dg_cal: f64,
    pub dh_cal: f64,
    pub ds: f64,
    pub tm: f64,
}

/// Error raised by an in-process calculator for one input.
#[derive(Debug, Error)]
#[error("calculation failed: {detail}")]
pub struct CalcError {
    pub detail: String,
}

impl CalcError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// The in-process library boundary: two sequences plus the five named
/// condition scalars, returning a [`RawDuplex`] in the library's native
/// units. The harness never looks inside the calculation.
pub trait DuplexCalculator {
    fn calc_heterodimer(
        &self,
        primer: &str,
        target: &str,
        conditions: &ReactionConditions,
    ) -> Result<RawDuplex, CalcError>;
}

const CAL_PER_KCAL: f64 = 1000.0;

/// Adapter over an in-process [`DuplexCalculator`].
///
/// Normalizes the calculator's milli-unit output into the canonical record:
/// ΔG and ΔH are divided by 1000 to yield kcal/mol, matching the unit
/// convention of the subprocess adapters; Tm and ΔS pass through
/// unconverted.
pub struct LibraryBackend<C> {
    label: String,
    calculator: C,
}

impl<C: DuplexCalculator> LibraryBackend<C> {
    pub fn new(label: impl Into<String>, calculator: C) -> Self {
        Self {
            label: label.into(),
            calculator,
        }
    }
}

impl<C: DuplexCalculator> Backend for LibraryBackend<C> {
    fn label(&self) -> &str {
        &self.label
    }

    fn invoke(
        &self,
        pair: &SequencePair,
        conditions: &ReactionConditions,
    ) -> Result<DuplexResult, BackendError> {
        let raw = self
            .calculator
            .calc_heterodimer(&pair.primer, &pair.target, conditions)
            .map_err(|e| BackendError::Invocation {
                detail: e.to_string(),
            })?;

        debug!(
            backend = %self.label,
            dg_cal = raw.dg_cal,
            tm = raw.tm,
            "library calculator returned"
        );

        Ok(DuplexResult {
            dg: raw.dg_cal / CAL_PER_KCAL,
            tm: raw.tm,
            dh: Some(raw.dh_cal / CAL_PER_KCAL),
            ds: Some(raw.ds),
        })
    }
}
