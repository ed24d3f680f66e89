use serde::{Deserialize, Serialize};

/// The canonical result record every adapter normalizes into.
///
/// A `DuplexResult` is either fully present (the backend succeeded) or does
/// not exist at all; failures travel as [`crate::backends::BackendError`],
/// never as a partially populated record. `dh`/`ds` are `None` when the
/// backend never reports them, which is distinct from failure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DuplexResult {
    /// Gibbs free energy of duplex formation, kcal/mol. Favorable binding
    /// is negative.
    pub dg: f64,
    /// Melting temperature, °C.
    pub tm: f64,
    /// Enthalpy, kcal/mol; absent when the backend does not emit it.
    pub dh: Option<f64>,
    /// Entropy, cal/mol/K; absent when the backend does not emit it.
    pub ds: Option<f64>,
}
