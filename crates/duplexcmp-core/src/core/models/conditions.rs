use serde::{Deserialize, Serialize};

/// Reaction conditions shared by every backend invocation of one scenario.
///
/// All concentrations and the temperature are non-negative by physical
/// convention; the harness does not enforce plausibility. Values are
/// forwarded verbatim to the oracles, which own any rejection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReactionConditions {
    /// Monovalent cation concentration (Na⁺), mM.
    pub monovalent_mm: f64,
    /// Divalent cation concentration (Mg²⁺), mM.
    pub divalent_mm: f64,
    /// dNTP concentration, mM.
    pub dntp_mm: f64,
    /// Duplex strand concentration, nM.
    pub dna_nm: f64,
    /// Reporting temperature, °C.
    pub temperature_c: f64,
}

impl ReactionConditions {
    /// Standard PCR-like baseline: Na⁺ 50 mM, Mg²⁺ 1.5 mM, dNTP 0.6 mM,
    /// DNA 50 nM, 37 °C.
    pub fn baseline() -> Self {
        Self {
            monovalent_mm: 50.0,
            divalent_mm: 1.5,
            dntp_mm: 0.6,
            dna_nm: 50.0,
            temperature_c: 37.0,
        }
    }

    pub fn with_divalent_mm(mut self, divalent_mm: f64) -> Self {
        self.divalent_mm = divalent_mm;
        self
    }

    pub fn with_monovalent_mm(mut self, monovalent_mm: f64) -> Self {
        self.monovalent_mm = monovalent_mm;
        self
    }

    pub fn with_temperature_c(mut self, temperature_c: f64) -> Self {
        self.temperature_c = temperature_c;
        self
    }
}

#[cfg(test)]
mod conditions_tests {
    use super::*;

    #[test]
    fn baseline_matches_standard_assay_values() {
        let cond = ReactionConditions::baseline();
        assert_eq!(cond.monovalent_mm, 50.0);
        assert_eq!(cond.divalent_mm, 1.5);
        assert_eq!(cond.dntp_mm, 0.6);
        assert_eq!(cond.dna_nm, 50.0);
        assert_eq!(cond.temperature_c, 37.0);
    }

    #[test]
    fn with_builders_override_only_their_field() {
        let cond = ReactionConditions::baseline()
            .with_divalent_mm(5.0)
            .with_temperature_c(25.0);
        assert_eq!(cond.divalent_mm, 5.0);
        assert_eq!(cond.temperature_c, 25.0);
        assert_eq!(cond.monovalent_mm, 50.0);
        assert_eq!(cond.dna_nm, 50.0);
    }
}
