use crate::core::models::{ReactionConditions, SequencePair};
use crate::engine::{ComparisonEngine, ScenarioComparison};
use std::collections::HashMap;
use tracing::{info, instrument};

pub const BASELINE_LABEL: &str = "baseline";
pub const HIGH_DIVALENT_LABEL: &str = "high divalent (Mg2+ 5.0 mM)";
pub const LOW_MONOVALENT_LABEL: &str = "low monovalent (Na+ 10.0 mM)";
pub const REDUCED_TEMPERATURE_LABEL: &str = "reduced temperature (25 C)";

/// One concrete test input: a labelled sequence pair under a labelled set
/// of reaction conditions.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub pair_label: String,
    pub pair: SequencePair,
    pub conditions_label: String,
    pub conditions: ReactionConditions,
}

/// The fixed scenario matrix: sequence-pair cases crossed with
/// reaction-condition variants.
#[derive(Debug, Clone)]
pub struct ScenarioSet {
    scenarios: Vec<Scenario>,
}

impl ScenarioSet {
    /// The standard matrix: five sequence cases (perfect match, shifted,
    /// longer target, G-C rich, A-T rich) crossed with the four condition
    /// variants (baseline, high Mg2+, low Na+, reduced temperature).
    pub fn standard() -> Self {
        let cases: [(&str, &str, &str); 5] = [
            ("perfect match", "ATGCGATCGATCG", "ATGCGATCGATCG"),
            ("shifted by 1", "ATGCGATCGATCG", "CGCGATCGATCGA"),
            ("longer target", "ATGCGATCGATCG", "CGCGATCGATCGAT"),
            ("G-C rich perfect match", "GCGCGCGCGC", "GCGCGCGCGC"),
            ("A-T rich perfect match", "ATATATATATAT", "ATATATATATAT"),
        ];

        let mut scenarios = Vec::with_capacity(cases.len() * condition_variants().len());
        for (pair_label, primer, target) in cases {
            for (conditions_label, conditions) in condition_variants() {
                scenarios.push(Scenario {
                    pair_label: pair_label.to_string(),
                    pair: SequencePair::new(primer, target),
                    conditions_label: conditions_label.to_string(),
                    conditions,
                });
            }
        }
        Self { scenarios }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.iter()
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

/// The four condition variants of the standard matrix. The baseline and
/// reduced-temperature variants share their salt composition, which is what
/// makes the drift check between them meaningful.
pub fn condition_variants() -> Vec<(&'static str, ReactionConditions)> {
    let baseline = ReactionConditions::baseline();
    vec![
        (BASELINE_LABEL, baseline),
        (HIGH_DIVALENT_LABEL, baseline.with_divalent_mm(5.0)),
        (LOW_MONOVALENT_LABEL, baseline.with_monovalent_mm(10.0)),
        (REDUCED_TEMPERATURE_LABEL, baseline.with_temperature_c(25.0)),
    ]
}

/// An unexpected dependence of a backend's reported value on the reporting
/// temperature parameter.
///
/// ΔG and Tm are computed from the sequence and the salt composition; the
/// reporting temperature should not move them. A backend whose values
/// differ between the baseline and reduced-temperature variants (identical
/// salts) is surfaced for human inspection, never treated as an error.
#[derive(Debug, Clone, PartialEq)]
pub struct DriftFinding {
    pub backend: String,
    pub pair_label: String,
    /// "Tm" or "dG".
    pub quantity: &'static str,
    pub at_baseline: f64,
    pub at_reduced_temperature: f64,
}

const DRIFT_TOLERANCE: f64 = 1e-9;

#[derive(Default)]
struct DriftTracker {
    // Scalar summaries only; full results never outlive their scenario.
    cells: HashMap<(String, String), DriftCell>,
}

#[derive(Default, Clone, Copy)]
struct DriftCell {
    baseline: Option<(f64, f64)>,
    reduced: Option<(f64, f64)>,
}

impl DriftTracker {
    fn record(&mut self, scenario: &Scenario, comparison: &ScenarioComparison) {
        let slot = match scenario.conditions_label.as_str() {
            BASELINE_LABEL => 0,
            REDUCED_TEMPERATURE_LABEL => 1,
            _ => return,
        };
        for outcome in &comparison.outcomes {
            if let Ok(result) = &outcome.result {
                let cell = self
                    .cells
                    .entry((outcome.label.clone(), scenario.pair_label.clone()))
                    .or_default();
                let value = Some((result.dg, result.tm));
                if slot == 0 {
                    cell.baseline = value;
                } else {
                    cell.reduced = value;
                }
            }
        }
    }

    fn findings(self) -> Vec<DriftFinding> {
        let mut findings = Vec::new();
        for ((backend, pair_label), cell) in self.cells {
            let (Some((dg_base, tm_base)), Some((dg_red, tm_red))) = (cell.baseline, cell.reduced)
            else {
                continue;
            };
            if (dg_base - dg_red).abs() > DRIFT_TOLERANCE {
                findings.push(DriftFinding {
                    backend: backend.clone(),
                    pair_label: pair_label.clone(),
                    quantity: "dG",
                    at_baseline: dg_base,
                    at_reduced_temperature: dg_red,
                });
            }
            if (tm_base - tm_red).abs() > DRIFT_TOLERANCE {
                findings.push(DriftFinding {
                    backend,
                    pair_label,
                    quantity: "Tm",
                    at_baseline: tm_base,
                    at_reduced_temperature: tm_red,
                });
            }
        }
        findings.sort_by(|a, b| {
            (&a.backend, &a.pair_label, a.quantity).cmp(&(&b.backend, &b.pair_label, b.quantity))
        });
        findings
    }
}

/// Drives the engine over every scenario in order, strictly sequentially,
/// handing each finished comparison to `on_scenario` for rendering before
/// it is dropped.
///
/// Returns the drift findings accumulated across the run.
#[instrument(skip_all, name = "comparison_workflow")]
pub fn run(
    engine: &ComparisonEngine,
    scenarios: &ScenarioSet,
    mut on_scenario: impl FnMut(&Scenario, &ScenarioComparison),
) -> Vec<DriftFinding> {
    info!(
        scenarios = scenarios.len(),
        backends = engine.roster_len(),
        "starting comparison run"
    );

    let mut tracker = DriftTracker::default();
    for scenario in scenarios.iter() {
        info!(
            pair = %scenario.pair_label,
            conditions = %scenario.conditions_label,
            "running scenario"
        );
        let comparison = engine.compare(&scenario.pair, &scenario.conditions);
        tracker.record(scenario, &comparison);
        on_scenario(scenario, &comparison);
    }

    let findings = tracker.findings();
    info!(
        findings = findings.len(),
        "comparison run complete"
    );
    findings
}
