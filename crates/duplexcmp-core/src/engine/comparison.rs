use crate::backends::{Backend, BackendError};
use crate::core::models::{DuplexResult, ReactionConditions, SequencePair};
use tracing::warn;

/// Signed differences between two present results for the same input.
///
/// Derived and ephemeral: produced fresh per scenario, rendered, then
/// dropped. The direction is always `second − first`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRecord {
    pub first: String,
    pub second: String,
    /// `second.dg − first.dg`, kcal/mol.
    pub dg_diff: f64,
    /// `second.tm − first.tm`, °C.
    pub tm_diff: f64,
}

impl ComparisonRecord {
    pub fn between(
        first_label: &str,
        first: &DuplexResult,
        second_label: &str,
        second: &DuplexResult,
    ) -> Self {
        Self {
            first: first_label.to_string(),
            second: second_label.to_string(),
            dg_diff: second.dg - first.dg,
            tm_diff: second.tm - first.tm,
        }
    }
}

/// One backend's contribution to a scenario: its fully normalized result,
/// or the failure that made it absent.
#[derive(Debug)]
pub struct BackendOutcome {
    pub label: String,
    pub result: Result<DuplexResult, BackendError>,
}

/// Everything the engine produced for one (sequence pair, conditions)
/// input: per-backend outcomes in roster order, and one record per
/// unordered pair of present results.
#[derive(Debug)]
pub struct ScenarioComparison {
    pub outcomes: Vec<BackendOutcome>,
    pub records: Vec<ComparisonRecord>,
}

impl ScenarioComparison {
    pub fn present_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }
}

/// Drives a fixed roster of backends over one scenario and derives all
/// pairwise differences.
///
/// The roster order is the invocation and report order: the library adapter
/// first, then subprocess oracles in configured order. Order affects
/// readability only, never correctness.
pub struct ComparisonEngine {
    backends: Vec<Box<dyn Backend>>,
}

impl ComparisonEngine {
    pub fn new(backends: Vec<Box<dyn Backend>>) -> Self {
        Self { backends }
    }

    pub fn roster_len(&self) -> usize {
        self.backends.len()
    }

    /// Invokes every backend sequentially and computes the diff set over
    /// whichever results came back present.
    ///
    /// This never fails as a whole: a failing backend is logged, reported
    /// in its outcome, and skipped from the diff computation. Zero or one
    /// present result yields an empty diff set, which is not an error.
    pub fn compare(
        &self,
        pair: &SequencePair,
        conditions: &ReactionConditions,
    ) -> ScenarioComparison {
        let mut outcomes = Vec::with_capacity(self.backends.len());
        for backend in &self.backends {
            let result = backend.invoke(pair, conditions);
            if let Err(e) = &result {
                warn!(backend = backend.label(), error = %e, "backend absent for this scenario");
            }
            outcomes.push(BackendOutcome {
                label: backend.label().to_string(),
                result,
            });
        }

        let mut records = Vec::new();
        for i in 0..outcomes.len() {
            for j in (i + 1)..outcomes.len() {
                if let (Ok(first), Ok(second)) = (&outcomes[i].result, &outcomes[j].result) {
                    records.push(ComparisonRecord::between(
                        &outcomes[i].label,
                        first,
                        &outcomes[j].label,
                        second,
                    ));
                }
            }
        }

        ScenarioComparison { outcomes, records }
    }
}
