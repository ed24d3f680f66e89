use serde::{Deserialize, Serialize};

/// A primer/target pair driven through every backend of one scenario.
///
/// Sequences are strings over {A,C,G,T}, case-insensitive. The harness does
/// not validate the alphabet: malformed input is passed through, and any
/// rejection belongs to the backend being exercised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencePair {
    pub primer: String,
    pub target: String,
}

impl SequencePair {
    pub fn new(primer: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            primer: primer.into(),
            target: target.into(),
        }
    }
}
