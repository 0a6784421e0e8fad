//! Per-batch score bookkeeping.

use super::eer::{EerEstimator, EerResult};
use crate::model::{Label, ScoreRecord};

// ---------------------------------------------------------------------------
// BatchScores
// ---------------------------------------------------------------------------

/// Confidence values of one batch, split by predicted label.
///
/// Values are appended in processing order. The order is only visible in the
/// debug log; the EER does not depend on it.
///
/// ```rust
/// use spoofcheck::metrics::BatchScores;
/// use spoofcheck::model::score_logits;
///
/// let mut scores = BatchScores::new();
/// scores.record(&score_logits(&[2.0, -2.0]).unwrap()); // Genuine
/// assert!(!scores.can_finalize());
/// scores.record(&score_logits(&[-1.0, 1.0]).unwrap()); // Spoof
/// assert!(scores.can_finalize());
/// assert!(scores.finalize().is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchScores {
    bonafide: Vec<f64>,
    spoof: Vec<f64>,
}

impl BatchScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route `record.confidence` to the collection matching its label.
    pub fn record(&mut self, record: &ScoreRecord) {
        match record.label {
            Label::Genuine => self.bonafide.push(record.confidence),
            Label::Spoof => self.spoof.push(record.confidence),
        }
    }

    pub fn bonafide(&self) -> &[f64] {
        &self.bonafide
    }

    pub fn spoof(&self) -> &[f64] {
        &self.spoof
    }

    /// Total number of recorded scores.
    pub fn len(&self) -> usize {
        self.bonafide.len() + self.spoof.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `true` iff both collections hold at least one score.
    pub fn can_finalize(&self) -> bool {
        !self.bonafide.is_empty() && !self.spoof.is_empty()
    }

    /// Compute the batch EER, or `None` when one side is empty.
    ///
    /// A missing side is the normal "not enough data" outcome, not an error.
    pub fn finalize(&self) -> Option<EerResult> {
        if !self.can_finalize() {
            return None;
        }
        match EerEstimator::compute(&self.bonafide, &self.spoof) {
            Ok(result) => Some(result),
            Err(e) => {
                log::warn!("EER not computed: {e}");
                None
            }
        }
    }
}
