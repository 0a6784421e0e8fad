//! Logits → label + confidence.
//!
//! The scorer owns the scoring convention used throughout the pipeline:
//!
//! ```text
//! probabilities = softmax(logits)          // exactly 2 classes
//! label         = argmax(probabilities)    // 0 = Genuine, 1 = Spoof
//! confidence    = 1 - max(probabilities)   // NOT the winning probability
//! ```
//!
//! `confidence` is the distance from the model's most confident assertion: a
//! very sure prediction yields a value near `0.0`, a coin toss yields `0.5`.
//! The EER thresholds in [`crate::metrics`] are defined against this
//! convention for both classes, so it must not be "corrected" in one place
//! only.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{Classifier, InferenceError};
use crate::audio::Waveform;

/// Number of classes the classifier must emit.
pub const NUM_CLASSES: usize = 2;

// ---------------------------------------------------------------------------
// Label
// ---------------------------------------------------------------------------

/// Predicted class of a clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// Bonafide (non-spoofed) speech: class index 0.
    Genuine,
    /// Synthetic or replayed speech: class index 1.
    Spoof,
}

impl Label {
    /// Map a class index to a label. Any index other than 0 is `Spoof`.
    pub fn from_index(index: usize) -> Self {
        if index == 0 {
            Label::Genuine
        } else {
            Label::Spoof
        }
    }

    pub fn index(self) -> usize {
        match self {
            Label::Genuine => 0,
            Label::Spoof => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Genuine => "Genuine",
            Label::Spoof => "Spoof",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ScoreRecord
// ---------------------------------------------------------------------------

/// One scored clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreRecord {
    pub label: Label,
    /// `1 - max(probabilities)`, in `[0, 0.5]` for two classes.
    pub confidence: f64,
    /// Softmax output, `[genuine, spoof]`.
    pub probabilities: [f64; NUM_CLASSES],
}

// ---------------------------------------------------------------------------
// softmax
// ---------------------------------------------------------------------------

/// Numerically stable softmax, computed in `f64`.
///
/// ```rust
/// use spoofcheck::model::softmax;
///
/// let p = softmax(&[1000.0, 1000.0]);
/// assert!((p[0] - 0.5).abs() < 1e-12);
/// assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-12);
/// ```
pub fn softmax(logits: &[f32]) -> Vec<f64> {
    let max = logits
        .iter()
        .map(|&l| l as f64)
        .fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|&l| (l as f64 - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Turn raw logits into a [`ScoreRecord`].
///
/// Ties resolve to the lower class index (Genuine).
///
/// # Errors
///
/// - [`InferenceError::NoOutput`]: `logits` is empty.
/// - [`InferenceError::UnexpectedClasses`]: not exactly two logits.
/// - [`InferenceError::NonFinite`]: a logit is NaN or infinite.
pub fn score_logits(logits: &[f32]) -> Result<ScoreRecord, InferenceError> {
    if logits.is_empty() {
        return Err(InferenceError::NoOutput);
    }
    if logits.len() != NUM_CLASSES {
        return Err(InferenceError::UnexpectedClasses {
            expected: NUM_CLASSES,
            got: logits.len(),
        });
    }
    if logits.iter().any(|l| !l.is_finite()) {
        return Err(InferenceError::NonFinite);
    }

    let p = softmax(logits);
    let probabilities = [p[0], p[1]];

    let (argmax, max) = probabilities
        .iter()
        .copied()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (i, v)| {
            if v > best.1 {
                (i, v)
            } else {
                best
            }
        });

    Ok(ScoreRecord {
        label: Label::from_index(argmax),
        confidence: 1.0 - max,
        probabilities,
    })
}

// ---------------------------------------------------------------------------
// Scorer
// ---------------------------------------------------------------------------

/// Wraps a shared [`Classifier`] and applies [`score_logits`] to its output.
#[derive(Clone)]
pub struct Scorer {
    classifier: Arc<dyn Classifier>,
}

impl fmt::Debug for Scorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scorer").finish_non_exhaustive()
    }
}

impl Scorer {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self { classifier }
    }

    /// Run the classifier on `waveform` and score its logits.
    pub fn score(&self, waveform: &Waveform) -> Result<ScoreRecord, InferenceError> {
        let logits = self.classifier.predict(waveform)?;
        log::debug!("scorer: logits = {logits:?}");
        score_logits(&logits)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
