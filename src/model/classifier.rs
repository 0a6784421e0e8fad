//! Core classifier trait and its error type.
//!
//! # Overview
//!
//! [`Classifier`] is the only thing the pipeline knows about the network: a
//! pure function from a normalized [`Waveform`] to two logits (index 0 =
//! genuine, index 1 = spoof). It is object-safe and `Send + Sync` so it can be
//! held behind an `Arc<dyn Classifier>` and shared by concurrent batches.
//!
//! The production adapter is `OnnxClassifier` (cargo feature `onnx`).
//! [`MockClassifier`] (available under `#[cfg(test)]`) returns scripted
//! logits so the pipeline can be tested without a checkpoint.

use thiserror::Error;

use crate::audio::Waveform;

// ---------------------------------------------------------------------------
// InferenceError
// ---------------------------------------------------------------------------

/// All errors that can arise from loading or running a classifier.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InferenceError {
    /// The checkpoint file was not found at the given path.
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// The runtime failed to load the checkpoint.
    #[error("Model initialisation failed: {0}")]
    Init(String),

    /// The forward pass itself failed.
    #[error("Inference failed: {0}")]
    Runtime(String),

    /// The forward pass produced nothing.
    #[error("model returned no output")]
    NoOutput,

    /// The output is not a distribution over exactly two classes.
    #[error("model returned {got} class scores, expected {expected}")]
    UnexpectedClasses { expected: usize, got: usize },

    /// At least one logit is NaN or infinite.
    #[error("model returned non-finite logits")]
    NonFinite,
}

// ---------------------------------------------------------------------------
// Classifier trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface for bonafide/spoof classifiers.
///
/// # Contract
///
/// - `waveform` is mono at the rate configured in the model context.
/// - Returns raw logits; the [`Scorer`](crate::model::Scorer) applies the
///   softmax and validates the class count.
/// - Must not mutate model weights: the same instance serves every batch.
pub trait Classifier: Send + Sync {
    /// Run a forward pass and return the class logits.
    fn predict(&self, waveform: &Waveform) -> Result<Vec<f32>, InferenceError>;
}

// Compile-time assertion: Box<dyn Classifier> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn Classifier>) {}
};

// ---------------------------------------------------------------------------
// MockClassifier  (test-only)
// ---------------------------------------------------------------------------

#[cfg(test)]
type Respond = Box<dyn Fn(&Waveform) -> Result<Vec<f32>, InferenceError> + Send + Sync>;

/// A test double whose logits are produced by a closure.
#[cfg(test)]
pub struct MockClassifier {
    respond: Respond,
}

#[cfg(test)]
impl MockClassifier {
    /// Always return `logits`.
    pub fn fixed(logits: Vec<f32>) -> Self {
        Self::from_fn(move |_| Ok(logits.clone()))
    }

    /// Always return `Err(error)`.
    pub fn err(error: InferenceError) -> Self {
        Self::from_fn(move |_| Err(error.clone()))
    }

    /// Derive the logits from the waveform.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&Waveform) -> Result<Vec<f32>, InferenceError> + Send + Sync + 'static,
    {
        Self {
            respond: Box::new(f),
        }
    }
}

#[cfg(test)]
impl Classifier for MockClassifier {
    fn predict(&self, waveform: &Waveform) -> Result<Vec<f32>, InferenceError> {
        (self.respond)(waveform)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
