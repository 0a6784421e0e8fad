//! Classifier capability and scoring.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                  Classifier (trait)                  │
//! │                                                      │
//! │   ┌──────────────┐    ┌───────────────┐              │
//! │   │ load_        │    │ OnnxClassifier│              │
//! │   │ classifier() │───▶│ - session     │              │
//! │   │ - exists?    │    │ - output name │              │
//! │   └──────────────┘    └──────┬────────┘              │
//! │                              │ logits                │
//! │                              ▼                       │
//! │                    ┌──────────────────┐              │
//! │                    │ Scorer::score()  │              │
//! │                    │ softmax → label, │              │
//! │                    │ 1 - max(p)       │              │
//! │                    └──────────────────┘              │
//! └──────────────────────────────────────────────────────┘
//! ```

pub mod classifier;
pub mod hyperparams;
pub mod onnx;
pub mod scorer;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use classifier::{Classifier, InferenceError};
pub use hyperparams::ModelHyperparameters;
pub use onnx::load_classifier;
#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;
pub use scorer::{score_logits, softmax, Label, ScoreRecord, Scorer, NUM_CLASSES};

// test-only re-export so other test modules can import MockClassifier
// without `use crate::model::classifier::MockClassifier`.
#[cfg(test)]
pub use classifier::MockClassifier;
