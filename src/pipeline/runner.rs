//! Pipeline orchestrator: drives one batch through normalize → score → EER.
//!
//! # Pipeline flow
//!
//! ```text
//! for each UploadedFile, in order:
//!   └─▶ AudioNormalizer::normalize      (extension check, decode, mono, resample)
//!         └─▶ Scorer::score             (classifier logits → label, confidence)
//!               ├─ Ok  → ItemResult::success, BatchScores::record
//!               └─ Err → ItemResult::failed, continue with the next file
//!
//! BatchScores::finalize
//!   ├─ both labels present → EerEstimator::compute
//!   └─ otherwise           → no EER entry
//! ```
//!
//! A failing file never aborts the batch. Panics raised while processing one
//! file are caught and reported as that file's failure.
//!
//! `process_batch` is synchronous and CPU-bound; async callers run it under
//! `tokio::task::spawn_blocking`.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use thiserror::Error;

use crate::audio::AudioError;
use crate::metrics::BatchScores;
use crate::model::{InferenceError, ScoreRecord};

use super::context::ModelContext;
use super::report::{BatchReport, ItemResult, UploadedFile};

// ---------------------------------------------------------------------------
// ItemError
// ---------------------------------------------------------------------------

/// Why one file of a batch could not be scored.
///
/// The `Display` text is what ends up in the item's `error` field.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ItemError {
    #[error(transparent)]
    Audio(#[from] AudioError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
    /// A panic escaped normalization or inference.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

// ---------------------------------------------------------------------------
// PipelineOrchestrator
// ---------------------------------------------------------------------------

/// Runs batches against a shared [`ModelContext`].
///
/// Cheap to clone (`Arc` clone). Batches run concurrently on separate clones
/// share nothing but the read-only context.
#[derive(Debug, Clone)]
pub struct PipelineOrchestrator {
    context: Arc<ModelContext>,
}

impl PipelineOrchestrator {
    pub fn new(context: Arc<ModelContext>) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &ModelContext {
        &self.context
    }

    /// Score every file of `files` and compute the batch EER.
    ///
    /// The report holds exactly one item per input, in input order. The EER
    /// is present iff at least one file was labelled Genuine and one Spoof.
    pub fn process_batch(&self, files: &[UploadedFile]) -> BatchReport {
        let mut scores = BatchScores::new();
        let mut items = Vec::with_capacity(files.len());

        for file in files {
            log::info!("Processing file: {}", file.filename);
            match self.process_item(file) {
                Ok(record) => {
                    log::debug!(
                        "{}: {} (confidence {:.4})",
                        file.filename,
                        record.label,
                        record.confidence
                    );
                    scores.record(&record);
                    items.push(ItemResult::success(&file.filename, &record));
                }
                Err(e) => {
                    log::warn!("Error processing file {}: {e}", file.filename);
                    items.push(ItemResult::failed(&file.filename, &e));
                }
            }
        }

        log::info!("Bonafide scores: {:?}", scores.bonafide());
        log::info!("Spoof scores: {:?}", scores.spoof());

        let eer = scores.finalize();
        match &eer {
            Some(result) => log::info!(
                "Calculated EER: {:.2}% at threshold {:.4}",
                result.percentage(),
                result.threshold
            ),
            None => log::info!("Not enough data to calculate EER."),
        }

        BatchReport { items, eer, scores }
    }

    /// Normalize and score a single file.
    pub fn process_item(&self, file: &UploadedFile) -> Result<ScoreRecord, ItemError> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| -> Result<ScoreRecord, ItemError> {
            let waveform = self
                .context
                .normalizer()
                .normalize(&file.filename, &file.bytes)?;
            Ok(self.context.scorer().score(&waveform)?)
        }));

        match outcome {
            Ok(result) => result,
            Err(payload) => Err(ItemError::Unexpected(panic_message(payload.as_ref()))),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
