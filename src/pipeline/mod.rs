//! Batch pipeline: uploaded files in, per-file verdicts plus EER out.
//!
//! # Architecture
//!
//! ```text
//! ModelContext (Arc, loaded once at startup)
//!        │
//!        ▼
//! PipelineOrchestrator::process_batch(&[UploadedFile])   ← spawn_blocking
//!        │
//!        ├─ per file: AudioNormalizer → Scorer → ItemResult
//!        ├─ BatchScores (bonafide / spoof confidences)
//!        └─ EerEstimator → BatchReport
//!                               │
//!                               ▼
//!                  BatchReport::into_entries() → JSON array
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use spoofcheck::config::AppConfig;
//! use spoofcheck::pipeline::{ModelContext, PipelineOrchestrator, UploadedFile};
//!
//! let config = AppConfig::load().unwrap();
//! let context = Arc::new(ModelContext::load(&config.model).unwrap());
//! let orchestrator = PipelineOrchestrator::new(context);
//!
//! let bytes = std::fs::read("clip.wav").unwrap();
//! let report = orchestrator.process_batch(&[UploadedFile::new("clip.wav", bytes)]);
//! println!("{}", serde_json::to_string_pretty(&report.into_entries()).unwrap());
//! ```

pub mod context;
pub mod report;
pub mod runner;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use context::ModelContext;
pub use report::{BatchReport, EerSummary, ItemResult, ItemStatus, ResponseEntry, UploadedFile};
pub use runner::{ItemError, PipelineOrchestrator};
