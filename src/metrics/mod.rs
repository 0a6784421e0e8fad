//! Batch-level discriminability metrics.
//!
//! * [`BatchScores`]: bonafide / spoof confidence collections for one batch.
//! * [`EerEstimator`]: Equal Error Rate over two score collections.
//! * [`EerError`]: why an EER could not be computed.

pub mod aggregator;
pub mod eer;

pub use aggregator::BatchScores;
pub use eer::{EerError, EerEstimator, EerResult, BOUNDARY_MARGIN};
