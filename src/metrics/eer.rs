//! Equal Error Rate estimation.
//!
//! Scores are the confidence values produced by the
//! [`Scorer`](crate::model::Scorer) (`1 - max(p)`). Against that convention a
//! threshold `t` accepts a clip whose score is `<= t`:
//!
//! ```text
//! FRR(t) = |{ b in bonafide : b >  t }| / |bonafide|   bonafide wrongly rejected
//! FAR(t) = |{ s in spoof    : s <= t }| / |spoof|      spoof wrongly accepted
//! ```
//!
//! FAR is non-decreasing and FRR non-increasing in `t`. The candidate
//! thresholds are the sorted distinct scores preceded by a lower boundary
//! where FAR = 0 and FRR = 1; at the largest score FAR = 1 and FRR = 0, so the
//! curves always cross. The EER is read at the first exact crossing, or
//! linearly interpolated between the two candidates that bracket the sign
//! change of `FAR - FRR`.

use thiserror::Error;

/// Offset of the lower boundary threshold below the smallest score.
pub const BOUNDARY_MARGIN: f64 = 1e-3;

// ---------------------------------------------------------------------------
// EerError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Error, PartialEq)]
pub enum EerError {
    /// One of the score collections is empty.
    #[error("not enough data to calculate EER ({bonafide} bonafide, {spoof} spoof scores)")]
    InsufficientData { bonafide: usize, spoof: usize },

    /// A score is NaN or infinite.
    #[error("score {0} is not a finite number")]
    InvalidScore(f64),
}

// ---------------------------------------------------------------------------
// EerResult
// ---------------------------------------------------------------------------

/// Outcome of [`EerEstimator::compute`].
///
/// `thresholds`, `far` and `frr` are parallel curves over the candidate
/// thresholds; they are intermediates kept for inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct EerResult {
    /// Equal error rate as a fraction in `[0, 1]`.
    pub eer: f64,
    /// Threshold at which FAR and FRR meet.
    pub threshold: f64,
    pub thresholds: Vec<f64>,
    pub far: Vec<f64>,
    pub frr: Vec<f64>,
}

impl EerResult {
    /// EER scaled to percent.
    pub fn percentage(&self) -> f64 {
        self.eer * 100.0
    }
}

// ---------------------------------------------------------------------------
// EerEstimator
// ---------------------------------------------------------------------------

/// Stateless EER computation over two score collections.
///
/// # Example
///
/// ```rust
/// use spoofcheck::metrics::EerEstimator;
///
/// // Perfect separation: no threshold in [0.2, 0.8) makes a mistake.
/// let r = EerEstimator::compute(&[0.1, 0.2], &[0.8, 0.9]).unwrap();
/// assert_eq!(r.eer, 0.0);
/// assert!((0.2..=0.8).contains(&r.threshold));
///
/// // Identical distributions: maximal confusion.
/// let r = EerEstimator::compute(&[0.5, 0.5], &[0.5, 0.5]).unwrap();
/// assert!((r.eer - 0.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EerEstimator;

impl EerEstimator {
    /// Compute the EER of `bonafide` versus `spoof` scores.
    ///
    /// Input order is irrelevant.
    ///
    /// # Errors
    ///
    /// - [`EerError::InsufficientData`]: either collection is empty.
    /// - [`EerError::InvalidScore`]: a score is not finite.
    pub fn compute(bonafide: &[f64], spoof: &[f64]) -> Result<EerResult, EerError> {
        if bonafide.is_empty() || spoof.is_empty() {
            return Err(EerError::InsufficientData {
                bonafide: bonafide.len(),
                spoof: spoof.len(),
            });
        }
        if let Some(&bad) = bonafide.iter().chain(spoof).find(|s| !s.is_finite()) {
            return Err(EerError::InvalidScore(bad));
        }

        let bonafide = sorted(bonafide);
        let spoof = sorted(spoof);
        let thresholds = candidate_thresholds(&bonafide, &spoof);

        let n_bonafide = bonafide.len() as f64;
        let n_spoof = spoof.len() as f64;

        let (far, frr): (Vec<f64>, Vec<f64>) = thresholds
            .iter()
            .map(|&t| {
                let accepted_spoof = spoof.partition_point(|&s| s <= t);
                let rejected_bonafide = bonafide.len() - bonafide.partition_point(|&b| b <= t);
                (
                    accepted_spoof as f64 / n_spoof,
                    rejected_bonafide as f64 / n_bonafide,
                )
            })
            .unzip();

        let (eer, threshold) = crossing(&thresholds, &far, &frr);

        Ok(EerResult {
            eer,
            threshold,
            thresholds,
            far,
            frr,
        })
    }
}

fn sorted(scores: &[f64]) -> Vec<f64> {
    let mut v = scores.to_vec();
    v.sort_by(f64::total_cmp);
    v
}

/// Lower boundary followed by every distinct score, ascending.
fn candidate_thresholds(bonafide: &[f64], spoof: &[f64]) -> Vec<f64> {
    let mut all: Vec<f64> = bonafide.iter().chain(spoof).copied().collect();
    all.sort_by(f64::total_cmp);
    all.dedup();

    let mut thresholds = Vec::with_capacity(all.len() + 1);
    thresholds.push(all[0] - BOUNDARY_MARGIN);
    thresholds.extend(all);
    thresholds
}

/// Locate where FAR meets FRR. Returns `(eer, threshold)`.
fn crossing(thresholds: &[f64], far: &[f64], frr: &[f64]) -> (f64, f64) {
    let diff = |i: usize| far[i] - frr[i];

    for i in 0..thresholds.len() {
        let d = diff(i);
        if d == 0.0 {
            return (far[i], thresholds[i]);
        }
        if d > 0.0 {
            if i == 0 {
                break;
            }
            // d(i-1) < 0 < d(i): interpolate both the rate and the threshold.
            let d0 = diff(i - 1);
            let alpha = d0 / (d0 - d);
            let eer = far[i - 1] + alpha * (far[i] - far[i - 1]);
            let threshold = thresholds[i - 1] + alpha * (thresholds[i] - thresholds[i - 1]);
            return (eer, threshold);
        }
    }

    // Unreachable with finite scores (the curves always cross); fall back to
    // the closest approach.
    let best = (0..thresholds.len())
        .min_by(|&a, &b| diff(a).abs().total_cmp(&diff(b).abs()))
        .unwrap_or(0);
    ((far[best] + frr[best]) / 2.0, thresholds[best])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
