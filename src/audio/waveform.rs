//! Canonical model input: mono `f32` samples at a known sample rate.
//!
//! # Example
//!
//! ```rust
//! use spoofcheck::audio::Waveform;
//!
//! let w = Waveform::new(vec![0.0_f32; 16_000], 16_000);
//! assert_eq!(w.len(), 16_000);
//! assert!((w.duration_secs() - 1.0).abs() < 1e-9);
//! assert!(w.is_silent());
//! ```

// ---------------------------------------------------------------------------
// Waveform
// ---------------------------------------------------------------------------

/// A single-channel clip.
///
/// There is no channel count field: a `Waveform` is mono by construction.
/// The normalizer guarantees `sample_rate` equals the model's expected rate.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    /// Wrap already-mono samples.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Clip length in seconds. `0.0` when the sample rate is zero.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0_f32, |acc, s| acc.max(s.abs()))
    }

    /// `true` when every sample is exactly zero.
    pub fn is_silent(&self) -> bool {
        self.samples.iter().all(|&s| s == 0.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
