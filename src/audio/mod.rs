//! Audio normalization: uploaded container → mono waveform at the model rate.
//!
//! # Pipeline
//!
//! ```text
//! (filename, bytes) → AudioFormat (extension check) → decode (symphonia)
//!                   → stereo_to_mono → resample (rubato sinc) → Waveform
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use spoofcheck::audio::AudioNormalizer;
//!
//! let bytes = std::fs::read("T_0000000000.flac").unwrap();
//! let waveform = AudioNormalizer::new(16_000)
//!     .normalize("T_0000000000.flac", &bytes)
//!     .unwrap();
//! println!("{} samples @ {} Hz", waveform.len(), waveform.sample_rate());
//! ```

pub mod decode;
pub mod error;
pub mod format;
pub mod normalize;
pub mod resample;
pub mod waveform;

#[cfg(test)]
pub(crate) mod fixtures;

pub use decode::{decode, DecodedAudio};
pub use error::AudioError;
pub use format::AudioFormat;
pub use normalize::{AudioNormalizer, DEFAULT_SAMPLE_RATE};
pub use resample::{resample, stereo_to_mono};
pub use waveform::Waveform;
