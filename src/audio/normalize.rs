//! Upload → canonical [`Waveform`].
//!
//! ```text
//! filename ──▶ AudioFormat::from_filename   (UnsupportedFormat)
//! bytes    ──▶ decode                       (EmptyAudio / Decode)
//!          ──▶ stereo_to_mono
//!          ──▶ resample (if rate ≠ target)  (Resample)
//!          ──▶ Waveform @ target rate
//! ```
//!
//! Downmixing runs before resampling. Both steps are linear, so the result is
//! the same as resampling every channel first, for a fraction of the work.

use super::decode::{decode, DecodedAudio};
use super::resample::{resample, stereo_to_mono};
use super::{AudioError, AudioFormat, Waveform};

/// Sample rate the bundled classifiers are trained on.
pub const DEFAULT_SAMPLE_RATE: u32 = 16_000;

// ---------------------------------------------------------------------------
// AudioNormalizer
// ---------------------------------------------------------------------------

/// Turns uploaded audio into the mono, fixed-rate input the classifier expects.
///
/// # Example
///
/// ```rust
/// use spoofcheck::audio::{AudioError, AudioNormalizer};
///
/// let normalizer = AudioNormalizer::new(16_000);
/// let err = normalizer.normalize("clip.mp3", b"ID3...").unwrap_err();
/// assert!(matches!(err, AudioError::UnsupportedFormat { .. }));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioNormalizer {
    target_rate: u32,
}

impl Default for AudioNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

impl AudioNormalizer {
    pub fn new(target_rate: u32) -> Self {
        Self { target_rate }
    }

    pub fn target_rate(&self) -> u32 {
        self.target_rate
    }

    /// Validate `filename`, decode `bytes` and bring the result to the target
    /// rate as mono.
    ///
    /// # Errors
    ///
    /// - [`AudioError::UnsupportedFormat`]: extension is not `.wav`/`.flac`;
    ///   nothing is decoded in that case.
    /// - [`AudioError::EmptyAudio`]: no bytes, no decoded samples, or a clip
    ///   too short to leave any sample at the target rate.
    /// - [`AudioError::Decode`]: unrecognized or corrupt container.
    /// - [`AudioError::Resample`]: the resampler rejected the input.
    pub fn normalize(&self, filename: &str, bytes: &[u8]) -> Result<Waveform, AudioError> {
        let format = AudioFormat::from_filename(filename)?;
        let decoded = decode(bytes, format)?;
        log::debug!(
            "normalize: {filename}: {} Hz, {} ch, {} frames",
            decoded.sample_rate,
            decoded.channels,
            decoded.frames()
        );
        let waveform = self.normalize_decoded(decoded)?;
        log::debug!(
            "normalize: {filename}: {:.3} s at {} Hz, peak {:.4}",
            waveform.duration_secs(),
            waveform.sample_rate(),
            waveform.peak()
        );
        Ok(waveform)
    }

    /// Channel collapse and rate conversion for already-decoded audio.
    pub fn normalize_decoded(&self, decoded: DecodedAudio) -> Result<Waveform, AudioError> {
        let DecodedAudio {
            samples,
            sample_rate,
            channels,
        } = decoded;

        let mono = if channels > 1 {
            stereo_to_mono(&samples, channels)
        } else {
            samples
        };

        if mono.is_empty() {
            return Err(AudioError::EmptyAudio);
        }

        let samples = if sample_rate != self.target_rate {
            resample(&mono, sample_rate, self.target_rate)?
        } else {
            mono
        };

        if samples.is_empty() {
            return Err(AudioError::EmptyAudio);
        }

        Ok(Waveform::new(samples, self.target_rate))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::fixtures::{constant_wav, wav_bytes};

    #[test]
    fn rejects_unsupported_extension_before_decoding() {
        // Valid WAV bytes, but the name says mp3: must not be decoded.
        let bytes = constant_wav(0.5, 160, 16_000);
        let err = AudioNormalizer::default()
            .normalize("clip.mp3", &bytes)
            .unwrap_err();
        assert_eq!(
            err,
            AudioError::UnsupportedFormat {
                extension: "mp3".into()
            }
        );
    }

    #[test]
    fn corrupt_wav_is_decode_error() {
        let err = AudioNormalizer::default()
            .normalize("clip.wav", b"\x00\x01\x02 corrupt payload \xff\xfe")
            .unwrap_err();
        assert!(matches!(err, AudioError::Decode(_)), "got {err:?}");
    }

    #[test]
    fn zero_length_upload_is_empty_audio() {
        let err = AudioNormalizer::default().normalize("clip.wav", &[]).unwrap_err();
        assert_eq!(err, AudioError::EmptyAudio);
    }

    #[test]
    fn decoded_without_samples_is_empty_audio() {
        let decoded = DecodedAudio {
            samples: Vec::new(),
            sample_rate: 16_000,
            channels: 1,
        };
        assert_eq!(
            AudioNormalizer::default().normalize_decoded(decoded),
            Err(AudioError::EmptyAudio)
        );
    }

    #[test]
    fn clip_shorter_than_one_output_sample_is_empty_audio() {
        // One frame at 44.1 kHz rounds to zero samples at 16 kHz.
        let bytes = wav_bytes(&[8_192], 1, 44_100);
        let err = AudioNormalizer::new(16_000)
            .normalize("blip.wav", &bytes)
            .unwrap_err();
        assert_eq!(err, AudioError::EmptyAudio);
    }

    #[test]
    fn target_rate_input_is_passed_through() {
        let bytes = wav_bytes(&[0, 8_192, -8_192, 16_384], 1, 16_000);
        let w = AudioNormalizer::new(16_000).normalize("a.wav", &bytes).unwrap();
        assert_eq!(w.sample_rate(), 16_000);
        assert_eq!(w.len(), 4);
        assert!((w.samples()[1] - 0.25).abs() < 1e-4);
        assert!((w.samples()[3] - 0.5).abs() < 1e-4);
    }

    #[test]
    fn stereo_at_target_rate_is_only_downmixed() {
        // Frames: (0.5, 0.0), (0.25, 0.25)
        let bytes = wav_bytes(&[16_384, 0, 8_192, 8_192], 2, 16_000);
        let w = AudioNormalizer::new(16_000).normalize("a.wav", &bytes).unwrap();
        assert_eq!(w.len(), 2);
        assert!((w.samples()[0] - 0.25).abs() < 1e-4);
        assert!((w.samples()[1] - 0.25).abs() < 1e-4);
    }

    #[test]
    fn other_rates_are_converted_to_target() {
        let bytes = constant_wav(0.0, 44_100, 44_100);
        let w = AudioNormalizer::new(16_000).normalize("a.wav", &bytes).unwrap();
        assert_eq!(w.sample_rate(), 16_000);
        assert_eq!(w.len(), 16_000);
    }

    #[test]
    fn upsampled_stereo_becomes_mono_at_target() {
        let frames = 8_000;
        let interleaved: Vec<i16> = (0..frames).flat_map(|_| [1_000_i16, 3_000]).collect();
        let bytes = wav_bytes(&interleaved, 2, 8_000);
        let w = AudioNormalizer::new(16_000).normalize("a.wav", &bytes).unwrap();
        assert_eq!(w.sample_rate(), 16_000);
        assert_eq!(w.len(), 16_000);
        let expected = 2_000.0 / 32_768.0;
        for &s in &w.samples()[1_000..15_000] {
            assert!((s - expected).abs() < 1e-3, "sample {s} vs {expected}");
        }
    }

    #[test]
    fn silence_is_valid_and_stays_zero() {
        let bytes = wav_bytes(&vec![0; 2 * 4_800], 2, 48_000);
        let w = AudioNormalizer::new(16_000).normalize("quiet.wav", &bytes).unwrap();
        assert_eq!(w.len(), 1_600);
        assert!(w.is_silent());
    }

    #[test]
    fn silence_at_target_rate_is_unchanged() {
        let bytes = constant_wav(0.0, 320, 16_000);
        let w = AudioNormalizer::new(16_000).normalize("quiet.wav", &bytes).unwrap();
        assert_eq!(w.samples(), &[0.0_f32; 320][..]);
    }
}
