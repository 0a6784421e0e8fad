//! Audio resampling and channel mixing utilities.
//!
//! The classifier requires **mono `f32`** audio at a fixed rate (16 kHz by
//! default).  This module provides the two conversion steps:
//!
//! 1. [`stereo_to_mono`]: downmix any number of interleaved channels to mono.
//! 2. [`resample`]: band-limited sample rate conversion with rubato
//!    (`SincFixedIn` + `BlackmanHarris2` window), so content above the new
//!    Nyquist frequency is filtered out instead of folding back as aliases.

use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

use super::AudioError;

/// Frames fed to rubato per `process` call.
const CHUNK_FRAMES: usize = 1_024;

// ---------------------------------------------------------------------------
// stereo_to_mono
// ---------------------------------------------------------------------------

/// Mix interleaved multi-channel audio down to mono by averaging all channels.
///
/// The output length is `samples.len() / channels`.
///
/// * If `channels == 1` the input slice is returned as an owned `Vec` with no
///   averaging.
/// * If `channels == 0` an empty vector is returned.
///
/// # Example
///
/// ```rust
/// use spoofcheck::audio::stereo_to_mono;
///
/// let stereo = vec![0.5_f32, -0.5, 0.2, -0.2]; // L R L R
/// let mono = stereo_to_mono(&stereo, 2);
/// assert_eq!(mono.len(), 2);
/// assert!((mono[0] - 0.0).abs() < 1e-6);
/// assert!((mono[1] - 0.0).abs() < 1e-6);
/// ```
pub fn stereo_to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => samples.to_vec(),
        n => {
            let n = n as usize;
            samples
                .chunks_exact(n)
                .map(|frame| frame.iter().sum::<f32>() / n as f32)
                .collect()
        }
    }
}

// ---------------------------------------------------------------------------
// resample
// ---------------------------------------------------------------------------

/// Resample mono `samples` from `source_rate` Hz to `target_rate` Hz.
///
/// * If the rates are equal the input is cloned and returned unchanged.
/// * If `samples` is empty an empty vector is returned.
///
/// The output is aligned with the input (the filter delay is trimmed) and its
/// length is `round(samples.len() * target_rate / source_rate)`.
///
/// # Example
///
/// ```rust
/// use spoofcheck::audio::resample;
///
/// let hi = vec![0.0_f32; 4_800]; // 100 ms @ 48 kHz
/// let lo = resample(&hi, 48_000, 16_000).unwrap();
/// assert_eq!(lo.len(), 1_600);
/// ```
pub fn resample(samples: &[f32], source_rate: u32, target_rate: u32) -> Result<Vec<f32>, AudioError> {
    if source_rate == target_rate {
        return Ok(samples.to_vec());
    }

    if samples.is_empty() {
        return Ok(Vec::new());
    }

    let fail = |reason: String| AudioError::Resample {
        from_rate: source_rate,
        to_rate: target_rate,
        reason,
    };

    if source_rate == 0 || target_rate == 0 {
        return Err(fail("sample rate must be non-zero".into()));
    }

    let ratio = target_rate as f64 / source_rate as f64;
    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let mut resampler = SincFixedIn::<f32>::new(ratio, 1.0, params, CHUNK_FRAMES, 1)
        .map_err(|e| fail(e.to_string()))?;

    let expected_len = (samples.len() as f64 * ratio).round() as usize;
    let delay = resampler.output_delay();
    let wanted = delay + expected_len;
    let mut output: Vec<f32> = Vec::with_capacity(wanted + CHUNK_FRAMES);

    let mut chunks = samples.chunks_exact(CHUNK_FRAMES);
    for chunk in &mut chunks {
        let input: [&[f32]; 1] = [chunk];
        let out = resampler
            .process(&input[..], None)
            .map_err(|e| fail(e.to_string()))?;
        output.extend_from_slice(&out[0]);
    }

    let rest = chunks.remainder();
    if !rest.is_empty() {
        let input: [&[f32]; 1] = [rest];
        let out = resampler
            .process_partial(Some(&input[..]), None)
            .map_err(|e| fail(e.to_string()))?;
        output.extend_from_slice(&out[0]);
    }

    // Flush the filter tail until the delayed signal is fully out.
    while output.len() < wanted {
        let out = resampler
            .process_partial::<&[f32]>(None, None)
            .map_err(|e| fail(e.to_string()))?;
        if out[0].is_empty() {
            break;
        }
        output.extend_from_slice(&out[0]);
    }

    let end = wanted.min(output.len());
    let start = delay.min(end);
    Ok(output[start..end].to_vec())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, rate: u32, len: usize, amplitude: f32) -> Vec<f32> {
        (0..len)
            .map(|i| amplitude * (2.0 * std::f32::consts::PI * freq * i as f32 / rate as f32).sin())
            .collect()
    }

    fn rms(samples: &[f32]) -> f32 {
        (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
    }

    // ---- stereo_to_mono ----------------------------------------------------

    #[test]
    fn stereo_to_mono_already_mono() {
        let input = vec![0.1_f32, 0.2, 0.3];
        let out = stereo_to_mono(&input, 1);
        assert_eq!(out, input);
    }

    #[test]
    fn stereo_to_mono_two_channel() {
        let input = vec![1.0_f32, -1.0, 0.5, 0.5];
        let out = stereo_to_mono(&input, 2);
        assert_eq!(out.len(), 2);
        assert!((out[0] - 0.0).abs() < 1e-6); // (1.0 + -1.0) / 2
        assert!((out[1] - 0.5).abs() < 1e-6); // (0.5 + 0.5) / 2
    }

    #[test]
    fn stereo_to_mono_four_channel() {
        let input = vec![0.4_f32; 4];
        let out = stereo_to_mono(&input, 4);
        assert_eq!(out.len(), 1);
        assert!((out[0] - 0.4).abs() < 1e-6);
    }

    #[test]
    fn stereo_to_mono_zero_channels() {
        let out = stereo_to_mono(&[1.0_f32, 2.0], 0);
        assert!(out.is_empty());
    }

    // ---- resample ----------------------------------------------------------

    #[test]
    fn same_rate_is_noop() {
        let input: Vec<f32> = (0..160).map(|i| i as f32 / 160.0).collect();
        let out = resample(&input, 16_000, 16_000).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn empty_input() {
        let out = resample(&[], 48_000, 16_000).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn zero_source_rate_is_an_error() {
        let err = resample(&[0.1; 10], 0, 16_000).unwrap_err();
        assert!(matches!(err, AudioError::Resample { from_rate: 0, .. }));
    }

    #[test]
    fn downsample_48k_output_length() {
        let input = vec![0.0_f32; 48_000];
        let out = resample(&input, 48_000, 16_000).unwrap();
        assert_eq!(out.len(), 16_000);
    }

    #[test]
    fn downsample_44100_output_length() {
        let input = vec![0.0_f32; 44_100];
        let out = resample(&input, 44_100, 16_000).unwrap();
        assert_eq!(out.len(), 16_000);
    }

    #[test]
    fn upsample_8k_output_length() {
        let input = vec![0.0_f32; 800];
        let out = resample(&input, 8_000, 16_000).unwrap();
        assert_eq!(out.len(), 1_600);
    }

    #[test]
    fn very_short_clip_still_resamples() {
        let out = resample(&[0.0_f32; 3], 48_000, 16_000).unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn silence_stays_silent() {
        let out = resample(&vec![0.0_f32; 22_050], 22_050, 16_000).unwrap();
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn dc_level_is_preserved_away_from_edges() {
        let input = vec![0.5_f32; 48_000];
        let out = resample(&input, 48_000, 16_000).unwrap();
        for &s in &out[1_000..15_000] {
            assert!((s - 0.5).abs() < 0.01, "amplitude drift: {s}");
        }
    }

    #[test]
    fn passband_tone_survives() {
        // 1 kHz is well below the 8 kHz Nyquist of the target rate.
        let input = sine(1_000.0, 48_000, 48_000, 0.5);
        let out = resample(&input, 48_000, 16_000).unwrap();
        let level = rms(&out[1_000..15_000]);
        assert!((level - 0.5 / 2f32.sqrt()).abs() < 0.02, "rms = {level}");
    }

    #[test]
    fn tone_above_target_nyquist_does_not_alias() {
        // 12 kHz would fold to 4 kHz with a naive interpolator.
        let input = sine(12_000.0, 48_000, 48_000, 0.5);
        let out = resample(&input, 48_000, 16_000).unwrap();
        let level = rms(&out[1_000..15_000]);
        assert!(level < 0.01, "aliased energy leaked through: rms = {level}");
    }
}
