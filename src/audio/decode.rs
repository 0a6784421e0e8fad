//! Container decoding via symphonia.
//!
//! The uploaded bytes are probed (with the validated extension as a hint),
//! every packet of the first audio track is decoded, and the result is
//! returned as **interleaved** `f32` samples plus the native rate and channel
//! count. Channel collapse and resampling happen later in
//! [`AudioNormalizer`](super::AudioNormalizer).

use std::io::Cursor;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::{AudioError, AudioFormat};

// ---------------------------------------------------------------------------
// DecodedAudio
// ---------------------------------------------------------------------------

/// Raw decoder output, before channel collapse and resampling.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    /// Interleaved samples in `[-1.0, 1.0]`.
    pub samples: Vec<f32>,
    /// Native sample rate in Hz.
    pub sample_rate: u32,
    /// Number of interleaved channels.
    pub channels: u16,
}

impl DecodedAudio {
    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        match self.channels {
            0 => 0,
            n => self.samples.len() / n as usize,
        }
    }
}

// ---------------------------------------------------------------------------
// decode
// ---------------------------------------------------------------------------

/// Decode an in-memory container.
///
/// # Errors
///
/// - [`AudioError::EmptyAudio`]: `bytes` is empty.
/// - [`AudioError::Decode`]: the probe does not recognize the container, the
///   stream has no audio track, or a packet fails to decode.
pub fn decode(bytes: &[u8], format: AudioFormat) -> Result<DecodedAudio, AudioError> {
    if bytes.is_empty() {
        return Err(AudioError::EmptyAudio);
    }

    let source = Cursor::new(bytes.to_vec());
    let mss = MediaSourceStream::new(Box::new(source), Default::default());

    let mut hint = Hint::new();
    hint.with_extension(format.extension());

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| AudioError::Decode(format!("unrecognized {} container: {e}", format.extension())))?;

    let mut reader = probed.format;

    let track = reader
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AudioError::Decode("no audio track found".into()))?;

    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate;
    let mut channels = track.codec_params.channels.map(|c| c.count());

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| AudioError::Decode(format!("unsupported codec: {e}")))?;

    let mut samples: Vec<f32> = Vec::new();

    loop {
        let packet = match reader.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(AudioError::Decode(format!("reading packet: {e}"))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder
            .decode(&packet)
            .map_err(|e| AudioError::Decode(format!("decoding packet: {e}")))?;

        let spec = *decoded.spec();
        sample_rate = Some(spec.rate);
        channels = Some(spec.channels.count());

        let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        buf.copy_interleaved_ref(decoded);
        samples.extend_from_slice(buf.samples());
    }

    if samples.is_empty() {
        return Err(AudioError::EmptyAudio);
    }

    let sample_rate =
        sample_rate.ok_or_else(|| AudioError::Decode("stream does not declare a sample rate".into()))?;
    let channels = channels
        .and_then(|c| u16::try_from(c).ok())
        .filter(|&c| c > 0)
        .ok_or_else(|| AudioError::Decode("stream does not declare its channels".into()))?;

    log::debug!(
        "decode: {} samples, {sample_rate} Hz, {channels} ch",
        samples.len()
    );

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::fixtures::wav_bytes;

    #[test]
    fn decodes_mono_wav() {
        let bytes = wav_bytes(&[0, 16_384, -16_384, 0], 1, 16_000);
        let decoded = decode(&bytes, AudioFormat::Wav).unwrap();
        assert_eq!(decoded.sample_rate, 16_000);
        assert_eq!(decoded.channels, 1);
        assert_eq!(decoded.samples.len(), 4);
        assert!((decoded.samples[1] - 0.5).abs() < 1e-4);
        assert!((decoded.samples[2] + 0.5).abs() < 1e-4);
    }

    #[test]
    fn decodes_stereo_wav_interleaved() {
        // L R L R
        let bytes = wav_bytes(&[16_384, 0, 16_384, 0], 2, 44_100);
        let decoded = decode(&bytes, AudioFormat::Wav).unwrap();
        assert_eq!(decoded.channels, 2);
        assert_eq!(decoded.sample_rate, 44_100);
        assert_eq!(decoded.frames(), 2);
        assert!((decoded.samples[0] - 0.5).abs() < 1e-4);
        assert_eq!(decoded.samples[1], 0.0);
    }

    #[test]
    fn empty_bytes_are_empty_audio() {
        assert_eq!(decode(&[], AudioFormat::Wav), Err(AudioError::EmptyAudio));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = decode(b"definitely not a riff header", AudioFormat::Wav).unwrap_err();
        assert!(matches!(err, AudioError::Decode(_)), "got {err:?}");
    }

    #[test]
    fn wav_bytes_labelled_flac_still_probe_by_content() {
        // The hint is only a hint; symphonia probes the actual header.
        let bytes = wav_bytes(&[0; 32], 1, 16_000);
        let decoded = decode(&bytes, AudioFormat::Flac).unwrap();
        assert_eq!(decoded.samples.len(), 32);
    }

    #[test]
    fn frames_with_zero_channels_is_zero() {
        let d = DecodedAudio {
            samples: vec![0.0; 4],
            sample_rate: 16_000,
            channels: 0,
        };
        assert_eq!(d.frames(), 0);
    }
}
