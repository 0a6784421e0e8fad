//! Errors raised while turning an uploaded buffer into a [`Waveform`].
//!
//! [`Waveform`]: crate::audio::Waveform

use thiserror::Error;

// ---------------------------------------------------------------------------
// AudioError
// ---------------------------------------------------------------------------

/// Reason an uploaded clip could not be normalized.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AudioError {
    /// The file name does not end in one of the accepted extensions.
    ///
    /// Raised before any decode attempt.
    #[error("Invalid file format {extension:?}. Only .wav and .flac files are allowed.")]
    UnsupportedFormat { extension: String },

    /// The byte stream is not a recognized (or is a corrupt) audio container.
    #[error("failed to decode audio: {0}")]
    Decode(String),

    /// The buffer, or the decoded stream, contains no samples.
    #[error("audio contains no samples")]
    EmptyAudio,

    /// The band-limited resampler rejected its input or configuration.
    #[error("resampling {from_rate} Hz -> {to_rate} Hz failed: {reason}")]
    Resample {
        from_rate: u32,
        to_rate: u32,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_format_message_names_allowed_extensions() {
        let e = AudioError::UnsupportedFormat {
            extension: "mp3".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("mp3"));
        assert!(msg.contains(".wav") && msg.contains(".flac"));
    }

    #[test]
    fn resample_message_includes_rates() {
        let e = AudioError::Resample {
            from_rate: 44_100,
            to_rate: 16_000,
            reason: "boom".into(),
        };
        assert!(e.to_string().contains("44100 Hz -> 16000 Hz"));
    }
}
