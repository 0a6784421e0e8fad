//! Upload container formats accepted by the normalizer.
//!
//! Only the file name is inspected here; the bytes are never touched, so an
//! unsupported upload is rejected before any decode work happens.

use std::path::Path;

use super::AudioError;

// ---------------------------------------------------------------------------
// AudioFormat
// ---------------------------------------------------------------------------

/// A container format the pipeline is willing to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    /// RIFF/WAVE (`.wav`).
    Wav,
    /// Free Lossless Audio Codec (`.flac`).
    Flac,
}

impl AudioFormat {
    /// Every accepted format, in the order they are listed to users.
    pub const ALL: [AudioFormat; 2] = [AudioFormat::Wav, AudioFormat::Flac];

    /// Resolve the format from an uploaded file name.
    ///
    /// The extension comparison is case-insensitive (`CLIP.WAV` is accepted).
    ///
    /// ```rust
    /// use spoofcheck::audio::{AudioError, AudioFormat};
    ///
    /// assert_eq!(AudioFormat::from_filename("take1.flac"), Ok(AudioFormat::Flac));
    /// assert!(matches!(
    ///     AudioFormat::from_filename("clip.mp3"),
    ///     Err(AudioError::UnsupportedFormat { .. })
    /// ));
    /// ```
    pub fn from_filename(filename: &str) -> Result<Self, AudioError> {
        // Suffix match, so a bare ".wav" name is accepted too.
        let lower = filename.to_ascii_lowercase();
        if let Some(format) = Self::ALL.into_iter().find(|f| {
            lower
                .strip_suffix(f.extension())
                .is_some_and(|stem| stem.ends_with('.'))
        }) {
            return Ok(format);
        }

        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        Err(AudioError::UnsupportedFormat {
            extension: extension.to_string(),
        })
    }

    /// Canonical lower-case extension without the dot; also used as the
    /// probe hint for the decoder.
    pub fn extension(self) -> &'static str {
        match self {
            AudioFormat::Wav => "wav",
            AudioFormat::Flac => "flac",
        }
    }
}
