//! In-memory WAV fixtures for tests.

use std::io::Cursor;

/// Encode interleaved 16-bit PCM samples as a WAV file in memory.
pub(crate) fn wav_bytes(samples: &[i16], channels: u16, sample_rate: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).expect("wav writer");
        for &s in samples {
            writer.write_sample(s).expect("write sample");
        }
        writer.finalize().expect("finalize wav");
    }
    cursor.into_inner()
}

/// One mono clip at a constant amplitude (`level` in `[-1.0, 1.0]`).
pub(crate) fn constant_wav(level: f32, frames: usize, sample_rate: u32) -> Vec<u8> {
    let value = (level * i16::MAX as f32).round() as i16;
    wav_bytes(&vec![value; frames], 1, sample_rate)
}
