use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use hound::{SampleFormat, WavSpec, WavWriter};

use crate::types::SampleBuffer;

/// Encode a buffer as 16-bit PCM mono WAV in memory.
pub fn encode_wav(buffer: &SampleBuffer) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::with_capacity(44 + buffer.len() * 2));
    {
        let mut writer = WavWriter::new(&mut cursor, wav_spec(buffer))
            .context("Failed to start in-memory WAV stream")?;
        write_samples(&mut writer, buffer)?;
        writer.finalize().context("Failed to finalize WAV stream")?;
    }
    Ok(cursor.into_inner())
}

/// Encode a buffer to a WAV file at `path`.
pub fn write_wav<P: AsRef<Path>>(buffer: &SampleBuffer, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut writer = WavWriter::create(path, wav_spec(buffer))
        .with_context(|| format!("Failed to create WAV file: {}", path.display()))?;
    write_samples(&mut writer, buffer)?;
    writer.finalize().context("Failed to finalize WAV file")?;
    Ok(())
}

fn wav_spec(buffer: &SampleBuffer) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate: buffer.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

fn write_samples<W>(writer: &mut WavWriter<W>, buffer: &SampleBuffer) -> Result<()>
where
    W: std::io::Write + std::io::Seek,
{
    for &sample in &buffer.samples {
        writer
            .write_sample(to_pcm16(sample))
            .context("Failed to write audio sample")?;
    }
    Ok(())
}

/// Negative samples scale by 32768 and positive ones by 32767 so both rails are reachable.
fn to_pcm16(sample: f32) -> i16 {
    let clamped = sample.clamp(-1.0, 1.0);
    if clamped < 0.0 {
        (clamped * 32_768.0) as i16
    } else {
        (clamped * 32_767.0) as i16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pcm16_reaches_both_rails() {
        assert_eq!(to_pcm16(1.0), i16::MAX);
        assert_eq!(to_pcm16(-1.0), i16::MIN);
        assert_eq!(to_pcm16(2.5), i16::MAX);
        assert_eq!(to_pcm16(0.0), 0);
    }

    #[test]
    fn in_memory_wav_has_header_and_payload() {
        let buffer = SampleBuffer::mono(vec![0.25; 100], 16_000);
        let bytes = encode_wav(&buffer).unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(bytes.len(), 44 + 200);
    }

    #[test]
    fn wav_file_round_trips_through_hound() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.wav");
        let buffer = SampleBuffer::mono(vec![0.5, -0.5, 0.0], 16_000);
        write_wav(&buffer, &path).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, 16_000);
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![16_383, -16_384, 0]);
    }
}
