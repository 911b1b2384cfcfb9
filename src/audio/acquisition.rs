use std::path::Path;

use tracing::debug;

use crate::audio::{decoder, resample};
use crate::pronunciation::{PronunciationError, Result};
use crate::types::{SampleBuffer, TARGET_SAMPLE_RATE};

/// Turn a recorded capture into the canonical 16 kHz mono buffer.
///
/// The container's own sample rate wins; `declared_rate` is only consulted
/// when the container does not carry one.
pub fn acquire(
    bytes: &[u8],
    extension: Option<&str>,
    declared_rate: Option<u32>,
) -> Result<SampleBuffer> {
    into_target_rate(decoder::decode_bytes(bytes, extension)?, declared_rate)
}

/// Same as [`acquire`], reading the capture from disk.
pub fn acquire_file<P: AsRef<Path>>(path: P, declared_rate: Option<u32>) -> Result<SampleBuffer> {
    into_target_rate(decoder::decode_file(path)?, declared_rate)
}

fn into_target_rate(
    decoded: decoder::DecodedCapture,
    declared_rate: Option<u32>,
) -> Result<SampleBuffer> {
    let source_rate = match decoded.sample_rate.or(declared_rate) {
        Some(rate) if rate > 0 => rate,
        _ => {
            return Err(PronunciationError::InvalidInput(
                "capture has no usable sample rate; declare one explicitly".into(),
            ))
        }
    };
    normalise(decoded.samples, source_rate)
}

/// Remap already-decoded mono samples to [`TARGET_SAMPLE_RATE`].
pub fn normalise(samples: Vec<f32>, source_rate: u32) -> Result<SampleBuffer> {
    if source_rate == TARGET_SAMPLE_RATE {
        return Ok(SampleBuffer::mono(samples, TARGET_SAMPLE_RATE));
    }
    let remapped = resample::remap_sample_rate(&samples, source_rate, TARGET_SAMPLE_RATE)
        .map_err(|err| PronunciationError::InvalidInput(err.to_string()))?;
    debug!(
        source_rate,
        source_len = samples.len(),
        target_len = remapped.len(),
        "remapped capture to target rate"
    );
    Ok(SampleBuffer::mono(remapped, TARGET_SAMPLE_RATE))
}
