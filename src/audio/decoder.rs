use std::fs;
use std::io::Cursor;
use std::path::Path;

use symphonia::core::audio::{AudioBufferRef, SampleBuffer as InterleavedBuffer};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

use crate::pronunciation::{PronunciationError, Result};

/// Decoded capture before sample-rate normalisation.
#[derive(Debug, Clone)]
pub struct DecodedCapture {
    /// Mono samples in [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Rate declared by the container, if any
    pub sample_rate: Option<u32>,
    /// Channel count of the source before downmixing
    pub source_channels: u16,
}

/// Decode an in-memory audio capture to mono f32.
///
/// Covers the codecs symphonia ships: PCM WAV, FLAC, MP3, AAC and Vorbis (in
/// Ogg or WebM/Matroska). Opus is not among them, so Opus captures fail with
/// [`PronunciationError::Decode`].
///
/// `extension` is an optional format hint such as `"wav"` or `"webm"`.
pub fn decode_bytes(bytes: &[u8], extension: Option<&str>) -> Result<DecodedCapture> {
    if bytes.is_empty() {
        return Err(PronunciationError::Decode("audio payload is empty".into()));
    }

    let source = Cursor::new(bytes.to_vec());
    let mss = MediaSourceStream::new(Box::new(source), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = extension {
        hint.with_extension(extension);
    }

    let probe_result = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|err| decode_error("failed to probe audio format", err))?;

    let mut format = probe_result.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| PronunciationError::Decode("no audio tracks found".into()))?;

    let track_id = track.id;
    let sample_rate = track.codec_params.sample_rate;
    let declared_channels = track
        .codec_params
        .channels
        .map(|channels| channels.count() as u16);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|err| decode_error("failed to create decoder", err))?;

    let mut samples = Vec::new();
    let mut source_channels = declared_channels.unwrap_or(1);

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(err))
                if err.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(err) => return Err(decode_error("failed to read packet", err)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(reason)) => {
                warn!(reason, "skipping corrupt audio packet");
                continue;
            }
            Err(err) => return Err(decode_error("failed to decode audio packet", err)),
        };

        source_channels = decoded.spec().channels.count() as u16;
        downmix_into(decoded, &mut samples);
    }

    debug!(
        samples = samples.len(),
        sample_rate = ?sample_rate,
        source_channels,
        "decoded capture"
    );

    Ok(DecodedCapture {
        samples,
        sample_rate,
        source_channels,
    })
}

/// Decode a capture stored on disk, using its extension as the format hint.
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<DecodedCapture> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|err| {
        PronunciationError::Decode(format!("failed to read {}: {err}", path.display()))
    })?;
    decode_bytes(&bytes, path.extension().and_then(|ext| ext.to_str()))
}

fn decode_error(context: &str, err: SymphoniaError) -> PronunciationError {
    PronunciationError::Decode(format!("{context}: {err}"))
}

/// Average every frame of `buffer` across channels and append it to `out`.
fn downmix_into(buffer: AudioBufferRef, out: &mut Vec<f32>) {
    let spec = *buffer.spec();
    let channels = spec.channels.count().max(1);
    let frames = buffer.frames();
    if frames == 0 {
        return;
    }

    let mut interleaved = InterleavedBuffer::<f32>::new(frames as u64, spec);
    interleaved.copy_interleaved_ref(buffer);

    out.reserve(frames);
    out.extend(
        interleaved
            .samples()
            .chunks_exact(channels)
            .map(|frame| (frame.iter().sum::<f32>() / channels as f32).clamp(-1.0, 1.0)),
    );
}
