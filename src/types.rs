//! Core types shared by the acquisition and evaluation stages

use serde::Serialize;

/// Sample rate every capture is remapped to before feature extraction.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Mono PCM capture ready for analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    /// Audio samples, normalized to [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Sample rate in Hz (e.g., 16000)
    pub sample_rate: u32,
    /// Channel count of `samples`; always 1 after acquisition
    pub channels: u16,
}

impl SampleBuffer {
    /// Wrap already-downmixed samples.
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
            channels: 1,
        }
    }

    /// Buffer of `duration_secs` zeros.
    pub fn silence(duration_secs: f64, sample_rate: u32) -> Self {
        let len = (duration_secs * sample_rate as f64).max(0.0) as usize;
        Self::mono(vec![0.0; len], sample_rate)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Summary of a capture used to warn about unusable recordings before scoring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CaptureQuality {
    /// Mean absolute amplitude
    pub volume: f32,
    pub duration_secs: f64,
    /// True when some sample exceeds the audible threshold and the clip is long enough
    pub has_audio: bool,
}

impl CaptureQuality {
    const AUDIBLE_THRESHOLD: f32 = 0.01;
    const MIN_DURATION_SECS: f64 = 0.5;

    pub fn assess(buffer: &SampleBuffer) -> Self {
        let duration_secs = buffer.duration_secs();
        if buffer.is_empty() {
            return Self {
                volume: 0.0,
                duration_secs,
                has_audio: false,
            };
        }
        let sum: f64 = buffer.samples.iter().map(|s| s.abs() as f64).sum();
        let audible = buffer
            .samples
            .iter()
            .any(|s| s.abs() > Self::AUDIBLE_THRESHOLD);
        Self {
            volume: (sum / buffer.samples.len() as f64) as f32,
            duration_secs,
            has_audio: audible && duration_secs > Self::MIN_DURATION_SECS,
        }
    }
}
