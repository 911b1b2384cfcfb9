mod energy;
mod pitch;
mod spectrum;

pub use energy::{rms, stability};
pub use pitch::{estimate_pitch, PitchSearch};
pub use spectrum::{
    bin_to_hz, dominant_bin, magnitude_spectrum, spectral_centroid, SpectrumMethod,
    SPECTRUM_BINS, SPECTRUM_WINDOW,
};

use serde::Serialize;
use tracing::debug;

use crate::types::SampleBuffer;

/// Samples per window when measuring loudness stability.
pub const STABILITY_WINDOW: usize = 1024;

/// Acoustic description of one capture.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcousticFeatures {
    pub pitch_hz: f32,
    pub volume_rms: f32,
    /// Magnitude per frequency bin
    pub spectrum: Vec<f32>,
    pub dominant_frequency_bin: usize,
    pub spectral_centroid_bin: f32,
    /// Loudness consistency in [0, 1]
    pub stability: f32,
    pub sample_rate: u32,
}

impl AcousticFeatures {
    pub fn dominant_frequency_hz(&self) -> f32 {
        bin_to_hz(self.dominant_frequency_bin as f32, self.sample_rate)
    }

    pub fn spectral_centroid_hz(&self) -> f32 {
        bin_to_hz(self.spectral_centroid_bin, self.sample_rate)
    }
}

/// Responsible for computing acoustic features from a sample buffer.
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    pitch: PitchSearch,
    spectrum_method: SpectrumMethod,
}

impl FeatureExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pitch_search(mut self, search: PitchSearch) -> Self {
        self.pitch = search;
        self
    }

    pub fn with_spectrum_method(mut self, method: SpectrumMethod) -> Self {
        self.spectrum_method = method;
        self
    }

    pub fn extract(&self, buffer: &SampleBuffer) -> AcousticFeatures {
        let samples = buffer.samples.as_slice();

        let pitch_hz = finite_or_zero(estimate_pitch(samples, buffer.sample_rate, &self.pitch));
        let volume_rms = finite_or_zero(rms(samples));
        let spectrum: Vec<f32> = magnitude_spectrum(samples, self.spectrum_method)
            .into_iter()
            .map(finite_or_zero)
            .collect();
        let dominant_frequency_bin = dominant_bin(&spectrum);
        let spectral_centroid_bin = finite_or_zero(spectral_centroid(&spectrum));
        let stability =
            finite_or_zero(energy::stability(samples, STABILITY_WINDOW)).clamp(0.0, 1.0);

        debug!(
            samples = samples.len(),
            sample_rate = buffer.sample_rate,
            pitch_hz,
            volume_rms,
            dominant_frequency_bin,
            spectral_centroid_bin,
            stability,
            "extracted acoustic features"
        );

        AcousticFeatures {
            pitch_hz,
            volume_rms,
            spectrum,
            dominant_frequency_bin,
            spectral_centroid_bin,
            stability,
            sample_rate: buffer.sample_rate,
        }
    }
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
