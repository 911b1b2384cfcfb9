use std::f64::consts::PI;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use serde::{Deserialize, Serialize};

/// Transform length; the input is truncated or zero-padded to this many samples.
pub const SPECTRUM_WINDOW: usize = 2048;
/// Magnitude bins kept (non-negative frequencies below Nyquist).
pub const SPECTRUM_BINS: usize = SPECTRUM_WINDOW / 2;

/// How the magnitude spectrum is computed. Both produce the same bins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpectrumMethod {
    /// Direct O(N²) discrete Fourier transform.
    Direct,
    #[default]
    Fast,
}

/// Magnitude of the first [`SPECTRUM_BINS`] DFT bins over the leading window.
pub fn magnitude_spectrum(samples: &[f32], method: SpectrumMethod) -> Vec<f32> {
    let frame = &samples[..samples.len().min(SPECTRUM_WINDOW)];
    match method {
        SpectrumMethod::Direct => direct_dft(frame),
        SpectrumMethod::Fast => fast_dft(frame),
    }
}

fn direct_dft(frame: &[f32]) -> Vec<f32> {
    // k * n wraps modulo the window, so one table of twiddles covers every term.
    let twiddles: Vec<(f64, f64)> = (0..SPECTRUM_WINDOW)
        .map(|i| {
            let angle = -2.0 * PI * i as f64 / SPECTRUM_WINDOW as f64;
            (angle.cos(), angle.sin())
        })
        .collect();

    (0..SPECTRUM_BINS)
        .map(|k| {
            let (mut real, mut imag) = (0.0_f64, 0.0_f64);
            for (n, &sample) in frame.iter().enumerate() {
                let (cos, sin) = twiddles[(k * n) % SPECTRUM_WINDOW];
                real += sample as f64 * cos;
                imag += sample as f64 * sin;
            }
            (real * real + imag * imag).sqrt() as f32
        })
        .collect()
}

fn fast_dft(frame: &[f32]) -> Vec<f32> {
    let mut buffer: Vec<Complex<f64>> = frame
        .iter()
        .map(|&s| Complex::new(s as f64, 0.0))
        .chain(std::iter::repeat(Complex::new(0.0, 0.0)))
        .take(SPECTRUM_WINDOW)
        .collect();
    let fft = FftPlanner::<f64>::new().plan_fft_forward(SPECTRUM_WINDOW);
    fft.process(&mut buffer);
    buffer
        .iter()
        .take(SPECTRUM_BINS)
        .map(|bin| bin.norm() as f32)
        .collect()
}

/// Index of the strongest bin above DC; 0 when every such bin is empty.
pub fn dominant_bin(spectrum: &[f32]) -> usize {
    let mut best = 0;
    let mut best_magnitude = 0.0;
    for (index, &magnitude) in spectrum.iter().enumerate().skip(1) {
        if magnitude > best_magnitude {
            best_magnitude = magnitude;
            best = index;
        }
    }
    best
}

/// Magnitude-weighted mean bin index; 0 when the spectrum carries no energy.
pub fn spectral_centroid(spectrum: &[f32]) -> f32 {
    let (weighted, total) = spectrum
        .iter()
        .enumerate()
        .fold((0.0_f64, 0.0_f64), |(weighted, total), (i, &m)| {
            (weighted + i as f64 * m as f64, total + m as f64)
        });
    if total > 0.0 {
        (weighted / total) as f32
    } else {
        0.0
    }
}

pub fn bin_to_hz(bin: f32, sample_rate: u32) -> f32 {
    bin * sample_rate as f32 / SPECTRUM_WINDOW as f32
}
