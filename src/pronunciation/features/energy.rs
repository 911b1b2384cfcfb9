/// Root-mean-square level; 0 for an empty slice.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f64 = samples.iter().map(|&s| s as f64 * s as f64).sum();
    (sum / samples.len() as f64).sqrt() as f32
}

/// Consistency of loudness across consecutive windows, in [0, 1].
///
/// Trailing samples that do not fill a whole window are ignored. Fewer than
/// two windows cannot show variability and report 1.0.
pub fn stability(samples: &[f32], window: usize) -> f32 {
    if window == 0 {
        return 1.0;
    }
    let levels: Vec<f64> = samples
        .chunks_exact(window)
        .map(|chunk| rms(chunk) as f64)
        .collect();
    if levels.len() < 2 {
        return 1.0;
    }

    let count = levels.len() as f64;
    let mean = levels.iter().sum::<f64>() / count;
    let variance = levels.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;
    let variation = if mean > 0.0 {
        variance.sqrt() / mean
    } else {
        0.0
    };
    (1.0 - variation).clamp(0.0, 1.0) as f32
}
