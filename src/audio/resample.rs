use anyhow::{ensure, Result};

/// Remap `samples` from `source_rate` to `target_rate` by nearest source index.
///
/// No anti-aliasing filter is applied; the output is `round(len * target / source)`
/// samples long and indices past the end of the input read as silence.
pub fn remap_sample_rate(samples: &[f32], source_rate: u32, target_rate: u32) -> Result<Vec<f32>> {
    ensure!(source_rate > 0, "source sample rate must be positive");
    ensure!(target_rate > 0, "target sample rate must be positive");
    if samples.is_empty() || source_rate == target_rate {
        return Ok(samples.to_vec());
    }
    let ratio = source_rate as f64 / target_rate as f64;
    let output_len = (samples.len() as f64 / ratio).round() as usize;
    let output = (0..output_len)
        .map(|i| {
            let source_index = (i as f64 * ratio).round() as usize;
            samples.get(source_index).copied().unwrap_or(0.0)
        })
        .collect();
    Ok(output)
}
