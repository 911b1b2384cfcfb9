use serde::{Deserialize, Serialize};

/// Frequency band searched for the fundamental, plus the voicing gate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchSearch {
    pub min_hz: f32,
    pub max_hz: f32,
    /// Minimum peak autocorrelation relative to the zero-lag energy.
    pub voicing_threshold: f32,
}

impl Default for PitchSearch {
    fn default() -> Self {
        Self {
            min_hz: 50.0,
            max_hz: 500.0,
            voicing_threshold: 0.3,
        }
    }
}

impl PitchSearch {
    /// Inclusive lag range in samples, clipped so every lag leaves some overlap.
    fn period_range(&self, sample_rate: u32, len: usize) -> Option<(usize, usize)> {
        if sample_rate == 0 || len < 2 || self.min_hz <= 0.0 || self.max_hz <= 0.0 {
            return None;
        }
        let rate = sample_rate as f32;
        let shortest = ((rate / self.max_hz).floor() as usize).max(1);
        let longest = ((rate / self.min_hz).floor() as usize).min(len - 1);
        (shortest <= longest).then_some((shortest, longest))
    }
}

/// Estimate the fundamental frequency in Hz by unnormalised autocorrelation.
///
/// Only lags past the first non-positive autocorrelation are candidates, so the
/// large overlap of short lags cannot outvote the true period on brief buffers.
///
/// Returns 0 when the buffer is too short for any candidate lag, when no lag
/// correlates positively, or when the best lag falls below the voicing gate.
pub fn estimate_pitch(samples: &[f32], sample_rate: u32, search: &PitchSearch) -> f32 {
    let Some((shortest, longest)) = search.period_range(sample_rate, samples.len()) else {
        return 0.0;
    };
    let energy = autocorrelation(samples, 0);
    if energy <= 0.0 {
        return 0.0;
    }

    let mut past_first_dip = false;
    let mut best_period = 0;
    let mut best_correlation = 0.0;
    for period in 1..=longest {
        let correlation = autocorrelation(samples, period);
        if !past_first_dip {
            past_first_dip = correlation <= 0.0;
            if !past_first_dip {
                continue;
            }
        }
        if period >= shortest && correlation > best_correlation {
            best_correlation = correlation;
            best_period = period;
        }
    }

    if best_period == 0 || best_correlation / energy < search.voicing_threshold as f64 {
        return 0.0;
    }
    sample_rate as f32 / best_period as f32
}

fn autocorrelation(samples: &[f32], lag: usize) -> f64 {
    samples
        .iter()
        .zip(&samples[lag..])
        .map(|(&a, &b)| a as f64 * b as f64)
        .sum()
}
