//! Reference ranges, weights and grade boundaries used by the scorer.

use serde::{Deserialize, Serialize};

use super::{PronunciationError, Result};

/// Acceptable envelope of one acoustic feature for native-like speech.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRange {
    pub min: f32,
    pub max: f32,
    pub ideal: f32,
}

impl ReferenceRange {
    pub const fn new(min: f32, max: f32, ideal: f32) -> Self {
        Self { min, max, ideal }
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Distance from the ideal relative to the ideal.
    pub fn relative_deviation(&self, value: f32) -> f32 {
        if self.ideal <= 0.0 {
            return 0.0;
        }
        (value - self.ideal).abs() / self.ideal
    }

    fn validate(&self, name: &str) -> Result<()> {
        check(
            [self.min, self.max, self.ideal].iter().all(|v| v.is_finite()),
            format!("{name} range must be finite"),
        )?;
        check(
            self.ideal > 0.0,
            format!("{name} ideal must be positive, got {}", self.ideal),
        )?;
        check(
            self.min <= self.ideal && self.ideal <= self.max,
            format!(
                "{name} range requires min <= ideal <= max, got {} / {} / {}",
                self.min, self.ideal, self.max
            ),
        )
    }
}

/// Contribution of each acoustic sub-score to the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureWeights {
    pub pitch: f32,
    pub volume: f32,
    pub stability: f32,
    pub spectral: f32,
}

impl Default for FeatureWeights {
    fn default() -> Self {
        STANDARD_PROFILE.weights
    }
}

impl FeatureWeights {
    fn total(&self) -> f32 {
        self.pitch + self.volume + self.stability + self.spectral
    }
}

/// Lowest overall score that still earns each grade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradeThresholds {
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
}

impl Default for GradeThresholds {
    fn default() -> Self {
        STANDARD_PROFILE.grades
    }
}

/// Bounds outside of which a capture is treated as containing no speech.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechGate {
    /// RMS below this is silence regardless of the other features.
    pub silence_rms: f32,
    pub min_volume: f32,
    pub max_volume: f32,
    pub min_pitch_hz: f32,
    pub max_pitch_hz: f32,
    pub min_stability: f32,
}

impl Default for SpeechGate {
    fn default() -> Self {
        STANDARD_PROFILE.speech_gate
    }
}

/// Complete scoring configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringProfile {
    pub pitch: ReferenceRange,
    pub volume: ReferenceRange,
    pub stability: ReferenceRange,
    /// Spectral centroid in Hz
    pub centroid: ReferenceRange,
    /// Dominant frequency in Hz
    pub dominant: ReferenceRange,
    pub weights: FeatureWeights,
    /// Share of the content accuracy in the overall score when one is supplied.
    pub content_weight: f32,
    pub grades: GradeThresholds,
    pub speech_gate: SpeechGate,
}

/// Built-in table shared by every evaluator that is not given a custom profile.
pub const STANDARD_PROFILE: ScoringProfile = ScoringProfile {
    pitch: ReferenceRange::new(80.0, 300.0, 150.0),
    volume: ReferenceRange::new(0.01, 0.5, 0.1),
    stability: ReferenceRange::new(0.6, 1.0, 0.8),
    centroid: ReferenceRange::new(250.0, 3000.0, 1000.0),
    dominant: ReferenceRange::new(80.0, 1000.0, 200.0),
    weights: FeatureWeights {
        pitch: 0.3,
        volume: 0.2,
        stability: 0.3,
        spectral: 0.2,
    },
    content_weight: 0.7,
    grades: GradeThresholds {
        a: 80,
        b: 70,
        c: 60,
        d: 40,
    },
    speech_gate: SpeechGate {
        silence_rms: 1e-4,
        min_volume: 0.002,
        max_volume: 1.0,
        min_pitch_hz: 50.0,
        max_pitch_hz: 500.0,
        min_stability: 0.3,
    },
};

impl Default for ScoringProfile {
    fn default() -> Self {
        STANDARD_PROFILE
    }
}

impl ScoringProfile {
    pub const fn standard() -> Self {
        STANDARD_PROFILE
    }

    pub fn validate(&self) -> Result<()> {
        self.pitch.validate("pitch")?;
        self.volume.validate("volume")?;
        self.stability.validate("stability")?;
        self.centroid.validate("centroid")?;
        self.dominant.validate("dominant")?;

        let weights = [
            self.weights.pitch,
            self.weights.volume,
            self.weights.stability,
            self.weights.spectral,
        ];
        check(
            weights.iter().all(|w| w.is_finite() && *w >= 0.0),
            "feature weights must be non-negative",
        )?;
        check(
            (self.weights.total() - 1.0).abs() <= 1e-3,
            format!(
                "feature weights must sum to 1, got {:.3}",
                self.weights.total()
            ),
        )?;
        check(
            (0.0..=1.0).contains(&self.content_weight),
            format!(
                "content weight must lie in [0, 1], got {}",
                self.content_weight
            ),
        )?;

        let g = self.grades;
        check(
            g.a <= 100 && g.a > g.b && g.b > g.c && g.c > g.d && g.d > 0,
            format!(
                "grade thresholds must strictly descend within (0, 100], got A{} B{} C{} D{}",
                g.a, g.b, g.c, g.d
            ),
        )?;

        let gate = self.speech_gate;
        check(
            gate.silence_rms >= 0.0 && gate.min_volume <= gate.max_volume,
            "speech gate volume bounds are inverted",
        )?;
        check(
            gate.min_pitch_hz <= gate.max_pitch_hz,
            "speech gate pitch bounds are inverted",
        )
    }
}

fn check(condition: bool, message: impl Into<String>) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(PronunciationError::Config(message.into()))
    }
}
