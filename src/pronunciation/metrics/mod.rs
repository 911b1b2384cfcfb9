use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::pronunciation::features::AcousticFeatures;
use crate::pronunciation::profile::{GradeThresholds, ReferenceRange, ScoringProfile, SpeechGate};

const OUTSIDE_BASE: f32 = 60.0;
const OUTSIDE_PENALTY: f32 = 40.0;
const INSIDE_FLOOR: f32 = 70.0;
const INSIDE_PENALTY: f32 = 30.0;

/// Letter grade, ordered so that a better grade compares greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Grade {
    F,
    D,
    C,
    B,
    A,
}

impl Grade {
    pub const fn worst() -> Self {
        Grade::F
    }

    pub fn description(&self) -> &'static str {
        match self {
            Grade::A => "Excellent - native-like pronunciation",
            Grade::B => "Good - natural pronunciation",
            Grade::C => "Fair - understandable pronunciation",
            Grade::D => "Needs work - keep practicing",
            Grade::F => "Insufficient - significant improvement needed",
        }
    }
}

impl Display for Grade {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        f.write_str(letter)
    }
}

impl GradeThresholds {
    pub fn grade_for(&self, score: u8) -> Grade {
        match score {
            s if s >= self.a => Grade::A,
            s if s >= self.b => Grade::B,
            s if s >= self.c => Grade::C,
            s if s >= self.d => Grade::D,
            _ => Grade::F,
        }
    }
}

/// Sub-scores and verdict for one capture. All scores lie in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scorecard {
    pub pitch: u8,
    pub volume: u8,
    pub stability: u8,
    pub spectral: u8,
    pub content: Option<u8>,
    pub overall: u8,
    pub grade: Grade,
    pub native_level: u8,
    /// False when the silence short-circuit fired.
    pub speech_detected: bool,
}

impl Scorecard {
    fn no_speech() -> Self {
        Self {
            pitch: 0,
            volume: 0,
            stability: 0,
            spectral: 0,
            content: None,
            overall: 0,
            grade: Grade::worst(),
            native_level: 1,
            speech_detected: false,
        }
    }
}

/// Maps acoustic features onto sub-scores, an overall score and a grade.
#[derive(Debug, Clone)]
pub struct MetricCalculator {
    profile: ScoringProfile,
}

impl Default for MetricCalculator {
    fn default() -> Self {
        Self::new(ScoringProfile::standard())
    }
}

impl MetricCalculator {
    pub fn new(profile: ScoringProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &ScoringProfile {
        &self.profile
    }

    /// Score `features`, blending in `content_accuracy` (0-100) when present.
    pub fn score(&self, features: &AcousticFeatures, content_accuracy: Option<f32>) -> Scorecard {
        if !detects_speech(features, &self.profile.speech_gate) {
            return Scorecard::no_speech();
        }

        let profile = &self.profile;
        let pitch = score_feature(features.pitch_hz, &profile.pitch);
        let volume = score_feature(features.volume_rms, &profile.volume);
        let stability = (features.stability * 100.0).clamp(0.0, 100.0);
        let spectral = spectral_score(features, profile);

        let weights = profile.weights;
        let acoustic = weights.pitch * pitch
            + weights.volume * volume
            + weights.stability * stability
            + weights.spectral * spectral;

        let content = content_accuracy.map(|value| value.clamp(0.0, 100.0));
        let blended = match content {
            Some(content) => {
                profile.content_weight * content + (1.0 - profile.content_weight) * acoustic
            }
            None => acoustic,
        };

        let overall = to_score(blended);
        Scorecard {
            pitch: to_score(pitch),
            volume: to_score(volume),
            stability: to_score(stability),
            spectral: to_score(spectral),
            content: content.map(to_score),
            overall,
            grade: profile.grades.grade_for(overall),
            native_level: native_level(overall),
            speech_detected: true,
        }
    }
}

/// Score a feature against its reference range.
///
/// Inside the range the score degrades gently from 100 and never drops below
/// 70; outside it starts at 60 and falls steeply towards 0.
pub fn score_feature(value: f32, range: &ReferenceRange) -> f32 {
    let deviation = range.relative_deviation(value);
    let score = if range.contains(value) {
        (100.0 - deviation * INSIDE_PENALTY).max(INSIDE_FLOOR)
    } else {
        (OUTSIDE_BASE - deviation * OUTSIDE_PENALTY).max(0.0)
    };
    if score.is_finite() {
        score.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

fn spectral_score(features: &AcousticFeatures, profile: &ScoringProfile) -> f32 {
    let centroid = score_feature(features.spectral_centroid_hz(), &profile.centroid);
    let dominant = score_feature(features.dominant_frequency_hz(), &profile.dominant);
    (centroid + dominant) / 2.0
}

/// False when the capture is silent or implausible as speech on every axis.
pub fn detects_speech(features: &AcousticFeatures, gate: &SpeechGate) -> bool {
    if features.volume_rms < gate.silence_rms {
        return false;
    }
    let volume_implausible =
        features.volume_rms < gate.min_volume || features.volume_rms > gate.max_volume;
    let pitch_implausible =
        features.pitch_hz < gate.min_pitch_hz || features.pitch_hz > gate.max_pitch_hz;
    let stability_implausible = features.stability < gate.min_stability;
    !(volume_implausible && pitch_implausible && stability_implausible)
}

fn native_level(overall: u8) -> u8 {
    ((overall as f32 / 10.0).round() as u8).clamp(1, 10)
}

fn to_score(value: f32) -> u8 {
    if value.is_finite() {
        value.round().clamp(0.0, 100.0) as u8
    } else {
        0
    }
}
