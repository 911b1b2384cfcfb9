use serde::Serialize;

use crate::pronunciation::features::AcousticFeatures;
use crate::pronunciation::metrics::Scorecard;
use crate::pronunciation::profile::{ReferenceRange, ScoringProfile};

const EXCELLENT_FROM: u8 = 90;
const GOOD_FROM: u8 = 80;
const ACCEPTABLE_FROM: u8 = 70;

const NO_SPEECH_IMPROVEMENT: &str =
    "No speech was detected: check that your microphone is on and speak clearly into it";
const KEEP_PRACTICING: &str = "Keep practicing regularly to polish your pronunciation further";
const GENERIC_POSITIVE: &str = "Great effort - every attempt builds your speaking confidence";

/// Overall-score bracket that selects the feedback text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackTier {
    Excellent,
    Good,
    Acceptable,
    NeedsImprovement,
    NoSpeech,
}

impl FeedbackTier {
    pub fn for_score(score: u8) -> Self {
        match score {
            s if s >= EXCELLENT_FROM => Self::Excellent,
            s if s >= GOOD_FROM => Self::Good,
            s if s >= ACCEPTABLE_FROM => Self::Acceptable,
            _ => Self::NeedsImprovement,
        }
    }
}

/// Human-readable commentary for one capture.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feedback {
    pub tier: FeedbackTier,
    pub text: String,
    /// Never empty.
    pub improvements: Vec<String>,
    /// Empty only when no speech was detected.
    pub positives: Vec<String>,
}

/// Rule-based feedback keyed off which features left their reference range.
#[derive(Debug, Clone)]
pub struct FeedbackGenerator {
    profile: ScoringProfile,
}

impl Default for FeedbackGenerator {
    fn default() -> Self {
        Self::new(ScoringProfile::standard())
    }
}

#[derive(Clone, Copy)]
enum Placement {
    Below,
    Within,
    Above,
}

fn place(value: f32, range: &ReferenceRange) -> Placement {
    if value < range.min {
        Placement::Below
    } else if value > range.max {
        Placement::Above
    } else {
        Placement::Within
    }
}

impl FeedbackGenerator {
    pub fn new(profile: ScoringProfile) -> Self {
        Self { profile }
    }

    pub fn generate(
        &self,
        features: &AcousticFeatures,
        scorecard: &Scorecard,
        target_text: Option<&str>,
    ) -> Feedback {
        if !scorecard.speech_detected {
            return Feedback {
                tier: FeedbackTier::NoSpeech,
                text: tier_text(FeedbackTier::NoSpeech, target_text),
                improvements: vec![NO_SPEECH_IMPROVEMENT.to_string()],
                positives: Vec::new(),
            };
        }

        let tier = FeedbackTier::for_score(scorecard.overall);
        let mut improvements = Vec::new();
        let mut positives = Vec::new();

        for check in self.checks(features) {
            match check.placement {
                Placement::Within => positives.push(check.positive.to_string()),
                Placement::Below => improvements.push(check.below.to_string()),
                Placement::Above => improvements.push(check.above.to_string()),
            }
        }

        if improvements.is_empty() {
            improvements.push(KEEP_PRACTICING.to_string());
        }
        if positives.is_empty() {
            positives.push(GENERIC_POSITIVE.to_string());
        }

        Feedback {
            tier,
            text: tier_text(tier, target_text),
            improvements,
            positives,
        }
    }

    fn checks(&self, features: &AcousticFeatures) -> [FeatureCheck; 4] {
        let profile = &self.profile;
        [
            FeatureCheck {
                placement: place(features.pitch_hz, &profile.pitch),
                below: "Pitch: raise your voice slightly towards a natural speaking pitch",
                above: "Pitch: relax your voice and speak at a lower, more natural pitch",
                positive: "Your pitch is within a natural speaking range",
            },
            FeatureCheck {
                placement: place(features.volume_rms, &profile.volume),
                below: "Volume: speak a little louder",
                above: "Volume: speak a little softer or move away from the microphone",
                positive: "You are speaking at a comfortable volume",
            },
            FeatureCheck {
                placement: place(features.stability, &profile.stability),
                below: "Stability: keep a steady pace and volume throughout the phrase",
                above: "Stability: vary your emphasis a little so the phrase sounds less monotonous",
                positive: "Your delivery is steady and confident",
            },
            FeatureCheck {
                placement: place(features.spectral_centroid_hz(), &profile.centroid),
                below: "Clarity: open your mouth more and articulate each sound crisply",
                above: "Clarity: soften harsh or hissing sounds and reduce background noise",
                positive: "Your speech sounds clear",
            },
        ]
    }
}

struct FeatureCheck {
    placement: Placement,
    below: &'static str,
    above: &'static str,
    positive: &'static str,
}

fn tier_text(tier: FeedbackTier, target_text: Option<&str>) -> String {
    let phrase = target_text
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| format!(" of \"{text}\""))
        .unwrap_or_default();
    match tier {
        FeedbackTier::Excellent => format!(
            "Excellent pronunciation{phrase}! Your acoustic profile is very close to a native speaker."
        ),
        FeedbackTier::Good => format!(
            "Good pronunciation{phrase}. Your voice is steady and there is room to improve further."
        ),
        FeedbackTier::Acceptable => format!(
            "Your pronunciation{phrase} is understandable. Working on the points below will make it sound more natural."
        ),
        FeedbackTier::NeedsImprovement => format!(
            "Your pronunciation{phrase} needs more work. Keep practicing with the points below in mind."
        ),
        FeedbackTier::NoSpeech => {
            "We could not hear any speech in this recording. Please try again.".to_string()
        }
    }
}
