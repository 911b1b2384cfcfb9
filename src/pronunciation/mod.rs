pub mod features;
pub mod feedback;
pub mod metrics;
pub mod profile;

use std::error::Error;
use std::fmt::{Display, Formatter};

use serde::Serialize;
use tracing::{info, warn};

use crate::types::SampleBuffer;
use features::{AcousticFeatures, FeatureExtractor};
use feedback::{FeedbackGenerator, FeedbackTier};
use metrics::{Grade, MetricCalculator};
use profile::ScoringProfile;

/// Convenient alias for results returned by pronunciation modules.
pub type Result<T> = std::result::Result<T, PronunciationError>;

/// Failures surfaced to callers of the evaluation pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum PronunciationError {
    /// Input bytes could not be interpreted as audio.
    Decode(String),
    /// Caller-supplied parameters are unusable.
    InvalidInput(String),
    /// A scoring profile failed validation.
    Config(String),
}

impl Display for PronunciationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decode(message) => write!(f, "audio decode failed: {message}"),
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::Config(message) => write!(f, "invalid scoring profile: {message}"),
        }
    }
}

impl Error for PronunciationError {}

/// Optional context accompanying a capture.
#[derive(Debug, Clone, Default)]
pub struct EvaluationRequest {
    /// Phrase the learner was asked to say; only quoted in feedback text.
    pub target_text: Option<String>,
    /// Content accuracy (0-100) from an external transcription assessor.
    pub content_accuracy: Option<f32>,
}

impl EvaluationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target_text(mut self, text: impl Into<String>) -> Self {
        self.target_text = Some(text.into());
        self
    }

    pub fn with_content_accuracy(mut self, accuracy: f32) -> Self {
        self.content_accuracy = Some(accuracy);
        self
    }

    fn validate(&self) -> Result<()> {
        match self.content_accuracy {
            Some(value) if !value.is_finite() || !(0.0..=100.0).contains(&value) => {
                Err(PronunciationError::InvalidInput(format!(
                    "content accuracy must lie in [0, 100], got {value}"
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Graded assessment of a single capture.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub pitch_score: u8,
    pub volume_score: u8,
    pub stability_score: u8,
    pub spectral_score: u8,
    /// Present when the request carried a content accuracy.
    pub content_score: Option<u8>,
    pub overall_score: u8,
    pub grade: Grade,
    pub grade_description: &'static str,
    /// Coarse 1-10 closeness-to-native rating derived from the overall score.
    pub native_level: u8,
    pub tier: FeedbackTier,
    pub feedback: String,
    pub improvements: Vec<String>,
    pub positives: Vec<String>,
}

/// Runs feature extraction, scoring, and feedback against one scoring profile.
///
/// Holds no mutable state, so a single instance can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct Evaluator {
    extractor: FeatureExtractor,
    metrics: MetricCalculator,
    feedback: FeedbackGenerator,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::with_parts(FeatureExtractor::new(), ScoringProfile::standard())
    }
}

impl Evaluator {
    /// Build an evaluator for `profile`, rejecting inconsistent tables.
    pub fn new(profile: ScoringProfile) -> Result<Self> {
        profile.validate()?;
        Ok(Self::with_parts(FeatureExtractor::new(), profile))
    }

    pub fn with_extractor(mut self, extractor: FeatureExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    fn with_parts(extractor: FeatureExtractor, profile: ScoringProfile) -> Self {
        Self {
            extractor,
            metrics: MetricCalculator::new(profile),
            feedback: FeedbackGenerator::new(profile),
        }
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    pub fn profile(&self) -> &ScoringProfile {
        self.metrics.profile()
    }

    pub fn evaluate(
        &self,
        buffer: &SampleBuffer,
        request: &EvaluationRequest,
    ) -> Result<Evaluation> {
        let features = self.extractor.extract(buffer);
        self.evaluate_features(&features, request)
    }

    /// Score features that were extracted earlier, e.g. to report both.
    pub fn evaluate_features(
        &self,
        features: &AcousticFeatures,
        request: &EvaluationRequest,
    ) -> Result<Evaluation> {
        request.validate()?;
        let scorecard = self.metrics.score(features, request.content_accuracy);
        if !scorecard.speech_detected {
            warn!(
                volume_rms = features.volume_rms,
                pitch_hz = features.pitch_hz,
                stability = features.stability,
                "no speech detected; skipping weighted scoring"
            );
        }
        let feedback =
            self.feedback
                .generate(features, &scorecard, request.target_text.as_deref());

        info!(
            overall_score = scorecard.overall,
            grade = %scorecard.grade,
            tier = ?feedback.tier,
            "capture evaluated"
        );

        Ok(Evaluation {
            pitch_score: scorecard.pitch,
            volume_score: scorecard.volume,
            stability_score: scorecard.stability,
            spectral_score: scorecard.spectral,
            content_score: scorecard.content,
            overall_score: scorecard.overall,
            grade: scorecard.grade,
            grade_description: scorecard.grade.description(),
            native_level: scorecard.native_level,
            tier: feedback.tier,
            feedback: feedback.text,
            improvements: feedback.improvements,
            positives: feedback.positives,
        })
    }
}

/// Evaluate `buffer` against the standard profile with no extra context.
pub fn evaluate(buffer: &SampleBuffer) -> Result<Evaluation> {
    Evaluator::default().evaluate(buffer, &EvaluationRequest::default())
}
