//! Acoustic pronunciation grading: decode a spoken capture, extract pitch,
//! loudness, spectral and stability features, and turn them into a graded
//! assessment with feedback.

pub mod audio;
pub mod config;
pub mod pronunciation;
pub mod types;

pub use pronunciation::{evaluate, Evaluation, EvaluationRequest, Evaluator, PronunciationError};
pub use types::{CaptureQuality, SampleBuffer, TARGET_SAMPLE_RATE};
