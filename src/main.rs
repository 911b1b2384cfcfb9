use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use voicegrade::audio::{acquire_file, encoder};
use voicegrade::config::AppConfig;
use voicegrade::pronunciation::features::AcousticFeatures;
use voicegrade::{CaptureQuality, Evaluation, EvaluationRequest, Evaluator};

/// voicegrade - acoustic pronunciation grader
///
/// Decodes a recorded phrase, extracts pitch, loudness, spectral and stability
/// features, and prints a graded assessment as JSON.
#[derive(Parser, Debug)]
#[command(name = "voicegrade")]
#[command(version)]
#[command(about = "Acoustic pronunciation grader", long_about = None)]
struct Args {
    /// Recorded capture (WAV, FLAC, MP3, AAC, or Vorbis in Ogg/WebM; no Opus)
    #[arg(value_name = "INPUT")]
    input_file: PathBuf,

    /// Sample rate to assume when the container does not declare one
    #[arg(long, value_name = "HZ")]
    sample_rate: Option<u32>,

    /// Phrase the learner was asked to say, quoted in the feedback
    #[arg(long, value_name = "TEXT")]
    target_text: Option<String>,

    /// Content accuracy (0-100) from an external transcription assessor
    #[arg(long, value_name = "SCORE")]
    content_score: Option<f32>,

    /// JSON scoring profile overriding the built-in reference table
    #[arg(long, value_name = "PATH")]
    profile: Option<PathBuf>,

    /// Also write the normalised 16 kHz mono capture as WAV
    #[arg(long, value_name = "PATH")]
    export_wav: Option<PathBuf>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,
}

impl Args {
    fn validate(&self) -> Result<()> {
        if !self.input_file.is_file() {
            anyhow::bail!("Input file does not exist: {:?}", self.input_file);
        }
        if let Some(score) = self.content_score {
            anyhow::ensure!(
                (0.0..=100.0).contains(&score),
                "Content score must lie in [0, 100], got: {}",
                score
            );
        }
        if self.sample_rate == Some(0) {
            anyhow::bail!("Sample rate must be positive");
        }
        Ok(())
    }

    fn request(&self) -> EvaluationRequest {
        let mut request = EvaluationRequest::new();
        if let Some(text) = &self.target_text {
            request = request.with_target_text(text.clone());
        }
        if let Some(score) = self.content_score {
            request = request.with_content_accuracy(score);
        }
        request
    }
}

#[derive(Serialize)]
struct Report<'a> {
    evaluation: &'a Evaluation,
    features: FeatureSummary,
    capture: CaptureQuality,
}

/// Feature values without the raw spectrum.
#[derive(Serialize)]
struct FeatureSummary {
    pitch_hz: f32,
    volume_rms: f32,
    dominant_frequency_hz: f32,
    spectral_centroid_hz: f32,
    stability: f32,
}

impl From<&AcousticFeatures> for FeatureSummary {
    fn from(features: &AcousticFeatures) -> Self {
        Self {
            pitch_hz: features.pitch_hz,
            volume_rms: features.volume_rms,
            dominant_frequency_hz: features.dominant_frequency_hz(),
            spectral_centroid_hz: features.spectral_centroid_hz(),
            stability: features.stability,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    args.validate()
        .context("Failed to validate command-line arguments")?;

    let config = AppConfig::from_override(args.profile.clone())
        .context("Failed to load scoring profile")?;
    let evaluator = Evaluator::new(config.profile)?;

    let buffer = acquire_file(&args.input_file, args.sample_rate)
        .with_context(|| format!("Failed to acquire audio from {:?}", args.input_file))?;
    info!(
        samples = buffer.len(),
        sample_rate = buffer.sample_rate,
        duration_secs = buffer.duration_secs(),
        "capture acquired"
    );

    if let Some(path) = &args.export_wav {
        encoder::write_wav(&buffer, path)
            .with_context(|| format!("Failed to export normalised capture to {:?}", path))?;
        info!(path = %path.display(), "exported normalised capture");
    }

    let capture = CaptureQuality::assess(&buffer);
    let features = evaluator.extractor().extract(&buffer);
    let evaluation = evaluator.evaluate_features(&features, &args.request())?;

    let report = Report {
        evaluation: &evaluation,
        features: FeatureSummary::from(&features),
        capture,
    };
    let json = if args.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .context("Failed to serialise evaluation report")?;
    println!("{json}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_argument_set() {
        let args = Args::try_parse_from([
            "voicegrade",
            "capture.webm",
            "--sample-rate",
            "48000",
            "--target-text",
            "good morning",
            "--content-score",
            "82.5",
            "--pretty",
        ])
        .unwrap();
        assert_eq!(args.sample_rate, Some(48_000));
        assert!(args.pretty);
        let request = args.request();
        assert_eq!(request.target_text.as_deref(), Some("good morning"));
        assert_eq!(request.content_accuracy, Some(82.5));
    }

    #[test]
    fn rejects_missing_input_file() {
        let args = Args::try_parse_from(["voicegrade", "/nonexistent/capture.wav"]).unwrap();
        assert!(args.validate().is_err());
    }
}
