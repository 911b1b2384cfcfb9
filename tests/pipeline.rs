use std::io::Cursor;

use voicegrade::audio::acquire;
use voicegrade::pronunciation::feedback::FeedbackTier;
use voicegrade::pronunciation::metrics::Grade;
use voicegrade::{
    evaluate, EvaluationRequest, Evaluator, PronunciationError, SampleBuffer, TARGET_SAMPLE_RATE,
};

fn tone(frequency: f32, amplitude: f32, sample_rate: u32, len: usize) -> Vec<f32> {
    (0..len)
        .map(|n| {
            let t = n as f32 / sample_rate as f32;
            amplitude * (2.0 * std::f32::consts::PI * frequency * t).sin()
        })
        .collect()
}

fn wav_bytes(samples: &[f32], sample_rate: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).expect("wav writer");
        for &sample in samples {
            writer
                .write_sample((sample * i16::MAX as f32) as i16)
                .expect("write sample");
        }
        writer.finalize().expect("finalize wav");
    }
    cursor.into_inner()
}

#[test]
fn silence_scores_zero_with_no_speech_feedback() {
    let buffer = SampleBuffer::silence(1.0, TARGET_SAMPLE_RATE);
    let evaluation = evaluate(&buffer).unwrap();

    assert_eq!(evaluation.overall_score, 0);
    assert_eq!(evaluation.grade, Grade::F);
    assert_eq!(evaluation.tier, FeedbackTier::NoSpeech);
    assert!(!evaluation.improvements.is_empty());
    assert!(evaluation
        .improvements
        .iter()
        .any(|line| line.to_lowercase().contains("speech")));
    assert!(evaluation.positives.is_empty());
}

#[test]
fn silence_of_any_length_short_circuits() {
    for len in [0, 1, 100, 4_096, 48_000] {
        let buffer = SampleBuffer::mono(vec![0.0; len], TARGET_SAMPLE_RATE);
        let evaluation = evaluate(&buffer).unwrap();
        assert_eq!(evaluation.overall_score, 0, "len={len}");
        assert_eq!(evaluation.grade, Grade::F, "len={len}");
        assert_eq!(evaluation.native_level, 1);
    }
}

#[test]
fn steady_tone_is_graded_well() {
    let buffer = SampleBuffer::mono(
        tone(150.0, 0.1, TARGET_SAMPLE_RATE, TARGET_SAMPLE_RATE as usize),
        TARGET_SAMPLE_RATE,
    );
    let evaluation = evaluate(&buffer).unwrap();

    println!(
        "overall={} grade={} tier={:?}",
        evaluation.overall_score, evaluation.grade, evaluation.tier
    );
    assert!(evaluation.overall_score >= 90, "{evaluation:?}");
    assert_eq!(evaluation.grade, Grade::A);
    assert_eq!(evaluation.tier, FeedbackTier::Excellent);
    assert!(!evaluation.improvements.is_empty());
    assert!(!evaluation.positives.is_empty());
}

#[test]
fn evaluation_is_deterministic() {
    let buffer = SampleBuffer::mono(tone(230.0, 0.2, TARGET_SAMPLE_RATE, 20_000), TARGET_SAMPLE_RATE);
    let evaluator = Evaluator::default();
    let request = EvaluationRequest::new().with_target_text("hello there");
    let first = evaluator.evaluate(&buffer, &request).unwrap();
    let second = evaluator.evaluate(&buffer, &request).unwrap();
    assert_eq!(first, second);
}

#[test]
fn content_accuracy_is_reported_and_blended() {
    let buffer = SampleBuffer::mono(tone(150.0, 0.1, TARGET_SAMPLE_RATE, 16_000), TARGET_SAMPLE_RATE);
    let evaluator = Evaluator::default();
    let acoustic = evaluator
        .evaluate(&buffer, &EvaluationRequest::new())
        .unwrap();
    let blended = evaluator
        .evaluate(&buffer, &EvaluationRequest::new().with_content_accuracy(20.0))
        .unwrap();

    assert_eq!(acoustic.content_score, None);
    assert_eq!(blended.content_score, Some(20));
    assert!(blended.overall_score < acoustic.overall_score);
}

#[test]
fn invalid_content_accuracy_is_rejected() {
    let buffer = SampleBuffer::silence(0.1, TARGET_SAMPLE_RATE);
    let request = EvaluationRequest::new().with_content_accuracy(f32::NAN);
    let err = Evaluator::default().evaluate(&buffer, &request).unwrap_err();
    assert!(matches!(err, PronunciationError::InvalidInput(_)), "{err}");
}

#[test]
fn garbage_bytes_fail_to_decode() {
    let garbage: Vec<u8> = (0..512u32).map(|i| (i * 37 % 251) as u8).collect();
    let err = acquire(&garbage, None, Some(16_000)).unwrap_err();
    assert!(matches!(err, PronunciationError::Decode(_)), "{err}");
}

#[test]
fn wav_capture_is_acquired_and_graded() {
    let bytes = wav_bytes(&tone(150.0, 0.1, 48_000, 48_000), 48_000);
    let buffer = acquire(&bytes, Some("wav"), None).unwrap();

    assert_eq!(buffer.sample_rate, TARGET_SAMPLE_RATE);
    assert_eq!(buffer.channels, 1);
    assert_eq!(buffer.len(), 16_000);

    let evaluation = evaluate(&buffer).unwrap();
    assert_eq!(evaluation.grade, Grade::A, "{evaluation:?}");
}

#[test]
fn shared_evaluator_serves_concurrent_callers() {
    let evaluator = Evaluator::default();
    let buffers: Vec<SampleBuffer> = [110.0, 150.0, 200.0, 260.0]
        .into_iter()
        .map(|f| SampleBuffer::mono(tone(f, 0.15, TARGET_SAMPLE_RATE, 8_000), TARGET_SAMPLE_RATE))
        .collect();
    let request = EvaluationRequest::new();

    let sequential: Vec<_> = buffers
        .iter()
        .map(|buffer| evaluator.evaluate(buffer, &request).unwrap())
        .collect();

    let (evaluator, request) = (&evaluator, &request);
    let concurrent: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = buffers
            .iter()
            .map(|buffer| scope.spawn(move || evaluator.evaluate(buffer, request).unwrap()))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("evaluation thread panicked"))
            .collect()
    });

    assert_eq!(sequential, concurrent);
}
