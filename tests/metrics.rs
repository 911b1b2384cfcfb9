use approx::assert_relative_eq;
use voicegrade::pronunciation::features::AcousticFeatures;
use voicegrade::pronunciation::metrics::{score_feature, Grade, MetricCalculator};
use voicegrade::pronunciation::profile::{ReferenceRange, ScoringProfile};

fn features(pitch_hz: f32, volume_rms: f32, stability: f32, centroid_bin: f32) -> AcousticFeatures {
    AcousticFeatures {
        pitch_hz,
        volume_rms,
        spectrum: Vec::new(),
        // 25.6 bins per 200 Hz at 16 kHz
        dominant_frequency_bin: 26,
        spectral_centroid_bin: centroid_bin,
        stability,
        sample_rate: 16_000,
    }
}

#[test]
fn metrics_reward_reference_speech() {
    // centroid bin 128 -> 1000 Hz
    let card = MetricCalculator::default().score(&features(150.0, 0.1, 0.8, 128.0), None);

    println!(
        "pitch={} volume={} stability={} spectral={} overall={}",
        card.pitch, card.volume, card.stability, card.spectral, card.overall
    );
    assert!(card.speech_detected);
    assert_eq!(card.pitch, 100);
    assert_eq!(card.volume, 100);
    assert_eq!(card.stability, 80);
    assert!(card.spectral >= 99);
    assert!(card.overall >= 93);
    assert_eq!(card.grade, Grade::A);
    assert_eq!(card.native_level, 9);
}

#[test]
fn metrics_penalize_out_of_range_features() {
    let calculator = MetricCalculator::default();
    let good = calculator.score(&features(150.0, 0.1, 0.8, 128.0), None);
    let shrill = calculator.score(&features(420.0, 0.1, 0.8, 128.0), None);
    let whisper = calculator.score(&features(150.0, 0.004, 0.8, 128.0), None);

    assert!(shrill.pitch < 60, "pitch score={}", shrill.pitch);
    assert!(whisper.volume < 60, "volume score={}", whisper.volume);
    assert!(shrill.overall < good.overall);
    assert!(whisper.overall < good.overall);
}

#[test]
fn feature_score_is_bounded_everywhere() {
    let profile = ScoringProfile::standard();
    for range in [profile.pitch, profile.volume, profile.centroid, profile.dominant] {
        let mut value = 0.0_f32;
        while value <= range.max * 4.0 {
            let score = score_feature(value, &range);
            assert!((0.0..=100.0).contains(&score), "{value} -> {score}");
            if range.contains(value) {
                assert!(score >= 70.0, "{value} inside {range:?} scored {score}");
            } else {
                assert!(score <= 60.0, "{value} outside {range:?} scored {score}");
            }
            value += range.max / 97.0;
        }
    }
}

#[test]
fn feature_score_tolerates_non_finite_input() {
    let range = ReferenceRange::new(80.0, 300.0, 150.0);
    assert_eq!(score_feature(f32::NAN, &range), 0.0);
    assert_eq!(score_feature(f32::INFINITY, &range), 0.0);
}

#[test]
fn grades_are_monotonic_in_score() {
    let grades = ScoringProfile::standard().grades;
    let mut previous = Grade::worst();
    for score in 0..=100u8 {
        let grade = grades.grade_for(score);
        assert!(grade >= previous, "score {score} dropped to {grade}");
        previous = grade;
    }
    assert_eq!(previous, Grade::A);
}

#[test]
fn overall_stays_in_range_for_extreme_features() {
    let calculator = MetricCalculator::default();
    let cases = [
        features(0.0, 1e-3, 0.0, 0.0),
        features(499.0, 0.99, 1.0, 1023.0),
        features(50.0, 0.002, 0.3, 1.0),
        features(f32::MAX, f32::MAX, 1.0, f32::MAX),
    ];
    for input in &cases {
        let card = calculator.score(input, None);
        assert!(card.overall <= 100);
        assert!((1..=10).contains(&card.native_level));
        assert_eq!(card.grade, calculator.profile().grades.grade_for(card.overall));
    }
}

#[test]
fn content_blend_uses_profile_weight() {
    let calculator = MetricCalculator::default();
    let input = features(150.0, 0.1, 0.8, 128.0);
    let acoustic = calculator.score(&input, None).overall as f32;
    let blended = calculator.score(&input, Some(40.0)).overall as f32;
    assert_relative_eq!(blended, 0.7 * 40.0 + 0.3 * acoustic, epsilon = 1.0);
}
