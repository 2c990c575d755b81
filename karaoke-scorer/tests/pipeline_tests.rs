//! End-to-end scoring tests against WAV files on disk
//!
//! Each test writes its recordings into a fresh temp folder and scores them
//! through `FsAudioStore`, the same path the CLI takes.

mod helpers;

use std::path::Path;
use std::sync::Arc;

use helpers::{generate_test_wav, AudioConfig};
use karaoke_scorer::{
    AlignmentError, DecodeError, EnvelopeConfig, FsAudioStore, LengthPolicy, Score, ScoringError,
    ScoringErrorKind, ScoringPipeline, StorageError, UndefinedSimilarityError,
};
use tempfile::TempDir;

/// Write the recordings used across tests into `dir`
fn write_session(dir: &Path) {
    let song = AudioConfig::default();
    generate_test_wav(&dir.join("song.wav"), &song).unwrap();

    generate_test_wav(
        &dir.join("take.wav"),
        &AudioConfig {
            phrases_per_second: 1.4,
            amplitude: 0.3,
            ..song.clone()
        },
    )
    .unwrap();

    generate_test_wav(
        &dir.join("inverted.wav"),
        &AudioConfig {
            invert_polarity: true,
            ..song.clone()
        },
    )
    .unwrap();

    generate_test_wav(
        &dir.join("stereo.wav"),
        &AudioConfig {
            channels: 2,
            ..song.clone()
        },
    )
    .unwrap();

    generate_test_wav(
        &dir.join("silent.wav"),
        &AudioConfig {
            silent: true,
            ..song.clone()
        },
    )
    .unwrap();

    generate_test_wav(
        &dir.join("lowrate.wav"),
        &AudioConfig {
            sample_rate: 22050,
            ..song.clone()
        },
    )
    .unwrap();

    generate_test_wav(
        &dir.join("short.wav"),
        &AudioConfig {
            duration_seconds: 1.5,
            ..song
        },
    )
    .unwrap();
}

fn setup() -> (TempDir, ScoringPipeline) {
    let temp_dir = TempDir::new().unwrap();
    write_session(temp_dir.path());
    let pipeline = ScoringPipeline::with_defaults(Arc::new(FsAudioStore::new(temp_dir.path())));
    (temp_dir, pipeline)
}

#[test]
fn test_identical_recording_scores_100() {
    let (_temp_dir, pipeline) = setup();

    let score = pipeline.evaluate("song.wav", "song.wav").unwrap();
    assert_eq!(score, Score::MAX);
    assert_eq!(score.to_string(), "100.00");
}

#[test]
fn test_polarity_inverted_recording_scores_100() {
    let (_temp_dir, pipeline) = setup();

    let score = pipeline.evaluate("song.wav", "inverted.wav").unwrap();
    assert_eq!(score, Score::MAX);
}

#[test]
fn test_stereo_copy_scores_100() {
    let (_temp_dir, pipeline) = setup();

    let score = pipeline.evaluate("song.wav", "stereo.wav").unwrap();
    assert_eq!(score, Score::MAX);
}

#[test]
fn test_different_phrasing_scores_below_100() {
    let (_temp_dir, pipeline) = setup();

    let report = pipeline.evaluate_detailed("song.wav", "take.wav").unwrap();

    assert!(report.score.value() < 100.0, "score was {}", report.score);
    assert!(report.score.value() >= 0.0);
    assert!((-1.0..=1.0).contains(&report.correlation));
    assert_eq!(report.sample_rate, 44100);
}

#[test]
fn test_score_has_two_decimals() {
    let (_temp_dir, pipeline) = setup();

    let value = pipeline.evaluate("song.wav", "take.wav").unwrap().value();
    assert_eq!((value * 100.0).round() / 100.0, value);
}

#[test]
fn test_repeated_evaluation_is_identical() {
    let (_temp_dir, pipeline) = setup();

    let first = pipeline.evaluate_detailed("song.wav", "take.wav").unwrap();
    let second = pipeline.evaluate_detailed("song.wav", "take.wav").unwrap();

    assert_eq!(first.score, second.score);
    assert_eq!(first.correlation, second.correlation);
}

#[test]
fn test_sample_rate_mismatch() {
    let (_temp_dir, pipeline) = setup();

    let err = pipeline.evaluate("song.wav", "lowrate.wav").unwrap_err();
    assert!(matches!(
        err,
        ScoringError::SampleRateMismatch {
            reference: 44100,
            candidate: 22050
        }
    ));
}

#[test]
fn test_silent_candidate_is_undefined_similarity() {
    let (_temp_dir, pipeline) = setup();

    let err = pipeline.evaluate("song.wav", "silent.wav").unwrap_err();
    assert!(matches!(
        err,
        ScoringError::UndefinedSimilarity(UndefinedSimilarityError {
            reference_flat: false,
            candidate_flat: true,
        })
    ));
}

#[test]
fn test_shorter_candidate_is_truncated() {
    let (_temp_dir, pipeline) = setup();

    let report = pipeline.evaluate_detailed("song.wav", "short.wav").unwrap();

    assert!(report.candidate_windows < report.reference_windows);
    assert_eq!(report.aligned_windows, report.candidate_windows);
    // Same material over the shared span; only the zero-padded tail differs
    assert!(report.score.value() > 80.0, "score was {}", report.score);
}

#[test]
fn test_tolerance_policy_rejects_large_gap() {
    let temp_dir = TempDir::new().unwrap();
    write_session(temp_dir.path());
    let pipeline = ScoringPipeline::new(
        Arc::new(FsAudioStore::new(temp_dir.path())),
        EnvelopeConfig::default(),
        LengthPolicy::tolerance(0.25).unwrap(),
    );

    let err = pipeline.evaluate("song.wav", "short.wav").unwrap_err();
    assert_eq!(err.kind(), ScoringErrorKind::Alignment);
    assert!(matches!(
        err,
        ScoringError::Alignment(AlignmentError::LengthMismatch { .. })
    ));
}

#[test]
fn test_missing_candidate_is_decode_error() {
    let (_temp_dir, pipeline) = setup();

    let err = pipeline.evaluate("song.wav", "nope.wav").unwrap_err();
    assert!(matches!(
        err,
        ScoringError::Decode(DecodeError::Storage(StorageError::NotFound(_)))
    ));
}

#[test]
fn test_path_traversal_is_rejected() {
    let (_temp_dir, pipeline) = setup();

    let err = pipeline.evaluate("song.wav", "../song.wav").unwrap_err();
    assert!(matches!(
        err,
        ScoringError::Decode(DecodeError::Storage(StorageError::InvalidIdentifier { .. }))
    ));
}

#[test]
fn test_non_audio_file_is_decode_error() {
    let (temp_dir, pipeline) = setup();
    std::fs::write(temp_dir.path().join("notes.txt"), b"la la la").unwrap();

    let err = pipeline.evaluate("song.wav", "notes.txt").unwrap_err();
    assert_eq!(err.kind(), ScoringErrorKind::Decode);
}

#[test]
fn test_batch_preserves_order_and_isolates_failures() {
    let (_temp_dir, pipeline) = setup();

    let candidates = ["take.wav", "nope.wav", "lowrate.wav", "song.wav", "silent.wav"];
    let results = pipeline.evaluate_batch("song.wav", &candidates).unwrap();

    assert_eq!(results.len(), candidates.len());

    let single = pipeline.evaluate_detailed("song.wav", "take.wav").unwrap();
    assert_eq!(results[0].as_ref().unwrap().score, single.score);

    assert_eq!(results[1].as_ref().unwrap_err().kind(), ScoringErrorKind::Decode);
    assert_eq!(
        results[2].as_ref().unwrap_err().kind(),
        ScoringErrorKind::SampleRateMismatch
    );
    assert_eq!(results[3].as_ref().unwrap().score, Score::MAX);
    assert_eq!(
        results[4].as_ref().unwrap_err().kind(),
        ScoringErrorKind::UndefinedSimilarity
    );
}

#[test]
fn test_batch_with_missing_reference_fails_whole_batch() {
    let (_temp_dir, pipeline) = setup();

    let err = pipeline
        .evaluate_batch("nope.wav", &["take.wav", "song.wav"])
        .unwrap_err();
    assert_eq!(err.kind(), ScoringErrorKind::Decode);
}

#[test]
fn test_shared_pipeline_across_threads() {
    let (_temp_dir, pipeline) = setup();
    let pipeline = Arc::new(pipeline);
    let expected = pipeline.evaluate("song.wav", "take.wav").unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let pipeline = Arc::clone(&pipeline);
            std::thread::spawn(move || pipeline.evaluate("song.wav", "take.wav").unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
