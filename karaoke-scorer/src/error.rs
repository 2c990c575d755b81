//! Error types for karaoke-scorer
//!
//! Each pipeline stage has its own error type; [`ScoringError`] wraps them
//! unchanged so callers can tell the four failure kinds apart.

use serde::Serialize;
use thiserror::Error;

/// Result type for scoring operations
pub type ScoringResult<T> = Result<T, ScoringError>;

/// Failure to fetch raw audio bytes from an [`AudioStore`](crate::storage::AudioStore)
#[derive(Debug, Error)]
pub enum StorageError {
    /// No resource exists under this identifier
    #[error("Audio resource not found: {0}")]
    NotFound(String),

    /// Identifier is empty or escapes the store root
    #[error("Invalid audio identifier '{identifier}': {reason}")]
    InvalidIdentifier { identifier: String, reason: String },

    /// Resource exists but could not be read
    #[error("Failed to read audio resource '{identifier}': {source}")]
    Io {
        identifier: String,
        #[source]
        source: std::io::Error,
    },
}

/// Audio decoding errors
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Resource missing or unreadable
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Container or codec not recognized
    #[error("Unsupported audio format in '{identifier}': {reason}")]
    Unsupported { identifier: String, reason: String },

    /// Container holds no decodable audio track
    #[error("No audio track found in '{0}'")]
    NoAudioTrack(String),

    /// Track does not declare its sample rate
    #[error("Sample rate unknown for '{0}'")]
    MissingSampleRate(String),

    /// Packet read or decode failed mid-stream
    #[error("Corrupt audio data in '{identifier}': {reason}")]
    Corrupt { identifier: String, reason: String },
}

impl DecodeError {
    /// Identifier of the resource that failed to decode
    pub fn identifier(&self) -> &str {
        match self {
            DecodeError::Storage(StorageError::NotFound(identifier)) => identifier,
            DecodeError::Storage(StorageError::InvalidIdentifier { identifier, .. }) => identifier,
            DecodeError::Storage(StorageError::Io { identifier, .. }) => identifier,
            DecodeError::Unsupported { identifier, .. } => identifier,
            DecodeError::NoAudioTrack(identifier) => identifier,
            DecodeError::MissingSampleRate(identifier) => identifier,
            DecodeError::Corrupt { identifier, .. } => identifier,
        }
    }
}

/// Envelope alignment errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AlignmentError {
    /// At least one envelope has no windows
    #[error(
        "Cannot align empty envelopes (reference: {reference_len} windows, candidate: {candidate_len} windows)"
    )]
    Empty {
        reference_len: usize,
        candidate_len: usize,
    },

    /// Truncation would drop more than the configured fraction of windows
    #[error(
        "Envelope lengths differ beyond tolerance (reference: {reference_len} windows, candidate: {candidate_len} windows, gap {gap:.3} > {max_gap:.3})"
    )]
    LengthMismatch {
        reference_len: usize,
        candidate_len: usize,
        gap: f64,
        max_gap: f64,
    },
}

/// Pearson correlation is undefined because a sequence has zero variance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Similarity undefined: {} zero variance", flat_sides(.reference_flat, .candidate_flat))]
pub struct UndefinedSimilarityError {
    /// Reference envelope is constant
    pub reference_flat: bool,
    /// Candidate envelope is constant
    pub candidate_flat: bool,
}

fn flat_sides(reference_flat: &bool, candidate_flat: &bool) -> &'static str {
    match (reference_flat, candidate_flat) {
        (true, true) => "both envelopes have",
        (true, false) => "reference envelope has",
        _ => "candidate envelope has",
    }
}

/// Invalid extractor or aligner parameters
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("window_size must be at least 1 sample")]
    ZeroWindowSize,

    #[error("hop_size must be at least 1 sample")]
    ZeroHopSize,

    #[error("max_length_gap must be within [0, 1], got {0}")]
    InvalidLengthGap(f64),
}

/// Pipeline error
///
/// Stage errors are carried unchanged.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Sample rates do not match (reference: {reference} Hz, candidate: {candidate} Hz)")]
    SampleRateMismatch { reference: u32, candidate: u32 },

    #[error("Alignment error: {0}")]
    Alignment(#[from] AlignmentError),

    #[error(transparent)]
    UndefinedSimilarity(#[from] UndefinedSimilarityError),
}

/// Payload-free tag for [`ScoringError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringErrorKind {
    Decode,
    SampleRateMismatch,
    Alignment,
    UndefinedSimilarity,
}

impl ScoringErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringErrorKind::Decode => "decode",
            ScoringErrorKind::SampleRateMismatch => "sample_rate_mismatch",
            ScoringErrorKind::Alignment => "alignment",
            ScoringErrorKind::UndefinedSimilarity => "undefined_similarity",
        }
    }
}

impl std::fmt::Display for ScoringErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ScoringError {
    pub fn kind(&self) -> ScoringErrorKind {
        match self {
            ScoringError::Decode(_) => ScoringErrorKind::Decode,
            ScoringError::SampleRateMismatch { .. } => ScoringErrorKind::SampleRateMismatch,
            ScoringError::Alignment(_) => ScoringErrorKind::Alignment,
            ScoringError::UndefinedSimilarity(_) => ScoringErrorKind::UndefinedSimilarity,
        }
    }
}
