//! karaoke-scorer library interface
//!
//! Grades a sung recording against a reference track by correlating their
//! short-time loudness envelopes:
//!
//! 1. [`AudioDecoder`] reads a resource through an [`AudioStore`] and yields
//!    a mono [`Waveform`] at its native sample rate
//! 2. [`EnvelopeExtractor`] turns the waveform into an RMS [`Envelope`]
//! 3. [`Aligner`] truncates two envelopes to a common length
//! 4. [`SimilarityScorer`] maps their Pearson correlation onto a 0-100 [`Score`]
//!
//! [`ScoringPipeline`] runs all four stages for a (reference, candidate) pair.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

pub use crate::error::{
    AlignmentError, ConfigError, DecodeError, ScoringError, ScoringErrorKind, ScoringResult,
    StorageError, UndefinedSimilarityError,
};
pub use crate::models::{
    AlignedPair, Envelope, EnvelopeConfig, LengthPolicy, Score, ScoreReport, Waveform,
};
pub use crate::services::{Aligner, EnvelopeExtractor, ScoringPipeline, SimilarityScorer};
pub use crate::storage::{AudioResource, AudioStore, FsAudioStore, MemoryAudioStore};
pub use crate::utils::audio_decoder::AudioDecoder;
