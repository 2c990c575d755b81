//! Scoring pipeline
//!
//! decode → sample-rate check → envelope extraction → alignment → scoring
//!
//! The pipeline holds no mutable state. One instance can be shared across
//! threads and evaluated concurrently.

use std::sync::{Arc, OnceLock};

use chrono::Utc;
use rayon::prelude::*;

use crate::error::{ScoringError, ScoringResult};
use crate::models::{Envelope, EnvelopeConfig, LengthPolicy, Score, ScoreReport, Waveform};
use crate::storage::AudioStore;
use crate::utils::audio_decoder::AudioDecoder;

use super::aligner::Aligner;
use super::envelope_extractor::EnvelopeExtractor;
use super::similarity_scorer::SimilarityScorer;

/// Reference-vs-candidate scoring pipeline
#[derive(Clone)]
pub struct ScoringPipeline {
    decoder: AudioDecoder,
    extractor: EnvelopeExtractor,
    aligner: Aligner,
    scorer: SimilarityScorer,
}

impl ScoringPipeline {
    pub fn new(store: Arc<dyn AudioStore>, envelope: EnvelopeConfig, policy: LengthPolicy) -> Self {
        Self {
            decoder: AudioDecoder::new(store),
            extractor: EnvelopeExtractor::new(envelope),
            aligner: Aligner::new(policy),
            scorer: SimilarityScorer::new(),
        }
    }

    /// Pipeline with default windowing and silent truncation
    pub fn with_defaults(store: Arc<dyn AudioStore>) -> Self {
        Self::new(store, EnvelopeConfig::default(), LengthPolicy::default())
    }

    pub fn envelope_config(&self) -> &EnvelopeConfig {
        self.extractor.config()
    }

    pub fn length_policy(&self) -> LengthPolicy {
        self.aligner.policy()
    }

    /// Score a candidate recording against a reference recording
    pub fn evaluate(&self, reference_id: &str, candidate_id: &str) -> ScoringResult<Score> {
        self.evaluate_detailed(reference_id, candidate_id)
            .map(|report| report.score)
    }

    /// Score a candidate recording and report the intermediate figures
    ///
    /// # Errors
    /// * `Decode` - either resource failed to decode
    /// * `SampleRateMismatch` - raised before any envelope is computed
    /// * `Alignment` - an envelope is empty or the length policy is exceeded
    /// * `UndefinedSimilarity` - an aligned envelope has zero variance
    pub fn evaluate_detailed(&self, reference_id: &str, candidate_id: &str) -> ScoringResult<ScoreReport> {
        tracing::debug!(reference = reference_id, candidate = candidate_id, "Evaluating singing");

        let reference = self.decoder.decode(reference_id)?;
        let candidate = self.decoder.decode(candidate_id)?;

        let report = self.evaluate_waveforms(&reference, &candidate)?;

        tracing::info!(
            reference = reference_id,
            candidate = candidate_id,
            score = %report.score,
            correlation = report.correlation,
            aligned_windows = report.aligned_windows,
            "Singing evaluated"
        );

        Ok(report)
    }

    /// Score two already-decoded waveforms
    pub fn evaluate_waveforms(&self, reference: &Waveform, candidate: &Waveform) -> ScoringResult<ScoreReport> {
        ensure_matching_rates(reference, candidate)?;

        let reference_envelope = self.extractor.extract(reference);
        self.score_candidate(&reference_envelope, candidate)
    }

    /// Score several candidates against one reference
    ///
    /// The reference is decoded once and its envelope extracted at most
    /// once. Candidates are scored in parallel on the rayon pool; results
    /// come back in input order, one per candidate.
    ///
    /// # Errors
    /// The outer error is the reference's decode failure. Per-candidate
    /// failures are reported in the returned vector.
    pub fn evaluate_batch<S>(&self, reference_id: &str, candidate_ids: &[S]) -> ScoringResult<Vec<ScoringResult<ScoreReport>>>
    where
        S: AsRef<str> + Sync,
    {
        let reference = self.decoder.decode(reference_id)?;
        let reference_envelope: OnceLock<Envelope> = OnceLock::new();

        tracing::debug!(
            reference = reference_id,
            candidates = candidate_ids.len(),
            workers = rayon::current_num_threads(),
            "Evaluating candidate batch"
        );

        let results: Vec<ScoringResult<ScoreReport>> = candidate_ids
            .par_iter()
            .map(|candidate_id| -> ScoringResult<ScoreReport> {
                let candidate_id = candidate_id.as_ref();
                let candidate = self.decoder.decode(candidate_id)?;
                ensure_matching_rates(&reference, &candidate)?;
                let envelope = reference_envelope.get_or_init(|| self.extractor.extract(&reference));
                let report = self.score_candidate(envelope, &candidate)?;

                tracing::info!(
                    reference = reference_id,
                    candidate = candidate_id,
                    score = %report.score,
                    correlation = report.correlation,
                    "Singing evaluated"
                );
                Ok(report)
            })
            .collect();

        Ok(results)
    }

    /// Extract, align and score a candidate whose sample rate already matches
    fn score_candidate(&self, reference_envelope: &Envelope, candidate: &Waveform) -> ScoringResult<ScoreReport> {
        let candidate_envelope = self.extractor.extract(candidate);
        let pair = self.aligner.align(reference_envelope, &candidate_envelope)?;
        let correlation = self.scorer.correlate(&pair)?;

        Ok(ScoreReport {
            score: Score::from_correlation(correlation),
            correlation,
            sample_rate: candidate.sample_rate(),
            reference_windows: reference_envelope.len(),
            candidate_windows: candidate_envelope.len(),
            aligned_windows: pair.len(),
            envelope: *self.extractor.config(),
            length_policy: self.aligner.policy(),
            evaluated_at: Utc::now(),
        })
    }
}

/// Fail fast when the recordings were captured at different rates
fn ensure_matching_rates(reference: &Waveform, candidate: &Waveform) -> ScoringResult<()> {
    if reference.sample_rate() != candidate.sample_rate() {
        tracing::debug!(
            reference = reference.sample_rate(),
            candidate = candidate.sample_rate(),
            "Sample rate mismatch"
        );
        return Err(ScoringError::SampleRateMismatch {
            reference: reference.sample_rate(),
            candidate: candidate.sample_rate(),
        });
    }
    Ok(())
}
