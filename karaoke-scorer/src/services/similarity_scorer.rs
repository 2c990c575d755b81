//! Pearson-correlation similarity scoring
//!
//! Known limitation: the correlation compares the *shape* of two loudness
//! curves. It ignores absolute gain (a quiet take scores like a loud one) and
//! carries no pitch information at all.

use crate::error::UndefinedSimilarityError;
use crate::models::{AlignedPair, Score};

/// Similarity scorer service
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarityScorer;

impl SimilarityScorer {
    pub fn new() -> Self {
        Self
    }

    /// Pearson correlation of the aligned envelopes, in [-1, 1]
    ///
    /// # Errors
    /// * `UndefinedSimilarityError` - either sequence has zero variance
    pub fn correlate(&self, pair: &AlignedPair) -> Result<f64, UndefinedSimilarityError> {
        pearson(pair.reference(), pair.candidate())
    }

    /// Correlation mapped onto a [0, 100] score
    pub fn score(&self, pair: &AlignedPair) -> Result<Score, UndefinedSimilarityError> {
        self.correlate(pair).map(Score::from_correlation)
    }
}

fn pearson(reference: &[f32], candidate: &[f32]) -> Result<f64, UndefinedSimilarityError> {
    debug_assert_eq!(reference.len(), candidate.len());

    let reference_flat = is_constant(reference);
    let candidate_flat = is_constant(candidate);
    if reference_flat || candidate_flat {
        return Err(UndefinedSimilarityError {
            reference_flat,
            candidate_flat,
        });
    }

    let n = reference.len() as f64;
    let mean_reference = reference.iter().map(|&v| v as f64).sum::<f64>() / n;
    let mean_candidate = candidate.iter().map(|&v| v as f64).sum::<f64>() / n;

    let mut covariance = 0.0f64;
    let mut reference_ss = 0.0f64;
    let mut candidate_ss = 0.0f64;
    for (&r, &c) in reference.iter().zip(candidate) {
        let dr = r as f64 - mean_reference;
        let dc = c as f64 - mean_candidate;
        covariance += dr * dc;
        reference_ss += dr * dr;
        candidate_ss += dc * dc;
    }

    let denominator = reference_ss.sqrt() * candidate_ss.sqrt();
    if !(denominator > 0.0 && denominator.is_finite()) {
        return Err(UndefinedSimilarityError {
            reference_flat: !(reference_ss > 0.0),
            candidate_flat: !(candidate_ss > 0.0),
        });
    }

    Ok((covariance / denominator).clamp(-1.0, 1.0))
}

/// True for empty, single-value, or all-equal sequences
fn is_constant(values: &[f32]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}
