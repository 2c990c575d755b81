//! Envelope alignment by truncation
//!
//! Both envelopes are cut from the end to the shorter length. There is no
//! offset search or time stretching: window `k` of the reference is compared
//! with window `k` of the candidate.

use crate::error::AlignmentError;
use crate::models::{AlignedPair, Envelope, LengthPolicy};

/// Truncation beyond this fraction is logged even when tolerated
const TRUNCATION_WARN_FRACTION: f64 = 0.10;

/// Aligner service
#[derive(Debug, Clone, Copy, Default)]
pub struct Aligner {
    policy: LengthPolicy,
}

impl Aligner {
    pub fn new(policy: LengthPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> LengthPolicy {
        self.policy
    }

    /// Truncate both envelopes to `min(len_reference, len_candidate)`
    ///
    /// # Errors
    /// * `AlignmentError::Empty` - either envelope has no windows
    /// * `AlignmentError::LengthMismatch` - the tolerance policy is exceeded
    pub fn align(
        &self,
        reference: &Envelope,
        candidate: &Envelope,
    ) -> Result<AlignedPair, AlignmentError> {
        let reference_len = reference.len();
        let candidate_len = candidate.len();
        let aligned_len = reference_len.min(candidate_len);

        if aligned_len == 0 {
            return Err(AlignmentError::Empty {
                reference_len,
                candidate_len,
            });
        }

        let longest = reference_len.max(candidate_len);
        let gap = 1.0 - aligned_len as f64 / longest as f64;

        if let LengthPolicy::Tolerance { max_length_gap } = self.policy {
            if gap > max_length_gap {
                return Err(AlignmentError::LengthMismatch {
                    reference_len,
                    candidate_len,
                    gap,
                    max_gap: max_length_gap,
                });
            }
        }

        if gap > TRUNCATION_WARN_FRACTION {
            tracing::warn!(
                reference_len,
                candidate_len,
                aligned_len,
                gap = format!("{:.3}", gap),
                "Envelopes truncated by more than 10%"
            );
        } else {
            tracing::debug!(reference_len, candidate_len, aligned_len, "Envelopes aligned");
        }

        Ok(AlignedPair::new(
            reference.values()[..aligned_len].to_vec(),
            candidate.values()[..aligned_len].to_vec(),
            reference_len - aligned_len,
            candidate_len - aligned_len,
        ))
    }
}
