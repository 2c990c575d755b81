//! Common-length envelope pair

/// Two envelopes truncated to the same length
///
/// Built only by [`Aligner`](crate::services::Aligner). Both sequences keep
/// their original order and are never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedPair {
    reference: Vec<f32>,
    candidate: Vec<f32>,
    reference_dropped: usize,
    candidate_dropped: usize,
}

impl AlignedPair {
    pub(crate) fn new(
        reference: Vec<f32>,
        candidate: Vec<f32>,
        reference_dropped: usize,
        candidate_dropped: usize,
    ) -> Self {
        debug_assert_eq!(reference.len(), candidate.len());
        debug_assert!(!reference.is_empty());
        Self {
            reference,
            candidate,
            reference_dropped,
            candidate_dropped,
        }
    }

    pub fn reference(&self) -> &[f32] {
        &self.reference
    }

    pub fn candidate(&self) -> &[f32] {
        &self.candidate
    }

    /// Common length of both sequences
    pub fn len(&self) -> usize {
        self.reference.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reference.is_empty()
    }

    /// Windows cut from the end of the reference envelope
    pub fn reference_dropped(&self) -> usize {
        self.reference_dropped
    }

    /// Windows cut from the end of the candidate envelope
    pub fn candidate_dropped(&self) -> usize {
        self.candidate_dropped
    }

    pub fn is_truncated(&self) -> bool {
        self.reference_dropped > 0 || self.candidate_dropped > 0
    }
}
