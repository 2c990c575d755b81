//! Similarity score and per-comparison report

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::parameters::{EnvelopeConfig, LengthPolicy};

/// User-facing similarity percentage
///
/// Always within [0, 100] and rounded to 2 decimal places.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Score(f64);

impl Score {
    pub const MIN: Score = Score(0.0);
    pub const MAX: Score = Score(100.0);

    /// Map a correlation coefficient in [-1, 1] onto [0, 100]
    ///
    /// `round(((rho + 1) / 2) * 100, 2)`, clamped to absorb floating-point
    /// overshoot.
    pub fn from_correlation(rho: f64) -> Self {
        let percent = (rho + 1.0) / 2.0 * 100.0;
        let rounded = ((percent * 100.0).round() / 100.0).clamp(0.0, 100.0);
        // Rounding a tiny negative overshoot yields -0.0
        Score(if rounded == 0.0 { 0.0 } else { rounded })
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Score plus the intermediate figures it was derived from
#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    /// Final score (0.00 - 100.00)
    pub score: Score,

    /// Pearson correlation of the aligned envelopes
    pub correlation: f64,

    /// Shared sample rate of both recordings in Hz
    pub sample_rate: u32,

    /// Envelope length of the reference before alignment
    pub reference_windows: usize,

    /// Envelope length of the candidate before alignment
    pub candidate_windows: usize,

    /// Length both envelopes were truncated to
    pub aligned_windows: usize,

    /// Windowing used for both envelopes
    pub envelope: EnvelopeConfig,

    /// Length policy applied by the aligner
    pub length_policy: LengthPolicy,

    /// Evaluation timestamp
    pub evaluated_at: DateTime<Utc>,
}
