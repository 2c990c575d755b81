//! Envelope extraction and alignment parameters

use karaoke_common::config::{DEFAULT_HOP_SIZE, DEFAULT_WINDOW_SIZE};
use serde::Serialize;

use crate::error::ConfigError;

/// Envelope windowing parameters
///
/// Window `k` starts at sample `k * hop_size` and spans `window_size`
/// samples; the final windows are zero-padded past the end of the waveform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnvelopeConfig {
    window_size: usize,
    hop_size: usize,
}

impl EnvelopeConfig {
    /// Validate and build windowing parameters
    ///
    /// # Errors
    /// * `ZeroWindowSize` / `ZeroHopSize` when either value is 0
    pub fn new(window_size: usize, hop_size: usize) -> Result<Self, ConfigError> {
        if window_size == 0 {
            return Err(ConfigError::ZeroWindowSize);
        }
        if hop_size == 0 {
            return Err(ConfigError::ZeroHopSize);
        }
        Ok(Self {
            window_size,
            hop_size,
        })
    }

    /// Window length in samples (default: 2048)
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Distance between window starts in samples (default: 512)
    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    /// Envelope length for a waveform of `sample_count` samples
    ///
    /// `ceil(sample_count / hop_size)`, independent of sample values.
    pub fn frame_count(&self, sample_count: usize) -> usize {
        sample_count.div_ceil(self.hop_size)
    }
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            hop_size: DEFAULT_HOP_SIZE,
        }
    }
}

/// What the aligner does when envelope lengths differ
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum LengthPolicy {
    /// Truncate to the shorter envelope without complaint
    #[default]
    Truncate,

    /// Truncate, but fail when more than `max_length_gap` of the longer
    /// envelope would be dropped
    Tolerance { max_length_gap: f64 },
}

impl LengthPolicy {
    /// Build a tolerance policy
    ///
    /// # Errors
    /// * `InvalidLengthGap` unless `max_length_gap` is within [0, 1]
    pub fn tolerance(max_length_gap: f64) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&max_length_gap) {
            return Err(ConfigError::InvalidLengthGap(max_length_gap));
        }
        Ok(LengthPolicy::Tolerance { max_length_gap })
    }
}
