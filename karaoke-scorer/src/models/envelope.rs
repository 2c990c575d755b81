//! Short-time loudness envelope

/// Per-window RMS energy of a waveform
///
/// Invariant: every value is ≥ 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    values: Vec<f32>,
    hop_size: usize,
    sample_rate: u32,
}

impl Envelope {
    /// Build an envelope from precomputed RMS values
    ///
    /// `hop_size` and `sample_rate` only affect time reporting.
    pub fn new(values: Vec<f32>, hop_size: usize, sample_rate: u32) -> Self {
        debug_assert!(
            values.iter().all(|v| *v >= 0.0),
            "envelope values must be non-negative"
        );
        Self {
            values,
            hop_size,
            sample_rate,
        }
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Number of analysis windows
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Start time of window `index` in seconds
    pub fn window_start_seconds(&self, index: usize) -> f64 {
        (index * self.hop_size) as f64 / self.sample_rate as f64
    }

    /// Largest RMS value, 0.0 for an empty envelope
    pub fn peak(&self) -> f32 {
        self.values.iter().copied().fold(0.0, f32::max)
    }
}
