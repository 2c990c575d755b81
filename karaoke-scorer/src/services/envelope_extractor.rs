//! RMS loudness envelope extraction
//!
//! Windowing policy: window `k` starts at sample `k * hop_size` for
//! `k = 0 .. ceil(n / hop_size)` and spans `window_size` samples. Samples
//! past the end of the waveform count as zeros, so every RMS value is
//! `sqrt(sum(x²) / window_size)`.

use crate::models::{Envelope, EnvelopeConfig, Waveform};

/// Envelope extractor service
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvelopeExtractor {
    config: EnvelopeConfig,
}

impl EnvelopeExtractor {
    pub fn new(config: EnvelopeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EnvelopeConfig {
        &self.config
    }

    /// Compute the RMS envelope of a waveform
    ///
    /// Output length is `ceil(waveform.len() / hop_size)`; an empty waveform
    /// yields an empty envelope.
    pub fn extract(&self, waveform: &Waveform) -> Envelope {
        let samples = waveform.samples();
        let window_size = self.config.window_size();
        let hop_size = self.config.hop_size();
        let frame_count = self.config.frame_count(samples.len());

        let mut values = Vec::with_capacity(frame_count);
        for frame in 0..frame_count {
            let start = frame * hop_size;
            // window_size is only bounded below, so the window end may not fit in usize
            let end = start.saturating_add(window_size).min(samples.len());
            values.push(window_rms(&samples[start..end], window_size));
        }

        let envelope = Envelope::new(values, hop_size, waveform.sample_rate());

        tracing::debug!(
            samples = samples.len(),
            sample_rate = waveform.sample_rate(),
            window_size,
            hop_size,
            frames = envelope.len(),
            peak = envelope.peak(),
            "Envelope extracted"
        );

        envelope
    }
}

/// RMS of one window, treating missing tail samples as zeros
fn window_rms(window: &[f32], window_size: usize) -> f32 {
    let sum_squares: f64 = window.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_squares / window_size as f64).sqrt() as f32
}
