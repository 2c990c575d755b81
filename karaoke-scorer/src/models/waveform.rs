//! Decoded audio

/// Mono PCM samples at their native sample rate
///
/// Immutable once decoded. Multi-channel sources are mixed down to mono by
/// the decoder; `channels` records the source layout for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
    channels: usize,
}

impl Waveform {
    /// Create a mono waveform
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        debug_assert!(sample_rate > 0, "sample rate must be positive");
        Self {
            samples,
            sample_rate,
            channels: 1,
        }
    }

    /// Record the channel count of the source the samples were mixed from
    pub fn with_source_channels(mut self, channels: usize) -> Self {
        self.channels = channels;
        self
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Channel count of the original source
    pub fn source_channels(&self) -> usize {
        self.channels
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration() {
        let waveform = Waveform::new(vec![0.0; 22050], 44100);
        assert_eq!(waveform.duration_seconds(), 0.5);
        assert_eq!(waveform.source_channels(), 1);
        assert_eq!(waveform.with_source_channels(2).source_channels(), 2);
    }
}
