//! Audio Test Fixture Generator
//!
//! Writes "sung" WAV files: a 440 Hz tone whose loudness swells and fades in
//! phrases, so two takes with different phrasing have different envelopes.

use std::path::{Path, PathBuf};

/// Configuration for generated audio
#[derive(Debug, Clone)]
pub struct AudioConfig {
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
    /// Loudness swells per second
    pub phrases_per_second: f64,
    /// Peak amplitude as a fraction of full scale
    pub amplitude: f64,
    /// Flip the sign of every sample
    pub invert_polarity: bool,
    /// Write digital silence instead of a tone
    pub silent: bool,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            duration_seconds: 3.0,
            sample_rate: 44100,
            channels: 1,
            phrases_per_second: 1.0,
            amplitude: 0.6,
            invert_polarity: false,
            silent: false,
        }
    }
}

/// Generate a test WAV file with specified configuration
///
/// # Returns
/// Generated file path
pub fn generate_test_wav(path: &Path, config: &AudioConfig) -> anyhow::Result<PathBuf> {
    let spec = hound::WavSpec {
        channels: config.channels,
        sample_rate: config.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    let total_samples = (config.duration_seconds * config.sample_rate as f64) as usize;
    let polarity = if config.invert_polarity { -1.0 } else { 1.0 };

    for i in 0..total_samples {
        let sample = if config.silent {
            0
        } else {
            let t = i as f64 / config.sample_rate as f64;
            let swell = (std::f64::consts::PI * config.phrases_per_second * t).sin().abs();
            let loudness = config.amplitude * (0.15 + 0.85 * swell);
            let tone = (2.0 * std::f64::consts::PI * 440.0 * t).sin();
            (polarity * loudness * tone * i16::MAX as f64) as i16
        };

        for _ in 0..config.channels {
            writer.write_sample(sample)?;
        }
    }

    writer.finalize()?;
    Ok(path.to_path_buf())
}
