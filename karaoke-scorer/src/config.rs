//! Scoring parameter resolution for karaoke-scorer
//!
//! Provides tiered resolution with CLI → TOML → compiled default priority.

use karaoke_common::config::ScoringConfig;
use tracing::info;

use crate::error::ConfigError;
use crate::models::{EnvelopeConfig, LengthPolicy};

/// Parameters given on the command line; `None` defers to the next tier
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringOverrides {
    pub window_size: Option<usize>,
    pub hop_size: Option<usize>,
    pub max_length_gap: Option<f64>,
}

/// Validated pipeline parameters
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoringSettings {
    pub envelope: EnvelopeConfig,
    pub length_policy: LengthPolicy,
}

/// Merge CLI overrides over the TOML `[scoring]` table and validate
///
/// The TOML table already carries compiled defaults for missing keys.
///
/// # Errors
/// * `ConfigError` - zero window/hop size or gap outside [0, 1]
pub fn resolve_scoring_settings(
    overrides: &ScoringOverrides,
    toml: &ScoringConfig,
) -> Result<ScoringSettings, ConfigError> {
    let window_size = pick("window_size", overrides.window_size, toml.window_size);
    let hop_size = pick("hop_size", overrides.hop_size, toml.hop_size);
    let envelope = EnvelopeConfig::new(window_size, hop_size)?;

    let length_policy = match overrides.max_length_gap.or(toml.max_length_gap) {
        Some(gap) => LengthPolicy::tolerance(gap)?,
        None => LengthPolicy::Truncate,
    };

    info!(
        window_size = envelope.window_size(),
        hop_size = envelope.hop_size(),
        length_policy = ?length_policy,
        "Scoring parameters resolved"
    );

    Ok(ScoringSettings {
        envelope,
        length_policy,
    })
}

fn pick(name: &str, cli: Option<usize>, toml: usize) -> usize {
    match cli {
        Some(value) => {
            info!("{} = {} loaded from command line", name, value);
            value
        }
        None => toml,
    }
}
