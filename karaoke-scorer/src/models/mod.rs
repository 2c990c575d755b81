//! Data models for karaoke-scorer
//!
//! Values flow strictly downstream:
//! `Waveform` → `Envelope` → `AlignedPair` → `Score`

pub mod alignment;
pub mod envelope;
pub mod parameters;
pub mod score;
pub mod waveform;

pub use alignment::AlignedPair;
pub use envelope::Envelope;
pub use parameters::{EnvelopeConfig, LengthPolicy};
pub use score::{Score, ScoreReport};
pub use waveform::Waveform;
