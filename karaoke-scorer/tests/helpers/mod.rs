//! Test Helper Utilities
//!
//! Shared utilities for karaoke-scorer integration tests

pub mod audio_generator;

pub use audio_generator::{generate_test_wav, AudioConfig};
