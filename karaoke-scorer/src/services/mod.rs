//! Scoring services
//!
//! - Envelope extraction (RMS per window)
//! - Alignment (truncation to a common length)
//! - Similarity scoring (Pearson correlation → 0-100)
//! - Pipeline orchestration

pub mod aligner;
pub mod envelope_extractor;
pub mod scoring_pipeline;
pub mod similarity_scorer;

pub use aligner::Aligner;
pub use envelope_extractor::EnvelopeExtractor;
pub use scoring_pipeline::ScoringPipeline;
pub use similarity_scorer::SimilarityScorer;
