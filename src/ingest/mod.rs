//! Document ingestion: normalization, section classification, chunking,
//! and the orchestrating pipeline.

pub mod chunker;
pub mod classifier;
pub mod handlers;
pub mod normalizer;
pub mod orchestrator;
