//! Analysis result types
//!
//! - Per-recording analysis (notes, onset features, envelope)
//! - Comparison results (DTW score, weighted score, quantized sequences)
//! - Metadata and flags

pub mod metadata;
pub mod result;
