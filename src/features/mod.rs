//! Feature extraction modules
//!
//! This module contains the per-recording feature stages:
//! - Onset detection (amplitude segmentation + energy-flux envelope)
//! - Pitch estimation (dominant frequency, pitch class, octave)
//! - Onset-indexed feature sequences and their quantization
//! - The feature provider seam

pub mod onset;
pub mod pitch;
pub mod provider;
pub mod sequence;
