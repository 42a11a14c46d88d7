//! Audio preprocessing modules
//!
//! Utilities for conditioning audio and features before analysis:
//! - Normalization (peak, RMS, strength max-normalization)
//! - Band-pass / high-pass filtering

pub mod filter;
pub mod normalization;
