//! Audio input types
//!
//! Decoding and resampling live outside the engine; this module only wraps
//! already-decoded mono samples.

pub mod sample_buffer;
