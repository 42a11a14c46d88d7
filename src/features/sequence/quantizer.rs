//! Fixed-step quantization of onset-indexed features
//!
//! Resamples an irregular `(onset_time, value)` sequence onto a uniform grid so
//! two recordings can be compared index by index.
//!
//! Algorithm:
//! 1. Allocate `ceil(max_time / step) + 1` zeroed buckets
//! 2. Bucket `floor(time / step)` receives the value; a later onset in the same
//!    bucket overwrites an earlier one
//!
//! Floor and ceil tolerate `BUCKET_EPSILON` of a bucket so that a time computed
//! as `i × step` lands back in bucket `i` despite rounding.
//!
//! # Example
//!
//! ```no_run
//! use duet_dsp::features::sequence::quantizer::quantize;
//!
//! let quantized = quantize(&[0.0, 0.5, 1.0], &[3.0, 5.0, 7.0], 0.2)?;
//! assert_eq!(quantized.values(), &[3.0, 0.0, 5.0, 0.0, 0.0, 7.0]);
//! # Ok::<(), duet_dsp::AnalysisError>(())
//! ```

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

/// Default quantization step in seconds
pub const DEFAULT_STEP_SECONDS: f32 = 0.2;

/// Rounding tolerance, as a fraction of one bucket
const BUCKET_EPSILON: f32 = 1e-4;

/// Feature values on a fixed time grid
///
/// Bucket `i` covers `[i × step, (i + 1) × step)`; empty buckets hold 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantizedSequence {
    step: f32,
    values: Vec<f32>,
}

impl QuantizedSequence {
    /// Wrap already-gridded values
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` for a non-positive step or
    /// non-finite values
    pub fn from_values(values: Vec<f32>, step: f32) -> Result<Self, AnalysisError> {
        check_step(step)?;
        if values.iter().any(|v| !v.is_finite()) {
            return Err(AnalysisError::InvalidInput(
                "Quantized values must be finite".to_string(),
            ));
        }
        Ok(Self { step, values })
    }

    /// Bucket width in seconds
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Bucket values
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Number of buckets
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if there are no buckets
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Start time of bucket `index` in seconds
    pub fn bucket_start(&self, index: usize) -> f32 {
        index as f32 * self.step
    }

    /// Value at `index`, 0.0 past the end
    pub fn get_or_zero(&self, index: usize) -> f32 {
        self.values.get(index).copied().unwrap_or(0.0)
    }
}

fn check_step(step: f32) -> Result<(), AnalysisError> {
    if !(step.is_finite() && step > 0.0) {
        return Err(AnalysisError::InvalidInput(format!(
            "Quantization step must be positive, got {}",
            step
        )));
    }
    Ok(())
}

/// Quantize `(onset_time, value)` pairs onto a grid of width `step`
///
/// # Arguments
///
/// * `onset_times` - Onset times in seconds (finite, non-negative)
/// * `values` - One value per onset
/// * `step` - Bucket width in seconds
///
/// # Returns
///
/// A sequence of `ceil(max(onset_times) / step) + 1` buckets, or an empty
/// sequence when there are no onsets
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for a non-positive step, mismatched
/// lengths, or negative/non-finite times or values
pub fn quantize(
    onset_times: &[f32],
    values: &[f32],
    step: f32,
) -> Result<QuantizedSequence, AnalysisError> {
    check_step(step)?;

    if onset_times.len() != values.len() {
        return Err(AnalysisError::InvalidInput(format!(
            "Onset/value length mismatch: {} vs {}",
            onset_times.len(),
            values.len()
        )));
    }

    if let Some(t) = onset_times.iter().find(|t| !(t.is_finite() && **t >= 0.0)) {
        return Err(AnalysisError::InvalidInput(format!(
            "Onset times must be finite and non-negative, got {}",
            t
        )));
    }

    if values.iter().any(|v| !v.is_finite()) {
        return Err(AnalysisError::InvalidInput(
            "Feature values must be finite".to_string(),
        ));
    }

    if onset_times.is_empty() {
        return Ok(QuantizedSequence {
            step,
            values: Vec::new(),
        });
    }

    let max_time = onset_times.iter().copied().fold(0.0f32, f32::max);
    let len = (max_time / step - BUCKET_EPSILON).ceil().max(0.0) as usize + 1;

    let mut buckets = vec![0.0f32; len];
    for (&time, &value) in onset_times.iter().zip(values) {
        let index = (time / step + BUCKET_EPSILON).floor() as usize;
        if let Some(bucket) = buckets.get_mut(index) {
            *bucket = value;
        }
    }

    log::debug!(
        "Quantized {} onsets into {} buckets of {:.3}s",
        onset_times.len(),
        len,
        step
    );

    Ok(QuantizedSequence {
        step,
        values: buckets,
    })
}
