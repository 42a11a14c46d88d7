//! Onset-indexed feature sequences
//!
//! - `FeatureSequence`: irregular `(onset_time, value)` pairs per recording
//! - `OnsetFeatures`: the pitch and strength sequences of one recording
//! - Quantization onto a fixed time grid

pub mod quantizer;

use crate::error::AnalysisError;
use crate::preprocessing::normalization::normalize_strengths;
use quantizer::{quantize, QuantizedSequence};
use serde::{Deserialize, Serialize};

/// Ordered `(onset_time, value)` pairs with strictly increasing times
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureSequence {
    times: Vec<f32>,
    values: Vec<f32>,
}

impl FeatureSequence {
    /// Build a sequence from parallel time/value vectors
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if the lengths differ, a time is
    /// negative or non-finite, times are not strictly increasing, or a value is
    /// non-finite
    pub fn new(times: Vec<f32>, values: Vec<f32>) -> Result<Self, AnalysisError> {
        if times.len() != values.len() {
            return Err(AnalysisError::InvalidInput(format!(
                "Time/value length mismatch: {} vs {}",
                times.len(),
                values.len()
            )));
        }

        if times.iter().any(|t| !(t.is_finite() && *t >= 0.0)) {
            return Err(AnalysisError::InvalidInput(
                "Onset times must be finite and non-negative".to_string(),
            ));
        }

        if let Some(idx) = times.windows(2).position(|pair| pair[1] <= pair[0]) {
            return Err(AnalysisError::InvalidInput(format!(
                "Onset times must be strictly increasing (index {}: {} -> {})",
                idx + 1,
                times[idx],
                times[idx + 1]
            )));
        }

        if values.iter().any(|v| !v.is_finite()) {
            return Err(AnalysisError::InvalidInput(
                "Feature values must be finite".to_string(),
            ));
        }

        Ok(Self { times, values })
    }

    /// Onset times in seconds
    pub fn times(&self) -> &[f32] {
        &self.times
    }

    /// Values, one per onset
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Number of onsets
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// True if there are no onsets
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Iterate over `(onset_time, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.times.iter().copied().zip(self.values.iter().copied())
    }

    /// Copy with values divided by the maximum value (unchanged if the max is 0)
    pub fn max_normalized(&self) -> Self {
        Self {
            times: self.times.clone(),
            values: normalize_strengths(&self.values),
        }
    }

    /// Quantize onto a grid of width `step` seconds
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` for a non-positive step
    pub fn quantize(&self, step: f32) -> Result<QuantizedSequence, AnalysisError> {
        quantize(&self.times, &self.values, step)
    }
}

/// Pitch/chroma and onset-strength sequences sharing one onset grid
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OnsetFeatures {
    /// Pitch class (or chroma value) per onset
    pub chroma: FeatureSequence,

    /// Onset strength per onset, not yet normalized
    pub strength: FeatureSequence,
}

impl OnsetFeatures {
    /// Build both sequences from parallel vectors
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` under the same conditions as
    /// [`FeatureSequence::new`], or if a strength is negative
    pub fn new(times: Vec<f32>, chroma: Vec<f32>, strength: Vec<f32>) -> Result<Self, AnalysisError> {
        if strength.iter().any(|&s| s < 0.0) {
            return Err(AnalysisError::InvalidInput(
                "Onset strengths must be non-negative".to_string(),
            ));
        }

        Ok(Self {
            chroma: FeatureSequence::new(times.clone(), chroma)?,
            strength: FeatureSequence::new(times, strength)?,
        })
    }

    /// Onset times in seconds
    pub fn times(&self) -> &[f32] {
        self.chroma.times()
    }

    /// Number of onsets
    pub fn len(&self) -> usize {
        self.chroma.len()
    }

    /// True if there are no onsets
    pub fn is_empty(&self) -> bool {
        self.chroma.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unordered_times() {
        assert!(FeatureSequence::new(vec![0.0, 0.5, 0.5], vec![1.0, 2.0, 3.0]).is_err());
        assert!(FeatureSequence::new(vec![0.5, 0.1], vec![1.0, 2.0]).is_err());
        assert!(FeatureSequence::new(vec![-0.1], vec![1.0]).is_err());
        assert!(FeatureSequence::new(vec![0.0], vec![]).is_err());
    }

    #[test]
    fn test_max_normalized() {
        let sequence = FeatureSequence::new(vec![0.0, 0.5, 1.0], vec![2.0, 0.0, 4.0]).unwrap();
        let normalized = sequence.max_normalized();
        assert_eq!(normalized.values(), &[0.5, 0.0, 1.0]);
        assert_eq!(normalized.times(), sequence.times());

        let silent = FeatureSequence::new(vec![0.0, 0.5], vec![0.0, 0.0]).unwrap();
        assert_eq!(silent.max_normalized(), silent);
    }

    #[test]
    fn test_quantize_through_sequence() {
        let sequence = FeatureSequence::new(vec![0.0, 0.5, 1.0], vec![0.0, 5.0, 7.0]).unwrap();
        let q = sequence.quantize(0.5).unwrap();
        assert_eq!(q.values(), &[0.0, 5.0, 7.0]);
        assert_eq!(sequence.iter().count(), 3);
    }

    #[test]
    fn test_onset_features_share_times() {
        let features =
            OnsetFeatures::new(vec![0.0, 0.5], vec![9.0, 0.0], vec![1.0, 0.25]).unwrap();
        assert_eq!(features.times(), &[0.0, 0.5]);
        assert_eq!(features.strength.times(), features.chroma.times());
        assert_eq!(features.len(), 2);

        assert!(OnsetFeatures::new(vec![0.0, 0.5], vec![9.0], vec![1.0, 0.25]).is_err());
        assert!(OnsetFeatures::new(vec![0.0], vec![9.0], vec![-1.0]).is_err());
    }
}
