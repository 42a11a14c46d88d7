//! Configuration parameters for performance analysis and comparison

use crate::error::AnalysisError;
use crate::preprocessing::normalization::NormalizationMethod;

/// Analysis and comparison configuration parameters
#[derive(Debug, Clone)]
pub struct ComparisonConfig {
    // Preprocessing
    /// Waveform normalization applied to a copy of the buffer before segmentation
    /// (default: None). Segmentation thresholds are relative to the buffer peak,
    /// so this only matters for callers inspecting the conditioned signal.
    pub normalization: NormalizationMethod,

    /// Target RMS level in dB for `NormalizationMethod::Rms` (default: -20.0)
    pub target_rms_db: f32,

    /// High-pass cutoff in Hz applied before segmentation (default: None = disabled)
    pub highpass_cutoff_hz: Option<f32>,

    // Segmentation
    /// Half-width of the local amplitude window in samples (default: 50)
    pub segment_half_window: usize,

    /// Enter threshold as a fraction of the buffer peak (default: 0.2)
    pub enter_threshold_ratio: f32,

    /// Exit threshold as a fraction of the buffer peak (default: 0.04)
    pub exit_threshold_ratio: f32,

    // Pitch estimation
    /// Maximum doubling/halving steps during octave normalization (default: 20)
    pub max_octave_iterations: usize,

    /// Attach a band-pass filtered copy of each note segment (default: false)
    pub attach_filtered_segments: bool,

    /// Half-width of the band-pass around the dominant frequency in Hz (default: 0.1)
    pub bandpass_half_width_hz: f32,

    // Onset strength
    /// Frame size for the onset-strength envelope (default: 2048)
    pub frame_size: usize,

    /// Hop size for the onset-strength envelope (default: 512)
    pub hop_size: usize,

    // Comparison
    /// Quantization step in seconds (default: 0.2)
    pub quantization_step: f32,

    /// Strength weight alpha for the weighted score (default: 0.1)
    pub strength_weight: f32,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            normalization: NormalizationMethod::None,
            target_rms_db: -20.0,
            highpass_cutoff_hz: None,
            segment_half_window: 50,
            enter_threshold_ratio: 0.2,
            exit_threshold_ratio: 0.04,
            max_octave_iterations: 20,
            attach_filtered_segments: false,
            bandpass_half_width_hz: 0.1,
            frame_size: 2048,
            hop_size: 512,
            quantization_step: 0.2,
            strength_weight: 0.1,
        }
    }
}

impl ComparisonConfig {
    /// Check that every parameter is usable
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` naming the first offending field
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.segment_half_window == 0 {
            return Err(AnalysisError::InvalidInput(
                "Segment half window must be > 0".to_string(),
            ));
        }

        if !(self.exit_threshold_ratio > 0.0
            && self.exit_threshold_ratio <= self.enter_threshold_ratio
            && self.enter_threshold_ratio <= 1.0)
        {
            return Err(AnalysisError::InvalidInput(format!(
                "Thresholds must satisfy 0 < exit ({}) <= enter ({}) <= 1",
                self.exit_threshold_ratio, self.enter_threshold_ratio
            )));
        }

        if self.max_octave_iterations == 0 {
            return Err(AnalysisError::InvalidInput(
                "Max octave iterations must be > 0".to_string(),
            ));
        }

        if self.frame_size == 0 || self.hop_size == 0 {
            return Err(AnalysisError::InvalidInput(
                "Frame size and hop size must be > 0".to_string(),
            ));
        }

        if !(self.quantization_step.is_finite() && self.quantization_step > 0.0) {
            return Err(AnalysisError::InvalidInput(format!(
                "Quantization step must be positive, got {}",
                self.quantization_step
            )));
        }

        if !(self.strength_weight.is_finite() && self.strength_weight >= 0.0) {
            return Err(AnalysisError::InvalidInput(format!(
                "Strength weight must be non-negative, got {}",
                self.strength_weight
            )));
        }

        if let Some(cutoff) = self.highpass_cutoff_hz {
            if !(cutoff.is_finite() && cutoff > 0.0) {
                return Err(AnalysisError::InvalidInput(format!(
                    "High-pass cutoff must be positive, got {}",
                    cutoff
                )));
            }
        }

        if !(self.bandpass_half_width_hz.is_finite() && self.bandpass_half_width_hz > 0.0) {
            return Err(AnalysisError::InvalidInput(format!(
                "Band-pass half width must be positive, got {}",
                self.bandpass_half_width_hz
            )));
        }

        Ok(())
    }
}
