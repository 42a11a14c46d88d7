//! Feature provider seam
//!
//! Onset-strength envelopes and per-onset pitch values come from a
//! `FeatureProvider`. The crate ships `NativeFeatureProvider`; callers with
//! their own onset or chroma front-end implement the trait instead.
//!
//! # Example
//!
//! ```no_run
//! use duet_dsp::features::provider::{FeatureProvider, NativeFeatureProvider};
//!
//! let samples = vec![0.0f32; 44100];
//! let provider = NativeFeatureProvider::default();
//! let envelope = provider.onset_strength(&samples, 44100)?;
//! let pitches = provider.pitch_values(&samples, 44100, &[0.0, 0.5])?;
//! # Ok::<(), duet_dsp::AnalysisError>(())
//! ```

use super::onset::energy_flux::energy_flux_envelope;
use super::onset::OnsetEnvelope;
use super::pitch::estimator::{estimate_with, DEFAULT_MAX_OCTAVE_ITERATIONS};
use crate::config::ComparisonConfig;
use crate::error::AnalysisError;

/// Source of onset-strength and pitch features for a buffer
pub trait FeatureProvider {
    /// Onset-strength envelope sampled on a known time grid
    ///
    /// # Errors
    ///
    /// Implementations return `AnalysisError::InvalidInput` for unusable input
    fn onset_strength(&self, samples: &[f32], sample_rate: u32)
        -> Result<OnsetEnvelope, AnalysisError>;

    /// One pitch/chroma value per requested time (same length as `times`)
    ///
    /// # Errors
    ///
    /// Implementations return an error if any value cannot be produced
    fn pitch_values(
        &self,
        samples: &[f32],
        sample_rate: u32,
        times: &[f32],
    ) -> Result<Vec<f32>, AnalysisError>;
}

/// Built-in provider: energy-flux envelope and FFT pitch classes
#[derive(Debug, Clone)]
pub struct NativeFeatureProvider {
    /// Envelope frame size in samples
    pub frame_size: usize,
    /// Envelope hop size in samples
    pub hop_size: usize,
    /// Octave normalization ceiling for pitch values
    pub max_octave_iterations: usize,
}

impl Default for NativeFeatureProvider {
    fn default() -> Self {
        Self {
            frame_size: 2048,
            hop_size: 512,
            max_octave_iterations: DEFAULT_MAX_OCTAVE_ITERATIONS,
        }
    }
}

impl NativeFeatureProvider {
    /// Provider using the envelope and pitch settings of `config`
    pub fn from_config(config: &ComparisonConfig) -> Self {
        Self {
            frame_size: config.frame_size,
            hop_size: config.hop_size,
            max_octave_iterations: config.max_octave_iterations,
        }
    }
}

impl FeatureProvider for NativeFeatureProvider {
    fn onset_strength(
        &self,
        samples: &[f32],
        sample_rate: u32,
    ) -> Result<OnsetEnvelope, AnalysisError> {
        energy_flux_envelope(samples, sample_rate, self.frame_size, self.hop_size)
    }

    /// Pitch class of the window starting at each time and running to the next
    /// time (or the end of the buffer)
    fn pitch_values(
        &self,
        samples: &[f32],
        sample_rate: u32,
        times: &[f32],
    ) -> Result<Vec<f32>, AnalysisError> {
        if sample_rate == 0 {
            return Err(AnalysisError::InvalidInput(
                "Invalid sample rate: 0".to_string(),
            ));
        }

        let to_index = |t: f32| ((t.max(0.0) * sample_rate as f32) as usize).min(samples.len());

        let mut values = Vec::with_capacity(times.len());
        for (k, &time) in times.iter().enumerate() {
            let start = to_index(time);
            let end = times
                .get(k + 1)
                .map(|&next| to_index(next))
                .unwrap_or(samples.len());

            if end <= start {
                return Err(AnalysisError::InvalidInput(format!(
                    "Empty pitch window at {:.3}s",
                    time
                )));
            }

            let pitch = estimate_with(&samples[start..end], sample_rate, self.max_octave_iterations)?;
            values.push(pitch.pitch_class as f32);
        }

        Ok(values)
    }
}
