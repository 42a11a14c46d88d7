//! Immutable mono sample buffer

use crate::error::AnalysisError;

/// Decoded mono waveform with its sample rate
///
/// The buffer borrows the caller's samples; the engine never mutates them.
#[derive(Debug, Clone, Copy)]
pub struct SampleBuffer<'a> {
    samples: &'a [f32],
    sample_rate: u32,
}

impl<'a> SampleBuffer<'a> {
    /// Wrap decoded samples
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if the sample rate is zero or a
    /// sample is not finite
    pub fn new(samples: &'a [f32], sample_rate: u32) -> Result<Self, AnalysisError> {
        if sample_rate == 0 {
            return Err(AnalysisError::InvalidInput(
                "Invalid sample rate: 0".to_string(),
            ));
        }

        if let Some(idx) = samples.iter().position(|s| !s.is_finite()) {
            return Err(AnalysisError::InvalidInput(format!(
                "Non-finite sample at index {}",
                idx
            )));
        }

        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Raw samples
    pub fn samples(&self) -> &'a [f32] {
        self.samples
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if the buffer holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration_seconds(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Peak absolute amplitude (0.0 for an empty buffer)
    pub fn peak(&self) -> f32 {
        self.samples.iter().map(|&x| x.abs()).fold(0.0f32, f32::max)
    }

    /// Convert a sample index to seconds
    pub fn time_of(&self, index: usize) -> f32 {
        index as f32 / self.sample_rate as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_sample_rate() {
        let samples = vec![0.0f32; 10];
        assert!(SampleBuffer::new(&samples, 0).is_err());
    }

    #[test]
    fn test_rejects_nan() {
        let samples = vec![0.0, f32::NAN, 0.1];
        let err = SampleBuffer::new(&samples, 44100).unwrap_err();
        assert!(err.to_string().contains("index 1"));
    }

    #[test]
    fn test_duration_and_peak() {
        let samples = vec![0.1, -0.8, 0.5, 0.0];
        let buffer = SampleBuffer::new(&samples, 4).unwrap();
        assert_eq!(buffer.len(), 4);
        assert!((buffer.duration_seconds() - 1.0).abs() < 1e-6);
        assert!((buffer.peak() - 0.8).abs() < 1e-6);
        assert!((buffer.time_of(2) - 0.5).abs() < 1e-6);
    }
}
