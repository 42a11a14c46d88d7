//! Amplitude and feature normalization utilities
//!
//! Supports:
//! - Peak normalization of a waveform to [-1.0, 1.0]
//! - RMS normalization of a waveform to a target level
//! - Max-normalization of onset-strength values
//!
//! # Example
//!
//! ```no_run
//! use duet_dsp::preprocessing::normalization::{normalize, NormalizationMethod};
//!
//! let mut samples = vec![0.5f32; 44100];
//! let metadata = normalize(&mut samples, NormalizationMethod::Peak, -20.0)?;
//! println!("Applied gain: {:.2} dB", metadata.gain_db);
//! # Ok::<(), duet_dsp::AnalysisError>(())
//! ```

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

/// Normalization method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalizationMethod {
    /// Leave the waveform untouched
    None,
    /// Scale so the largest absolute sample is 1.0
    Peak,
    /// Scale to a target RMS level in dB (clipping-limited)
    Rms,
}

/// Level metadata returned from normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoudnessMetadata {
    /// Peak level in dB (before normalization); `None` for silent input
    pub peak_db: Option<f32>,
    /// RMS level in dB (before normalization); `None` for silent input
    pub rms_db: Option<f32>,
    /// Gain applied in dB
    pub gain_db: f32,
}

impl Default for LoudnessMetadata {
    fn default() -> Self {
        Self {
            peak_db: None,
            rms_db: None,
            gain_db: 0.0,
        }
    }
}

/// Numerical stability epsilon for divisions
const EPSILON: f32 = 1e-10;

fn to_db(linear: f32) -> Option<f32> {
    (linear > EPSILON).then(|| gain_to_db(linear))
}

fn gain_to_db(gain_linear: f32) -> f32 {
    20.0 * gain_linear.log10()
}

fn peak_of(samples: &[f32]) -> f32 {
    samples.iter().map(|&x| x.abs()).fold(0.0f32, f32::max)
}

fn rms_of(samples: &[f32]) -> f32 {
    (samples.iter().map(|&x| x * x).sum::<f32>() / samples.len() as f32).sqrt()
}

/// Normalize audio samples to a unit peak
fn normalize_peak(samples: &mut [f32]) -> LoudnessMetadata {
    let peak = peak_of(samples);
    let rms = rms_of(samples);

    if peak <= EPSILON {
        log::warn!("Audio is silent or extremely quiet, cannot normalize");
        return LoudnessMetadata::default();
    }

    let gain_linear = 1.0 / peak;
    for sample in samples.iter_mut() {
        *sample *= gain_linear;
    }

    let metadata = LoudnessMetadata {
        peak_db: to_db(peak),
        rms_db: to_db(rms),
        gain_db: gain_to_db(gain_linear),
    };

    log::debug!(
        "Peak normalization: peak={:.2} dB, gain={:.2} dB",
        metadata.peak_db.unwrap_or(f32::NEG_INFINITY),
        metadata.gain_db
    );

    metadata
}

/// Normalize audio samples to a target RMS level
fn normalize_rms(samples: &mut [f32], target_rms_db: f32) -> LoudnessMetadata {
    let rms = rms_of(samples);

    if rms <= EPSILON {
        log::warn!("Audio is silent or extremely quiet, cannot normalize");
        return LoudnessMetadata::default();
    }

    let peak = peak_of(samples);
    let target_rms_linear = 10.0_f32.powf(target_rms_db / 20.0);
    let mut gain_linear = target_rms_linear / rms;

    if peak * gain_linear > 1.0 {
        log::warn!("RMS normalization would cause clipping, limiting gain");
        gain_linear = 1.0 / peak;
    }

    for sample in samples.iter_mut() {
        *sample *= gain_linear;
    }

    let metadata = LoudnessMetadata {
        peak_db: to_db(peak),
        rms_db: to_db(rms),
        gain_db: gain_to_db(gain_linear),
    };

    log::debug!(
        "RMS normalization: rms={:.2} dB, target={:.2} dB, gain={:.2} dB",
        metadata.rms_db.unwrap_or(f32::NEG_INFINITY),
        target_rms_db,
        metadata.gain_db
    );

    metadata
}

/// Normalize audio samples in place
///
/// # Arguments
///
/// * `samples` - Audio samples to normalize (modified in-place)
/// * `method` - Normalization method
/// * `target_rms_db` - Target RMS level, used by `NormalizationMethod::Rms` only
///
/// # Returns
///
/// `LoudnessMetadata` describing the input levels and the applied gain
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `samples` is empty
pub fn normalize(
    samples: &mut [f32],
    method: NormalizationMethod,
    target_rms_db: f32,
) -> Result<LoudnessMetadata, AnalysisError> {
    if samples.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "Empty audio samples".to_string(),
        ));
    }

    log::debug!("Normalizing {} samples using {:?}", samples.len(), method);

    Ok(match method {
        NormalizationMethod::None => LoudnessMetadata {
            peak_db: to_db(peak_of(samples)),
            rms_db: to_db(rms_of(samples)),
            gain_db: 0.0,
        },
        NormalizationMethod::Peak => normalize_peak(samples),
        NormalizationMethod::Rms => normalize_rms(samples, target_rms_db),
    })
}

/// Divide every strength value by the maximum strength
///
/// If the maximum is not positive the values are returned unchanged.
pub fn normalize_strengths(values: &[f32]) -> Vec<f32> {
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);

    if max > 0.0 {
        values.iter().map(|&v| v / max).collect()
    } else {
        values.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Generate a test signal: sine wave at 440 Hz
    fn generate_test_signal(length: usize, amplitude: f32, sample_rate: f32) -> Vec<f32> {
        let freq = 440.0;
        (0..length)
            .map(|i| {
                let t = i as f32 / sample_rate;
                amplitude * (2.0 * std::f32::consts::PI * freq * t).sin()
            })
            .collect()
    }

    #[test]
    fn test_peak_normalization() {
        let mut samples = generate_test_signal(44100, 0.5, 44100.0);

        let metadata = normalize(&mut samples, NormalizationMethod::Peak, -20.0).unwrap();

        let new_peak = peak_of(&samples);
        assert!(
            (new_peak - 1.0).abs() < 1e-4,
            "Peak normalization failed: got {:.4}",
            new_peak
        );
        assert!(metadata.gain_db > 5.9 && metadata.gain_db < 6.1);
    }

    #[test]
    fn test_rms_normalization() {
        let mut samples = generate_test_signal(44100, 0.3, 44100.0);

        normalize(&mut samples, NormalizationMethod::Rms, -20.0).unwrap();

        let rms = rms_of(&samples);
        let target_rms = 10.0_f32.powf(-20.0 / 20.0);
        assert!(
            (rms - target_rms).abs() < 0.01,
            "RMS normalization failed: expected ~{:.3}, got {:.3}",
            target_rms,
            rms
        );
    }

    #[test]
    fn test_rms_normalization_limits_clipping() {
        let mut samples = generate_test_signal(44100, 0.3, 44100.0);

        normalize(&mut samples, NormalizationMethod::Rms, 0.0).unwrap();

        let peak = peak_of(&samples);
        assert!(peak <= 1.0 + 1e-5, "RMS normalization caused clipping");
    }

    #[test]
    fn test_none_leaves_samples() {
        let mut samples = generate_test_signal(1000, 0.3, 44100.0);
        let original = samples.clone();

        let metadata = normalize(&mut samples, NormalizationMethod::None, -20.0).unwrap();
        assert_eq!(samples, original);
        assert_eq!(metadata.gain_db, 0.0);
    }

    #[test]
    fn test_silent_audio() {
        let mut samples = vec![0.0f32; 44100];

        let metadata = normalize(&mut samples, NormalizationMethod::Peak, -20.0).unwrap();
        assert_eq!(metadata.gain_db, 0.0, "Silent audio should not apply gain");
        assert_eq!(metadata.peak_db, None);
        assert_eq!(metadata.rms_db, None);
    }

    #[test]
    fn test_levels_reported_in_db() {
        let mut samples = generate_test_signal(44100, 0.5, 44100.0);

        let metadata = normalize(&mut samples, NormalizationMethod::None, -20.0).unwrap();
        let peak_db = metadata.peak_db.expect("Audible input has a peak level");
        assert!((peak_db + 6.02).abs() < 0.05, "peak {:.2} dB", peak_db);
        assert!(metadata.rms_db.unwrap() < peak_db);
    }

    #[test]
    fn test_empty_samples() {
        let mut samples: Vec<f32> = vec![];
        assert!(normalize(&mut samples, NormalizationMethod::Peak, -20.0).is_err());
    }

    #[test]
    fn test_normalize_strengths() {
        assert_eq!(normalize_strengths(&[2.0, 0.0, 4.0]), vec![0.5, 0.0, 1.0]);
        assert_eq!(normalize_strengths(&[0.0, 0.0]), vec![0.0, 0.0]);
        assert!(normalize_strengths(&[]).is_empty());
    }
}
