//! Energy flux onset-strength envelope
//!
//! Onset strength from the frame-by-frame energy derivative.
//!
//! Algorithm:
//! 1. Divide audio into overlapping frames (frame_size, hop_size)
//! 2. Compute RMS energy per frame
//! 3. Compute energy derivative (flux): E_flux[n] = max(0, E[n] - E[n-1])
//! 4. Stamp each flux value with the start time of the later frame
//!
//! # Example
//!
//! ```no_run
//! use duet_dsp::features::onset::energy_flux::energy_flux_envelope;
//!
//! let samples = vec![0.0f32; 44100 * 30];
//! let envelope = energy_flux_envelope(&samples, 44100, 2048, 512)?;
//! println!("{} frames", envelope.len());
//! # Ok::<(), duet_dsp::AnalysisError>(())
//! ```

use super::OnsetEnvelope;
use crate::error::AnalysisError;

/// Compute the energy-flux onset-strength envelope
///
/// # Reference
///
/// Bello, J. P., Daudet, L., Abdallah, S., Duxbury, C., Davies, M., & Sandler, M. B. (2005).
/// A Tutorial on Onset Detection in Music Signals.
/// *IEEE Transactions on Speech and Audio Processing*, 13(5), 1035-1047.
///
/// # Arguments
///
/// * `samples` - Audio samples (mono)
/// * `sample_rate` - Sample rate in Hz
/// * `frame_size` - Frame size for analysis (typically 2048)
/// * `hop_size` - Hop size between frames (typically 512)
///
/// # Returns
///
/// Envelope with one value per frame after the first. Audio shorter than two
/// frames yields an empty envelope.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if any parameter is zero
pub fn energy_flux_envelope(
    samples: &[f32],
    sample_rate: u32,
    frame_size: usize,
    hop_size: usize,
) -> Result<OnsetEnvelope, AnalysisError> {
    if sample_rate == 0 {
        return Err(AnalysisError::InvalidInput(
            "Invalid sample rate: 0".to_string(),
        ));
    }

    if frame_size == 0 {
        return Err(AnalysisError::InvalidInput(
            "Frame size must be > 0".to_string(),
        ));
    }

    if hop_size == 0 {
        return Err(AnalysisError::InvalidInput(
            "Hop size must be > 0".to_string(),
        ));
    }

    if frame_size > samples.len() {
        log::warn!(
            "Frame size ({}) larger than audio length ({}), returning empty envelope",
            frame_size,
            samples.len()
        );
        return Ok(OnsetEnvelope::default());
    }

    let num_frames = (samples.len() - frame_size) / hop_size + 1;
    if num_frames < 2 {
        return Ok(OnsetEnvelope::default());
    }

    log::debug!(
        "Computing energy flux envelope: {} samples, frame={}, hop={}",
        samples.len(),
        frame_size,
        hop_size
    );

    let frame_energies: Vec<f32> = (0..num_frames)
        .map(|i| {
            let start = i * hop_size;
            let frame = &samples[start..start + frame_size];
            (frame.iter().map(|&x| x * x).sum::<f32>() / frame_size as f32).sqrt()
        })
        .collect();

    let values: Vec<f32> = frame_energies
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).max(0.0))
        .collect();

    let times: Vec<f32> = (1..num_frames)
        .map(|i| (i * hop_size) as f32 / sample_rate as f32)
        .collect();

    Ok(OnsetEnvelope { times, values })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_energy_flux_step() {
        // Silence then a constant signal from sample 5000
        let mut samples = vec![0.0f32; 44100];
        for sample in samples.iter_mut().skip(5000) {
            *sample = 0.5;
        }

        let envelope = energy_flux_envelope(&samples, 44100, 2048, 512).unwrap();
        assert_eq!(envelope.times.len(), envelope.values.len());

        let (peak_idx, _) = envelope
            .values
            .iter()
            .enumerate()
            .fold((0, f32::MIN), |best, (i, &v)| if v > best.1 { (i, v) } else { best });
        let peak_time = envelope.times[peak_idx];
        assert!(
            peak_time > 3000.0 / 44100.0 && peak_time < 8000.0 / 44100.0,
            "Flux peak should be near the step, got {:.3}s",
            peak_time
        );
    }

    #[test]
    fn test_energy_flux_silent_audio() {
        let samples = vec![0.0f32; 44100];
        let envelope = energy_flux_envelope(&samples, 44100, 2048, 512).unwrap();
        assert!(envelope.values.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_energy_flux_too_short_audio() {
        let samples = vec![0.5f32; 1000];
        let envelope = energy_flux_envelope(&samples, 44100, 2048, 512).unwrap();
        assert!(envelope.is_empty());
    }

    #[test]
    fn test_energy_flux_invalid_parameters() {
        let samples = vec![0.5f32; 44100];
        assert!(energy_flux_envelope(&samples, 44100, 0, 512).is_err());
        assert!(energy_flux_envelope(&samples, 44100, 2048, 0).is_err());
        assert!(energy_flux_envelope(&samples, 0, 2048, 512).is_err());
    }

    #[test]
    fn test_energy_flux_times_are_regular() {
        let samples = vec![0.1f32; 44100];
        let envelope = energy_flux_envelope(&samples, 44100, 2048, 512).unwrap();
        for pair in envelope.times.windows(2) {
            assert!((pair[1] - pair[0] - 512.0 / 44100.0).abs() < 1e-5);
        }
    }
}
