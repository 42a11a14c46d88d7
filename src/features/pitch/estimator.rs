//! Dominant-frequency pitch estimation
//!
//! Finds the strongest bin of a segment's magnitude spectrum, folds that
//! frequency into the reference octave C..B (254.284 Hz to 508.5675 Hz) and
//! classifies it into one of 12 semitone bins.
//!
//! # Example
//!
//! ```no_run
//! use duet_dsp::features::pitch::estimator::estimate;
//!
//! let samples: Vec<f32> = (0..44100)
//!     .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 44100.0).sin())
//!     .collect();
//! let pitch = estimate(&samples, 44100)?;
//! assert_eq!(pitch.pitch_class, 9); // A
//! # Ok::<(), duet_dsp::AnalysisError>(())
//! ```

use crate::error::AnalysisError;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Lower edge of the reference octave (C), in Hz
pub const REFERENCE_OCTAVE_LOW_HZ: f32 = 254.284;

/// Upper, exclusive edge of the reference octave, in Hz
pub const REFERENCE_OCTAVE_HIGH_HZ: f32 = 508.5675;

/// Default ceiling on doubling/halving steps
pub const DEFAULT_MAX_OCTAVE_ITERATIONS: usize = 20;

/// Semitone bin edges of the reference octave, C through B
const PITCH_CLASS_EDGES_HZ: [f32; 13] = [
    254.284, 269.4045, 285.424, 302.396, 320.3775, 339.428, 359.611, 380.9945, 403.65, 427.6525,
    453.082, 480.0235, 508.5675,
];

/// Result of estimating one segment's pitch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchEstimate {
    /// Dominant frequency before octave folding, in Hz
    pub frequency: f32,
    /// Pitch class, 0 = C … 11 = B
    pub pitch_class: u8,
    /// Octave offset from the reference octave (negative below it)
    pub octave: i32,
}

/// Estimate pitch with the default iteration ceiling
///
/// # Errors
///
/// See [`estimate_with`]
pub fn estimate(segment: &[f32], sample_rate: u32) -> Result<PitchEstimate, AnalysisError> {
    estimate_with(segment, sample_rate, DEFAULT_MAX_OCTAVE_ITERATIONS)
}

/// Estimate the dominant frequency, pitch class and octave of a segment
///
/// # Arguments
///
/// * `segment` - Samples of one note
/// * `sample_rate` - Sample rate in Hz
/// * `max_iterations` - Ceiling on octave doubling/halving steps
///
/// # Errors
///
/// - `AnalysisError::InvalidInput` for an empty segment or zero sample rate
/// - `AnalysisError::PitchOutOfRange` if the dominant frequency cannot be
///   folded into the reference octave (e.g. a DC peak at 0 Hz)
pub fn estimate_with(
    segment: &[f32],
    sample_rate: u32,
    max_iterations: usize,
) -> Result<PitchEstimate, AnalysisError> {
    let frequency = dominant_frequency(segment, sample_rate)?;
    let (normalized, octave) = normalize_octave(frequency, max_iterations)?;
    let pitch_class = classify(normalized).ok_or_else(|| AnalysisError::PitchOutOfRange {
        frequency,
        max_iterations,
    })?;

    log::debug!(
        "Segment of {} samples: {:.2} Hz -> class {} octave {}",
        segment.len(),
        frequency,
        pitch_class,
        octave
    );

    Ok(PitchEstimate {
        frequency,
        pitch_class,
        octave,
    })
}

/// Magnitude spectrum of a real signal, first `len / 2 + 1` bins
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `samples` is empty
pub fn magnitude_spectrum(samples: &[f32]) -> Result<Vec<f32>, AnalysisError> {
    if samples.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "Empty segment".to_string(),
        ));
    }

    let n = samples.len();
    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(n);

    let mut buffer: Vec<Complex<f32>> = samples.iter().map(|&x| Complex::new(x, 0.0)).collect();
    fft.process(&mut buffer);

    Ok(buffer[..n / 2 + 1].iter().map(|c| c.norm()).collect())
}

/// Frequency of the strongest spectrum bin, `argmax × sample_rate / len`
///
/// Ties resolve to the lowest bin.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for an empty segment or zero sample rate
pub fn dominant_frequency(segment: &[f32], sample_rate: u32) -> Result<f32, AnalysisError> {
    if sample_rate == 0 {
        return Err(AnalysisError::InvalidInput(
            "Invalid sample rate: 0".to_string(),
        ));
    }

    let magnitudes = magnitude_spectrum(segment)?;

    let (peak_bin, _) = magnitudes
        .iter()
        .enumerate()
        .fold((0usize, f32::NEG_INFINITY), |best, (bin, &mag)| {
            if mag > best.1 {
                (bin, mag)
            } else {
                best
            }
        });

    Ok(peak_bin as f32 * sample_rate as f32 / segment.len() as f32)
}

/// Fold a frequency into `[254.284, 508.5675)` Hz
///
/// Each doubling lowers the octave counter by one and each halving raises it.
/// A halving that would land below 254.284 Hz is clamped to it, so the
/// returned frequency is not always an exact power-of-two multiple of the input.
///
/// # Returns
///
/// `(normalized_frequency, octave)`
///
/// # Errors
///
/// Returns `AnalysisError::PitchOutOfRange` for non-positive or non-finite
/// input, or when more than `max_iterations` steps would be needed
pub fn normalize_octave(frequency: f32, max_iterations: usize) -> Result<(f32, i32), AnalysisError> {
    let out_of_range = AnalysisError::PitchOutOfRange {
        frequency,
        max_iterations,
    };

    if !(frequency.is_finite() && frequency > 0.0) {
        return Err(out_of_range);
    }

    let mut f = frequency;
    let mut octave = 0i32;
    let mut steps = 0usize;

    loop {
        if f < REFERENCE_OCTAVE_LOW_HZ {
            f *= 2.0;
            octave -= 1;
        } else if f >= REFERENCE_OCTAVE_HIGH_HZ {
            // The band is a hair narrower than an octave; keep halving from
            // landing just under the low edge and bouncing back up.
            f = (f / 2.0).max(REFERENCE_OCTAVE_LOW_HZ);
            octave += 1;
        } else {
            return Ok((f, octave));
        }

        steps += 1;
        if steps > max_iterations {
            log::warn!(
                "Octave normalization of {:.3} Hz exceeded {} steps",
                frequency,
                max_iterations
            );
            return Err(out_of_range);
        }
    }
}

/// Pitch class (0 = C … 11 = B) of a frequency inside the reference octave
///
/// Returns `None` outside `[254.284, 508.5675)`.
pub fn classify(normalized_frequency: f32) -> Option<u8> {
    PITCH_CLASS_EDGES_HZ
        .windows(2)
        .position(|edge| normalized_frequency >= edge[0] && normalized_frequency < edge[1])
        .map(|idx| idx as u8)
}
