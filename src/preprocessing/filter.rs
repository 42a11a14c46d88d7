//! Biquad band-pass and high-pass filters
//!
//! Used for optional signal conditioning only: a high-pass pre-filter before
//! segmentation and a narrow band-pass around each note's dominant frequency.
//! Neither affects pitch classification, which always reads the raw spectrum.

use crate::error::AnalysisError;

/// Q values of the two sections of a 4th-order Butterworth response
const BUTTERWORTH_Q: [f64; 2] = [0.541_196_1, 1.306_563];

/// Second-order IIR section (RBJ cookbook coefficients)
///
/// Coefficients and state are kept in f64: very narrow band-passes have poles
/// close to the unit circle and are unstable in single precision.
#[derive(Debug, Clone)]
struct Biquad {
    // Direct Form II transposed state
    s1: f64,
    s2: f64,
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
}

impl Biquad {
    fn from_raw(b0: f64, b1: f64, b2: f64, a0: f64, a1: f64, a2: f64) -> Self {
        Self {
            s1: 0.0,
            s2: 0.0,
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }

    fn highpass(cutoff_hz: f64, q: f64, sample_rate: f64) -> Self {
        let w0 = 2.0 * std::f64::consts::PI * cutoff_hz / sample_rate;
        let cos_w0 = w0.cos();
        let alpha = w0.sin() / (2.0 * q);

        Self::from_raw(
            (1.0 + cos_w0) / 2.0,
            -(1.0 + cos_w0),
            (1.0 + cos_w0) / 2.0,
            1.0 + alpha,
            -2.0 * cos_w0,
            1.0 - alpha,
        )
    }

    /// Constant 0 dB peak gain band-pass
    fn bandpass(center_hz: f64, q: f64, sample_rate: f64) -> Self {
        let w0 = 2.0 * std::f64::consts::PI * center_hz / sample_rate;
        let cos_w0 = w0.cos();
        let alpha = w0.sin() / (2.0 * q);

        Self::from_raw(alpha, 0.0, -alpha, 1.0 + alpha, -2.0 * cos_w0, 1.0 - alpha)
    }

    fn process(&mut self, sample: f64) -> f64 {
        let output = self.b0 * sample + self.s1;
        self.s1 = self.b1 * sample + self.s2 - self.a1 * output;
        self.s2 = self.b2 * sample - self.a2 * output;
        output
    }
}

fn run_cascade(samples: &[f32], mut sections: Vec<Biquad>) -> Vec<f32> {
    samples
        .iter()
        .map(|&x| {
            let y = sections
                .iter_mut()
                .fold(x as f64, |acc, section| section.process(acc));
            y as f32
        })
        .collect()
}

fn check_frequency(name: &str, freq: f32, sample_rate: u32) -> Result<(), AnalysisError> {
    if sample_rate == 0 {
        return Err(AnalysisError::InvalidInput(
            "Invalid sample rate: 0".to_string(),
        ));
    }

    let nyquist = sample_rate as f32 / 2.0;
    if !(freq.is_finite() && freq > 0.0 && freq < nyquist) {
        return Err(AnalysisError::InvalidInput(format!(
            "{} frequency {:.3} Hz outside (0, {:.1}) Hz",
            name, freq, nyquist
        )));
    }

    Ok(())
}

/// 4th-order Butterworth high-pass
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if the cutoff is not inside (0, Nyquist)
pub fn highpass(samples: &[f32], cutoff_hz: f32, sample_rate: u32) -> Result<Vec<f32>, AnalysisError> {
    check_frequency("Cutoff", cutoff_hz, sample_rate)?;

    log::debug!(
        "High-pass filtering {} samples at {:.1} Hz",
        samples.len(),
        cutoff_hz
    );

    let sections = BUTTERWORTH_Q
        .iter()
        .map(|&q| Biquad::highpass(cutoff_hz as f64, q, sample_rate as f64))
        .collect();

    Ok(run_cascade(samples, sections))
}

/// Two cascaded band-pass sections between `low_hz` and `high_hz`
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` unless `0 < low_hz < high_hz < Nyquist`
pub fn bandpass(
    samples: &[f32],
    low_hz: f32,
    high_hz: f32,
    sample_rate: u32,
) -> Result<Vec<f32>, AnalysisError> {
    check_frequency("Low edge", low_hz, sample_rate)?;
    check_frequency("High edge", high_hz, sample_rate)?;

    if low_hz >= high_hz {
        return Err(AnalysisError::InvalidInput(format!(
            "Band-pass edges out of order: {:.3} >= {:.3}",
            low_hz, high_hz
        )));
    }

    let low = low_hz as f64;
    let high = high_hz as f64;
    let center = (low * high).sqrt();
    let q = center / (high - low);

    log::debug!(
        "Band-pass filtering {} samples: center={:.3} Hz, Q={:.1}",
        samples.len(),
        center,
        q
    );

    let sections = (0..2)
        .map(|_| Biquad::bandpass(center, q, sample_rate as f64))
        .collect();

    Ok(run_cascade(samples, sections))
}
