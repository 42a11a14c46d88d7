//! Dual-threshold amplitude segmentation
//!
//! Splits a waveform into note segments with a two-state (quiet/active)
//! machine over a sliding local-amplitude envelope.
//!
//! Algorithm:
//! 1. Enter threshold = `enter_ratio × max(|x|)`, exit threshold = `exit_ratio × max(|x|)`
//! 2. For each index `i` in `W..len-W`, take the local max of `|x|` over `[i-W, i+W]`
//!    - quiet and above the enter threshold → active, record boundary `i`
//!    - active and below the exit threshold → quiet, record boundary `i`
//! 3. Bracket the boundaries with `0` and `len`, pair them up, and take each
//!    pair's midpoint (the middle of a quiet stretch)
//! 4. Consecutive midpoints delimit one note; if the buffer ends while still
//!    active, the last note runs to the end of the buffer
//!
//! # Example
//!
//! ```no_run
//! use duet_dsp::features::onset::segmenter::segment;
//!
//! let samples = vec![0.0f32; 44100];
//! let segments = segment(&samples, 44100)?;
//! assert!(segments.is_empty());
//! # Ok::<(), duet_dsp::AnalysisError>(())
//! ```

use super::Segment;
use crate::error::AnalysisError;
use std::collections::VecDeque;

/// Default half-width of the local amplitude window, in samples
pub const DEFAULT_HALF_WINDOW: usize = 50;

/// Default enter threshold as a fraction of the buffer peak
pub const DEFAULT_ENTER_RATIO: f32 = 0.2;

/// Default exit threshold as a fraction of the buffer peak
pub const DEFAULT_EXIT_RATIO: f32 = 0.04;

/// Segmenter parameters
#[derive(Debug, Clone, Copy)]
pub struct SegmenterParams {
    /// Half-width `W` of the local amplitude window
    pub half_window: usize,
    /// Enter threshold ratio
    pub enter_ratio: f32,
    /// Exit threshold ratio
    pub exit_ratio: f32,
}

impl Default for SegmenterParams {
    fn default() -> Self {
        Self {
            half_window: DEFAULT_HALF_WINDOW,
            enter_ratio: DEFAULT_ENTER_RATIO,
            exit_ratio: DEFAULT_EXIT_RATIO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Quiet,
    Active,
}

/// Segment a buffer with the default parameters
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `sample_rate` is zero
pub fn segment(samples: &[f32], sample_rate: u32) -> Result<Vec<Segment>, AnalysisError> {
    segment_with(samples, sample_rate, SegmenterParams::default())
}

/// Segment a buffer into notes
///
/// # Arguments
///
/// * `samples` - Mono audio samples
/// * `sample_rate` - Sample rate in Hz
/// * `params` - Window and threshold parameters
///
/// # Returns
///
/// Non-overlapping segments ordered by start index. Silence yields an empty
/// vector, which is not an error.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `sample_rate` or the half window is zero
pub fn segment_with(
    samples: &[f32],
    sample_rate: u32,
    params: SegmenterParams,
) -> Result<Vec<Segment>, AnalysisError> {
    if sample_rate == 0 {
        return Err(AnalysisError::InvalidInput(
            "Invalid sample rate: 0".to_string(),
        ));
    }

    if params.half_window == 0 {
        return Err(AnalysisError::InvalidInput(
            "Half window must be > 0".to_string(),
        ));
    }

    log::debug!(
        "Segmenting {} samples at {} Hz (W={}, enter={}, exit={})",
        samples.len(),
        sample_rate,
        params.half_window,
        params.enter_ratio,
        params.exit_ratio
    );

    let boundaries = find_boundaries(samples, params);
    let segments = pair_boundaries(&boundaries, samples.len(), sample_rate);

    log::debug!(
        "Segmenter found {} boundaries, {} segments",
        boundaries.len(),
        segments.len()
    );

    Ok(segments)
}

/// Run the quiet/active state machine and return the transition indices
fn find_boundaries(samples: &[f32], params: SegmenterParams) -> Vec<usize> {
    let w = params.half_window;
    let len = samples.len();

    if len < 2 * w + 1 {
        return Vec::new();
    }

    let peak = samples.iter().map(|&x| x.abs()).fold(0.0f32, f32::max);
    if peak <= 0.0 {
        return Vec::new();
    }

    let enter = params.enter_ratio * peak;
    let exit = params.exit_ratio * peak;

    let mut boundaries = Vec::new();
    let mut state = State::Quiet;

    // Sliding-window maximum over |x|: the deque holds indices with
    // decreasing amplitudes, front is the max of the current window.
    let mut window: VecDeque<usize> = VecDeque::with_capacity(2 * w + 1);
    let push = |window: &mut VecDeque<usize>, idx: usize| {
        let value = samples[idx].abs();
        while let Some(&back) = window.back() {
            if samples[back].abs() <= value {
                window.pop_back();
            } else {
                break;
            }
        }
        window.push_back(idx);
    };

    for idx in 0..2 * w {
        push(&mut window, idx);
    }

    for i in w..len - w {
        push(&mut window, i + w);
        while let Some(&front) = window.front() {
            if front + w < i {
                window.pop_front();
            } else {
                break;
            }
        }

        let local_max = window.front().map_or(0.0, |&idx| samples[idx].abs());

        match state {
            State::Quiet if local_max > enter => {
                state = State::Active;
                boundaries.push(i);
            }
            State::Active if local_max < exit => {
                state = State::Quiet;
                boundaries.push(i);
            }
            _ => {}
        }
    }

    boundaries
}

/// Turn transition indices into note segments
fn pair_boundaries(boundaries: &[usize], len: usize, sample_rate: u32) -> Vec<Segment> {
    if boundaries.is_empty() {
        return Vec::new();
    }

    let mut bracketed = Vec::with_capacity(boundaries.len() + 2);
    bracketed.push(0);
    bracketed.extend_from_slice(boundaries);
    bracketed.push(len);

    let midpoints: Vec<usize> = bracketed
        .chunks_exact(2)
        .map(|pair| (pair[0] + pair[1]) / 2)
        .collect();

    let mut edges = midpoints;
    // Odd boundary count: the buffer ended mid-note, close it at the buffer end
    if bracketed.len() % 2 == 1 {
        edges.push(len);
    }

    edges
        .windows(2)
        .filter(|pair| pair[1] > pair[0])
        .map(|pair| Segment::new(pair[0], pair[1], sample_rate))
        .collect()
}
