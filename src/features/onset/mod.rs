//! Onset detection modules
//!
//! - Dual-threshold amplitude segmentation into notes
//! - Energy-flux onset-strength envelope

pub mod energy_flux;
pub mod segmenter;

use serde::{Deserialize, Serialize};

/// Contiguous note segment `[start, end)` in samples
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// First sample of the segment (the note's representative onset)
    pub start: usize,

    /// One past the last sample of the segment
    pub end: usize,

    /// Onset time in seconds (`start / sample_rate`)
    pub onset_seconds: f32,
}

impl Segment {
    /// Create a segment; `sample_rate` must be non-zero
    pub fn new(start: usize, end: usize, sample_rate: u32) -> Self {
        Self {
            start,
            end,
            onset_seconds: start as f32 / sample_rate as f32,
        }
    }

    /// Segment length in samples
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// True if the segment holds no samples
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// End time in seconds
    pub fn end_seconds(&self, sample_rate: u32) -> f32 {
        self.end as f32 / sample_rate as f32
    }
}

/// Onset-strength envelope sampled on a regular time grid
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OnsetEnvelope {
    /// Frame times in seconds (strictly increasing, regular spacing)
    pub times: Vec<f32>,

    /// Onset strength per frame (non-negative)
    pub values: Vec<f32>,
}

impl OnsetEnvelope {
    /// Number of frames
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the envelope has no frames
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Largest strength among frames with `start <= t < end` (0.0 if none)
    pub fn peak_between(&self, start: f32, end: f32) -> f32 {
        self.times
            .iter()
            .zip(&self.values)
            .filter(|(t, _)| **t >= start && **t < end)
            .map(|(_, &v)| v)
            .fold(0.0f32, f32::max)
    }
}
