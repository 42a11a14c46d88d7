//! Analysis metadata structures

use crate::preprocessing::normalization::LoudnessMetadata;
use serde::{Deserialize, Serialize};

/// Non-fatal conditions recorded while analyzing a recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnalysisFlag {
    /// Segmentation found no notes
    NoOnsetsDetected,

    /// A segment was dropped from the note list
    SegmentSkipped {
        /// Index of the segment in segmenter order
        index: usize,
        /// Segment onset in seconds
        onset_seconds: f32,
        /// Why the segment was dropped
        reason: String,
    },
}

/// Metadata for one analyzed recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// Audio duration in seconds
    pub duration_seconds: f32,

    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Processing time in milliseconds
    pub processing_time_ms: f32,

    /// Algorithm version
    pub algorithm_version: String,

    /// Segments produced by the segmenter, before any were skipped
    pub segments_found: usize,

    /// Input levels and gain, when waveform normalization was applied
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub loudness: Option<LoudnessMetadata>,

    /// High-pass cutoff applied before segmentation, if any
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub highpass_cutoff_hz: Option<f32>,

    /// Analysis flags
    pub flags: Vec<AnalysisFlag>,
}

impl Default for AnalysisMetadata {
    fn default() -> Self {
        Self {
            duration_seconds: 0.0,
            sample_rate: 0,
            processing_time_ms: 0.0,
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
            segments_found: 0,
            loudness: None,
            highpass_cutoff_hz: None,
            flags: vec![],
        }
    }
}

impl AnalysisMetadata {
    /// Number of segments dropped from the note list
    pub fn skipped_segments(&self) -> usize {
        self.flags
            .iter()
            .filter(|flag| matches!(flag, AnalysisFlag::SegmentSkipped { .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_carries_crate_version() {
        let metadata = AnalysisMetadata::default();
        assert_eq!(metadata.algorithm_version, env!("CARGO_PKG_VERSION"));
        assert!(metadata.flags.is_empty());
    }

    #[test]
    fn test_skipped_segments() {
        let metadata = AnalysisMetadata {
            flags: vec![
                AnalysisFlag::SegmentSkipped {
                    index: 1,
                    onset_seconds: 0.4,
                    reason: "out of range".to_string(),
                },
                AnalysisFlag::NoOnsetsDetected,
                AnalysisFlag::SegmentSkipped {
                    index: 3,
                    onset_seconds: 1.2,
                    reason: "out of range".to_string(),
                },
            ],
            ..AnalysisMetadata::default()
        };
        assert_eq!(metadata.skipped_segments(), 2);
    }
}
