//! Analysis and comparison result types

use super::metadata::AnalysisMetadata;
use crate::alignment::ScoreResult;
use crate::features::onset::OnsetEnvelope;
use crate::features::pitch::NoteEvent;
use crate::features::sequence::quantizer::QuantizedSequence;
use crate::features::sequence::OnsetFeatures;
use serde::{Deserialize, Serialize};

/// Everything extracted from one recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingAnalysis {
    /// Detected notes in onset order (skipped segments are absent)
    pub notes: Vec<NoteEvent>,

    /// Pitch and onset-strength sequences at the note onsets
    pub features: OnsetFeatures,

    /// Onset-strength envelope of the whole recording
    pub envelope: OnsetEnvelope,

    /// Analysis metadata
    pub metadata: AnalysisMetadata,
}

impl RecordingAnalysis {
    /// Note onsets in seconds
    pub fn onset_times(&self) -> &[f32] {
        self.features.times()
    }

    /// `(onset_seconds, midi_note)` pairs, e.g. for a piano-roll view
    ///
    /// # Example
    ///
    /// ```no_run
    /// use duet_dsp::{analyze_recording, ComparisonConfig};
    ///
    /// let samples = vec![0.0f32; 44100];
    /// let analysis = analyze_recording(&samples, 44100, &ComparisonConfig::default())?;
    /// for (onset, note) in analysis.note_roll() {
    ///     println!("{:.2}s: {}", onset, note);
    /// }
    /// # Ok::<(), duet_dsp::AnalysisError>(())
    /// ```
    pub fn note_roll(&self) -> Vec<(f32, i32)> {
        self.notes
            .iter()
            .map(|note| (note.onset_seconds, note.midi_note))
            .collect()
    }
}

/// Score of one sample/practice comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Unweighted DTW distance and alignment path over the pitch sequences
    pub score: ScoreResult,

    /// Strength-weighted distance along the same path
    pub weighted_distance: f32,

    /// Quantization step in seconds
    pub step: f32,

    /// Strength weight used for `weighted_distance`
    pub strength_weight: f32,

    /// Quantized sample pitch sequence
    pub sample_chroma: QuantizedSequence,

    /// Quantized practice pitch sequence
    pub practice_chroma: QuantizedSequence,

    /// Quantized, max-normalized sample strengths
    pub sample_strength: QuantizedSequence,

    /// Quantized, max-normalized practice strengths
    pub practice_strength: QuantizedSequence,
}

impl ComparisonResult {
    /// Unweighted DTW distance
    pub fn distance(&self) -> f32 {
        self.score.distance
    }

    /// Alignment path as `(sample_seconds, practice_seconds)` bucket start times
    pub fn aligned_times(&self) -> Vec<(f32, f32)> {
        self.score
            .path
            .iter()
            .map(|(i, j)| {
                (
                    self.sample_chroma.bucket_start(i),
                    self.practice_chroma.bucket_start(j),
                )
            })
            .collect()
    }
}

/// Full comparison of two raw performances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceComparison {
    /// Reference recording
    pub sample: RecordingAnalysis,

    /// Practice attempt
    pub practice: RecordingAnalysis,

    /// Comparison score
    pub comparison: ComparisonResult,
}
