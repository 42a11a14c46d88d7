//! Pitch estimation modules
//!
//! Per-segment dominant frequency, octave folding and pitch-class
//! classification, plus the note events built from them.

pub mod estimator;

use crate::features::onset::Segment;
use serde::{Deserialize, Serialize};

/// Note names by pitch class (0 = C)
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Name of a pitch class (wraps modulo 12)
pub fn note_name(pitch_class: u8) -> &'static str {
    NOTE_NAMES[pitch_class as usize % 12]
}

/// MIDI-like note number: `pitch_class + 12 × (octave + 4)`
///
/// A 440 Hz tone (pitch class 9, octave 0) maps to 57. This is comparable
/// to, but offset from, standard MIDI numbering.
pub fn midi_like_note(pitch_class: u8, octave: i32) -> i32 {
    pitch_class as i32 + 12 * (octave + 4)
}

/// One detected note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// Segment the note was estimated from
    pub segment: Segment,

    /// Onset time in seconds
    pub onset_seconds: f32,

    /// Dominant frequency in Hz (> 0)
    pub frequency: f32,

    /// Pitch class, 0 = C … 11 = B
    pub pitch_class: u8,

    /// Octave relative to the reference octave C..B around A = 440 Hz
    pub octave: i32,

    /// MIDI-like note number
    pub midi_note: i32,

    /// Peak absolute amplitude within the segment
    pub peak_amplitude: f32,

    /// Band-passed copy of the segment around the dominant frequency,
    /// only populated when requested in the configuration
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub filtered: Option<Vec<f32>>,
}

impl NoteEvent {
    /// Note name, e.g. `"A"` or `"C#"`
    pub fn name(&self) -> &'static str {
        note_name(self.pitch_class)
    }
}
