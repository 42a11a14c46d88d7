//! Error types for the performance comparison engine

use std::fmt;

/// Errors that can occur during analysis and comparison
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Invalid input parameters (zero sample rate, bad step, mismatched lengths, ...)
    InvalidInput(String),

    /// Segmentation found no notes (silence or near silence)
    NoOnsetsDetected,

    /// Octave normalization did not converge within its iteration bound
    PitchOutOfRange {
        /// Dominant frequency that could not be normalized, in Hz
        frequency: f32,
        /// Iteration ceiling that was exceeded
        max_iterations: usize,
    },

    /// Alignment requested with an empty sequence on one side
    EmptySequence {
        /// Length of the first (sample) sequence
        sample_len: usize,
        /// Length of the second (practice) sequence
        practice_len: usize,
    },

    /// Processing error during analysis
    ProcessingError(String),

    /// Numerical error (overflow, non-finite values, etc.)
    NumericalError(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AnalysisError::NoOnsetsDetected => write!(f, "No notes found"),
            AnalysisError::PitchOutOfRange {
                frequency,
                max_iterations,
            } => write!(
                f,
                "Pitch out of range: {:.3} Hz did not settle into the reference octave within {} steps",
                frequency, max_iterations
            ),
            AnalysisError::EmptySequence {
                sample_len,
                practice_len,
            } => write!(
                f,
                "Insufficient data to compare (sample length {}, practice length {})",
                sample_len, practice_len
            ),
            AnalysisError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
            AnalysisError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}
