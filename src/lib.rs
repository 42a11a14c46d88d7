//! # Duet DSP
//!
//! A performance comparison engine for music practice: scores how closely a
//! practice attempt follows a reference recording.
//!
//! ## Features
//!
//! - **Note Segmentation**: Dual-threshold amplitude state machine with hysteresis
//! - **Pitch Estimation**: FFT dominant frequency, bounded octave folding, 12 pitch classes
//! - **Quantization**: Onset-indexed features resampled onto a fixed time grid
//! - **Alignment**: Dynamic time warping with a strength-weighted rescoring
//!
//! ## Quick Start
//!
//! ```no_run
//! use duet_dsp::{compare_performances, ComparisonConfig};
//!
//! // Decoded mono samples for both recordings
//! let sample: Vec<f32> = vec![];
//! let practice: Vec<f32> = vec![];
//!
//! let result = compare_performances(&sample, 44100, &practice, 44100, &ComparisonConfig::default())?;
//!
//! println!("DTW distance: {:.2}", result.comparison.distance());
//! println!("Weighted distance: {:.2}", result.comparison.weighted_distance);
//! # Ok::<(), duet_dsp::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Samples → Preprocessing → Segmentation → Pitch Estimation → Feature Sequences
//!         → Quantization → DTW Alignment → Score
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod alignment;
pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod preprocessing;

// Re-export main types
pub use alignment::{AlignmentPath, ScoreResult};
pub use analysis::metadata::{AnalysisFlag, AnalysisMetadata};
pub use analysis::result::{ComparisonResult, PerformanceComparison, RecordingAnalysis};
pub use config::ComparisonConfig;
pub use error::AnalysisError;
pub use features::pitch::NoteEvent;
pub use features::provider::{FeatureProvider, NativeFeatureProvider};
pub use features::sequence::{FeatureSequence, OnsetFeatures};

use alignment::dtw::{align, align_values};
use alignment::weighted::weighted_distance;
use features::onset::segmenter::{segment_with, SegmenterParams};
use features::pitch::estimator::estimate_with;
use features::pitch::midi_like_note;
use io::sample_buffer::SampleBuffer;
use preprocessing::filter::{bandpass, highpass};
use preprocessing::normalization::{normalize, NormalizationMethod};

/// Analyze one recording with the built-in feature provider
///
/// # Arguments
///
/// * `samples` - Mono audio samples (not modified)
/// * `sample_rate` - Sample rate in Hz
/// * `config` - Analysis configuration parameters
///
/// # Returns
///
/// Notes, onset features and metadata. Silence yields an empty note list and
/// an `AnalysisFlag::NoOnsetsDetected` flag rather than an error.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for a zero sample rate, non-finite
/// samples or an invalid configuration
///
/// # Example
///
/// ```no_run
/// use duet_dsp::{analyze_recording, ComparisonConfig};
///
/// let samples = vec![0.0f32; 44100 * 5];
/// let analysis = analyze_recording(&samples, 44100, &ComparisonConfig::default())?;
/// println!("{} notes", analysis.notes.len());
/// # Ok::<(), duet_dsp::AnalysisError>(())
/// ```
pub fn analyze_recording(
    samples: &[f32],
    sample_rate: u32,
    config: &ComparisonConfig,
) -> Result<RecordingAnalysis, AnalysisError> {
    let provider = NativeFeatureProvider::from_config(config);
    analyze_recording_with(&provider, samples, sample_rate, config)
}

/// Analyze one recording, taking onset strength and pitch values from `provider`
///
/// Notes always come from the built-in segmenter and pitch estimator. The
/// provider supplies the onset-strength envelope and the pitch value of each
/// note, read from the buffer up to the end of that note's segment. A note
/// without a pitch value is dropped and flagged as `AnalysisFlag::SegmentSkipped`.
///
/// # Errors
///
/// As [`analyze_recording`], plus an envelope error from the provider, or
/// `AnalysisError::ProcessingError` if it returns the wrong number of pitch values
pub fn analyze_recording_with<P: FeatureProvider + ?Sized>(
    provider: &P,
    samples: &[f32],
    sample_rate: u32,
    config: &ComparisonConfig,
) -> Result<RecordingAnalysis, AnalysisError> {
    use std::time::Instant;
    let start_time = Instant::now();

    config.validate()?;
    let buffer = SampleBuffer::new(samples, sample_rate)?;

    log::debug!(
        "Starting recording analysis: {} samples at {} Hz",
        buffer.len(),
        sample_rate
    );

    // Preprocessing works on a copy; the caller's buffer is never touched
    let mut conditioned = buffer.samples().to_vec();

    let loudness = if config.normalization != NormalizationMethod::None && !conditioned.is_empty() {
        Some(normalize(
            &mut conditioned,
            config.normalization,
            config.target_rms_db,
        )?)
    } else {
        None
    };

    if let Some(cutoff) = config.highpass_cutoff_hz {
        conditioned = highpass(&conditioned, cutoff, sample_rate)?;
    }

    // Segmentation
    let params = SegmenterParams {
        half_window: config.segment_half_window,
        enter_ratio: config.enter_threshold_ratio,
        exit_ratio: config.exit_threshold_ratio,
    };
    let segments = segment_with(&conditioned, sample_rate, params)?;

    let mut flags = Vec::new();
    if segments.is_empty() {
        log::warn!("No notes found in {:.2}s of audio", buffer.duration_seconds());
        flags.push(AnalysisFlag::NoOnsetsDetected);
    }

    // Pitch estimation, one note per segment
    let mut notes = Vec::with_capacity(segments.len());
    let mut note_indices = Vec::with_capacity(segments.len());
    for (index, segment) in segments.iter().enumerate() {
        let slice = &conditioned[segment.start..segment.end];

        let pitch = match estimate_with(slice, sample_rate, config.max_octave_iterations) {
            Ok(pitch) => pitch,
            Err(e) => {
                log::warn!(
                    "Skipping segment {} at {:.3}s: {}",
                    index,
                    segment.onset_seconds,
                    e
                );
                flags.push(AnalysisFlag::SegmentSkipped {
                    index,
                    onset_seconds: segment.onset_seconds,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let filtered = if config.attach_filtered_segments {
            let low = pitch.frequency - config.bandpass_half_width_hz;
            let high = pitch.frequency + config.bandpass_half_width_hz;
            match bandpass(slice, low, high, sample_rate) {
                Ok(filtered) => Some(filtered),
                Err(e) => {
                    log::warn!("No band-passed copy for segment {}: {}", index, e);
                    None
                }
            }
        } else {
            None
        };

        notes.push(NoteEvent {
            segment: *segment,
            onset_seconds: segment.onset_seconds,
            frequency: pitch.frequency,
            pitch_class: pitch.pitch_class,
            octave: pitch.octave,
            midi_note: midi_like_note(pitch.pitch_class, pitch.octave),
            peak_amplitude: slice.iter().map(|&x| x.abs()).fold(0.0f32, f32::max),
            filtered,
        });
        note_indices.push(index);
    }

    // Pitch values, one note window at a time
    let mut chroma = Vec::with_capacity(notes.len());
    let mut kept = Vec::with_capacity(notes.len());
    for (note, index) in notes.into_iter().zip(note_indices) {
        let window = &conditioned[..note.segment.end.min(conditioned.len())];
        match provider.pitch_values(window, sample_rate, &[note.onset_seconds]) {
            Ok(values) if values.len() == 1 => {
                chroma.push(values[0]);
                kept.push(note);
            }
            Ok(values) => {
                return Err(AnalysisError::ProcessingError(format!(
                    "Feature provider returned {} pitch values for 1 onset",
                    values.len()
                )));
            }
            Err(e) => {
                log::warn!(
                    "Skipping segment {} at {:.3}s: no pitch value: {}",
                    index,
                    note.onset_seconds,
                    e
                );
                flags.push(AnalysisFlag::SegmentSkipped {
                    index,
                    onset_seconds: note.onset_seconds,
                    reason: e.to_string(),
                });
            }
        }
    }
    let notes = kept;

    // Onset features
    let envelope = provider.onset_strength(&conditioned, sample_rate)?;
    let times: Vec<f32> = notes.iter().map(|note| note.onset_seconds).collect();

    let strength: Vec<f32> = notes
        .iter()
        .map(|note| envelope.peak_between(note.onset_seconds, note.segment.end_seconds(sample_rate)))
        .collect();

    let features = OnsetFeatures::new(times, chroma, strength)?;

    let processing_time_ms = start_time.elapsed().as_secs_f32() * 1000.0;

    log::debug!(
        "Analysis complete: {} notes from {} segments in {:.2} ms",
        notes.len(),
        segments.len(),
        processing_time_ms
    );

    Ok(RecordingAnalysis {
        notes,
        features,
        envelope,
        metadata: AnalysisMetadata {
            duration_seconds: buffer.duration_seconds(),
            sample_rate,
            processing_time_ms,
            segments_found: segments.len(),
            loudness,
            highpass_cutoff_hz: config.highpass_cutoff_hz,
            flags,
            ..AnalysisMetadata::default()
        },
    })
}

/// Compare two onset-feature sets
///
/// Strengths are max-normalized, then all four sequences are quantized at
/// `config.quantization_step`. The pitch sequences are aligned with DTW and the
/// resulting path is rescored with strength weighting.
///
/// # Errors
///
/// - `AnalysisError::EmptySequence` if either side has no onsets
/// - `AnalysisError::InvalidInput` for an invalid configuration
///
/// # Example
///
/// ```no_run
/// use duet_dsp::{compare_features, ComparisonConfig, OnsetFeatures};
///
/// let sample = OnsetFeatures::new(vec![0.0, 0.5, 1.0], vec![0.0; 3], vec![1.0, 0.0, 1.0])?;
/// let practice = OnsetFeatures::new(vec![0.0, 0.5, 1.0], vec![5.0; 3], vec![1.0, 0.0, 1.0])?;
/// let result = compare_features(&sample, &practice, &ComparisonConfig::default())?;
/// assert_eq!(result.distance(), 15.0);
/// # Ok::<(), duet_dsp::AnalysisError>(())
/// ```
pub fn compare_features(
    sample: &OnsetFeatures,
    practice: &OnsetFeatures,
    config: &ComparisonConfig,
) -> Result<ComparisonResult, AnalysisError> {
    config.validate()?;

    if sample.is_empty() || practice.is_empty() {
        log::warn!(
            "Insufficient data to compare: {} sample onsets, {} practice onsets",
            sample.len(),
            practice.len()
        );
        return Err(AnalysisError::EmptySequence {
            sample_len: sample.len(),
            practice_len: practice.len(),
        });
    }

    let step = config.quantization_step;
    let sample_chroma = sample.chroma.quantize(step)?;
    let practice_chroma = practice.chroma.quantize(step)?;
    let sample_strength = sample.strength.max_normalized().quantize(step)?;
    let practice_strength = practice.strength.max_normalized().quantize(step)?;

    let score = align(&sample_chroma, &practice_chroma)?;
    let weighted = weighted_distance(
        sample_chroma.values(),
        practice_chroma.values(),
        sample_strength.values(),
        practice_strength.values(),
        &score.path,
        config.strength_weight,
    )?;

    log::debug!(
        "Comparison: distance={:.4}, weighted={:.4}, path length {}",
        score.distance,
        weighted,
        score.path.len()
    );

    Ok(ComparisonResult {
        score,
        weighted_distance: weighted,
        step,
        strength_weight: config.strength_weight,
        sample_chroma,
        practice_chroma,
        sample_strength,
        practice_strength,
    })
}

/// Compare two analyzed recordings
///
/// # Errors
///
/// See [`compare_features`]
pub fn compare_recordings(
    sample: &RecordingAnalysis,
    practice: &RecordingAnalysis,
    config: &ComparisonConfig,
) -> Result<ComparisonResult, AnalysisError> {
    compare_features(&sample.features, &practice.features, config)
}

/// Analyze and compare a reference recording and a practice attempt
///
/// # Errors
///
/// - `AnalysisError::InvalidInput` if the sample rates differ or either buffer is invalid
/// - `AnalysisError::EmptySequence` if either recording has no usable notes
pub fn compare_performances(
    sample: &[f32],
    sample_rate: u32,
    practice: &[f32],
    practice_rate: u32,
    config: &ComparisonConfig,
) -> Result<PerformanceComparison, AnalysisError> {
    if sample_rate != practice_rate {
        return Err(AnalysisError::InvalidInput(format!(
            "Sample rate mismatch: sample {} Hz, practice {} Hz",
            sample_rate, practice_rate
        )));
    }

    let sample = analyze_recording(sample, sample_rate, config)?;
    let practice = analyze_recording(practice, practice_rate, config)?;
    let comparison = compare_recordings(&sample, &practice, config)?;

    Ok(PerformanceComparison {
        sample,
        practice,
        comparison,
    })
}

/// DTW alignment of raw onset times, ignoring pitch
///
/// Measures rhythm alone: the local cost is the difference in onset time.
///
/// # Errors
///
/// Returns `AnalysisError::EmptySequence` if either list is empty
pub fn compare_onset_times(
    sample_times: &[f32],
    practice_times: &[f32],
) -> Result<ScoreResult, AnalysisError> {
    align_values(sample_times, practice_times)
}
