//! Dynamic time warping
//!
//! Classic DTW over two sequences of possibly different lengths.
//!
//! Algorithm:
//! 1. Fill a cumulative cost grid: `C[i][j] = d(a[i], b[j]) + min(C[i-1][j], C[i][j-1], C[i-1][j-1])`,
//!    with row 0 and column 0 as prefix sums along the border
//! 2. Backtrack from the last cell to `(0, 0)` through the cheapest predecessor,
//!    preferring the diagonal, then up `(i-1, j)`, then left `(i, j-1)` on ties
//! 3. Distance is the cumulative cost at the last cell
//!
//! Cost is `O(|a| × |b|)` in time and memory.
//!
//! # Example
//!
//! ```no_run
//! use duet_dsp::alignment::dtw::align_values;
//!
//! let result = align_values(&[0.0, 0.0, 0.0], &[5.0, 5.0, 5.0])?;
//! assert_eq!(result.distance, 15.0);
//! assert_eq!(result.path.pairs(), &[(0, 0), (1, 1), (2, 2)]);
//! # Ok::<(), duet_dsp::AnalysisError>(())
//! ```

use super::{AlignmentPath, ScoreResult};
use crate::error::AnalysisError;
use crate::features::sequence::quantizer::QuantizedSequence;

/// Relative tolerance when checking two sequences share a quantization step
const STEP_TOLERANCE: f32 = 1e-6;

/// Align two quantized sequences
///
/// # Errors
///
/// - `AnalysisError::EmptySequence` if either sequence has no buckets
/// - `AnalysisError::InvalidInput` if the sequences use different steps
pub fn align(a: &QuantizedSequence, b: &QuantizedSequence) -> Result<ScoreResult, AnalysisError> {
    if (a.step() - b.step()).abs() > STEP_TOLERANCE * a.step().max(b.step()) {
        return Err(AnalysisError::InvalidInput(format!(
            "Quantization steps differ: {} vs {}",
            a.step(),
            b.step()
        )));
    }

    align_values(a.values(), b.values())
}

/// Align two scalar sequences with absolute-difference local cost
///
/// # Errors
///
/// Returns `AnalysisError::EmptySequence` if either input is empty
pub fn align_values(a: &[f32], b: &[f32]) -> Result<ScoreResult, AnalysisError> {
    align_by(a.len(), b.len(), |i, j| (a[i] - b[j]).abs())
}

/// Align two sequences of feature vectors with Euclidean local cost
///
/// # Errors
///
/// - `AnalysisError::EmptySequence` if either input is empty
/// - `AnalysisError::InvalidInput` if the vectors do not all share one dimension
pub fn align_vectors(a: &[Vec<f32>], b: &[Vec<f32>]) -> Result<ScoreResult, AnalysisError> {
    if let Some(dim) = a.first().or_else(|| b.first()).map(Vec::len) {
        if let Some(bad) = a.iter().chain(b).find(|v| v.len() != dim) {
            return Err(AnalysisError::InvalidInput(format!(
                "Feature vector dimension mismatch: expected {}, got {}",
                dim,
                bad.len()
            )));
        }
    }

    align_by(a.len(), b.len(), |i, j| {
        a[i].iter()
            .zip(&b[j])
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f32>()
            .sqrt()
    })
}

/// DTW over an `n × m` grid with an arbitrary local cost
fn align_by<F>(n: usize, m: usize, local: F) -> Result<ScoreResult, AnalysisError>
where
    F: Fn(usize, usize) -> f32,
{
    if n == 0 || m == 0 {
        return Err(AnalysisError::EmptySequence {
            sample_len: n,
            practice_len: m,
        });
    }

    log::debug!("DTW over {}x{} grid", n, m);

    // Row-major cumulative cost
    let mut cost = vec![0.0f32; n * m];
    let at = |i: usize, j: usize| i * m + j;

    cost[0] = local(0, 0);
    for j in 1..m {
        cost[at(0, j)] = cost[at(0, j - 1)] + local(0, j);
    }
    for i in 1..n {
        cost[at(i, 0)] = cost[at(i - 1, 0)] + local(i, 0);
        for j in 1..m {
            let best = cost[at(i - 1, j - 1)]
                .min(cost[at(i - 1, j)])
                .min(cost[at(i, j - 1)]);
            cost[at(i, j)] = local(i, j) + best;
        }
    }

    let distance = cost[at(n - 1, m - 1)];
    if !distance.is_finite() {
        return Err(AnalysisError::NumericalError(format!(
            "DTW distance is not finite: {}",
            distance
        )));
    }

    let mut pairs = Vec::with_capacity(n + m - 1);
    let (mut i, mut j) = (n - 1, m - 1);
    pairs.push((i, j));
    while i > 0 || j > 0 {
        if i == 0 {
            j -= 1;
        } else if j == 0 {
            i -= 1;
        } else {
            let diagonal = cost[at(i - 1, j - 1)];
            let up = cost[at(i - 1, j)];
            let left = cost[at(i, j - 1)];

            if diagonal <= up && diagonal <= left {
                i -= 1;
                j -= 1;
            } else if up <= left {
                i -= 1;
            } else {
                j -= 1;
            }
        }
        pairs.push((i, j));
    }
    pairs.reverse();

    log::debug!("DTW distance {:.4}, path length {}", distance, pairs.len());

    Ok(ScoreResult {
        distance,
        path: AlignmentPath::from_pairs(pairs),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::sequence::quantizer::quantize;

    #[test]
    fn test_identity_alignment() {
        let sequence = [3.0, 0.0, 7.0, 7.0, 1.0, 0.0, 11.0];
        let result = align_values(&sequence, &sequence).unwrap();

        assert_eq!(result.distance, 0.0);
        let expected: Vec<(usize, usize)> = (0..sequence.len()).map(|i| (i, i)).collect();
        assert_eq!(result.path.pairs(), expected.as_slice());
    }

    #[test]
    fn test_all_zero_sequences_prefer_diagonal() {
        let zeros = [0.0f32; 6];
        let result = align_values(&zeros, &zeros).unwrap();
        assert_eq!(result.distance, 0.0);
        assert_eq!(result.path.len(), 6);
        assert!(result.path.iter().all(|(i, j)| i == j));
    }

    #[test]
    fn test_single_element_sequences() {
        let result = align_values(&[2.0], &[7.5]).unwrap();
        assert_eq!(result.distance, 5.5);
        assert_eq!(result.path.pairs(), &[(0, 0)]);
    }

    #[test]
    fn test_constant_offset() {
        let result = align_values(&[0.0, 0.0, 0.0], &[5.0, 5.0, 5.0]).unwrap();
        assert_eq!(result.distance, 15.0);
        assert_eq!(result.path.pairs(), &[(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn test_unequal_lengths_same_content() {
        let result = align_values(&[1.0, 1.0, 4.0], &[1.0, 4.0, 4.0, 4.0]).unwrap();
        assert_eq!(result.distance, 0.0);
        assert!(result.path.is_valid_for(3, 4));
        assert_ne!(result.path.len(), 3);
    }

    #[test]
    fn test_scale_monotonicity() {
        let a = [1.0f32, 2.0];
        let scaled = |k: f32| a.iter().map(|&x| k * x).collect::<Vec<f32>>();

        let d1 = align_values(&a, &scaled(1.5)).unwrap().distance;
        let d2 = align_values(&a, &scaled(2.0)).unwrap().distance;
        let d3 = align_values(&a, &scaled(3.0)).unwrap().distance;

        assert!((d1 - 1.5).abs() < 1e-6);
        assert!((d2 - 3.0).abs() < 1e-6);
        assert!((d3 - 6.0).abs() < 1e-6);
        assert!(d1 < d2 && d2 < d3);
    }

    #[test]
    fn test_scale_monotonicity_longer_sequence() {
        let a = [0.5f32, 2.0, 1.0, 4.0, 3.0];
        let mut previous = 0.0f32;
        for &k in &[1.1f32, 1.5, 2.0, 3.0, 5.0] {
            let scaled: Vec<f32> = a.iter().map(|&x| k * x).collect();
            let distance = align_values(&a, &scaled).unwrap().distance;
            assert!(
                distance > previous,
                "Distance should grow with scale: k={} gave {} after {}",
                k,
                distance,
                previous
            );
            previous = distance;
        }
    }

    #[test]
    fn test_path_is_always_valid() {
        let a = [0.0, 3.0, 1.0, 4.0, 1.0, 5.0, 9.0];
        let b = [2.0, 6.0, 5.0, 3.0];
        let result = align_values(&a, &b).unwrap();
        assert!(result.path.is_valid_for(a.len(), b.len()));

        let reversed = align_values(&b, &a).unwrap();
        assert!(reversed.path.is_valid_for(b.len(), a.len()));
        assert!((reversed.distance - result.distance).abs() < 1e-5);
    }

    #[test]
    fn test_distance_equals_local_cost_sum_along_path() {
        let a = [0.0f32, 3.0, 1.0, 4.0];
        let b = [1.0f32, 5.0, 9.0];
        let result = align_values(&a, &b).unwrap();

        let sum: f32 = result.path.iter().map(|(i, j)| (a[i] - b[j]).abs()).sum();
        assert!((sum - result.distance).abs() < 1e-5);
    }

    #[test]
    fn test_empty_sequence() {
        assert_eq!(
            align_values(&[], &[1.0]),
            Err(AnalysisError::EmptySequence {
                sample_len: 0,
                practice_len: 1
            })
        );
        assert!(matches!(
            align_values(&[1.0], &[]),
            Err(AnalysisError::EmptySequence { .. })
        ));
    }

    #[test]
    fn test_align_quantized_sequences() {
        let a = quantize(&[0.0, 0.5, 1.0], &[0.0, 0.0, 0.0], 0.2).unwrap();
        let b = quantize(&[0.0, 0.5, 1.0], &[5.0, 5.0, 5.0], 0.2).unwrap();
        let result = align(&a, &b).unwrap();
        assert_eq!(result.distance, 15.0);
        assert!(result.path.is_valid_for(a.len(), b.len()));

        let coarse = quantize(&[0.0, 0.5, 1.0], &[5.0, 5.0, 5.0], 0.5).unwrap();
        assert!(matches!(align(&a, &coarse), Err(AnalysisError::InvalidInput(_))));
    }

    #[test]
    fn test_align_vectors() {
        let a = vec![vec![0.0, 0.0], vec![3.0, 4.0]];
        let b = vec![vec![0.0, 0.0], vec![0.0, 0.0], vec![3.0, 4.0]];
        let result = align_vectors(&a, &b).unwrap();
        assert_eq!(result.distance, 0.0);
        assert_eq!(result.path.pairs(), &[(0, 0), (0, 1), (1, 2)]);

        let offset = align_vectors(&[vec![0.0, 0.0]], &[vec![3.0, 4.0]]).unwrap();
        assert_eq!(offset.distance, 5.0);

        let ragged = vec![vec![0.0, 0.0], vec![1.0]];
        assert!(matches!(
            align_vectors(&a, &ragged),
            Err(AnalysisError::InvalidInput(_))
        ));
    }
}
