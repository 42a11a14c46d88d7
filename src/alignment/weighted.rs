//! Strength-weighted rescoring
//!
//! Re-scores an existing alignment path, scaling each step's local cost by the
//! mean onset strength of the two matched buckets:
//!
//! `cost(i, j) = |a[i] - b[j]| × (1 + α × (s_a[i] + s_b[j]) / 2)`
//!
//! The path is not recomputed; strong onsets only make mismatches on an
//! already chosen alignment count more. A strength index past the end of its
//! sequence counts as 0.

use super::AlignmentPath;
use crate::error::AnalysisError;

/// Default strength weight α
pub const DEFAULT_STRENGTH_WEIGHT: f32 = 0.1;

/// Weighted distance along `path`
///
/// # Arguments
///
/// * `a`, `b` - Primary (pitch/chroma) sequences the path was computed on
/// * `strength_a`, `strength_b` - Quantized onset strengths for each side
/// * `path` - Alignment path over `a × b`
/// * `alpha` - Strength weight (>= 0)
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for a negative or non-finite `alpha`,
/// or a path index outside `a` or `b`
pub fn weighted_distance(
    a: &[f32],
    b: &[f32],
    strength_a: &[f32],
    strength_b: &[f32],
    path: &AlignmentPath,
    alpha: f32,
) -> Result<f32, AnalysisError> {
    if !(alpha.is_finite() && alpha >= 0.0) {
        return Err(AnalysisError::InvalidInput(format!(
            "Strength weight must be non-negative, got {}",
            alpha
        )));
    }

    let mut total = 0.0f32;
    for (i, j) in path.iter() {
        let (Some(&x), Some(&y)) = (a.get(i), b.get(j)) else {
            return Err(AnalysisError::InvalidInput(format!(
                "Path step ({}, {}) outside {}x{} grid",
                i,
                j,
                a.len(),
                b.len()
            )));
        };

        let sa = strength_a.get(i).copied().unwrap_or(0.0);
        let sb = strength_b.get(j).copied().unwrap_or(0.0);
        total += (x - y).abs() * (1.0 + alpha * (sa + sb) / 2.0);
    }

    log::debug!(
        "Weighted distance {:.4} over {} steps (alpha={})",
        total,
        path.len(),
        alpha
    );

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::dtw::align_values;

    #[test]
    fn test_weighting_scales_mismatches() {
        let a = [0.0, 0.0, 0.0];
        let b = [5.0, 5.0, 5.0];
        let strength = [1.0, 0.0, 1.0];
        let result = align_values(&a, &b).unwrap();

        let weighted = weighted_distance(&a, &b, &strength, &strength, &result.path, 0.1).unwrap();
        assert!((weighted - 16.0).abs() < 1e-5);
        assert_eq!(result.distance, 15.0);
    }

    #[test]
    fn test_zero_base_distance_stays_zero() {
        let a = [0.0, 0.0, 0.0];
        let strength = [1.0, 0.0, 1.0];
        let result = align_values(&a, &a).unwrap();

        let weighted = weighted_distance(&a, &a, &strength, &strength, &result.path, 0.1).unwrap();
        assert_eq!(weighted, 0.0);
    }

    #[test]
    fn test_zero_alpha_matches_unweighted() {
        let a = [0.0, 3.0, 1.0, 4.0];
        let b = [1.0, 5.0, 9.0];
        let result = align_values(&a, &b).unwrap();

        let weighted =
            weighted_distance(&a, &b, &[1.0; 4], &[0.5; 3], &result.path, 0.0).unwrap();
        assert!((weighted - result.distance).abs() < 1e-5);
    }

    #[test]
    fn test_weighted_at_least_unweighted() {
        let a = [0.0, 3.0, 1.0, 4.0, 1.0, 5.0];
        let b = [2.0, 6.0, 5.0, 3.0, 5.0];
        let strength_a = [1.0, 0.2, 0.0, 0.7, 0.0, 0.4];
        let strength_b = [0.0, 1.0, 0.3, 0.0, 0.9];
        let result = align_values(&a, &b).unwrap();

        for &alpha in &[0.01f32, 0.1, 0.5, 2.0] {
            let weighted =
                weighted_distance(&a, &b, &strength_a, &strength_b, &result.path, alpha).unwrap();
            assert!(
                weighted >= result.distance,
                "alpha={} gave {} < {}",
                alpha,
                weighted,
                result.distance
            );
        }
    }

    #[test]
    fn test_short_strength_counts_as_zero() {
        let a = [0.0, 0.0];
        let b = [2.0, 2.0];
        let result = align_values(&a, &b).unwrap();

        let weighted = weighted_distance(&a, &b, &[1.0], &[1.0], &result.path, 0.5).unwrap();
        // Step 0: 2 × 1.5, step 1: 2 × 1.0
        assert!((weighted - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_invalid_arguments() {
        let a = [0.0, 1.0];
        let result = align_values(&a, &a).unwrap();
        assert!(weighted_distance(&a, &a, &[], &[], &result.path, -0.1).is_err());
        assert!(weighted_distance(&a, &a, &[], &[], &result.path, f32::NAN).is_err());
        assert!(weighted_distance(&a[..1], &a, &[], &[], &result.path, 0.1).is_err());
    }
}
