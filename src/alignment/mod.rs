//! Sequence alignment modules
//!
//! - Dynamic time warping over scalar or vector sequences
//! - Strength-weighted rescoring of an alignment path

pub mod dtw;
pub mod weighted;

use serde::{Deserialize, Serialize};

/// Index pairs `(i, j)` matched by an alignment
///
/// Starts at `(0, 0)`, ends at `(len_a - 1, len_b - 1)`, and each step advances
/// one or both coordinates by exactly one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentPath(Vec<(usize, usize)>);

impl AlignmentPath {
    /// Wrap index pairs produced by an aligner
    pub(crate) fn from_pairs(pairs: Vec<(usize, usize)>) -> Self {
        Self(pairs)
    }

    /// Matched index pairs in order
    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.0
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the path has no steps
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(i, j)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.iter().copied()
    }

    /// Check the path is a connected monotonic walk over an `len_a × len_b` grid
    pub fn is_valid_for(&self, len_a: usize, len_b: usize) -> bool {
        if len_a == 0 || len_b == 0 {
            return self.0.is_empty();
        }

        let connected = self.0.windows(2).all(|step| {
            let (i0, j0) = step[0];
            let (i1, j1) = step[1];
            let di = i1.wrapping_sub(i0);
            let dj = j1.wrapping_sub(j0);
            di <= 1 && dj <= 1 && di + dj >= 1
        });

        connected
            && self.0.first() == Some(&(0, 0))
            && self.0.last() == Some(&(len_a - 1, len_b - 1))
    }
}

/// Distance plus the path that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Accumulated cost along the path (>= 0)
    pub distance: f32,

    /// Alignment path
    pub path: AlignmentPath,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_validity() {
        let path = AlignmentPath::from_pairs(vec![(0, 0), (1, 1), (1, 2), (2, 3)]);
        assert!(path.is_valid_for(3, 4));
        assert!(!path.is_valid_for(3, 5));

        let skipping = AlignmentPath::from_pairs(vec![(0, 0), (2, 1)]);
        assert!(!skipping.is_valid_for(3, 2));

        let stalled = AlignmentPath::from_pairs(vec![(0, 0), (0, 0), (1, 1)]);
        assert!(!stalled.is_valid_for(2, 2));

        let backwards = AlignmentPath::from_pairs(vec![(0, 0), (1, 1), (0, 2), (1, 2)]);
        assert!(!backwards.is_valid_for(2, 3));
    }
}
