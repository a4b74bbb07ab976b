//! Symmetry metrics over the positions of the givens

use crate::sudoku::PuzzleGrid;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mirror transforms of the square grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymmetryTransform {
    /// Reflection across the main diagonal
    MainDiagonal,
    /// Reflection across the anti-diagonal
    AntiDiagonal,
    LeftRight,
    UpDown,
}

impl SymmetryTransform {
    pub const ALL: [SymmetryTransform; 4] = [
        SymmetryTransform::MainDiagonal,
        SymmetryTransform::AntiDiagonal,
        SymmetryTransform::LeftRight,
        SymmetryTransform::UpDown,
    ];

    /// Where cell `(row, col)` lands under the transform on an `size x size` grid
    pub fn mirror(self, row: usize, col: usize, size: usize) -> (usize, usize) {
        let last = size - 1;
        match self {
            SymmetryTransform::MainDiagonal => (col, row),
            SymmetryTransform::AntiDiagonal => (last - col, last - row),
            SymmetryTransform::LeftRight => (row, last - col),
            SymmetryTransform::UpDown => (last - row, col),
        }
    }
}

impl fmt::Display for SymmetryTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SymmetryTransform::MainDiagonal => "main diagonal",
            SymmetryTransform::AntiDiagonal => "anti-diagonal",
            SymmetryTransform::LeftRight => "left-right",
            SymmetryTransform::UpDown => "up-down",
        };
        f.write_str(name)
    }
}

/// Fraction of givens whose mirror cell is also given. `0` when there are no givens.
pub fn symmetry(grid: &PuzzleGrid, transform: SymmetryTransform) -> f64 {
    let givens = grid.given_count();
    if givens == 0 {
        return 0.0;
    }

    let n = grid.size();
    let symmetric = grid
        .givens()
        .filter(|&(r, c, _)| {
            let (mr, mc) = transform.mirror(r, c, n);
            grid.is_given(mr, mc)
        })
        .count();

    symmetric as f64 / givens as f64
}

/// Best symmetry score over all four transforms
pub fn global_symmetry(grid: &PuzzleGrid) -> f64 {
    SymmetryTransform::ALL
        .iter()
        .map(|&t| symmetry(grid, t))
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_grid_scores_zero() {
        let grid = PuzzleGrid::empty(9).unwrap();
        for transform in SymmetryTransform::ALL {
            assert_eq!(symmetry(&grid, transform), 0.0);
        }
        assert_eq!(global_symmetry(&grid), 0.0);
    }

    #[test]
    fn test_mirror_positions() {
        assert_eq!(SymmetryTransform::MainDiagonal.mirror(0, 2, 9), (2, 0));
        assert_eq!(SymmetryTransform::AntiDiagonal.mirror(0, 0, 9), (8, 8));
        assert_eq!(SymmetryTransform::AntiDiagonal.mirror(0, 2, 9), (6, 8));
        assert_eq!(SymmetryTransform::LeftRight.mirror(1, 0, 9), (1, 8));
        assert_eq!(SymmetryTransform::UpDown.mirror(1, 0, 9), (7, 0));
    }

    #[test]
    fn test_partial_symmetry() {
        // Givens at (0,0), (0,3) and (3,0) on a 4x4 grid
        let grid: PuzzleGrid = "1002000000003000".parse().unwrap();
        assert!((symmetry(&grid, SymmetryTransform::MainDiagonal) - 1.0).abs() < 1e-9);
        assert!((symmetry(&grid, SymmetryTransform::LeftRight) - 2.0 / 3.0).abs() < 1e-9);
        assert!((symmetry(&grid, SymmetryTransform::UpDown) - 2.0 / 3.0).abs() < 1e-9);
        assert!((symmetry(&grid, SymmetryTransform::AntiDiagonal) - 2.0 / 3.0).abs() < 1e-9);
        assert!((global_symmetry(&grid) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_center_given_is_self_symmetric() {
        let mut grid = PuzzleGrid::empty(9).unwrap();
        grid.set(4, 4, 7).unwrap();
        for transform in SymmetryTransform::ALL {
            assert_eq!(symmetry(&grid, transform), 1.0);
        }
    }
}
