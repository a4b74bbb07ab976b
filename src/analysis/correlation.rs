//! Autocorrelation of the value matrix

use crate::sudoku::PuzzleGrid;

/// Full 2-D convolution of the grid's value matrix with itself.
///
/// The result is `(2N - 1) x (2N - 1)`, row-major.
pub fn self_convolution(grid: &PuzzleGrid) -> Vec<u64> {
    let n = grid.size();
    let out = 2 * n - 1;
    let mut result = vec![0u64; out * out];

    for (r1, c1, v1) in grid.givens() {
        for (r2, c2, v2) in grid.givens() {
            result[(r1 + r2) * out + (c1 + c2)] += (v1 * v2) as u64;
        }
    }

    result
}

/// Sum of every entry of [`self_convolution`]
pub fn autocorrelation_sum(grid: &PuzzleGrid) -> u64 {
    self_convolution(grid).iter().sum()
}
