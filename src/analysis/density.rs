//! Density metrics: how unevenly the givens are spread

use crate::sudoku::PuzzleGrid;

/// Dispersion of `counts` around the mean given count per scope, `G / N`
fn dispersion(grid: &PuzzleGrid, counts: impl Iterator<Item = usize>) -> f64 {
    let average = grid.given_count() as f64 / grid.size() as f64;
    counts
        .map(|count| (count as f64 - average).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Dispersion reached when the givens fill whole rows first.
///
/// Sums the full rows, the one partially filled row and the empty rows.
pub fn max_density(grid: &PuzzleGrid) -> f64 {
    let n = grid.size();
    let givens = grid.given_count();
    let size = n as f64;
    let average = givens as f64 / size;
    let full_rows = (givens / n) as f64;
    let partial = (givens % n) as f64;
    let touched_rows = givens.div_ceil(n) as f64;

    ((size - average).powi(2) * full_rows
        + (partial - average).powi(2)
        + average.powi(2) * (size - touched_rows))
        .sqrt()
}

fn normalized(grid: &PuzzleGrid, value: f64) -> f64 {
    let max = max_density(grid);
    if max == 0.0 {
        0.0
    } else {
        value / max
    }
}

/// Density with respect to rows
pub fn row_density(grid: &PuzzleGrid) -> f64 {
    let value = dispersion(grid, (0..grid.size()).map(|r| grid.row_givens(r)));
    normalized(grid, value)
}

/// Density with respect to columns
pub fn column_density(grid: &PuzzleGrid) -> f64 {
    let value = dispersion(grid, (0..grid.size()).map(|c| grid.column_givens(c)));
    normalized(grid, value)
}

/// Density with respect to the values placed
pub fn value_density(grid: &PuzzleGrid) -> f64 {
    let value = dispersion(grid, (1..=grid.size()).map(|v| grid.value_givens(v as u8)));
    normalized(grid, value)
}

/// Density with respect to blocks
pub fn block_density(grid: &PuzzleGrid) -> f64 {
    let b = grid.block_size();
    let counts = (0..b).flat_map(|br| (0..b).map(move |bc| (br, bc)));
    let value = dispersion(grid, counts.map(|(br, bc)| grid.block_givens(br, bc)));
    normalized(grid, value)
}

/// Mean of row, column and block density
pub fn global_density(grid: &PuzzleGrid) -> f64 {
    (row_density(grid) + column_density(grid) + block_density(grid)) / 3.0
}
