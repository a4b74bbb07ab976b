//! Variable numbering for the SAT encoding

use crate::error::PuzzleError;

/// Closed-form mapping between `(row, col, value)` triples and SAT variable ids.
///
/// Ids are assigned row-major, then column, then value slot, starting at 1:
/// `var(r, c, v) = r * N * N + c * N + v + 1`. Value slots are zero-based, so
/// slot `v` stands for puzzle value `v + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableMap {
    size: usize,
    block_size: usize,
}

impl VariableMap {
    /// Create a map for an `size x size` puzzle. `size` must be a perfect square.
    pub fn new(size: usize) -> Result<Self, PuzzleError> {
        let block_size = block_size_of(size)?;
        Ok(Self { size, block_size })
    }

    /// Side length of the puzzle
    pub fn size(&self) -> usize {
        self.size
    }

    /// Side length of one block
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Total number of variables, `N³`
    pub fn variable_count(&self) -> usize {
        self.size * self.size * self.size
    }

    /// Variable id of `(row, col, value slot)`.
    ///
    /// # Panics
    ///
    /// Panics when any coordinate is `>= size`; callers iterate over `0..size`.
    #[inline]
    pub fn var(&self, row: usize, col: usize, value: usize) -> i32 {
        let n = self.size;
        assert!(
            row < n && col < n && value < n,
            "variable ({row}, {col}, {value}) out of range for size {n}"
        );
        (row * n * n + col * n + value + 1) as i32
    }

    /// Inverse of [`VariableMap::var`]; the sign of the literal is ignored.
    pub fn decode(&self, literal: i32) -> Option<(usize, usize, usize)> {
        let id = literal.unsigned_abs() as usize;
        if id == 0 || id > self.variable_count() {
            return None;
        }
        let n = self.size;
        let index = id - 1;
        Some((index / (n * n), (index / n) % n, index % n))
    }

    /// Iterate over every variable id in ascending order
    pub fn all_variables(&self) -> impl Iterator<Item = i32> {
        1..=self.variable_count() as i32
    }
}

/// Integer square root of `size`, failing when `size` is not a perfect square
pub fn block_size_of(size: usize) -> Result<usize, PuzzleError> {
    if size == 0 {
        return Err(PuzzleError::ZeroSize);
    }
    let mut root = (size as f64).sqrt() as usize;
    while root * root > size {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= size {
        root += 1;
    }
    if root * root == size {
        Ok(root)
    } else {
        Err(PuzzleError::NonSquareSize(size))
    }
}

impl std::fmt::Display for VariableMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Variable Map:")?;
        writeln!(f, "  Puzzle size: {0}x{0}", self.size)?;
        writeln!(f, "  Block size: {0}x{0}", self.block_size)?;
        writeln!(f, "  Total variables: {}", self.variable_count())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_first_and_last_variable() {
        let vm = VariableMap::new(9).unwrap();
        assert_eq!(vm.var(0, 0, 0), 1);
        assert_eq!(vm.var(0, 0, 4), 5);
        assert_eq!(vm.var(8, 8, 8), 729);
        assert_eq!(vm.variable_count(), 729);
    }

    #[test]
    fn test_bijection() {
        for size in [1, 4, 9, 16] {
            let vm = VariableMap::new(size).unwrap();
            let mut seen = HashSet::new();
            for r in 0..size {
                for c in 0..size {
                    for v in 0..size {
                        assert!(seen.insert(vm.var(r, c, v)));
                    }
                }
            }
            let expected: HashSet<i32> = vm.all_variables().collect();
            assert_eq!(seen, expected);
            assert_eq!(seen.len(), size * size * size);
        }
    }

    #[test]
    fn test_decode_inverts_var() {
        let vm = VariableMap::new(4).unwrap();
        for r in 0..4 {
            for c in 0..4 {
                for v in 0..4 {
                    let id = vm.var(r, c, v);
                    assert_eq!(vm.decode(id), Some((r, c, v)));
                    assert_eq!(vm.decode(-id), Some((r, c, v)));
                }
            }
        }
        assert_eq!(vm.decode(0), None);
        assert_eq!(vm.decode(65), None);
    }

    #[test]
    fn test_non_square_size_rejected() {
        assert_eq!(VariableMap::new(8), Err(PuzzleError::NonSquareSize(8)));
        assert_eq!(VariableMap::new(0), Err(PuzzleError::ZeroSize));
        assert_eq!(block_size_of(25), Ok(5));
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_panics() {
        let vm = VariableMap::new(4).unwrap();
        vm.var(4, 0, 0);
    }
}
