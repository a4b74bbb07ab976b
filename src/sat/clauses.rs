//! Clause generation for the Sudoku SAT encoding
//!
//! Rules are encoded after Kwon and Jain, "Optimized CNF Encoding for Sudoku
//! Puzzles": every scope (cell, row, column, block) has a definedness family
//! ("at least one") and a uniqueness family ("at most one", as pairwise
//! negative binary clauses).

use super::VariableMap;
use crate::sudoku::PuzzleGrid;
use itertools::Itertools;
use log::debug;
use std::fmt;

/// Represents a SAT clause (disjunction of literals)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Clause {
    pub literals: Vec<i32>, // Positive for variable, negative for negation
}

impl Clause {
    /// Create a new clause from literals
    pub fn new(literals: Vec<i32>) -> Self {
        Self { literals }
    }

    /// Create a unit clause (single literal)
    pub fn unit(literal: i32) -> Self {
        Self {
            literals: vec![literal],
        }
    }

    /// Clause forbidding both variables from being true
    pub fn not_both(var1: i32, var2: i32) -> Self {
        Self {
            literals: vec![-var1, -var2],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }
}

/// Renders the clause as a DIMACS line body: literals followed by `0`
impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for literal in &self.literals {
            write!(f, "{} ", literal)?;
        }
        write!(f, "0")
    }
}

/// One scope x shape pair of Sudoku rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseFamily {
    CellDefinedness,
    CellUniqueness,
    RowDefinedness,
    RowUniqueness,
    ColumnDefinedness,
    ColumnUniqueness,
    BlockDefinedness,
    BlockUniqueness,
}

impl ClauseFamily {
    pub const ALL: [ClauseFamily; 8] = [
        ClauseFamily::CellDefinedness,
        ClauseFamily::CellUniqueness,
        ClauseFamily::RowDefinedness,
        ClauseFamily::RowUniqueness,
        ClauseFamily::ColumnDefinedness,
        ClauseFamily::ColumnUniqueness,
        ClauseFamily::BlockDefinedness,
        ClauseFamily::BlockUniqueness,
    ];

    /// Whether this family asserts "at least one" rather than "at most one"
    pub fn is_definedness(self) -> bool {
        matches!(
            self,
            ClauseFamily::CellDefinedness
                | ClauseFamily::RowDefinedness
                | ClauseFamily::ColumnDefinedness
                | ClauseFamily::BlockDefinedness
        )
    }

    /// Number of clauses this family emits for an `size x size` puzzle
    pub fn clause_count(self, size: usize) -> usize {
        if self.is_definedness() {
            definedness_count(size)
        } else {
            uniqueness_count(size)
        }
    }

    /// Generate the family's clauses in their reference order
    pub fn generate(self, vm: &VariableMap) -> Vec<Clause> {
        let clauses = match self {
            ClauseFamily::CellDefinedness => cell_definedness(vm),
            ClauseFamily::CellUniqueness => cell_uniqueness(vm),
            ClauseFamily::RowDefinedness => row_definedness(vm),
            ClauseFamily::RowUniqueness => row_uniqueness(vm),
            ClauseFamily::ColumnDefinedness => column_definedness(vm),
            ClauseFamily::ColumnUniqueness => column_uniqueness(vm),
            ClauseFamily::BlockDefinedness => block_definedness(vm),
            ClauseFamily::BlockUniqueness => block_uniqueness(vm),
        };
        debug!("{} generated {} clauses", self, clauses.len());
        clauses
    }
}

impl fmt::Display for ClauseFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClauseFamily::CellDefinedness => "cell definedness",
            ClauseFamily::CellUniqueness => "cell uniqueness",
            ClauseFamily::RowDefinedness => "row definedness",
            ClauseFamily::RowUniqueness => "row uniqueness",
            ClauseFamily::ColumnDefinedness => "column definedness",
            ClauseFamily::ColumnUniqueness => "column uniqueness",
            ClauseFamily::BlockDefinedness => "block definedness",
            ClauseFamily::BlockUniqueness => "block uniqueness",
        };
        f.write_str(name)
    }
}

/// Clauses in any definedness family, `N²`
pub fn definedness_count(size: usize) -> usize {
    size * size
}

/// Clauses in any uniqueness family, `N³(N-1)/2`
pub fn uniqueness_count(size: usize) -> usize {
    size * size * size * size.saturating_sub(1) / 2
}

/// Each cell holds at least one value
fn cell_definedness(vm: &VariableMap) -> Vec<Clause> {
    let n = vm.size();
    let mut clauses = Vec::with_capacity(definedness_count(n));

    for r in 0..n {
        for c in 0..n {
            clauses.push(Clause::new((0..n).map(|v| vm.var(r, c, v)).collect()));
        }
    }

    clauses
}

/// Each cell holds at most one value
fn cell_uniqueness(vm: &VariableMap) -> Vec<Clause> {
    let n = vm.size();
    let mut clauses = Vec::with_capacity(uniqueness_count(n));

    for r in 0..n {
        for c in 0..n {
            for (vi, vj) in (0..n).tuple_combinations() {
                clauses.push(Clause::not_both(vm.var(r, c, vi), vm.var(r, c, vj)));
            }
        }
    }

    clauses
}

/// Each value appears at least once per row
fn row_definedness(vm: &VariableMap) -> Vec<Clause> {
    let n = vm.size();
    let mut clauses = Vec::with_capacity(definedness_count(n));

    for r in 0..n {
        for v in 0..n {
            clauses.push(Clause::new((0..n).map(|c| vm.var(r, c, v)).collect()));
        }
    }

    clauses
}

/// Each value appears at most once per row
fn row_uniqueness(vm: &VariableMap) -> Vec<Clause> {
    let n = vm.size();
    let mut clauses = Vec::with_capacity(uniqueness_count(n));

    for r in 0..n {
        for v in 0..n {
            for (ci, cj) in (0..n).tuple_combinations() {
                clauses.push(Clause::not_both(vm.var(r, ci, v), vm.var(r, cj, v)));
            }
        }
    }

    clauses
}

/// Each value appears at least once per column
fn column_definedness(vm: &VariableMap) -> Vec<Clause> {
    let n = vm.size();
    let mut clauses = Vec::with_capacity(definedness_count(n));

    for c in 0..n {
        for v in 0..n {
            clauses.push(Clause::new((0..n).map(|r| vm.var(r, c, v)).collect()));
        }
    }

    clauses
}

/// Each value appears at most once per column
fn column_uniqueness(vm: &VariableMap) -> Vec<Clause> {
    let n = vm.size();
    let mut clauses = Vec::with_capacity(uniqueness_count(n));

    for c in 0..n {
        for v in 0..n {
            for (ri, rj) in (0..n).tuple_combinations() {
                clauses.push(Clause::not_both(vm.var(ri, c, v), vm.var(rj, c, v)));
            }
        }
    }

    clauses
}

/// Position of the `index`-th cell of block `(block_row, block_col)`.
///
/// Cells inside a block are numbered row-major, so both block families
/// visit them in the same order.
#[inline]
fn block_cell(vm: &VariableMap, block_row: usize, block_col: usize, index: usize) -> (usize, usize) {
    let b = vm.block_size();
    (block_row * b + index / b, block_col * b + index % b)
}

/// Each value appears at least once per block
fn block_definedness(vm: &VariableMap) -> Vec<Clause> {
    let n = vm.size();
    let b = vm.block_size();
    let mut clauses = Vec::with_capacity(definedness_count(n));

    for block_row in 0..b {
        for block_col in 0..b {
            for v in 0..n {
                let literals = (0..n)
                    .map(|i| {
                        let (r, c) = block_cell(vm, block_row, block_col, i);
                        vm.var(r, c, v)
                    })
                    .collect();
                clauses.push(Clause::new(literals));
            }
        }
    }

    clauses
}

/// Each value appears at most once per block
fn block_uniqueness(vm: &VariableMap) -> Vec<Clause> {
    let n = vm.size();
    let b = vm.block_size();
    let mut clauses = Vec::with_capacity(uniqueness_count(n));

    for block_row in 0..b {
        for block_col in 0..b {
            for v in 0..n {
                for (i, j) in (0..n).tuple_combinations() {
                    let (ri, ci) = block_cell(vm, block_row, block_col, i);
                    let (rj, cj) = block_cell(vm, block_row, block_col, j);
                    clauses.push(Clause::not_both(vm.var(ri, ci, v), vm.var(rj, cj, v)));
                }
            }
        }
    }

    clauses
}

/// One unit clause per given cell, fixing it to its value
pub fn assignment_clauses(vm: &VariableMap, grid: &PuzzleGrid) -> Vec<Clause> {
    grid.givens()
        .map(|(r, c, value)| Clause::unit(vm.var(r, c, value - 1)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_family_counts() {
        for size in [1, 4, 9, 16] {
            let vm = VariableMap::new(size).unwrap();
            for family in ClauseFamily::ALL {
                let clauses = family.generate(&vm);
                assert_eq!(clauses.len(), family.clause_count(size), "{} for N={}", family, size);
            }
        }
    }

    #[test]
    fn test_uniqueness_counts_agree() {
        for size in [4, 9, 16, 25] {
            assert_eq!(uniqueness_count(size), size * size * size * (size - 1) / 2);
            assert_eq!(definedness_count(size), size * size);
        }
        assert_eq!(uniqueness_count(9), 2916);
        assert_eq!(uniqueness_count(1), 0);
        assert_eq!(uniqueness_count(0), 0);
    }

    #[test]
    fn test_clause_shapes() {
        let vm = VariableMap::new(9).unwrap();
        for family in ClauseFamily::ALL {
            for clause in family.generate(&vm) {
                assert!(!clause.is_empty());
                if family.is_definedness() {
                    assert_eq!(clause.len(), 9);
                    assert!(clause.literals.iter().all(|&lit| lit > 0));
                } else {
                    assert_eq!(clause.len(), 2);
                    assert!(clause.literals.iter().all(|&lit| lit < 0));
                    assert_ne!(clause.literals[0], clause.literals[1]);
                }
            }
        }
    }

    #[test]
    fn test_reference_order() {
        let vm = VariableMap::new(9).unwrap();

        let cell_def = ClauseFamily::CellDefinedness.generate(&vm);
        assert_eq!(cell_def[0].literals, (1..=9).collect::<Vec<_>>());

        let cell_uni = ClauseFamily::CellUniqueness.generate(&vm);
        assert_eq!(cell_uni[0].literals, vec![-1, -2]);
        assert_eq!(cell_uni[1].literals, vec![-1, -3]);

        let row_uni = ClauseFamily::RowUniqueness.generate(&vm);
        assert_eq!(row_uni[0].literals, vec![-1, -10]);

        let column_uni = ClauseFamily::ColumnUniqueness.generate(&vm);
        assert_eq!(column_uni[0].literals, vec![-1, -82]);

        // Second pair of the first block is (0,0) and (0,2)
        let block_uni = ClauseFamily::BlockUniqueness.generate(&vm);
        assert_eq!(block_uni[1].literals, vec![-1, -19]);
        // Fourth cell of the first block wraps to the next row
        assert_eq!(block_uni[2].literals, vec![-1, -82]);
    }

    #[test]
    fn test_block_families_cover_same_cells() {
        let vm = VariableMap::new(9).unwrap();
        let definedness = ClauseFamily::BlockDefinedness.generate(&vm);
        let uniqueness = ClauseFamily::BlockUniqueness.generate(&vm);
        let pairs_per_scope = uniqueness_count(9) / definedness_count(9);

        for (scope, def_clause) in definedness.iter().enumerate() {
            let def_vars: BTreeSet<i32> = def_clause.literals.iter().copied().collect();
            let uni_vars: BTreeSet<i32> = uniqueness[scope * pairs_per_scope..(scope + 1) * pairs_per_scope]
                .iter()
                .flat_map(|clause| clause.literals.iter().map(|lit| -lit))
                .collect();
            assert_eq!(def_vars, uni_vars, "block scope {}", scope);
        }
    }

    #[test]
    fn test_block_definedness_stays_in_block() {
        let vm = VariableMap::new(9).unwrap();
        for clause in ClauseFamily::BlockDefinedness.generate(&vm) {
            let cells: Vec<_> = clause
                .literals
                .iter()
                .map(|&lit| vm.decode(lit).unwrap())
                .collect();
            let block = (cells[0].0 / 3, cells[0].1 / 3);
            assert!(cells.iter().all(|&(r, c, v)| (r / 3, c / 3) == block && v == cells[0].2));
        }
    }

    #[test]
    fn test_assignment_clauses() {
        let record = format!("5{}3", "0".repeat(79));
        let grid: PuzzleGrid = record.parse().unwrap();
        let vm = VariableMap::new(9).unwrap();

        let clauses = assignment_clauses(&vm, &grid);
        assert_eq!(clauses.len(), 2);
        assert!(clauses.iter().all(Clause::is_unit));
        assert_eq!(clauses[0].literals, vec![5]);
        assert_eq!(vm.decode(clauses[1].literals[0]), Some((8, 8, 2)));
    }

    #[test]
    fn test_clause_display() {
        assert_eq!(Clause::new(vec![1, 2, 3]).to_string(), "1 2 3 0");
        assert_eq!(Clause::not_both(4, 7).to_string(), "-4 -7 0");
    }
}
