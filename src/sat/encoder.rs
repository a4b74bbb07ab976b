//! Encoding strategies: which clause families make up a Sudoku formula

use super::clauses::{assignment_clauses, definedness_count, uniqueness_count, Clause, ClauseFamily};
use super::VariableMap;
use crate::error::PuzzleError;
use crate::sudoku::PuzzleGrid;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named selections of clause families, in increasing verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum EncodingStrategy {
    Minimal,
    Efficient,
    Extended,
}

impl EncodingStrategy {
    pub const ALL: [EncodingStrategy; 3] = [
        EncodingStrategy::Minimal,
        EncodingStrategy::Efficient,
        EncodingStrategy::Extended,
    ];

    /// Families emitted by this strategy, in output order. Givens follow them.
    pub fn families(self) -> &'static [ClauseFamily] {
        use ClauseFamily::*;
        match self {
            EncodingStrategy::Minimal => &[
                CellDefinedness,
                RowUniqueness,
                ColumnUniqueness,
                BlockUniqueness,
            ],
            EncodingStrategy::Efficient => &[
                CellDefinedness,
                CellUniqueness,
                RowUniqueness,
                ColumnUniqueness,
                BlockUniqueness,
            ],
            EncodingStrategy::Extended => &ClauseFamily::ALL,
        }
    }

    /// Clause count declared in the header for `size` and `givens` given cells
    pub fn declared_clause_count(self, size: usize, givens: usize) -> usize {
        let d = definedness_count(size);
        let u = uniqueness_count(size);
        match self {
            EncodingStrategy::Minimal => d + 3 * u + givens,
            EncodingStrategy::Efficient => d + 4 * u + givens,
            EncodingStrategy::Extended => 4 * d + 4 * u + givens,
        }
    }

    /// Lower-case name used in file names and configuration
    pub fn name(self) -> &'static str {
        match self {
            EncodingStrategy::Minimal => "minimal",
            EncodingStrategy::Efficient => "efficient",
            EncodingStrategy::Extended => "extended",
        }
    }

    /// Free-text description written to the formula's comment line
    pub fn description(self) -> String {
        format!("A Sudoku in {} encoding", self.name())
    }
}

impl fmt::Display for EncodingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A complete CNF formula for one puzzle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    pub strategy: EncodingStrategy,
    pub variable_count: usize,
    pub declared_clause_count: usize,
    pub given_count: usize,
    pub clauses: Vec<Clause>,
}

impl Formula {
    /// Number of clauses actually present in the body
    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    /// Unit clauses fixing the givens; they always close the formula
    pub fn assignment_clauses(&self) -> &[Clause] {
        let start = self.clauses.len().saturating_sub(self.given_count);
        &self.clauses[start..]
    }

    pub fn statistics(&self) -> EncodingStatistics {
        EncodingStatistics {
            strategy: self.strategy,
            total_variables: self.variable_count,
            total_clauses: self.clauses.len(),
            total_literals: self.clauses.iter().map(Clause::len).sum(),
            unit_clauses: self.clauses.iter().filter(|c| c.is_unit()).count(),
        }
    }
}

/// Build the CNF formula of `grid` under `strategy`
pub fn encode_formula(grid: &PuzzleGrid, strategy: EncodingStrategy) -> Result<Formula, PuzzleError> {
    let vm = VariableMap::new(grid.size())?;
    let declared = strategy.declared_clause_count(grid.size(), grid.given_count());

    let mut clauses = Vec::with_capacity(declared);
    for family in strategy.families() {
        clauses.extend(family.generate(&vm));
    }
    clauses.extend(assignment_clauses(&vm, grid));

    debug_assert_eq!(
        clauses.len(),
        declared,
        "{} encoding emitted a different clause count than it declares",
        strategy
    );
    debug!(
        "{} encoding: {} variables, {} clauses ({} givens)",
        strategy,
        vm.variable_count(),
        clauses.len(),
        grid.given_count()
    );

    Ok(Formula {
        strategy,
        variable_count: vm.variable_count(),
        declared_clause_count: declared,
        given_count: grid.given_count(),
        clauses,
    })
}

/// Statistics about one encoded formula
#[derive(Debug, Clone)]
pub struct EncodingStatistics {
    pub strategy: EncodingStrategy,
    pub total_variables: usize,
    pub total_clauses: usize,
    pub total_literals: usize,
    pub unit_clauses: usize,
}

impl fmt::Display for EncodingStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SAT Encoding Statistics:")?;
        writeln!(f, "  Strategy: {}", self.strategy)?;
        writeln!(f, "  Total variables: {}", self.total_variables)?;
        writeln!(f, "  Total clauses: {}", self.total_clauses)?;
        writeln!(f, "  Total literals: {}", self.total_literals)?;
        writeln!(f, "  Unit clauses: {}", self.unit_clauses)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_given_grid() -> PuzzleGrid {
        let record = format!("5{}", "0".repeat(80));
        record.parse().unwrap()
    }

    #[test]
    fn test_minimal_single_given() {
        let grid = single_given_grid();
        let formula = encode_formula(&grid, EncodingStrategy::Minimal).unwrap();

        assert_eq!(formula.variable_count, 729);
        assert_eq!(formula.declared_clause_count, 81 + 3 * 2916 + 1);
        assert_eq!(formula.declared_clause_count, 8830);
        assert_eq!(formula.clause_count(), 8830);

        let units: Vec<_> = formula.clauses.iter().filter(|c| c.is_unit()).collect();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].literals, vec![5]);
    }

    #[test]
    fn test_declared_counts_match_body() {
        let grid = single_given_grid();
        for strategy in EncodingStrategy::ALL {
            let formula = encode_formula(&grid, strategy).unwrap();
            assert_eq!(formula.clause_count(), formula.declared_clause_count, "{}", strategy);
        }

        let small: PuzzleGrid = "1200340000000000".parse().unwrap();
        for strategy in EncodingStrategy::ALL {
            let formula = encode_formula(&small, strategy).unwrap();
            assert_eq!(formula.variable_count, 64);
            assert_eq!(formula.clause_count(), formula.declared_clause_count, "{}", strategy);
        }
    }

    #[test]
    fn test_families_sum_to_declared() {
        for strategy in EncodingStrategy::ALL {
            let from_families: usize = strategy.families().iter().map(|f| f.clause_count(9)).sum();
            assert_eq!(from_families + 17, strategy.declared_clause_count(9, 17));
        }
    }

    #[test]
    fn test_strategy_monotonicity() {
        let grid = single_given_grid();
        let counts: Vec<usize> = EncodingStrategy::ALL
            .iter()
            .map(|&s| encode_formula(&grid, s).unwrap().clause_count())
            .collect();
        assert!(counts[0] <= counts[1]);
        assert!(counts[1] <= counts[2]);
    }

    #[test]
    fn test_givens_fidelity() {
        let record = "003020600900305001001806400008102900700000008006708200002609500800203009005010300";
        let grid: PuzzleGrid = record.parse().unwrap();
        let vm = VariableMap::new(9).unwrap();
        let formula = encode_formula(&grid, EncodingStrategy::Efficient).unwrap();

        let units = formula.assignment_clauses();
        assert_eq!(units.len(), grid.given_count());
        for unit in units {
            assert!(unit.is_unit());
            let (r, c, v) = vm.decode(unit.literals[0]).unwrap();
            assert_eq!(grid.get(r, c), (v + 1) as u8);
        }
        let unit_total = formula.clauses.iter().filter(|c| c.is_unit()).count();
        assert_eq!(unit_total, grid.given_count());
    }

    #[test]
    fn test_assignment_clauses_empty_grid() {
        let grid = PuzzleGrid::empty(4).unwrap();
        for strategy in EncodingStrategy::ALL {
            let formula = encode_formula(&grid, strategy).unwrap();
            assert_eq!(formula.given_count, 0);
            assert!(formula.assignment_clauses().is_empty());
        }
    }

    #[test]
    fn test_declared_count_degenerate_size() {
        assert_eq!(EncodingStrategy::Minimal.declared_clause_count(0, 0), 0);
        assert_eq!(EncodingStrategy::Extended.declared_clause_count(1, 1), 5);
    }

    #[test]
    fn test_extended_statistics() {
        let grid = single_given_grid();
        let stats = encode_formula(&grid, EncodingStrategy::Extended).unwrap().statistics();
        assert_eq!(stats.total_clauses, 4 * 81 + 4 * 2916 + 1);
        assert_eq!(stats.total_literals, 4 * 81 * 9 + 4 * 2916 * 2 + 1);
        assert_eq!(stats.unit_clauses, 1);
    }
}
