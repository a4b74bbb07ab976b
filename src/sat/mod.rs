//! SAT encoding components for Sudoku puzzles

pub mod variables;
pub mod clauses;
pub mod encoder;
pub mod dimacs;
pub mod runner;

pub use variables::VariableMap;
pub use clauses::{Clause, ClauseFamily};
pub use encoder::{encode_formula, EncodingStatistics, EncodingStrategy, Formula};
pub use dimacs::{encode, save_corpus_dimacs, save_dimacs, to_dimacs_string, write_dimacs};
pub use runner::{ExternalSolver, SolverOutcome, SolverRunner, SolverStatistics};
