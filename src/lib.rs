//! Sudoku CNF Encoder
//!
//! This library translates Sudoku puzzles into propositional formulas in
//! DIMACS CNF so that any SAT solver can solve or verify them, and computes
//! descriptive metrics over puzzle corpora.

pub mod analysis;
pub mod config;
pub mod error;
pub mod sat;
pub mod sudoku;
pub mod utils;

pub use config::Settings;
pub use error::{PuzzleError, SolverError};
pub use sat::{encode, EncodingStrategy};
pub use sudoku::PuzzleGrid;

use anyhow::Result;
use std::path::PathBuf;

/// Encode every puzzle of the configured corpus into the output directory
pub fn encode_corpus(settings: &Settings) -> Result<Vec<PathBuf>> {
    let puzzles = sudoku::load_puzzles(&settings.input.corpus_file, settings.encoding.size)?;
    sat::save_corpus_dimacs(&puzzles, settings.encoding.strategy, &settings.output.directory)
}
