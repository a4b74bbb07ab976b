//! Sudoku puzzle representation and corpus I/O

pub mod grid;
pub mod io;

pub use grid::PuzzleGrid;
pub use io::{
    create_example_corpus, load_corpus, load_corpus_json, load_puzzles, parse_corpus,
    save_corpus_json,
};
