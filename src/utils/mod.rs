//! Console output helpers

pub mod display;

pub use display::{PuzzleFormatter, Tone};
