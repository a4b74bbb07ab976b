//! Error types for puzzle construction and solver invocation

use std::time::Duration;
use thiserror::Error;

/// Failures detected while building a puzzle grid or a variable map
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    #[error("puzzle size must be positive")]
    ZeroSize,

    #[error("puzzle size {0} has no integer square root, blocks are undefined")]
    NonSquareSize(usize),

    #[error("puzzle size {0} is too large to be written with single characters")]
    UnsupportedSize(usize),

    #[error("record has {found} cells, expected {expected}")]
    InvalidLength { expected: usize, found: usize },

    #[error("invalid character '{ch}' at position {position}, expected a digit 0..={max}")]
    InvalidCharacter { ch: char, position: usize, max: usize },

    #[error("cell value {value} at ({row}, {col}) is outside 0..={max}")]
    InvalidValue {
        row: usize,
        col: usize,
        value: usize,
        max: usize,
    },
}

/// Failures at the boundary with an external SAT solver process
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("failed to launch solver '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("solver did not finish within {0:?}")]
    Timeout(Duration),

    #[error("solver exited with {0} without reporting a result")]
    AbnormalExit(std::process::ExitStatus),

    #[error("solver output has no result line")]
    MissingVerdict,

    #[error("solver output has no '{0}' statistic")]
    MissingStatistic(String),

    #[error("model literal '{0}' is not a valid integer")]
    MalformedModel(String),

    #[error("solver output carries no model")]
    MissingModel,

    #[error(transparent)]
    Puzzle(#[from] PuzzleError),

    #[error("I/O error while talking to the solver: {0}")]
    Io(#[from] std::io::Error),
}
