//! Configuration management for the Sudoku CNF encoder

pub mod settings;

pub use settings::{
    AnalysisConfig, CliOverrides, EncodingConfig, InputConfig, OutputConfig, Settings, SolverConfig,
};
