//! Configuration settings for the Sudoku CNF encoder

use crate::analysis::Metric;
use crate::sat::EncodingStrategy;
use crate::sat::runner::CNF_PLACEHOLDER;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub encoding: EncodingConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
    pub solver: SolverConfig,
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodingConfig {
    pub strategy: EncodingStrategy,
    /// Side length of the puzzles, a perfect square
    pub size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Raw corpus, one record per line, or an ingested `.json` corpus
    pub corpus_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub corpus_json: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    pub command: String,
    /// Arguments; `{cnf}` is replaced with the formula path
    pub args: Vec<String>,
    /// Zero disables the timeout
    pub timeout_seconds: u64,
    /// Statistics that must appear in the solver output
    pub required_statistics: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub metric: Metric,
    pub histogram_bins: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            encoding: EncodingConfig {
                strategy: EncodingStrategy::Minimal,
                size: 9,
            },
            input: InputConfig {
                corpus_file: PathBuf::from("input/raw_17_clue_sudokus.txt"),
            },
            output: OutputConfig {
                directory: PathBuf::from("output/cnf"),
                corpus_json: PathBuf::from("output/corpus.json"),
            },
            solver: SolverConfig {
                command: "zchaff".to_string(),
                args: vec![CNF_PLACEHOLDER.to_string()],
                timeout_seconds: 60,
                required_statistics: vec![
                    "Max Decision Level".to_string(),
                    "Num. of Decisions".to_string(),
                ],
            },
            analysis: AnalysisConfig {
                metric: Metric::GlobalDensity,
                histogram_bins: 10,
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Load from `path` when it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &PathBuf) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        crate::sat::variables::block_size_of(self.encoding.size)
            .context("Invalid puzzle size in configuration")?;

        if self.analysis.histogram_bins == 0 {
            anyhow::bail!("Histogram bin count must be positive");
        }

        if self.solver.command.trim().is_empty() {
            anyhow::bail!("Solver command cannot be empty");
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(strategy) = cli_overrides.strategy {
            self.encoding.strategy = strategy;
        }
        if let Some(size) = cli_overrides.size {
            self.encoding.size = size;
        }
        if let Some(ref input) = cli_overrides.input {
            self.input.corpus_file = input.clone();
        }
        if let Some(ref output_dir) = cli_overrides.output_dir {
            self.output.directory = output_dir.clone();
        }
        if let Some(metric) = cli_overrides.metric {
            self.analysis.metric = metric;
        }
        if let Some(ref command) = cli_overrides.solver {
            self.solver.command = command.clone();
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub strategy: Option<EncodingStrategy>,
    pub size: Option<usize>,
    pub input: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub metric: Option<Metric>,
    pub solver: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_is_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.encoding.size, 9);
    }

    #[test]
    fn test_yaml_round_trip() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config/default.yaml");

        let mut settings = Settings::default();
        settings.encoding.strategy = EncodingStrategy::Extended;
        settings.to_file(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("strategy: extended"));

        let loaded = Settings::from_file(&path).unwrap();
        assert_eq!(loaded.encoding.strategy, EncodingStrategy::Extended);
        assert_eq!(loaded.solver.args, vec!["{cnf}"]);
    }

    #[test]
    fn test_invalid_size_rejected() {
        let mut settings = Settings::default();
        settings.encoding.size = 8;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let mut settings = Settings::default();
        settings.merge_with_cli(&CliOverrides {
            strategy: Some(EncodingStrategy::Efficient),
            size: Some(4),
            metric: Some(Metric::Symmetry),
            ..Default::default()
        });
        assert_eq!(settings.encoding.strategy, EncodingStrategy::Efficient);
        assert_eq!(settings.encoding.size, 4);
        assert_eq!(settings.analysis.metric, Metric::Symmetry);
        assert_eq!(settings.solver.command, "zchaff");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let settings = Settings::load_or_default(&temp_dir.path().join("absent.yaml")).unwrap();
        assert_eq!(settings.encoding.strategy, EncodingStrategy::Minimal);
    }
}
