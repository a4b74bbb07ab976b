//! Statistical metrics over puzzles and puzzle corpora

pub mod correlation;
pub mod density;
pub mod symmetry;

pub use correlation::autocorrelation_sum;
pub use density::{block_density, column_density, global_density, row_density, value_density};
pub use symmetry::{global_symmetry, symmetry, SymmetryTransform};

use crate::sudoku::PuzzleGrid;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar metrics that can be computed for a single puzzle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Givens,
    RowDensity,
    ColumnDensity,
    ValueDensity,
    BlockDensity,
    GlobalDensity,
    Symmetry,
    Autocorrelation,
}

impl Metric {
    pub fn evaluate(self, grid: &PuzzleGrid) -> f64 {
        match self {
            Metric::Givens => grid.given_count() as f64,
            Metric::RowDensity => row_density(grid),
            Metric::ColumnDensity => column_density(grid),
            Metric::ValueDensity => value_density(grid),
            Metric::BlockDensity => block_density(grid),
            Metric::GlobalDensity => global_density(grid),
            Metric::Symmetry => global_symmetry(grid),
            Metric::Autocorrelation => autocorrelation_sum(grid) as f64,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metric::Givens => "givens",
            Metric::RowDensity => "row density",
            Metric::ColumnDensity => "column density",
            Metric::ValueDensity => "value density",
            Metric::BlockDensity => "block density",
            Metric::GlobalDensity => "global density",
            Metric::Symmetry => "symmetry",
            Metric::Autocorrelation => "autocorrelation",
        };
        f.write_str(name)
    }
}

/// Evaluate `metric` for every puzzle, preserving corpus order
pub fn evaluate_corpus(puzzles: &[PuzzleGrid], metric: Metric) -> Vec<f64> {
    puzzles.par_iter().map(|grid| metric.evaluate(grid)).collect()
}

/// Summary of one metric over a corpus
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    pub metric: Metric,
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Index of the first puzzle reaching `min`
    pub argmin: usize,
    /// Index of the first puzzle reaching `max`
    pub argmax: usize,
}

impl MetricSummary {
    /// Summarize `values`; `None` for an empty corpus
    pub fn from_values(metric: Metric, values: &[f64]) -> Option<Self> {
        let first = *values.first()?;
        let mut summary = Self {
            metric,
            count: values.len(),
            min: first,
            max: first,
            mean: 0.0,
            argmin: 0,
            argmax: 0,
        };

        for (i, &value) in values.iter().enumerate() {
            if value < summary.min {
                summary.min = value;
                summary.argmin = i;
            }
            if value > summary.max {
                summary.max = value;
                summary.argmax = i;
            }
        }
        summary.mean = values.iter().sum::<f64>() / values.len() as f64;

        Some(summary)
    }
}

impl fmt::Display for MetricSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Metric: {}", self.metric)?;
        writeln!(f, "  Puzzles: {}", self.count)?;
        writeln!(f, "  Min: {:.4} (puzzle {})", self.min, self.argmin)?;
        writeln!(f, "  Max: {:.4} (puzzle {})", self.max, self.argmax)?;
        writeln!(f, "  Mean: {:.4}", self.mean)?;
        Ok(())
    }
}

/// Equal-width histogram bins
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub lower: f64,
    pub upper: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` into `bins` equal ranges spanning their min and max.
    ///
    /// The top edge belongs to the last bin. When every value is equal they all
    /// land in the first bin.
    pub fn from_values(values: &[f64], bins: usize) -> Self {
        let bins = bins.max(1);
        let lower = values.iter().copied().fold(f64::INFINITY, f64::min);
        let upper = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mut counts = vec![0; bins];

        if values.is_empty() {
            return Self { lower: 0.0, upper: 0.0, counts };
        }

        let width = (upper - lower) / bins as f64;
        for &value in values {
            let bin = if width > 0.0 {
                (((value - lower) / width) as usize).min(bins - 1)
            } else {
                0
            };
            counts[bin] += 1;
        }

        Self { lower, upper, counts }
    }

    pub fn bin_width(&self) -> f64 {
        (self.upper - self.lower) / self.counts.len() as f64
    }

    /// Lower edge of bin `index`
    pub fn bin_start(&self, index: usize) -> f64 {
        self.lower + self.bin_width() * index as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary() {
        let values = [0.5, 0.1, 0.9, 0.1, 0.9];
        let summary = MetricSummary::from_values(Metric::Symmetry, &values).unwrap();
        assert_eq!(summary.count, 5);
        assert_eq!(summary.argmin, 1);
        assert_eq!(summary.argmax, 2);
        assert!((summary.mean - 0.5).abs() < 1e-9);
        assert!(MetricSummary::from_values(Metric::Symmetry, &[]).is_none());
    }

    #[test]
    fn test_histogram() {
        let values = [0.0, 0.1, 0.5, 0.9, 1.0];
        let histogram = Histogram::from_values(&values, 2);
        assert_eq!(histogram.counts, vec![2, 3]);
        assert!((histogram.bin_start(1) - 0.5).abs() < 1e-9);

        let flat = Histogram::from_values(&[3.0, 3.0], 4);
        assert_eq!(flat.counts, vec![2, 0, 0, 0]);
    }

    #[test]
    fn test_evaluate_corpus_keeps_order() {
        let puzzles: Vec<PuzzleGrid> = ["1000000000000000", "1234000000000000", "0000000000000000"]
            .iter()
            .map(|r| r.parse().unwrap())
            .collect();
        let givens = evaluate_corpus(&puzzles, Metric::Givens);
        assert_eq!(givens, vec![1.0, 4.0, 0.0]);
        assert_eq!(evaluate_corpus(&puzzles, Metric::Symmetry)[2], 0.0);
    }
}
