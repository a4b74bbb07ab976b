//! Display and output formatting utilities

use crate::analysis::{Histogram, MetricSummary};
use crate::sat::SolverOutcome;
use crate::sudoku::PuzzleGrid;
use std::io::IsTerminal;

/// Format puzzles and corpus metrics for the console
pub struct PuzzleFormatter;

impl PuzzleFormatter {
    /// Format a grid with row and column numbers
    pub fn format_grid_with_coords(grid: &PuzzleGrid) -> String {
        let mut output = String::new();

        output.push_str("   ");
        for col in 0..grid.size() {
            output.push_str(&format!("{:3}", col));
        }
        output.push('\n');

        for row in 0..grid.size() {
            output.push_str(&format!("{:2} ", row));
            for col in 0..grid.size() {
                match grid.get(row, col) {
                    0 => output.push_str("  ·"),
                    v => output.push_str(&format!("{:3}", v)),
                }
            }
            output.push('\n');
        }

        output
    }

    /// One-line metric summary per puzzle
    pub fn format_metric_table(values: &[f64], limit: usize) -> String {
        let mut output = String::new();
        output.push_str("Index    | Value\n");
        output.push_str("---------|----------\n");
        for (i, value) in values.iter().enumerate().take(limit) {
            output.push_str(&format!("{:8} | {:.4}\n", i, value));
        }
        if values.len() > limit {
            output.push_str(&format!("... {} more\n", values.len() - limit));
        }
        output
    }

    /// Render a histogram as horizontal bars scaled to `width` characters
    pub fn format_histogram(histogram: &Histogram, width: usize) -> String {
        let mut output = String::new();
        let peak = histogram.counts.iter().copied().max().unwrap_or(0);

        for (i, &count) in histogram.counts.iter().enumerate() {
            let bar = if peak > 0 { count * width / peak } else { 0 };
            output.push_str(&format!(
                "{:>10.4} | {:<width$} {}\n",
                histogram.bin_start(i),
                "█".repeat(bar),
                count,
                width = width
            ));
        }

        output
    }

    /// Summary followed by the histogram
    pub fn format_analysis(summary: &MetricSummary, histogram: &Histogram) -> String {
        format!("{}\n{}", summary, Self::format_histogram(histogram, 40))
    }
}

/// Colour of a console status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Finished work
    Done,
    /// Progress step
    Step,
    Warn,
    Fail,
}

impl Tone {
    fn ansi(self) -> u8 {
        match self {
            Tone::Fail => 31,
            Tone::Done => 32,
            Tone::Warn => 33,
            Tone::Step => 36,
        }
    }

    /// Wrap `text` in this tone's ANSI colour when stdout is a colour terminal
    pub fn paint(self, text: &str) -> String {
        if colors_enabled() {
            format!("\x1b[{}m{}\x1b[0m", self.ansi(), text)
        } else {
            text.to_string()
        }
    }

    /// Coloured one-line summary of a solver verdict
    pub fn verdict(outcome: SolverOutcome) -> String {
        match outcome {
            SolverOutcome::Satisfiable => Tone::Done.paint("Puzzle is solvable"),
            SolverOutcome::Unsatisfiable => Tone::Fail.paint("Puzzle has no solution"),
            SolverOutcome::Unknown => Tone::Warn.paint("Solver reported an unknown result"),
        }
    }
}

fn colors_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}
