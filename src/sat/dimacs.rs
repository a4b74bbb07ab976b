//! DIMACS CNF serialization

use super::encoder::{encode_formula, EncodingStrategy, Formula};
use crate::error::PuzzleError;
use crate::sudoku::PuzzleGrid;
use anyhow::{Context, Result};
use log::info;
use rayon::prelude::*;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Write `formula` in DIMACS CNF: comment line, problem line, one clause per line
pub fn write_dimacs<W: Write>(formula: &Formula, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "c {}", formula.strategy.description())?;
    writeln!(
        writer,
        "p cnf {} {}",
        formula.variable_count, formula.declared_clause_count
    )?;
    for clause in &formula.clauses {
        writeln!(writer, "{}", clause)?;
    }
    Ok(())
}

/// Render `formula` as DIMACS text
pub fn to_dimacs_string(formula: &Formula) -> String {
    // Roughly three literals of up to five characters per clause
    let mut buffer = Vec::with_capacity(64 + formula.clauses.len() * 16);
    // Writes into a Vec<u8> cannot fail and the output is ASCII
    let _ = write_dimacs(formula, &mut buffer);
    String::from_utf8(buffer).unwrap_or_default()
}

/// Encode `grid` with `strategy` and return the DIMACS text
pub fn encode(grid: &PuzzleGrid, strategy: EncodingStrategy) -> Result<String, PuzzleError> {
    encode_formula(grid, strategy).map(|formula| to_dimacs_string(&formula))
}

/// Encode `grid` and save the DIMACS text to `path`
pub fn save_dimacs<P: AsRef<Path>>(
    grid: &PuzzleGrid,
    strategy: EncodingStrategy,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    let formula = encode_formula(grid, strategy).context("Failed to encode puzzle")?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create CNF file: {}", path.display()))?;
    let mut writer = io::BufWriter::new(file);
    write_dimacs(&formula, &mut writer)
        .and_then(|_| writer.flush())
        .with_context(|| format!("Failed to write CNF file: {}", path.display()))?;

    Ok(())
}

/// File name for puzzle `index` of a corpus
pub fn corpus_file_name(index: usize, strategy: EncodingStrategy) -> String {
    format!("puzzle_{:05}_{}.cnf", index, strategy)
}

/// Encode every puzzle of a corpus in parallel, one DIMACS file each.
///
/// Returns the written paths in corpus order.
pub fn save_corpus_dimacs<P: AsRef<Path>>(
    puzzles: &[PuzzleGrid],
    strategy: EncodingStrategy,
    directory: P,
) -> Result<Vec<PathBuf>> {
    let directory = directory.as_ref();
    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create directory: {}", directory.display()))?;

    let paths = puzzles
        .par_iter()
        .enumerate()
        .map(|(index, grid)| -> Result<PathBuf> {
            let path = directory.join(corpus_file_name(index, strategy));
            save_dimacs(grid, strategy, &path)
                .with_context(|| format!("Failed to encode puzzle {}", index))?;
            Ok(path)
        })
        .collect::<Result<Vec<_>>>()?;

    info!(
        "Encoded {} puzzles with the {} encoding into {}",
        paths.len(),
        strategy,
        directory.display()
    );
    Ok(paths)
}
