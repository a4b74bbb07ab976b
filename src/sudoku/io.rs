//! Puzzle corpus ingestion and persistence

use super::PuzzleGrid;
use anyhow::{Context, Result};
use log::info;
use rayon::prelude::*;
use std::path::Path;

/// Parse a corpus with one flat `size²`-character record per line.
///
/// Blank lines are skipped. Any malformed record fails the whole corpus,
/// reporting its 1-based line number.
pub fn parse_corpus(content: &str, size: usize) -> Result<Vec<PuzzleGrid>> {
    let records: Vec<(usize, &str)> = content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .collect();

    records
        .into_par_iter()
        .map(|(line_no, record)| {
            PuzzleGrid::parse_record(record, size)
                .with_context(|| format!("Invalid puzzle record on line {}", line_no))
        })
        .collect()
}

/// Load a raw text corpus from a file
pub fn load_corpus<P: AsRef<Path>>(path: P, size: usize) -> Result<Vec<PuzzleGrid>> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read corpus file: {}", path.as_ref().display()))?;

    let puzzles = parse_corpus(&content, size)
        .with_context(|| format!("Failed to parse corpus file: {}", path.as_ref().display()))?;

    info!("Loaded {} puzzles from {}", puzzles.len(), path.as_ref().display());
    Ok(puzzles)
}

/// Load a corpus either from JSON (nested rows, `.json` extension) or raw text
pub fn load_puzzles<P: AsRef<Path>>(path: P, size: usize) -> Result<Vec<PuzzleGrid>> {
    match path.as_ref().extension() {
        Some(ext) if ext == "json" => load_corpus_json(path),
        _ => load_corpus(path, size),
    }
}

/// Save a corpus as JSON, one nested row array per puzzle
pub fn save_corpus_json<P: AsRef<Path>>(puzzles: &[PuzzleGrid], path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let content = serde_json::to_string(puzzles).context("Failed to serialize corpus")?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write corpus file: {}", path.display()))?;

    Ok(())
}

/// Load a corpus previously written by [`save_corpus_json`]
pub fn load_corpus_json<P: AsRef<Path>>(path: P) -> Result<Vec<PuzzleGrid>> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read corpus file: {}", path.as_ref().display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse corpus file: {}", path.as_ref().display()))
}

/// Write a small example corpus for trying the tool out
pub fn create_example_corpus<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let content = [
        // 17-clue puzzles
        "000000010400000000020000000000050407008000300001090000300400200050100000000806000",
        "000000010400000000020000000000050604008000300001090000300400200050100000000807000",
        "000000012000035000000600070700000300000400800100000000000120000080000040050000600",
        // A denser classic
        "003020600900305001001806400008102900700000008006708200002609500800203009005010300",
    ]
    .join("\n");

    std::fs::write(path, content + "\n")
        .with_context(|| format!("Failed to write example corpus: {}", path.display()))?;

    Ok(())
}
