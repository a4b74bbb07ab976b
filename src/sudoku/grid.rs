//! Puzzle grid representation

use crate::error::PuzzleError;
use crate::sat::variables::block_size_of;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest side length whose values still fit in one base-36 character
pub const MAX_SIZE: usize = 35;

/// An `N x N` Sudoku grid of given values, `0` marking a blank cell.
///
/// Serialized as nested rows, e.g. `[[0, 0, 3, ...], ...]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct PuzzleGrid {
    size: usize,
    block_size: usize,
    cells: Vec<u8>,
}

impl PuzzleGrid {
    /// Create an empty grid
    pub fn empty(size: usize) -> Result<Self, PuzzleError> {
        if size > MAX_SIZE {
            return Err(PuzzleError::UnsupportedSize(size));
        }
        let block_size = block_size_of(size)?;
        Ok(Self {
            size,
            block_size,
            cells: vec![0; size * size],
        })
    }

    /// Create a grid from rows of values
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self, PuzzleError> {
        let size = rows.len();
        let mut grid = Self::empty(size)?;

        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != size {
                return Err(PuzzleError::InvalidLength {
                    expected: size,
                    found: values.len(),
                });
            }
            for (col, value) in values.into_iter().enumerate() {
                grid.set(row, col, value)?;
            }
        }

        Ok(grid)
    }

    /// Parse a flat record of `size²` digit characters.
    ///
    /// Values above 9 use letters, so a 16x16 record spells 10..16 as `a`..`g`.
    pub fn parse_record(record: &str, size: usize) -> Result<Self, PuzzleError> {
        let mut grid = Self::empty(size)?;

        let found = record.chars().count();
        if found != size * size {
            return Err(PuzzleError::InvalidLength {
                expected: size * size,
                found,
            });
        }

        for (position, ch) in record.chars().enumerate() {
            let value = ch
                .to_digit(36)
                .filter(|&d| d as usize <= size)
                .ok_or(PuzzleError::InvalidCharacter {
                    ch,
                    position,
                    max: size,
                })?;
            grid.cells[position] = value as u8;
        }

        Ok(grid)
    }

    /// Side length N
    pub fn size(&self) -> usize {
        self.size
    }

    /// Side length of one block, √N
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    /// Value at coordinates, `0` for blank
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[self.index(row, col)]
    }

    /// Set cell value at coordinates
    pub fn set(&mut self, row: usize, col: usize, value: u8) -> Result<(), PuzzleError> {
        if row >= self.size || col >= self.size || value as usize > self.size {
            return Err(PuzzleError::InvalidValue {
                row,
                col,
                value: value as usize,
                max: self.size,
            });
        }
        let idx = self.index(row, col);
        self.cells[idx] = value;
        Ok(())
    }

    pub fn is_given(&self, row: usize, col: usize) -> bool {
        self.get(row, col) != 0
    }

    /// All given cells as `(row, col, value)`, row-major
    pub fn givens(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &value)| value != 0)
            .map(move |(i, &value)| (i / self.size, i % self.size, value as usize))
    }

    pub fn given_count(&self) -> usize {
        self.cells.iter().filter(|&&value| value != 0).count()
    }

    /// Givens in one row
    pub fn row_givens(&self, row: usize) -> usize {
        (0..self.size).filter(|&col| self.is_given(row, col)).count()
    }

    /// Givens in one column
    pub fn column_givens(&self, col: usize) -> usize {
        (0..self.size).filter(|&row| self.is_given(row, col)).count()
    }

    /// Givens in block `(block_row, block_col)`, both in `0..block_size`
    pub fn block_givens(&self, block_row: usize, block_col: usize) -> usize {
        let b = self.block_size;
        (0..self.size)
            .filter(|&i| self.is_given(block_row * b + i / b, block_col * b + i % b))
            .count()
    }

    /// How many cells are given `value`
    pub fn value_givens(&self, value: u8) -> usize {
        self.cells.iter().filter(|&&v| v == value).count()
    }

    pub fn rows(&self) -> Vec<Vec<u8>> {
        self.cells.chunks(self.size).map(<[u8]>::to_vec).collect()
    }

    /// Flat record form, the inverse of [`PuzzleGrid::parse_record`]
    pub fn to_record(&self) -> String {
        self.cells
            .iter()
            .map(|&v| char::from_digit(v as u32, 36).unwrap_or('?'))
            .collect()
    }
}

/// Parse a record, inferring the size from its length
impl FromStr for PuzzleGrid {
    type Err = PuzzleError;

    fn from_str(record: &str) -> Result<Self, Self::Err> {
        let record = record.trim();
        let length = record.chars().count();
        let size = (length as f64).sqrt().round() as usize;
        if size * size != length {
            return Err(PuzzleError::InvalidLength {
                expected: size * size,
                found: length,
            });
        }
        Self::parse_record(record, size)
    }
}

impl TryFrom<Vec<Vec<u8>>> for PuzzleGrid {
    type Error = PuzzleError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<PuzzleGrid> for Vec<Vec<u8>> {
    fn from(grid: PuzzleGrid) -> Self {
        grid.rows()
    }
}

impl fmt::Display for PuzzleGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.block_size;
        for row in 0..self.size {
            if row > 0 && row % b == 0 {
                let width = self.size * 2 + (b - 1) * 2 - 1;
                writeln!(f, "{}", "-".repeat(width))?;
            }
            for col in 0..self.size {
                if col > 0 {
                    write!(f, " ")?;
                    if col % b == 0 {
                        write!(f, "| ")?;
                    }
                }
                match self.get(row, col) {
                    0 => write!(f, ".")?,
                    v => write!(f, "{}", char::from_digit(v as u32, 36).unwrap_or('?'))?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
