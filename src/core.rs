//! Defines the core doku-gen types.
//!
//! Among these are:
//!
//! - Cell: the 81 cells of the grid, and the Unit type grouping them
//! - Digit: the 9 numerals that go in the grid's cells, and DigitSet
//! - Puzzle: the classic or pencilmark text of a Sudoku
//! - Solution: a solved grid

mod cell;
mod digit;
mod id_types;
mod puzzle;

pub use cell::*;
pub use digit::*;
pub use puzzle::*;

use std::fmt;

/// Marker error for invalid Sudoku grids and buffers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Invalid;

impl fmt::Display for Invalid {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("invalid sudoku")
  }
}

impl std::error::Error for Invalid {}
