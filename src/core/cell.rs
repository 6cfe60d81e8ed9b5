//! Defines the Cell type, which identifies the 81 cells of a Sudoku grid, and
//! the units (rows, columns and blocks) that group them.

use super::id_types::grid_index;
use itertools::Itertools;
use once_cell::sync::Lazy;
use std::fmt;

grid_index! {
  /// One of the 81 cells of the grid, numbered in row-major order from the
  /// top left.
  Cell[81]
}

grid_index! {
  /// One of the 27 units of the grid: rows 0..9, then columns 9..18, then
  /// blocks 18..27.
  #[derive(Debug)]
  Unit[27]
}

/// The number of cells that share a unit with any given cell.
pub const PEER_COUNT: usize = 20;

impl Cell {
  /// Converts from row/col (both in 0..9) to Cell.
  pub const fn at(row: i8, col: i8) -> Cell {
    Cell(row * 9 + col)
  }

  /// This cell's row, in 0..9.
  pub const fn row(self) -> i8 {
    self.0 / 9
  }

  /// This cell's column, in 0..9.
  pub const fn col(self) -> i8 {
    self.0 % 9
  }

  /// This cell's block, in 0..9, numbered in row-major order.
  pub const fn blk(self) -> i8 {
    self.row() / 3 * 3 + self.col() / 3
  }

  /// The three units this cell belongs to: its row, column and block.
  pub const fn units(self) -> [Unit; 3] {
    [Unit(self.row()), Unit(9 + self.col()), Unit(18 + self.blk())]
  }

  /// The 20 other cells sharing a unit with this one.
  pub fn peers(self) -> &'static [Cell; PEER_COUNT] {
    unsafe {
      // Safe because `self.index()` is in 0..81.
      PEERS.get_unchecked(self.index())
    }
  }
}

impl Unit {
  /// The nine cells of this unit, in row-major order.
  pub fn cells(self) -> &'static [Cell; 9] {
    unsafe {
      // Safe because `self.index()` is in 0..27.
      UNIT_CELLS.get_unchecked(self.index())
    }
  }
}

static UNIT_CELLS: Lazy<[[Cell; 9]; Unit::COUNT]> = Lazy::new(|| {
  let mut answer = [[Cell(0); 9]; Unit::COUNT];
  for cell in Cell::all() {
    for unit in cell.units() {
      let slot = match unit.get() {
        0..=8 => cell.col(),
        9..=17 => cell.row(),
        _ => cell.row() % 3 * 3 + cell.col() % 3,
      };
      answer[unit.index()][slot as usize] = cell;
    }
  }
  answer
});

static PEERS: Lazy<[[Cell; PEER_COUNT]; Cell::COUNT]> = Lazy::new(|| {
  let mut answer = [[Cell(0); PEER_COUNT]; Cell::COUNT];
  for cell in Cell::all() {
    let peers = cell
      .units()
      .iter()
      .flat_map(|unit| unit.cells().iter().copied())
      .filter(|&peer| peer != cell)
      .unique()
      .sorted()
      .collect_vec();
    answer[cell.index()].copy_from_slice(&peers);
  }
  answer
});

impl fmt::Debug for Cell {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "R{}C{}", self.row() + 1, self.col() + 1)
  }
}
