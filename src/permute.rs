//! Functions to permute a Sudoku puzzle into a different but equivalent one.
//!
//! Relabeling digits, transposing, swapping bands, and swapping lines within
//! a band all preserve a puzzle's validity and solution count.  A solver may
//! still take a different number of guesses on each version.

use crate::{core::*, random::*};

/// A rearrangement of `0..N`, sending `i` to `self.0[i]`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
struct Shuffle<const N: usize>([usize; N]);

impl<const N: usize> Shuffle<N> {
  fn identity() -> Self {
    Shuffle(std::array::from_fn(|i| i))
  }

  fn random<R: Rng>(random: &mut R) -> Self {
    let mut answer = Self::identity();
    answer.0.shuffle(random);
    answer
  }

  fn apply(&self, i: usize) -> usize {
    self.0[i]
  }
}

/// Moves a row (or column) by shuffling its band among the bands, then
/// shuffling it among the lines of its new band.
fn move_line(line: usize, bands: &Shuffle<3>, within: &[Shuffle<3>; 3]) -> usize {
  let band = bands.apply(line / 3);
  band * 3 + within[band].apply(line % 3)
}

/// A permutation of Sudoku cells that preserves the validity of the grid.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct CellPermutation {
  transpose: bool,
  row_bands: Shuffle<3>,
  col_bands: Shuffle<3>,
  rows_in_bands: [Shuffle<3>; 3],
  cols_in_bands: [Shuffle<3>; 3],
}

impl CellPermutation {
  pub fn random<R: Rng>(random: &mut R) -> Self {
    CellPermutation {
      transpose: random.random(),
      row_bands: Shuffle::random(random),
      col_bands: Shuffle::random(random),
      rows_in_bands: [(); 3].map(|_| Shuffle::random(random)),
      cols_in_bands: [(); 3].map(|_| Shuffle::random(random)),
    }
  }

  pub fn identity() -> Self {
    CellPermutation {
      transpose: false,
      row_bands: Shuffle::identity(),
      col_bands: Shuffle::identity(),
      rows_in_bands: [Shuffle::identity(); 3],
      cols_in_bands: [Shuffle::identity(); 3],
    }
  }

  /// Applies this permutation to the given cell.
  pub fn apply(&self, cell: Cell) -> Cell {
    let (mut row, mut col) = (cell.row() as usize, cell.col() as usize);
    if self.transpose {
      std::mem::swap(&mut row, &mut col);
    }
    let row = move_line(row, &self.row_bands, &self.rows_in_bands);
    let col = move_line(col, &self.col_bands, &self.cols_in_bands);
    Cell::at(row as i8, col as i8)
  }
}

/// Describes a validity-preserving transformation of a Sudoku puzzle.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct PuzzlePermutation {
  digits: Shuffle<9>,
  cells: CellPermutation,
}

impl PuzzlePermutation {
  /// Makes a random Sudoku permutation from the given Random.
  pub fn random<R: Rng>(random: &mut R) -> Self {
    PuzzlePermutation {
      digits: Shuffle::random(random),
      cells: CellPermutation::random(random),
    }
  }

  pub fn identity() -> Self {
    PuzzlePermutation {
      digits: Shuffle::identity(),
      cells: CellPermutation::identity(),
    }
  }

  /// The index of the digit this permutation relabels `digit` as.
  fn relabel(&self, digit: Digit) -> usize {
    self.digits.apply(digit.index())
  }

  /// Applies this permutation to the given puzzle.  Classic cells that hold
  /// no digit keep whatever blank symbol they had.
  pub fn apply(&self, puzzle: &Puzzle) -> Puzzle {
    let mut answer = puzzle.clone();
    let source = puzzle.text();
    let target = answer.text_mut();
    match puzzle.variant() {
      Variant::Classic => {
        for cell in Cell::all() {
          let b = source[cell.index()];
          target[self.cells.apply(cell).index()] = match Digit::from_ascii(b) {
            Some(digit) => b'1' + self.relabel(digit) as u8,
            None => b,
          };
        }
      }
      Variant::Pencilmark => {
        for cell in Cell::all() {
          let to_cell = self.cells.apply(cell).index();
          for digit in Digit::all() {
            let from = cell.index() * 9 + digit.index();
            let to = to_cell * 9 + self.relabel(digit);
            target[to] = if source[from] == b'.' {
              b'.'
            } else {
              candidate_symbol(to)
            };
          }
        }
      }
    }
    answer
  }
}

/// Rewrites the puzzle in place as a random equivalent one.
pub fn permute_sudoku<R: Rng>(puzzle: &mut Puzzle, random: &mut R) {
  *puzzle = PuzzlePermutation::random(random).apply(puzzle);
}
