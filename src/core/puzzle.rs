//! Defines the Puzzle type: the text form of a classic or pencilmark Sudoku,
//! and the Solution type that the solver produces for either.

use super::*;
use serde::{Deserialize, Serialize, Serializer};
use static_assertions::const_assert_eq;
use std::fmt;
use std::str::FromStr;

/// The number of symbols in a classic puzzle: one per cell.
pub const CLASSIC_SIZE: usize = 81;
/// The number of symbols in a pencilmark puzzle: one per cell and digit.
pub const PENCILMARK_SIZE: usize = 729;

const_assert_eq!(CLASSIC_SIZE, Cell::COUNT);
const_assert_eq!(PENCILMARK_SIZE, Cell::COUNT * Digit::COUNT);

/// The two textual representations of a Sudoku.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
  /// 81 symbols, each a digit clue or `.` for an empty cell.
  Classic,
  /// 729 symbols, nine per cell; `.` marks an eliminated candidate and
  /// anything else a surviving one.
  Pencilmark,
}

impl Variant {
  /// Picks the variant for a pencilmark flag.
  pub const fn from_flag(pencilmark: bool) -> Variant {
    if pencilmark {
      Variant::Pencilmark
    } else {
      Variant::Classic
    }
  }

  /// Tells which variant a raw buffer holds.  A buffer is pencilmark exactly
  /// when its byte at offset 81 exists and is a symbol rather than a
  /// terminator: that is, when it's `>= b'.'`.
  pub fn detect(bytes: &[u8]) -> Variant {
    match bytes.get(CLASSIC_SIZE) {
      Some(&b) if b >= b'.' => Variant::Pencilmark,
      _ => Variant::Classic,
    }
  }

  /// The number of symbols in a puzzle of this variant.
  pub const fn size(self) -> usize {
    match self {
      Variant::Classic => CLASSIC_SIZE,
      Variant::Pencilmark => PENCILMARK_SIZE,
    }
  }

  pub const fn is_pencilmark(self) -> bool {
    matches!(self, Variant::Pencilmark)
  }
}

/// A Sudoku puzzle in text form.  The variant is fixed when the puzzle is
/// made, and the text always holds exactly `variant.size()` bytes.
///
/// No symbol validation is done: malformed text simply turns out to have no
/// solution.
#[derive(Clone, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Puzzle {
  variant: Variant,
  text: Box<[u8]>,
}

impl Puzzle {
  /// Makes the fully unconstrained puzzle of the given variant: no clues for
  /// classic, every candidate present for pencilmark.
  pub fn empty(variant: Variant) -> Puzzle {
    let text = match variant {
      Variant::Classic => vec![b'.'; CLASSIC_SIZE],
      Variant::Pencilmark => (0..PENCILMARK_SIZE).map(candidate_symbol).collect(),
    };
    Puzzle {
      variant,
      text: text.into_boxed_slice(),
    }
  }

  /// Makes a puzzle of the given variant from the front of a buffer, ignoring
  /// anything past the variant's size.  Returns `Err(Invalid)` if the buffer
  /// is too short.
  pub fn from_bytes(variant: Variant, bytes: &[u8]) -> Result<Puzzle, Invalid> {
    let text = bytes.get(..variant.size()).ok_or(Invalid)?;
    Ok(Puzzle {
      variant,
      text: text.into(),
    })
  }

  /// Decodes a buffer in the external convention, where the variant is
  /// implied by the byte at offset 81.
  pub fn from_wire(bytes: &[u8]) -> Result<Puzzle, Invalid> {
    Puzzle::from_bytes(Variant::detect(bytes), bytes)
  }

  /// Makes the puzzle whose only clues spell out the given solution.
  pub fn from_solution(variant: Variant, solution: &Solution) -> Puzzle {
    let mut answer = Puzzle::empty(variant);
    for cell in Cell::all() {
      let digit = solution[cell];
      match variant {
        Variant::Classic => answer.text[cell.index()] = digit.to_ascii(),
        Variant::Pencilmark => {
          for other in Digit::all().filter(|&d| d != digit) {
            answer.text[cell.index() * 9 + other.index()] = b'.';
          }
        }
      }
    }
    answer
  }

  pub fn variant(&self) -> Variant {
    self.variant
  }

  /// The puzzle's symbols.
  pub fn text(&self) -> &[u8] {
    &self.text
  }

  /// Mutable access to the symbols, for in-place rewriting.  The length can't
  /// change, so the variant invariant holds.
  pub(crate) fn text_mut(&mut self) -> &mut [u8] {
    &mut self.text
  }

  pub fn len(&self) -> usize {
    self.text.len()
  }

  /// Whether the puzzle has no symbols, which is never the case.
  pub fn is_empty(&self) -> bool {
    self.text.is_empty()
  }

  /// Copies the text into the front of `out`, returning the number of bytes
  /// written.  Returns `Err(Invalid)` without writing if `out` is too short.
  pub fn copy_to(&self, out: &mut [u8]) -> Result<usize, Invalid> {
    let dest = out.get_mut(..self.text.len()).ok_or(Invalid)?;
    dest.copy_from_slice(&self.text);
    Ok(self.text.len())
  }

  /// Tells whether the symbol at `i` is a clue: a digit for classic, an
  /// eliminated candidate for pencilmark.
  pub fn is_clue(&self, i: usize) -> bool {
    match self.variant {
      Variant::Classic => Digit::from_ascii(self.text[i]).is_some(),
      Variant::Pencilmark => self.text[i] == b'.',
    }
  }

  /// Counts the clues.  The two variants count constraint strength in
  /// opposite directions: filled cells versus eliminated candidates.
  pub fn num_clues(&self) -> usize {
    (0..self.text.len()).filter(|&i| self.is_clue(i)).count()
  }

  /// The positions of all the clues.
  pub fn clue_positions(&self) -> impl Iterator<Item = usize> + '_ {
    (0..self.text.len()).filter(|&i| self.is_clue(i))
  }

  /// Removes the clue at `i`, if there is one there, returning whether it
  /// did.  Classic cells become `.`; pencilmark candidates are restored.
  pub fn drop_clue(&mut self, i: usize) -> bool {
    if !self.is_clue(i) {
      return false;
    }
    self.text[i] = match self.variant {
      Variant::Classic => b'.',
      Variant::Pencilmark => candidate_symbol(i),
    };
    true
  }

  /// The candidate digits each cell starts out with.
  pub fn candidates(&self) -> [DigitSet; 81] {
    let mut answer = [DigitSet::ALL; 81];
    match self.variant {
      Variant::Classic => {
        for (set, &b) in answer.iter_mut().zip(self.text.iter()) {
          if let Some(digit) = Digit::from_ascii(b) {
            *set = DigitSet::singleton(digit);
          }
        }
      }
      Variant::Pencilmark => {
        for (set, symbols) in answer.iter_mut().zip(self.text.chunks_exact(9)) {
          *set = Digit::all()
            .zip(symbols)
            .filter(|&(_, &b)| b != b'.')
            .map(|(digit, _)| digit)
            .collect();
        }
      }
    }
    answer
  }

  /// Converts to the pencilmark form with the same constraints.  Pencilmark
  /// puzzles are returned unchanged.
  pub fn to_pencilmark(&self) -> Puzzle {
    if self.variant.is_pencilmark() {
      return self.clone();
    }
    let mut answer = Puzzle::empty(Variant::Pencilmark);
    for (cell, set) in self.candidates().iter().enumerate() {
      for digit in Digit::all().filter(|&d| !set.contains(d)) {
        answer.text[cell * 9 + digit.index()] = b'.';
      }
    }
    answer
  }
}

/// The symbol for a surviving candidate at a pencilmark position.
pub(crate) fn candidate_symbol(i: usize) -> u8 {
  b'1' + (i % 9) as u8
}

impl fmt::Display for Puzzle {
  /// Prints the puzzle's text as is.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for &b in self.text.iter() {
      fmt::Write::write_char(f, b as char)?;
    }
    Ok(())
  }
}

impl fmt::Debug for Puzzle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:?}({})", self.variant, self)
  }
}

impl FromStr for Puzzle {
  type Err = Invalid;

  /// Parses a puzzle using the same variant detection as `from_wire`.
  fn from_str(s: &str) -> Result<Puzzle, Invalid> {
    Puzzle::from_wire(s.as_bytes())
  }
}

impl Serialize for Puzzle {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

/// A solved Sudoku grid: every cell holds a digit, and every unit holds each
/// digit once.  Solutions of both variants share this form.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Solution([Digit; 81]);

impl Solution {
  /// Makes a Solution from its digits.  Returns `Err(Invalid)` unless every
  /// unit holds nine distinct digits.
  pub fn new(digits: [Digit; 81]) -> Result<Solution, Invalid> {
    let valid = Unit::all().all(|unit| {
      unit
        .cells()
        .iter()
        .map(|&cell| DigitSet::singleton(digits[cell.index()]))
        .fold(DigitSet::EMPTY, |acc, d| acc.union(d))
        == DigitSet::ALL
    });
    if valid {
      Ok(Solution(digits))
    } else {
      Err(Invalid)
    }
  }

  /// Makes a Solution without checking it.  Callers must ensure that every
  /// unit holds nine distinct digits.
  pub(crate) const fn new_unchecked(digits: [Digit; 81]) -> Solution {
    Solution(digits)
  }

  /// Renders the solution as 81 ASCII digits.
  pub fn to_text(&self) -> [u8; 81] {
    self.0.map(Digit::to_ascii)
  }
}

impl std::ops::Index<Cell> for Solution {
  type Output = Digit;

  fn index(&self, cell: Cell) -> &Digit {
    unsafe {
      // Safe because `cell.index()` is in 0..81.
      self.0.get_unchecked(cell.index())
    }
  }
}

impl fmt::Display for Solution {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for digit in self.0 {
      fmt::Display::fmt(&digit, f)?;
    }
    Ok(())
  }
}

impl fmt::Debug for Solution {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Solution({})", self)
  }
}

impl FromStr for Solution {
  type Err = Invalid;

  fn from_str(s: &str) -> Result<Solution, Invalid> {
    let bytes = s.as_bytes();
    if bytes.len() != CLASSIC_SIZE {
      return Err(Invalid);
    }
    let mut digits = [D1; 81];
    for (digit, &b) in digits.iter_mut().zip(bytes) {
      *digit = Digit::from_ascii(b).ok_or(Invalid)?;
    }
    Solution::new(digits)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::fixtures::SOLVED;

  #[test]
  fn detect() {
    let classic = SOLVED.as_bytes();
    assert_eq!(Variant::detect(classic), Variant::Classic);
    let mut terminated = classic.to_vec();
    terminated.push(b'\n');
    terminated.extend_from_slice(classic);
    assert_eq!(Variant::detect(&terminated), Variant::Classic);
    let pencilmark = Puzzle::empty(Variant::Pencilmark);
    assert_eq!(Variant::detect(pencilmark.text()), Variant::Pencilmark);
    assert_eq!(Variant::Classic.size(), 81);
    assert_eq!(Variant::Pencilmark.size(), 729);
  }

  #[test]
  fn from_bytes_truncates() {
    let mut bytes = SOLVED.as_bytes().to_vec();
    bytes.extend_from_slice(b"\0garbage");
    let puzzle = Puzzle::from_bytes(Variant::Classic, &bytes).unwrap();
    assert_eq!(puzzle.to_string(), SOLVED);
    assert!(Puzzle::from_bytes(Variant::Pencilmark, &bytes).is_err());
    assert!(Puzzle::from_bytes(Variant::Classic, b"123").is_err());
  }

  #[test]
  fn clues() {
    let mut puzzle: Puzzle = SOLVED.replace("5", ".").parse().unwrap();
    assert_eq!(puzzle.variant(), Variant::Classic);
    assert_eq!(puzzle.num_clues(), 72);
    assert!(!puzzle.drop_clue(4));
    assert!(puzzle.drop_clue(0));
    assert_eq!(puzzle.num_clues(), 71);
    assert_eq!(&puzzle.text()[..3], b".23");

    let mut pm = Puzzle::empty(Variant::Pencilmark);
    assert_eq!(pm.num_clues(), 0);
    pm.text_mut()[10] = b'.';
    assert_eq!(pm.num_clues(), 1);
    assert!(pm.drop_clue(10));
    assert_eq!(pm.text()[10], b'2');
    assert_eq!(pm, Puzzle::empty(Variant::Pencilmark));
  }

  #[test]
  fn candidates_and_conversion() {
    let solution: Solution = SOLVED.parse().unwrap();
    let classic = Puzzle::from_solution(Variant::Classic, &solution);
    assert_eq!(classic.to_string(), SOLVED);
    let pm = Puzzle::from_solution(Variant::Pencilmark, &solution);
    assert_eq!(pm.num_clues(), 81 * 8);
    assert_eq!(classic.to_pencilmark(), pm);
    assert_eq!(classic.candidates(), pm.candidates());
    assert_eq!(&pm.text()[..9], b"1........");

    let empty = Puzzle::empty(Variant::Classic);
    assert_eq!(empty.to_pencilmark(), Puzzle::empty(Variant::Pencilmark));
  }

  #[test]
  fn copy_to() {
    let puzzle = Puzzle::empty(Variant::Classic);
    let mut buffer = [0u8; 82];
    assert_eq!(puzzle.copy_to(&mut buffer).unwrap(), 81);
    assert_eq!(buffer[80], b'.');
    assert_eq!(buffer[81], 0);
    assert!(puzzle.copy_to(&mut buffer[..80]).is_err());
  }

  #[test]
  fn solutions() {
    let solution: Solution = SOLVED.parse().unwrap();
    assert_eq!(solution.to_string(), SOLVED);
    assert_eq!(&solution.to_text()[..], SOLVED.as_bytes());
    assert!(SOLVED.replace("12", "21").parse::<Solution>().is_err());
    assert!("123".parse::<Solution>().is_err());
  }
}
