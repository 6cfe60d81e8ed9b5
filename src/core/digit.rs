//! Defines the Digit type, which represents the numerals written in a Sudoku,
//! and DigitSet, the bit-set of candidates for a cell.

use super::id_types::grid_index;
use itertools::Itertools;
use paste::paste;
use seq_macro::seq;
use std::fmt;

grid_index! {
  /// One of the 9 digits that can occupy a cell, kept as its index in 0..9:
  /// the digit it stands for is one more than that.
  Digit[9]
}

// Constant Digit values, D1 through D9.
seq!(K in 1..=9 {
    paste! {
        pub const [<D K>]: Digit = Digit(K - 1);
    }
});

impl Digit {
  /// Returns the digit this stands for, in 1..=9.
  pub const fn ordinal(self) -> i8 {
    self.0 + 1
  }

  /// Parses an ASCII digit `'1'..='9'`; everything else yields None.
  pub const fn from_ascii(byte: u8) -> Option<Digit> {
    match byte {
      b'1'..=b'9' => Some(Digit((byte - b'1') as i8)),
      _ => None,
    }
  }

  /// Renders this digit as an ASCII byte.
  pub const fn to_ascii(self) -> u8 {
    b'1' + self.0 as u8
  }
}

impl fmt::Debug for Digit {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "D{}", self.ordinal())
  }
}

impl fmt::Display for Digit {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.ordinal())
  }
}

/// A set of digits, kept as the low 9 bits of a u16.
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
pub struct DigitSet(u16);

impl DigitSet {
  pub const EMPTY: DigitSet = DigitSet(0);
  pub const ALL: DigitSet = DigitSet(0o777);

  /// Makes a set containing just the given digit.
  pub const fn singleton(digit: Digit) -> Self {
    DigitSet(1 << digit.0)
  }

  pub const fn contains(self, digit: Digit) -> bool {
    self.0 & (1 << digit.0) != 0
  }

  pub fn insert(&mut self, digit: Digit) {
    self.0 |= 1 << digit.0;
  }

  pub fn remove(&mut self, digit: Digit) {
    self.0 &= !(1 << digit.0);
  }

  pub const fn union(self, other: DigitSet) -> DigitSet {
    DigitSet(self.0 | other.0)
  }

  pub const fn len(self) -> u32 {
    self.0.count_ones()
  }

  pub const fn is_empty(self) -> bool {
    self.0 == 0
  }

  /// Returns the set's only member, when it has exactly one.
  pub const fn single(self) -> Option<Digit> {
    if self.0.count_ones() == 1 {
      Some(Digit(self.0.trailing_zeros() as i8))
    } else {
      None
    }
  }

  /// Iterates the set's digits in increasing order.
  pub fn iter(self) -> impl Iterator<Item = Digit> {
    Digit::all().filter(move |&digit| self.contains(digit))
  }
}

impl FromIterator<Digit> for DigitSet {
  fn from_iter<I: IntoIterator<Item = Digit>>(iter: I) -> Self {
    let mut answer = DigitSet::EMPTY;
    for digit in iter {
      answer.insert(digit);
    }
    answer
  }
}

impl fmt::Debug for DigitSet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{{{}}}", self.iter().join(" "))
  }
}
