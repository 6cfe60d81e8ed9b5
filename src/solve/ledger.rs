//! Defines the Ledger struct that's at the heart of the solver.

use crate::core::*;

/// How hard the ledger works to find implied assignments.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Propagation {
  /// Naked singles (a cell with one candidate) and hidden singles (a digit
  /// with one possible cell in a unit).
  Singles,
  /// Naked singles only.
  NakedSingles,
}

/// Tracks the possible digits of every cell during solving.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Ledger {
  /// The remaining candidates for each cell.
  cells: [DigitSet; 81],

  /// The cells whose single remaining digit has been removed from all their
  /// peers, one bit per cell.
  settled: u128,

  propagation: Propagation,
}

const ALL_SETTLED: u128 = (1 << 81) - 1;

impl Ledger {
  /// Makes a ledger from each cell's starting candidates, with no
  /// implications applied yet.  Returns `Err(Invalid)` if any cell starts
  /// with no candidates at all.
  pub fn new(cells: [DigitSet; 81], propagation: Propagation) -> Result<Ledger, Invalid> {
    if cells.iter().any(|set| set.is_empty()) {
      return Err(Invalid);
    }
    Ok(Ledger {
      cells,
      settled: 0,
      propagation,
    })
  }

  /// Makes a ledger for the given puzzle and applies all the implications of
  /// its clues.
  pub fn for_puzzle(puzzle: &Puzzle, propagation: Propagation) -> Result<Ledger, Invalid> {
    let mut answer = Ledger::new(puzzle.candidates(), propagation)?;
    answer.apply_implications()?;
    Ok(answer)
  }

  /// Tells whether every cell has been settled.
  pub fn is_complete(&self) -> bool {
    self.settled == ALL_SETTLED
  }

  pub fn is_settled(&self, cell: Cell) -> bool {
    self.settled & (1 << cell.index()) != 0
  }

  /// The digits still possible at the given cell.
  pub fn candidates(&self, cell: Cell) -> DigitSet {
    unsafe {
      // Safe because `cell.index()` is in 0..81.
      *self.cells.get_unchecked(cell.index())
    }
  }

  /// The cells not yet settled.  After `apply_implications` succeeds, each of
  /// these has at least two candidates.
  pub fn unsettled(&self) -> impl Iterator<Item = Cell> + '_ {
    Cell::all().filter(move |&cell| !self.is_settled(cell))
  }

  /// Repeatedly settles single-candidate cells and (depending on the
  /// propagation level) hidden singles until nothing changes.  Returns an
  /// error if some cell or unit runs out of possibilities.
  pub fn apply_implications(&mut self) -> Result<(), Invalid> {
    loop {
      let mut changed = self.settle_naked_singles()?;
      if self.propagation == Propagation::Singles {
        changed |= self.find_hidden_singles()?;
      }
      if !changed {
        return Ok(());
      }
    }
  }

  /// Assigns the given digit to the given cell, then applies all following
  /// implications.
  pub fn assign_and_apply_implications(&mut self, digit: Digit, cell: Cell) -> Result<(), Invalid> {
    if !self.candidates(cell).contains(digit) {
      return Err(Invalid);
    }
    self.cells[cell.index()] = DigitSet::singleton(digit);
    self.apply_implications()
  }

  /// Renders the ledger as a solution, when it's complete.
  pub fn solution(&self) -> Option<Solution> {
    if !self.is_complete() {
      return None;
    }
    let mut digits = [D1; 81];
    for (digit, set) in digits.iter_mut().zip(self.cells.iter()) {
      *digit = set.single()?;
    }
    // A complete ledger has had every digit removed from all its peers.
    Some(Solution::new_unchecked(digits))
  }

  /// Settles every unsettled cell that has a single candidate, removing that
  /// candidate from the cell's peers.  Returns whether anything was settled.
  fn settle_naked_singles(&mut self) -> Result<bool, Invalid> {
    let mut changed = false;
    for cell in Cell::all() {
      if self.is_settled(cell) {
        continue;
      }
      let Some(digit) = self.candidates(cell).single() else {
        continue;
      };
      self.settled |= 1 << cell.index();
      changed = true;
      for peer in cell.peers() {
        let set = &mut self.cells[peer.index()];
        if set.contains(digit) {
          set.remove(digit);
          if set.is_empty() {
            return Err(Invalid);
          }
        }
      }
    }
    Ok(changed)
  }

  /// Narrows every cell that is the only place in some unit for a digit down
  /// to that digit.  Returns whether any cell was narrowed.
  fn find_hidden_singles(&mut self) -> Result<bool, Invalid> {
    let mut changed = false;
    for unit in Unit::all() {
      for digit in Digit::all() {
        let mut places = unit
          .cells()
          .iter()
          .filter(|&&cell| self.candidates(cell).contains(digit));
        let (Some(&cell), None) = (places.next(), places.next()) else {
          if self.unit_lacks(unit, digit) {
            return Err(Invalid);
          }
          continue;
        };
        if self.candidates(cell).len() > 1 {
          self.cells[cell.index()] = DigitSet::singleton(digit);
          changed = true;
        }
      }
    }
    Ok(changed)
  }

  fn unit_lacks(&self, unit: Unit, digit: Digit) -> bool {
    !unit
      .cells()
      .iter()
      .any(|&cell| self.candidates(cell).contains(digit))
  }
}
