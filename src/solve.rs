//! Defines the backtracking solver shared by every backend, plus the
//! puzzle-reshaping operations built on it.

use crate::core::*;
use crate::random::*;

pub mod ledger;
mod reshape;

pub use ledger::{Ledger, Propagation};
pub use reshape::{constrain, is_minimal, is_unique, minimize};

/// What a call to `solve` found out about a puzzle.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SolveReport {
  /// The number of solutions found, at most the limit passed to `solve`.
  pub count: usize,

  /// The number of guesses the search made: pivot digits tried while other
  /// digits remained to be tried at the same pivot.
  pub guesses: u64,

  /// The solution, when the limit was 1 and one was found.
  pub solution: Option<Solution>,
}

/// Searches for up to `limit` solutions of the given puzzle.
pub fn solve(
  puzzle: &Puzzle,
  limit: usize,
  helper: &mut dyn SearchHelper,
  propagation: Propagation,
) -> SolveReport {
  let mut report = SolveReport::default();
  if limit == 0 {
    return report;
  }
  let mut searcher = Searcher::new(puzzle, propagation, helper);
  while report.count < limit {
    let Some(solution) = searcher.run() else {
      break;
    };
    report.count += 1;
    if limit == 1 {
      report.solution = Some(solution);
    }
  }
  report.guesses = searcher.guesses;
  report
}

/// Counts the puzzle's solutions, up to `limit`, using the default helper.
pub fn count_solutions(puzzle: &Puzzle, limit: usize) -> usize {
  solve(puzzle, limit, &mut MinRemainingHelper, Propagation::Singles).count
}

/// Feeds each of the puzzle's first `limit` solutions to `callback`, returning
/// how many there were.
pub fn enumerate<F: FnMut(&Solution)>(
  puzzle: &Puzzle,
  limit: usize,
  helper: &mut dyn SearchHelper,
  propagation: Propagation,
  mut callback: F,
) -> usize {
  let mut searcher = Searcher::new(puzzle, propagation, helper);
  let mut count = 0;
  while count < limit {
    let Some(solution) = searcher.run() else {
      break;
    };
    callback(&solution);
    count += 1;
  }
  count
}

/// Callbacks for searching the Sudoku solution space.
pub trait SearchHelper {
  /// Decides on a cell to search through.  Only called on ledgers that have
  /// unsettled cells.
  fn choose_pivot(&mut self, ledger: &Ledger) -> Cell;

  /// Optionally puts the given digits into a different order.
  fn order_pivot_digits(&mut self, digits: &mut [Option<Digit>]);
}

/// A deterministic `SearchHelper` that pivots on the unsettled cell with the
/// fewest candidates.
pub struct MinRemainingHelper;

impl SearchHelper for MinRemainingHelper {
  fn choose_pivot(&mut self, ledger: &Ledger) -> Cell {
    ledger
      .unsettled()
      .min_by_key(|&cell| ledger.candidates(cell).len())
      .unwrap_or_else(|| Cell::at(0, 0))
  }

  fn order_pivot_digits(&mut self, _digits: &mut [Option<Digit>]) {}
}

/// A deterministic `SearchHelper` that pivots on the first unsettled cell in
/// row-major order.
pub struct FirstUnsettledHelper;

impl SearchHelper for FirstUnsettledHelper {
  fn choose_pivot(&mut self, ledger: &Ledger) -> Cell {
    ledger
      .unsettled()
      .next()
      .unwrap_or_else(|| Cell::at(0, 0))
  }

  fn order_pivot_digits(&mut self, _digits: &mut [Option<Digit>]) {}
}

/// A `SearchHelper` that picks pivot cells at random, preferring cells with
/// two candidates when there are any, and tries the pivot digits in random
/// order.  Searching with it finds a uniformly chosen branch of the solution
/// space first.
pub struct RandomPivotHelper<'a, R: Rng>(pub &'a mut R);

impl<R: Rng> SearchHelper for RandomPivotHelper<'_, R> {
  fn choose_pivot(&mut self, ledger: &Ledger) -> Cell {
    let twos: Vec<Cell> = ledger
      .unsettled()
      .filter(|&cell| ledger.candidates(cell).len() == 2)
      .collect();
    if let Some(&cell) = twos.choose(self.0) {
      return cell;
    }
    let unsettled: Vec<Cell> = ledger.unsettled().collect();
    unsettled
      .choose(self.0)
      .copied()
      .unwrap_or_else(|| Cell::at(0, 0))
  }

  fn order_pivot_digits(&mut self, digits: &mut [Option<Digit>]) {
    digits.shuffle(self.0);
  }
}

/// Walks the solution space of one puzzle, yielding solutions one at a time.
pub struct Searcher<'a> {
  /// The number of guesses made so far.
  pub guesses: u64,
  stack: Vec<StackItem>,
  /// A solution found before any pivoting, returned by the first `run`.
  pending: Option<Solution>,
  helper: &'a mut dyn SearchHelper,
}

struct StackItem {
  ledger: Ledger,

  /// An unsettled cell we'll try all possible digits in.
  pivot: Cell,

  /// The digits to try assigning to the pivot cell.  `count` is the total
  /// number, and `next` is the index of the next one to try.
  digits: [Option<Digit>; 9],
  count: u8,
  next: u8,
}

impl<'a> Searcher<'a> {
  pub fn new(puzzle: &Puzzle, propagation: Propagation, helper: &'a mut dyn SearchHelper) -> Self {
    let mut answer = Searcher {
      guesses: 0,
      stack: Vec::with_capacity(16),
      pending: None,
      helper,
    };
    if let Ok(ledger) = Ledger::for_puzzle(puzzle, propagation) {
      if !answer.pivot(&ledger) {
        answer.pending = ledger.solution();
      }
    }
    answer
  }

  /// Searches for the next solution.  Returns None once the solution space
  /// is exhausted.
  pub fn run(&mut self) -> Option<Solution> {
    if let Some(solution) = self.pending.take() {
      return Some(solution);
    }
    while let Some(item) = self.stack.last_mut() {
      let (digit, last) = item.next_digit();
      if last {
        // For the final digit, we modify the item's ledger in place, instead
        // of copying.
        if item.ledger.assign_and_apply_implications(digit, item.pivot).is_err() {
          self.stack.pop();
        } else if item.ledger.is_complete() {
          let found = item.ledger.solution();
          self.stack.pop();
          return found;
        } else {
          // We even reuse the item for the following pivot.
          item.pivot = self.helper.choose_pivot(&item.ledger);
          item.fill_digits();
          self
            .helper
            .order_pivot_digits(&mut item.digits[..item.count as usize]);
        }
      } else {
        // There are other digits after this one, so we modify a copy of the
        // item's ledger and they'll all start from the same place.
        self.guesses += 1;
        let mut ledger = item.ledger;
        if ledger.assign_and_apply_implications(digit, item.pivot).is_ok() && !self.pivot(&ledger) {
          return ledger.solution();
        }
      }
    }
    None
  }

  /// Chooses a pivot cell and pushes it and its possible digits onto the
  /// stack; returns false if there are no unsettled cells.
  fn pivot(&mut self, ledger: &Ledger) -> bool {
    if ledger.is_complete() {
      return false;
    }
    let mut item = StackItem {
      ledger: *ledger,
      pivot: self.helper.choose_pivot(ledger),
      digits: [None; 9],
      count: 0,
      next: 0,
    };
    item.fill_digits();
    self
      .helper
      .order_pivot_digits(&mut item.digits[..item.count as usize]);
    self.stack.push(item);
    true
  }
}

impl StackItem {
  /// Returns the next digit to assign to this item's pivot, and whether it's
  /// the last one.
  fn next_digit(&mut self) -> (Digit, bool) {
    let digit = self.digits[self.next as usize].unwrap_or(D1);
    self.next += 1;
    (digit, self.next >= self.count)
  }

  /// Finds all the digits available for the pivot cell and adds them to
  /// `digits`.
  fn fill_digits(&mut self) {
    self.count = 0;
    self.next = 0;
    for digit in self.ledger.candidates(self.pivot).iter() {
      unsafe {
        // Safe because there can't be more than 9 digits in a set.
        *self.digits.get_unchecked_mut(self.count as usize) = Some(digit);
      }
      self.count += 1;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::fixtures::*;
  use paste::paste;

  const MAX_SOLUTIONS: usize = 12;

  fn check(clues: &str, expected: usize, helper: &mut dyn SearchHelper, propagation: Propagation) {
    let puzzle: Puzzle = clues.parse().unwrap();
    let clue_text = puzzle.text().to_vec();
    let mut seen = 0;
    let count = enumerate(&puzzle, MAX_SOLUTIONS + 1, helper, propagation, |solution| {
      seen += 1;
      for (&b, d) in clue_text.iter().zip(solution.to_text()) {
        assert!(b == b'.' || b == d);
      }
    });
    assert_eq!(count, seen);
    assert_eq!(count, expected.min(MAX_SOLUTIONS + 1));
  }

  macro_rules! solve_test {
    ($name:ident, $clues:expr, $count:expr) => {
      paste! {
          #[test]
          fn [<solve_ $name>]() {
              check($clues, $count, &mut MinRemainingHelper, Propagation::Singles);
              check($clues, $count, &mut FirstUnsettledHelper, Propagation::Singles);
              check($clues, $count, &mut FirstUnsettledHelper, Propagation::NakedSingles);
              let mut random = new_random(stringify!($name));
              check($clues, $count, &mut RandomPivotHelper(&mut random), Propagation::Singles);
          }

          #[test]
          fn [<solve_pencilmark_ $name>]() {
              let pencilmark = $clues.parse::<Puzzle>().unwrap().to_pencilmark();
              let count = count_solutions(&pencilmark, MAX_SOLUTIONS + 1);
              assert_eq!(count, ($count as usize).min(MAX_SOLUTIONS + 1));
          }
      }
    };
  }

  solve_test!(broken, BROKEN, 0);
  solve_test!(no_solution, NO_SOLUTION, 0);
  solve_test!(unique_solution, UNIQUE, 1);
  solve_test!(unique_solution_no_pivots, EASY, 1);
  solve_test!(multiple_solutions, NINE_SOLUTIONS, 9);
  solve_test!(many_solutions, MANY_SOLUTIONS, MAX_SOLUTIONS + 1);

  #[test]
  fn solved_grid_needs_no_guesses() {
    let puzzle: Puzzle = SOLVED.parse().unwrap();
    let report = solve(&puzzle, 2, &mut MinRemainingHelper, Propagation::Singles);
    assert_eq!(report.count, 1);
    assert_eq!(report.guesses, 0);
    assert_eq!(report.solution, None);

    let report = solve(&puzzle, 1, &mut FirstUnsettledHelper, Propagation::NakedSingles);
    assert_eq!(report.guesses, 0);
    assert_eq!(report.solution.unwrap().to_string(), SOLVED);
  }

  #[test]
  fn easy_puzzle_needs_no_guesses() {
    let puzzle: Puzzle = EASY.parse().unwrap();
    let report = solve(&puzzle, 1, &mut MinRemainingHelper, Propagation::Singles);
    assert_eq!(report.count, 1);
    assert_eq!(report.guesses, 0);
    assert!(report.solution.is_some());
  }

  #[test]
  fn harder_puzzles_need_guesses() {
    let puzzle: Puzzle = NINE_SOLUTIONS.parse().unwrap();
    let report = solve(&puzzle, 9, &mut MinRemainingHelper, Propagation::Singles);
    assert_eq!(report.count, 9);
    assert!(report.guesses > 0);
  }

  #[test]
  fn zero_limit() {
    let puzzle = Puzzle::empty(Variant::Classic);
    let report = solve(&puzzle, 0, &mut MinRemainingHelper, Propagation::Singles);
    assert_eq!(report, SolveReport::default());
  }

  #[test]
  fn empty_grid_has_a_random_solution() {
    let puzzle = Puzzle::empty(Variant::Classic);
    let mut random = new_random("empty");
    let report = solve(&puzzle, 1, &mut RandomPivotHelper(&mut random), Propagation::Singles);
    assert_eq!(report.count, 1);
    let solution = report.solution.unwrap();
    let digits = std::array::from_fn(|i| solution[Cell::from_index(i).unwrap()]);
    assert_eq!(Solution::new(digits), Ok(solution));
  }
}
