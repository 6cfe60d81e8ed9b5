//! Selects a solving backend by integer id and gives every backend the same
//! solve, rate and enumerate interface.

use crate::core::*;
use crate::permute::permute_sudoku;
use crate::random::*;
use crate::solve::{self, FirstUnsettledHelper, MinRemainingHelper, Propagation, SearchHelper};
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};

/// The rating reported when no trial could be solved.
pub const UNRATED: i32 = 100;

/// The interchangeable solving strategies.
#[derive(
  Clone, Copy, Debug, Default, Deserialize, Eq, FromPrimitive, Hash, PartialEq, Serialize,
)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum Backend {
  /// Naked and hidden singles, pivoting on the cell with the fewest
  /// candidates.  Handles both variants.
  #[default]
  Propagating = 0,
  /// The same propagation, pivoting on the first unsettled cell.  Classic
  /// puzzles only.
  ClassicOnly = 1,
  /// Naked singles only, pivoting on the first unsettled cell.
  Basic = 2,
}

impl Backend {
  /// Looks up a backend by its external id.
  pub fn from_id(id: i32) -> Option<Backend> {
    Backend::from_i32(id)
  }

  pub const fn id(self) -> i32 {
    self as i32
  }

  /// Tells whether this backend accepts puzzles of the given variant.
  pub const fn supports(self, variant: Variant) -> bool {
    !matches!((self, variant), (Backend::ClassicOnly, Variant::Pencilmark))
  }

  fn propagation(self) -> Propagation {
    match self {
      Backend::Propagating | Backend::ClassicOnly => Propagation::Singles,
      Backend::Basic => Propagation::NakedSingles,
    }
  }

  fn helper(self) -> Box<dyn SearchHelper> {
    match self {
      Backend::Propagating => Box::new(MinRemainingHelper),
      Backend::ClassicOnly | Backend::Basic => Box::new(FirstUnsettledHelper),
    }
  }

  /// Solves with this backend, up to `limit` solutions.  Returns None when
  /// the backend can't handle the puzzle's variant.
  pub fn solve(self, puzzle: &Puzzle, limit: usize) -> Option<solve::SolveReport> {
    if !self.supports(puzzle.variant()) {
      return None;
    }
    Some(solve::solve(puzzle, limit, self.helper().as_mut(), self.propagation()))
  }
}

/// A puzzle's first solution and the guesses it took to find.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Solved {
  pub solution: Solution,
  pub guesses: u64,
}

/// Finds one solution with the given backend.  Returns None when the puzzle
/// has no solution or the backend doesn't accept it.
pub fn solve(puzzle: &Puzzle, backend: Backend) -> Option<Solved> {
  let report = backend.solve(puzzle, 1)?;
  let solution = report.solution?;
  Some(Solved {
    solution,
    guesses: report.guesses,
  })
}

/// Like `solve`, but with the backend given by its external id.
pub fn solve_by_id(puzzle: &Puzzle, backend_id: i32) -> Option<Solved> {
  solve(puzzle, Backend::from_id(backend_id)?)
}

/// Averages `ln(guesses + 1)` over `num_evals` solves of randomly permuted
/// copies of the puzzle, counting only the trials that succeed.  Returns None
/// when none do.
pub fn mean_log_guesses<R: Rng>(
  puzzle: &Puzzle,
  backend: Backend,
  num_evals: usize,
  random: &mut R,
) -> Option<f64> {
  let mut work = puzzle.clone();
  let mut total = 0.0;
  let mut successes = 0;
  for _ in 0..num_evals {
    permute_sudoku(&mut work, random);
    if let Some(solved) = solve(&work, backend) {
      total += (solved.guesses as f64 + 1.0).ln();
      successes += 1;
    }
  }
  (successes > 0).then(|| total / successes as f64)
}

/// Rates the puzzle's difficulty on a log scale where each factor of 9 in
/// guesses adds 1000.  Returns `UNRATED` when no trial succeeded.
pub fn rate<R: Rng>(puzzle: &Puzzle, backend: Backend, num_evals: usize, random: &mut R) -> i32 {
  match mean_log_guesses(puzzle, backend, num_evals, random) {
    Some(mean) => (mean / 9f64.ln() * 1000.0).round() as i32,
    None => UNRATED,
  }
}

/// Feeds up to `limit` solutions to `callback` using the propagating backend,
/// returning how many there were.
pub fn enumerate<F: FnMut(&Solution)>(puzzle: &Puzzle, limit: usize, callback: F) -> usize {
  solve::enumerate(
    puzzle,
    limit,
    &mut MinRemainingHelper,
    Propagation::Singles,
    callback,
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::fixtures::*;

  #[test]
  fn backend_ids() {
    assert_eq!(Backend::from_id(0), Some(Backend::Propagating));
    assert_eq!(Backend::from_id(1), Some(Backend::ClassicOnly));
    assert_eq!(Backend::from_id(2), Some(Backend::Basic));
    assert_eq!(Backend::from_id(3), None);
    assert_eq!(Backend::from_id(-1), None);
    assert_eq!(Backend::Basic.id(), 2);
    assert_eq!(Backend::default(), Backend::Propagating);
  }

  #[test]
  fn backends_agree() {
    let puzzle: Puzzle = UNIQUE.parse().unwrap();
    let expected = solve(&puzzle, Backend::Propagating).unwrap().solution;
    for backend in [Backend::ClassicOnly, Backend::Basic] {
      assert_eq!(solve(&puzzle, backend).unwrap().solution, expected);
    }
    assert_eq!(solve_by_id(&puzzle, 1).unwrap().solution, expected);
    assert_eq!(solve_by_id(&puzzle, 7), None);
  }

  #[test]
  fn classic_only_rejects_pencilmark() {
    let puzzle = UNIQUE.parse::<Puzzle>().unwrap().to_pencilmark();
    assert!(solve(&puzzle, Backend::ClassicOnly).is_none());
    let expected = solve(&puzzle, Backend::Propagating).unwrap().solution;
    assert_eq!(solve(&puzzle, Backend::Basic).unwrap().solution, expected);
  }

  #[test]
  fn unsolvable_puzzles() {
    for clues in [BROKEN, NO_SOLUTION] {
      let puzzle: Puzzle = clues.parse().unwrap();
      assert!(solve(&puzzle, Backend::Propagating).is_none());
    }
  }

  #[test]
  fn rating() {
    let mut random = new_random("rating");
    let solved: Puzzle = SOLVED.parse().unwrap();
    assert_eq!(rate(&solved, Backend::Propagating, 5, &mut random), 0);
    assert_eq!(rate(&solved, Backend::Propagating, 0, &mut random), UNRATED);

    let broken: Puzzle = BROKEN.parse().unwrap();
    assert_eq!(rate(&broken, Backend::Propagating, 5, &mut random), UNRATED);

    let pencilmark = solved.to_pencilmark();
    assert_eq!(rate(&pencilmark, Backend::ClassicOnly, 5, &mut random), UNRATED);
    assert_eq!(rate(&pencilmark, Backend::Basic, 5, &mut random), 0);

    let hard: Puzzle = UNIQUE.parse().unwrap();
    assert!(rate(&hard, Backend::Basic, 10, &mut random) > 0);
  }

  #[test]
  fn enumeration() {
    let puzzle: Puzzle = NINE_SOLUTIONS.parse().unwrap();
    let mut solutions = Vec::new();
    assert_eq!(enumerate(&puzzle, 100, |s| solutions.push(*s)), 9);
    solutions.sort();
    solutions.dedup();
    assert_eq!(solutions.len(), 9);
    assert_eq!(enumerate(&puzzle, 4, |_| {}), 4);
  }
}
