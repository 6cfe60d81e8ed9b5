//! Defines the evaluator, which scores candidate puzzles for the generator.

use crate::core::*;
use crate::dispatch::{self, Backend};
use crate::gen::Options;
use crate::random::*;
use crate::solve;
use rand_distr::StandardUniform;
use serde::Serialize;

/// A puzzle's score.  Lower losses are better.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Evaluation {
  /// Filled cells for classic puzzles, eliminated candidates for pencilmark.
  pub num_clues: usize,
  /// The geometric mean of the guesses the backend needed across trials,
  /// less one.
  pub mean_guesses: f64,
  /// Infinite for puzzles without a unique solution.
  pub loss: f64,
}

/// Scores puzzles by combining clue count, solving difficulty and a random
/// tie-breaker.
#[derive(Clone, Copy, Debug)]
pub struct Evaluator {
  clue_weight: f64,
  guess_weight: f64,
  random_weight: f64,
  num_evals: usize,
  backend: Backend,
}

impl Evaluator {
  pub fn new(options: &Options) -> Self {
    Evaluator {
      clue_weight: options.clue_weight,
      guess_weight: options.guess_weight,
      random_weight: options.random_weight,
      num_evals: options.num_evals,
      backend: options.backend,
    }
  }

  /// Evaluates the puzzle.  Always draws exactly one tie-breaking number from
  /// `random` after the trials, whether or not the puzzle is unique.
  pub fn evaluate<R: Rng>(&self, puzzle: &Puzzle, random: &mut R) -> Evaluation {
    let num_clues = puzzle.num_clues();
    let mean_log = dispatch::mean_log_guesses(puzzle, self.backend, self.num_evals, random)
      .unwrap_or(0.0);
    let noise: f64 = random.sample(StandardUniform);
    let loss = if has_unique_solution(puzzle) {
      self.clue_weight * num_clues as f64 - (mean_log * self.guess_weight).exp()
        + self.random_weight * noise
    } else {
      f64::INFINITY
    };
    Evaluation {
      num_clues,
      mean_guesses: mean_log.exp() - 1.0,
      loss,
    }
  }
}

/// Tells whether the propagating engine finds exactly one solution.
pub fn has_unique_solution(puzzle: &Puzzle) -> bool {
  solve::is_unique(puzzle)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::fixtures::*;

  fn options(num_evals: usize) -> Options {
    Options {
      num_evals,
      ..Options::default()
    }
  }

  #[test]
  fn no_trials_is_deterministic() {
    let evaluator = Evaluator::new(&options(0));
    let puzzle: Puzzle = UNIQUE.parse().unwrap();
    let a = evaluator.evaluate(&puzzle, &mut new_random("same"));
    let b = evaluator.evaluate(&puzzle, &mut new_random("same"));
    assert_eq!(a, b);
    assert_eq!(a.mean_guesses, 0.0);

    let noise: f64 = new_random("same").sample(StandardUniform);
    let expected = puzzle.num_clues() as f64 - 1.0 + noise;
    assert!((a.loss - expected).abs() < 1e-9);
  }

  #[test]
  fn solved_grid() {
    let evaluator = Evaluator::new(&options(5));
    let puzzle: Puzzle = SOLVED.parse().unwrap();
    assert!(has_unique_solution(&puzzle));
    let evaluation = evaluator.evaluate(&puzzle, &mut new_random("solved"));
    assert_eq!(evaluation.num_clues, 81);
    assert_eq!(evaluation.mean_guesses, 0.0);
    assert!(evaluation.loss >= 80.0 && evaluation.loss < 81.0);
  }

  #[test]
  fn ambiguous_puzzles_have_infinite_loss() {
    let evaluator = Evaluator::new(&options(3));
    let mut random = new_random("ambiguous");
    for clues in [NINE_SOLUTIONS, NO_SOLUTION] {
      let puzzle: Puzzle = clues.parse().unwrap();
      assert!(!has_unique_solution(&puzzle));
      assert_eq!(evaluator.evaluate(&puzzle, &mut random).loss, f64::INFINITY);
    }
  }

  #[test]
  fn unsupported_variant_counts_as_no_guesses() {
    let evaluator = Evaluator::new(&Options {
      backend: Backend::ClassicOnly,
      ..options(4)
    });
    let puzzle = UNIQUE.parse::<Puzzle>().unwrap().to_pencilmark();
    assert!(has_unique_solution(&puzzle));
    let evaluation = evaluator.evaluate(&puzzle, &mut new_random("unsupported"));
    assert_eq!(evaluation.mean_guesses, 0.0);
    assert!(evaluation.loss.is_finite());
    let floor = evaluation.num_clues as f64 - 1.0;
    assert!(evaluation.loss >= floor && evaluation.loss < floor + 1.0);
  }

  #[test]
  fn harder_puzzles_score_lower() {
    let evaluator = Evaluator::new(&Options {
      random_weight: 0.0,
      ..options(10)
    });
    let mut random = new_random("harder");
    let hard: Puzzle = UNIQUE.parse().unwrap();
    let evaluation = evaluator.evaluate(&hard, &mut random);
    assert!(evaluation.mean_guesses > 0.0);
    assert!(evaluation.loss < hard.num_clues() as f64 - 1.0);
  }
}
