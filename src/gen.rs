//! Defines the generator, which evolves a pool of seed patterns into new
//! uniquely solvable puzzles.

use crate::core::*;
use crate::dispatch::Backend;
use crate::evaluate::{Evaluation, Evaluator};
use crate::pool::*;
use crate::random::*;
use crate::solve;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Everything that tunes a generation run.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Options {
  /// The number of attempts; each yields at most one puzzle.
  pub max_puzzles: usize,
  pub clue_weight: f64,
  pub guess_weight: f64,
  pub random_weight: f64,
  /// How many clues to strip from each sampled pattern before re-deriving a
  /// unique puzzle.
  pub clues_to_drop: usize,
  /// How many permuted solves to average when estimating difficulty.
  pub num_evals: usize,
  /// Whether to strip redundant clues from every candidate.
  pub minimize: bool,
  pub pencilmark: bool,
  /// Seeds the generator's random source; 0 draws a seed from entropy.
  pub random_seed: u64,
  pub pool_capacity: usize,
  pub pool_mode: PoolMode,
  /// The number of slots in a rotating pool.
  pub rotation_size: usize,
  /// The backend whose guess counts measure difficulty.
  pub backend: Backend,
}

impl Default for Options {
  fn default() -> Self {
    Options {
      max_puzzles: 1,
      clue_weight: 1.0,
      guess_weight: 0.5,
      random_weight: 1.0,
      clues_to_drop: 3,
      num_evals: 10,
      minimize: true,
      pencilmark: false,
      random_seed: 0,
      pool_capacity: 500,
      pool_mode: PoolMode::Ranked,
      rotation_size: DEFAULT_ROTATION_SIZE,
      backend: Backend::Propagating,
    }
  }
}

impl Options {
  pub fn variant(&self) -> Variant {
    Variant::from_flag(self.pencilmark)
  }
}

/// A puzzle the generator produced, with its scores.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GeneratedRecord {
  pub num_clues: usize,
  pub mean_guesses: f64,
  pub loss: f64,
  pub puzzle: Puzzle,
}

impl GeneratedRecord {
  fn new(puzzle: Puzzle, evaluation: Evaluation) -> Self {
    GeneratedRecord {
      num_clues: evaluation.num_clues,
      mean_guesses: evaluation.mean_guesses,
      loss: evaluation.loss,
      puzzle,
    }
  }
}

/// Why an attempt produced nothing.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Rejection {
  /// The pool had nothing to sample.
  EmptyPool,
  /// The perturbed pattern had no solution to constrain towards.
  ConstrainFailed,
  /// The candidate came out identical to the pattern it was made from.
  Unchanged,
  /// The candidate is already in the pool.
  Duplicate,
  /// The candidate doesn't have a unique solution.
  NotUnique,
  /// The candidate's loss doesn't beat the pool's worst.
  NotImproving,
}

impl fmt::Display for Rejection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Rejection::EmptyPool => "empty pool",
      Rejection::ConstrainFailed => "constrain failed",
      Rejection::Unchanged => "unchanged",
      Rejection::Duplicate => "duplicate",
      Rejection::NotUnique => "not unique",
      Rejection::NotImproving => "not improving",
    };
    f.write_str(s)
  }
}

/// Tallies the outcomes of a run's attempts.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RunStats {
  pub generated: usize,
  pub empty_pool: usize,
  pub constrain_failed: usize,
  pub unchanged: usize,
  pub duplicate: usize,
  pub not_unique: usize,
  pub not_improving: usize,
}

impl RunStats {
  fn record(&mut self, outcome: &Result<GeneratedRecord, Rejection>) {
    let counter = match outcome {
      Ok(_) => &mut self.generated,
      Err(Rejection::EmptyPool) => &mut self.empty_pool,
      Err(Rejection::ConstrainFailed) => &mut self.constrain_failed,
      Err(Rejection::Unchanged) => &mut self.unchanged,
      Err(Rejection::Duplicate) => &mut self.duplicate,
      Err(Rejection::NotUnique) => &mut self.not_unique,
      Err(Rejection::NotImproving) => &mut self.not_improving,
    };
    *counter += 1;
  }
}

/// Generates puzzles by repeatedly perturbing pool members.  Owns its random
/// source, so two generators built from the same non-zero seed and patterns
/// produce the same puzzles.
pub struct Generator<P: SeedPool> {
  options: Options,
  evaluator: Evaluator,
  random: Random,
  pool: P,
  stats: RunStats,
}

impl Generator<RankedPool> {
  /// Makes a generator with a ranked pool holding just the unconstrained
  /// pattern of the configured variant.
  pub fn new(options: Options) -> Self {
    let seed = Puzzle::empty(options.variant());
    Generator::with_patterns(options, vec![seed])
  }

  /// Makes a generator with a ranked pool holding the given patterns, each
  /// scored by the evaluator.  Patterns beyond the pool's capacity compete
  /// for places by loss.
  pub fn with_patterns(options: Options, patterns: Vec<Puzzle>) -> Self {
    let pool = RankedPool::new(options.pool_capacity);
    let mut answer = Generator::with_pool(options, pool);
    for pattern in patterns {
      let evaluation = answer.evaluator.evaluate(&pattern, &mut answer.random);
      answer.pool.try_admit(pattern, evaluation.loss, &mut answer.random);
    }
    answer
  }
}

impl Generator<RotatingPool> {
  /// Makes a generator with a rotating pool whose slots all start out as the
  /// unconstrained pattern of the configured variant.
  pub fn rotating(options: Options) -> Self {
    let seed = Puzzle::empty(options.variant());
    Generator::rotating_with_patterns(options, vec![seed])
  }

  /// Makes a generator with a rotating pool whose slots are filled by cycling
  /// through the given patterns.
  pub fn rotating_with_patterns(options: Options, patterns: Vec<Puzzle>) -> Self {
    let pool = RotatingPool::from_patterns(options.rotation_size, &patterns);
    Generator::with_pool(options, pool)
  }
}

impl<P: SeedPool> Generator<P> {
  /// Makes a generator around an already-filled pool.
  pub fn with_pool(options: Options, pool: P) -> Self {
    Generator {
      evaluator: Evaluator::new(&options),
      random: seeded(options.random_seed),
      pool,
      stats: RunStats::default(),
      options,
    }
  }

  pub fn options(&self) -> &Options {
    &self.options
  }

  pub fn pool(&self) -> &P {
    &self.pool
  }

  /// The outcomes of every attempt so far.
  pub fn stats(&self) -> RunStats {
    self.stats
  }

  /// Makes one attempt at a new puzzle, admitting it to the pool on success.
  pub fn attempt(&mut self) -> Result<GeneratedRecord, Rejection> {
    let outcome = self.try_attempt();
    self.stats.record(&outcome);
    if let Err(rejection) = &outcome {
      debug!(%rejection, "Attempt rejected");
    }
    outcome
  }

  fn try_attempt(&mut self) -> Result<GeneratedRecord, Rejection> {
    let source = self
      .pool
      .sample(&mut self.random)
      .ok_or(Rejection::EmptyPool)?
      .clone();
    let mut candidate = source.clone();
    self.drop_clues(&mut candidate);

    if self.options.clues_to_drop > 0 {
      if !solve::constrain(&mut candidate, &mut self.random) {
        return Err(Rejection::ConstrainFailed);
      }
      if self.options.minimize {
        solve::minimize(&mut candidate, false, &mut self.random);
      }
    }
    if candidate == source {
      return Err(Rejection::Unchanged);
    }
    if self.pool.contains(&candidate) {
      return Err(Rejection::Duplicate);
    }

    let evaluation = self.evaluator.evaluate(&candidate, &mut self.random);
    if evaluation.loss == f64::INFINITY {
      return Err(Rejection::NotUnique);
    }
    if let Some(worst) = self.pool.worst_loss() {
      if evaluation.loss >= worst {
        return Err(Rejection::NotImproving);
      }
    }
    let record = GeneratedRecord::new(candidate.clone(), evaluation);
    self
      .pool
      .try_admit(candidate, evaluation.loss, &mut self.random);
    Ok(record)
  }

  /// Strips up to `clues_to_drop` clues, visiting positions in random order.
  fn drop_clues(&mut self, puzzle: &mut Puzzle) {
    let mut dropped = 0;
    for i in permutation(puzzle.len(), &mut self.random) {
      if dropped == self.options.clues_to_drop {
        break;
      }
      if puzzle.drop_clue(i) {
        dropped += 1;
      }
    }
  }

  /// Runs `max_puzzles` attempts, handing each success to `sink`.  Stops early
  /// when `sink` returns false.  Returns the number of puzzles generated.
  pub fn generate_with<F: FnMut(GeneratedRecord) -> bool>(&mut self, mut sink: F) -> usize {
    let mut count = 0;
    for _ in 0..self.options.max_puzzles {
      if let Ok(record) = self.attempt() {
        count += 1;
        if !sink(record) {
          break;
        }
      }
    }
    let stats = self.stats;
    info!(
      generated = stats.generated,
      empty_pool = stats.empty_pool,
      constrain_failed = stats.constrain_failed,
      unchanged = stats.unchanged,
      duplicate = stats.duplicate,
      not_unique = stats.not_unique,
      not_improving = stats.not_improving,
      pool_size = self.pool.len(),
      "Generation run finished"
    );
    count
  }

  /// Runs `max_puzzles` attempts and collects the puzzles they produce.
  pub fn generate(&mut self) -> Vec<GeneratedRecord> {
    let mut answer = Vec::new();
    self.generate_with(|record| {
      answer.push(record);
      true
    });
    answer
  }
}

/// Generates puzzles from the unconstrained pattern, with the pool the
/// options call for.
pub fn generate(options: &Options) -> Vec<GeneratedRecord> {
  match options.pool_mode {
    PoolMode::Ranked => Generator::new(options.clone()).generate(),
    PoolMode::Rotating => Generator::rotating(options.clone()).generate(),
  }
}

/// Generates puzzles from the given patterns, with the pool the options call
/// for.
pub fn generate_from_patterns(options: &Options, patterns: Vec<Puzzle>) -> Vec<GeneratedRecord> {
  match options.pool_mode {
    PoolMode::Ranked => Generator::with_patterns(options.clone(), patterns).generate(),
    PoolMode::Rotating => Generator::rotating_with_patterns(options.clone(), patterns).generate(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::fixtures::*;

  fn options(max_puzzles: usize, seed: u64) -> Options {
    Options {
      max_puzzles,
      random_seed: seed,
      num_evals: 2,
      ..Options::default()
    }
  }

  #[test]
  fn defaults() {
    let options = Options::default();
    assert_eq!(options.max_puzzles, 1);
    assert_eq!(options.clues_to_drop, 3);
    assert_eq!(options.num_evals, 10);
    assert!(options.minimize);
    assert_eq!(options.pool_capacity, 500);
    assert_eq!(options.pool_mode, PoolMode::Ranked);
    assert_eq!(options.variant(), Variant::Classic);
  }

  #[test]
  fn options_from_partial_json() {
    let options: Options =
      serde_json::from_str(r#"{"max_puzzles": 7, "pencilmark": true, "pool_mode": "rotating"}"#)
        .unwrap();
    assert_eq!(options.max_puzzles, 7);
    assert_eq!(options.variant(), Variant::Pencilmark);
    assert_eq!(options.pool_mode, PoolMode::Rotating);
    assert_eq!(options.clue_weight, 1.0);
    assert_eq!(options.backend, Backend::Propagating);
  }

  #[test]
  fn single_puzzle_from_empty_grid() {
    let options = Options {
      clues_to_drop: 1,
      ..options(1, 42)
    };
    let records = Generator::new(options).generate();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.puzzle.len(), 81);
    assert!(record.num_clues <= 80);
    assert_eq!(record.num_clues, record.puzzle.num_clues());
    assert!(solve::is_unique(&record.puzzle));
    assert!(record.loss.is_finite());
  }

  #[test]
  fn fixed_seeds_repeat() {
    let a = Generator::new(options(4, 9)).generate();
    let b = Generator::new(options(4, 9)).generate();
    assert_eq!(a, b);
    assert!(!a.is_empty());
  }

  #[test]
  fn records_are_unique_and_improving() {
    let mut generator = Generator::new(options(12, 5));
    let records = generator.generate();
    assert!(!records.is_empty());
    for record in &records {
      assert!(solve::is_unique(&record.puzzle));
      assert!(generator.pool().contains(&record.puzzle));
    }
    let stats = generator.stats();
    assert_eq!(stats.generated, records.len());
    assert!(generator.pool().len() <= generator.options().pool_capacity);
  }

  #[test]
  fn nothing_to_drop_from_solved_patterns() {
    let options = Options {
      clues_to_drop: 0,
      minimize: false,
      ..options(5, 3)
    };
    let solved: Puzzle = SOLVED.parse().unwrap();
    let mut generator = Generator::with_patterns(options.clone(), vec![solved.clone()]);
    assert!(generator.generate().is_empty());
    assert_eq!(generator.stats().unchanged, 5);
    assert!(generate_from_patterns(&options, vec![solved]).is_empty());
  }

  #[test]
  fn pencilmark_records() {
    let options = Options {
      pencilmark: true,
      clues_to_drop: 5,
      minimize: false,
      ..options(2, 11)
    };
    let records = Generator::new(options).generate();
    assert!(!records.is_empty());
    for record in records {
      assert_eq!(record.puzzle.len(), 729);
      assert_eq!(record.puzzle.variant(), Variant::Pencilmark);
      assert!(solve::is_unique(&record.puzzle));
    }
  }

  #[test]
  fn rotating_pool_generation() {
    let options = Options {
      pool_mode: PoolMode::Rotating,
      rotation_size: 4,
      ..options(3, 21)
    };
    let mut generator = Generator::rotating(options.clone());
    let records = generator.generate();
    assert!(!records.is_empty());
    assert_eq!(generator.pool().len(), 4);
    for record in &records {
      assert_eq!(record.puzzle.len(), 81);
    }
    assert_eq!(generate(&options), records);
  }

  #[test]
  fn sink_can_stop_early() {
    let mut generator = Generator::new(options(10, 8));
    let mut seen = 0;
    let count = generator.generate_with(|_| {
      seen += 1;
      false
    });
    assert_eq!(count, 1);
    assert_eq!(seen, 1);
  }

  #[test]
  fn empty_pattern_list() {
    let mut generator = Generator::with_patterns(options(3, 1), Vec::new());
    assert!(generator.generate().is_empty());
    assert_eq!(generator.stats().empty_pool, 3);
  }
}
