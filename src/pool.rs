//! Defines the seed pools the generator draws its base patterns from.

use crate::core::Puzzle;
use crate::random::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

/// The number of slots in a rotating pool unless configured otherwise.
pub const DEFAULT_ROTATION_SIZE: usize = 64;

/// A collection of puzzles the generator mutates into new candidates.
pub trait SeedPool {
  /// Picks a member uniformly at random, or None if the pool is empty.
  fn sample<R: Rng>(&self, random: &mut R) -> Option<&Puzzle>;

  /// Offers a puzzle with its loss, returning whether the pool took it.
  fn try_admit<R: Rng>(&mut self, puzzle: Puzzle, loss: f64, random: &mut R) -> bool;

  fn contains(&self, puzzle: &Puzzle) -> bool;

  /// The loss a candidate must beat to get in, if admission depends on loss.
  fn worst_loss(&self) -> Option<f64>;

  fn len(&self) -> usize;

  fn is_empty(&self) -> bool {
    self.len() == 0
  }

  fn capacity(&self) -> usize;

  /// Iterates the members along with their losses, where known.
  fn iter(&self) -> Box<dyn Iterator<Item = (&Puzzle, Option<f64>)> + '_>;
}

/// Which pool implementation a generator uses.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolMode {
  /// Keeps the lowest-loss puzzles seen.
  #[default]
  Ranked,
  /// Overwrites random slots with every admitted puzzle.
  Rotating,
}

/// A pool member.  Entries order by loss first, and by puzzle text among equal
/// losses, so the heap's order is total.
#[derive(Clone, Debug)]
struct SeedEntry {
  loss: f64,
  puzzle: Puzzle,
}

impl PartialEq for SeedEntry {
  fn eq(&self, other: &Self) -> bool {
    self.cmp(other) == Ordering::Equal
  }
}

impl Eq for SeedEntry {}

impl PartialOrd for SeedEntry {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for SeedEntry {
  fn cmp(&self, other: &Self) -> Ordering {
    self
      .loss
      .total_cmp(&other.loss)
      .then_with(|| self.puzzle.cmp(&other.puzzle))
  }
}

/// A bounded pool that keeps the lowest-loss puzzles it has been offered.  The
/// heap and the membership set always hold the same puzzles.
#[derive(Clone, Debug)]
pub struct RankedPool {
  capacity: usize,
  ranking: BinaryHeap<SeedEntry>,
  members: HashSet<Puzzle>,
}

impl RankedPool {
  pub fn new(capacity: usize) -> Self {
    RankedPool {
      capacity,
      ranking: BinaryHeap::with_capacity(capacity + 1),
      members: HashSet::with_capacity(capacity + 1),
    }
  }

  fn insert(&mut self, puzzle: Puzzle, loss: f64) {
    self.members.insert(puzzle.clone());
    self.ranking.push(SeedEntry { loss, puzzle });
  }

  #[cfg(test)]
  fn check_consistency(&self) {
    assert_eq!(self.ranking.len(), self.members.len());
    assert!(self.ranking.len() <= self.capacity);
    for entry in self.ranking.iter() {
      assert!(self.members.contains(&entry.puzzle));
    }
  }
}

impl SeedPool for RankedPool {
  fn sample<R: Rng>(&self, random: &mut R) -> Option<&Puzzle> {
    if self.ranking.is_empty() {
      return None;
    }
    let n = random.random_range(0..self.ranking.len());
    self.ranking.iter().nth(n).map(|entry| &entry.puzzle)
  }

  /// Rejects duplicates.  Below capacity, admits anything else; at capacity,
  /// admits only puzzles with a loss strictly below the worst member's, which
  /// they then replace.
  fn try_admit<R: Rng>(&mut self, puzzle: Puzzle, loss: f64, _random: &mut R) -> bool {
    if self.capacity == 0 || self.members.contains(&puzzle) {
      return false;
    }
    if self.ranking.len() >= self.capacity {
      match self.ranking.peek() {
        Some(worst) if loss < worst.loss => {}
        _ => return false,
      }
      if let Some(evicted) = self.ranking.pop() {
        self.members.remove(&evicted.puzzle);
      }
    }
    self.insert(puzzle, loss);
    true
  }

  fn contains(&self, puzzle: &Puzzle) -> bool {
    self.members.contains(puzzle)
  }

  fn worst_loss(&self) -> Option<f64> {
    self.ranking.peek().map(|entry| entry.loss)
  }

  fn len(&self) -> usize {
    self.ranking.len()
  }

  fn capacity(&self) -> usize {
    self.capacity
  }

  fn iter(&self) -> Box<dyn Iterator<Item = (&Puzzle, Option<f64>)> + '_> {
    Box::new(self.ranking.iter().map(|entry| (&entry.puzzle, Some(entry.loss))))
  }
}

/// A fixed number of slots, all starting out as the seed pattern, where each
/// admitted puzzle overwrites a random slot.
#[derive(Clone, Debug)]
pub struct RotatingPool {
  slots: Vec<Puzzle>,
}

impl RotatingPool {
  pub fn new(size: usize, seed: Puzzle) -> Self {
    RotatingPool {
      slots: vec![seed; size],
    }
  }

  /// Fills the slots by cycling through the given patterns.  With no
  /// patterns, the pool is empty.
  pub fn from_patterns(size: usize, patterns: &[Puzzle]) -> Self {
    RotatingPool {
      slots: patterns.iter().cycle().take(size).cloned().collect(),
    }
  }
}

impl SeedPool for RotatingPool {
  fn sample<R: Rng>(&self, random: &mut R) -> Option<&Puzzle> {
    self.slots.choose(random)
  }

  fn try_admit<R: Rng>(&mut self, puzzle: Puzzle, _loss: f64, random: &mut R) -> bool {
    if self.slots.is_empty() {
      return false;
    }
    let i = random.random_range(0..self.slots.len());
    self.slots[i] = puzzle;
    true
  }

  fn contains(&self, puzzle: &Puzzle) -> bool {
    self.slots.contains(puzzle)
  }

  fn worst_loss(&self) -> Option<f64> {
    None
  }

  fn len(&self) -> usize {
    self.slots.len()
  }

  fn capacity(&self) -> usize {
    self.slots.len()
  }

  fn iter(&self) -> Box<dyn Iterator<Item = (&Puzzle, Option<f64>)> + '_> {
    Box::new(self.slots.iter().map(|puzzle| (puzzle, None)))
  }
}
