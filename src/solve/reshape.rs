//! Operations that rewrite a puzzle's clues in place: completing a partial
//! puzzle into a uniquely solvable one, and stripping redundant clues.

use super::*;

/// Adds clues consistent with a randomly chosen solution of the puzzle until
/// that solution is the only one.  Returns false, leaving the puzzle as it
/// was, when it has no solution at all.
///
/// Classic puzzles gain filled cells; pencilmark puzzles gain eliminated
/// candidates.
pub fn constrain<R: Rng>(puzzle: &mut Puzzle, random: &mut R) -> bool {
  let report = solve(puzzle, 1, &mut RandomPivotHelper(&mut *random), Propagation::Singles);
  let Some(target) = report.solution else {
    return false;
  };
  loop {
    let mut rival = None;
    enumerate(puzzle, 2, &mut MinRemainingHelper, Propagation::Singles, |solution| {
      if *solution != target {
        rival = Some(*solution);
      }
    });
    let Some(rival) = rival else {
      return true;
    };
    let differences: Vec<Cell> = Cell::all().filter(|&cell| rival[cell] != target[cell]).collect();
    let Some(&cell) = differences.choose(random) else {
      return true;
    };
    match puzzle.variant() {
      Variant::Classic => puzzle.text_mut()[cell.index()] = target[cell].to_ascii(),
      Variant::Pencilmark => puzzle.text_mut()[cell.index() * 9 + rival[cell].index()] = b'.',
    }
  }
}

/// Tries removing each clue in random order, putting back any whose removal
/// would admit a second solution.  Returns false, leaving the puzzle as it
/// was, unless the puzzle starts out with a unique solution.
///
/// With `monotonic`, stops at the first clue that has to be put back and
/// returns whether the puzzle is minimal at that point.
pub fn minimize<R: Rng>(puzzle: &mut Puzzle, monotonic: bool, random: &mut R) -> bool {
  if !is_unique(puzzle) {
    return false;
  }
  let mut positions: Vec<usize> = puzzle.clue_positions().collect();
  positions.shuffle(random);
  for i in positions {
    let saved = puzzle.text()[i];
    puzzle.drop_clue(i);
    if !is_unique(puzzle) {
      puzzle.text_mut()[i] = saved;
      if monotonic {
        return is_minimal(puzzle);
      }
    }
  }
  true
}

/// Tells whether the puzzle has exactly one solution.
pub fn is_unique(puzzle: &Puzzle) -> bool {
  count_solutions(puzzle, 2) == 1
}

/// Tells whether every clue of a uniquely solvable puzzle is needed to keep
/// it that way.
pub fn is_minimal(puzzle: &Puzzle) -> bool {
  let mut probe = puzzle.clone();
  puzzle.clue_positions().all(|i| {
    probe.drop_clue(i);
    let needed = !is_unique(&probe);
    probe.text_mut()[i] = puzzle.text()[i];
    needed
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::fixtures::*;

  #[test]
  fn constrain_empty_grid() {
    let mut random = new_random("constrain");
    let mut puzzle = Puzzle::empty(Variant::Classic);
    assert!(constrain(&mut puzzle, &mut random));
    assert!(is_unique(&puzzle));
    assert!(puzzle.num_clues() > 16);
  }

  #[test]
  fn constrain_keeps_existing_clues() {
    let mut random = new_random("keeps");
    let original: Puzzle = NINE_SOLUTIONS.parse().unwrap();
    let mut puzzle = original.clone();
    assert!(constrain(&mut puzzle, &mut random));
    assert!(is_unique(&puzzle));
    for i in original.clue_positions() {
      assert_eq!(puzzle.text()[i], original.text()[i]);
    }
    assert!(puzzle.num_clues() > original.num_clues());
  }

  #[test]
  fn constrain_leaves_unique_puzzles_alone() {
    let mut random = new_random("unique");
    let original: Puzzle = UNIQUE.parse().unwrap();
    let mut puzzle = original.clone();
    assert!(constrain(&mut puzzle, &mut random));
    assert_eq!(puzzle, original);
  }

  #[test]
  fn constrain_fails_without_solutions() {
    let mut random = new_random("fails");
    for clues in [BROKEN, NO_SOLUTION] {
      let original: Puzzle = clues.parse().unwrap();
      let mut puzzle = original.clone();
      assert!(!constrain(&mut puzzle, &mut random));
      assert_eq!(puzzle, original);
    }
  }

  #[test]
  fn constrain_pencilmark() {
    let mut random = new_random("pencilmark");
    let mut puzzle = Puzzle::empty(Variant::Pencilmark);
    assert!(constrain(&mut puzzle, &mut random));
    assert_eq!(puzzle.len(), 729);
    assert!(is_unique(&puzzle));
  }

  #[test]
  fn minimize_solved_grid() {
    let mut random = new_random("minimize");
    let mut puzzle: Puzzle = SOLVED.parse().unwrap();
    assert!(minimize(&mut puzzle, false, &mut random));
    assert!(is_unique(&puzzle));
    assert!(is_minimal(&puzzle));
    assert!(puzzle.num_clues() < 40);
    let solution: Solution = SOLVED.parse().unwrap();
    let report = solve(&puzzle, 1, &mut MinRemainingHelper, Propagation::Singles);
    assert_eq!(report.solution, Some(solution));
  }

  #[test]
  fn monotonic_minimize_stops_early() {
    let mut random = new_random("monotonic");
    let mut puzzle: Puzzle = SOLVED.parse().unwrap();
    let minimal = minimize(&mut puzzle, true, &mut random);
    assert!(is_unique(&puzzle));
    assert_eq!(minimal, is_minimal(&puzzle));

    // Minimizing a minimal puzzle restores the first clue it tries, and
    // finds nothing else to remove.
    let mut again = puzzle.clone();
    if minimal {
      assert!(minimize(&mut again, true, &mut random));
      assert_eq!(again, puzzle);
    }
  }

  #[test]
  fn minimize_rejects_ambiguous_puzzles() {
    let mut random = new_random("ambiguous");
    let original: Puzzle = NINE_SOLUTIONS.parse().unwrap();
    let mut puzzle = original.clone();
    assert!(!minimize(&mut puzzle, false, &mut random));
    assert_eq!(puzzle, original);
  }
}
