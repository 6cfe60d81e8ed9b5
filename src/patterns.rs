//! Reads and writes pattern files: plain text, one puzzle per line.

use crate::core::*;
use crate::pool::SeedPool;
use anyhow::Context;
use itertools::Itertools;
use std::path::Path;
use tracing::warn;

/// Parses the puzzles in a pattern file's contents.  Blank lines and lines
/// starting with `#` are ignored; every other line is truncated to the
/// variant's size, or skipped with a warning if it's shorter than that.
pub fn parse_patterns(contents: &str, variant: Variant) -> Vec<Puzzle> {
  let mut answer = Vec::new();
  for (number, line) in contents.lines().enumerate() {
    let line = line.trim_end();
    if line.is_empty() || line.starts_with('#') {
      continue;
    }
    match Puzzle::from_bytes(variant, line.as_bytes()) {
      Ok(puzzle) => answer.push(puzzle),
      Err(Invalid) => warn!(
        line = number + 1,
        len = line.len(),
        expected = variant.size(),
        "Skipping short pattern line"
      ),
    }
  }
  answer
}

/// Reads a pattern file.
pub fn load_patterns(path: &Path, variant: Variant) -> anyhow::Result<Vec<Puzzle>> {
  let contents = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read pattern file {}", path.display()))?;
  Ok(parse_patterns(&contents, variant))
}

/// Renders a pool in pattern-file form, each puzzle preceded by a comment line
/// giving its loss when the pool knows it.
pub fn export_patterns<P: SeedPool>(pool: &P) -> String {
  pool
    .iter()
    .map(|(puzzle, loss)| match loss {
      Some(loss) => format!("# loss {loss}\n{puzzle}\n"),
      None => format!("{puzzle}\n"),
    })
    .join("")
}

/// Writes a pool to a pattern file.
pub fn save_patterns<P: SeedPool>(pool: &P, path: &Path) -> anyhow::Result<()> {
  std::fs::write(path, export_patterns(pool))
    .with_context(|| format!("Failed to write pattern file {}", path.display()))
}
