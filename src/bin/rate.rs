use anyhow::{bail, Context};
use clap::{Parser, ValueHint};
use doku_gen::{
  core::Puzzle,
  dispatch::{self, Backend},
  random::seeded,
};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Rates Sudoku puzzles read one per line, printing each puzzle's rating
/// followed by the puzzle.  Unsolvable puzzles rate 100.
#[derive(Parser)]
#[command(name = "doku-rate")]
struct Cli {
  /// File of puzzles; reads stdin when absent.
  #[arg(value_hint = ValueHint::FilePath)]
  input: Option<PathBuf>,

  /// Backend id: 0 propagating, 1 classic-only, 2 basic.
  #[arg(short, long, default_value_t = 0)]
  backend: i32,

  /// Number of permuted solves to average.
  #[arg(short, long, default_value_t = 10)]
  num_evals: usize,

  /// Random seed; 0 seeds from the OS.
  #[arg(short, long, default_value_t = 0)]
  seed: u64,
}

fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let Some(backend) = Backend::from_id(cli.backend) else {
    bail!("Unknown backend {}", cli.backend);
  };
  let input: Box<dyn BufRead> = match &cli.input {
    Some(path) => Box::new(BufReader::new(
      std::fs::File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
    )),
    None => Box::new(std::io::stdin().lock()),
  };

  let mut random = seeded(cli.seed);
  let mut out = BufWriter::new(std::io::stdout().lock());
  for (number, line) in input.lines().enumerate() {
    let line = line?;
    let line = line.trim_end();
    if line.is_empty() || line.starts_with('#') {
      continue;
    }
    let Ok(puzzle) = line.parse::<Puzzle>() else {
      warn!(line = number + 1, "Skipping short puzzle line");
      continue;
    };
    let rating = dispatch::rate(&puzzle, backend, cli.num_evals, &mut random);
    writeln!(out, "{rating:5} {puzzle}")?;
  }
  out.flush()?;
  Ok(())
}
