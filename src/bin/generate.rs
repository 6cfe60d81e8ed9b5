use anyhow::Context;
use clap::{Parser, ValueHint};
use doku_gen::{
  dispatch::Backend,
  gen::{GeneratedRecord, Generator, Options},
  patterns,
  pool::{PoolMode, SeedPool},
};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Generates Sudoku puzzles, one per line on stdout.
#[derive(Parser)]
#[command(name = "doku-generate")]
struct Cli {
  /// JSON file of generation options; flags override it.
  #[arg(long, value_hint = ValueHint::FilePath)]
  config: Option<PathBuf>,

  /// Pattern file to seed the pool from, instead of the empty grid.
  #[arg(long, value_hint = ValueHint::FilePath)]
  patterns: Option<PathBuf>,

  /// Where to write the final pool, in pattern-file form.
  #[arg(long, value_hint = ValueHint::FilePath)]
  export: Option<PathBuf>,

  /// Number of generation attempts.
  #[arg(short = 'n', long)]
  max_puzzles: Option<usize>,

  #[arg(long)]
  clues_to_drop: Option<usize>,

  #[arg(long)]
  num_evals: Option<usize>,

  #[arg(long)]
  clue_weight: Option<f64>,

  #[arg(long)]
  guess_weight: Option<f64>,

  #[arg(long)]
  random_weight: Option<f64>,

  /// Keep redundant clues.
  #[arg(long)]
  no_minimize: bool,

  /// Generate pencilmark puzzles.
  #[arg(short, long)]
  pencilmark: bool,

  /// Random seed; 0 seeds from the OS.
  #[arg(short, long)]
  seed: Option<u64>,

  #[arg(long)]
  pool_capacity: Option<usize>,

  /// Use a rotating pool instead of a ranked one.
  #[arg(long)]
  rotating: bool,

  /// Evaluation backend id: 0 propagating, 1 classic-only, 2 basic.
  #[arg(long)]
  backend: Option<i32>,

  /// Print each puzzle's scores as JSON instead of its bare text.
  #[arg(long)]
  json: bool,
}

impl Cli {
  fn options(&self) -> anyhow::Result<Options> {
    let mut options = match &self.config {
      Some(path) => {
        let text = std::fs::read_to_string(path)
          .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&text)
          .with_context(|| format!("Failed to parse config {}", path.display()))?
      }
      None => Options::default(),
    };
    if let Some(n) = self.max_puzzles {
      options.max_puzzles = n;
    }
    if let Some(n) = self.clues_to_drop {
      options.clues_to_drop = n;
    }
    if let Some(n) = self.num_evals {
      options.num_evals = n;
    }
    if let Some(w) = self.clue_weight {
      options.clue_weight = w;
    }
    if let Some(w) = self.guess_weight {
      options.guess_weight = w;
    }
    if let Some(w) = self.random_weight {
      options.random_weight = w;
    }
    if let Some(seed) = self.seed {
      options.random_seed = seed;
    }
    if let Some(n) = self.pool_capacity {
      options.pool_capacity = n;
    }
    if let Some(id) = self.backend {
      options.backend = Backend::from_id(id).with_context(|| format!("Unknown backend {id}"))?;
    }
    options.minimize &= !self.no_minimize;
    options.pencilmark |= self.pencilmark;
    if self.rotating {
      options.pool_mode = PoolMode::Rotating;
    }
    Ok(options)
  }
}

fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let options = cli.options()?;
  let patterns = match &cli.patterns {
    Some(path) => Some(patterns::load_patterns(path, options.variant())?),
    None => None,
  };

  match (options.pool_mode, patterns) {
    (PoolMode::Ranked, None) => run(&cli, Generator::new(options)),
    (PoolMode::Ranked, Some(p)) => run(&cli, Generator::with_patterns(options, p)),
    (PoolMode::Rotating, None) => run(&cli, Generator::rotating(options)),
    (PoolMode::Rotating, Some(p)) => run(&cli, Generator::rotating_with_patterns(options, p)),
  }
}

fn run<P: SeedPool>(cli: &Cli, mut generator: Generator<P>) -> anyhow::Result<()> {
  let mut out = BufWriter::new(std::io::stdout().lock());
  let mut result = Ok(());
  generator.generate_with(|record| {
    result = print(&mut out, &record, cli.json);
    result.is_ok()
  });
  result?;
  out.flush()?;
  if let Some(path) = &cli.export {
    patterns::save_patterns(generator.pool(), path)?;
  }
  Ok(())
}

fn print(out: &mut impl Write, record: &GeneratedRecord, json: bool) -> anyhow::Result<()> {
  if json {
    serde_json::to_writer(&mut *out, record)?;
    writeln!(out)?;
  } else {
    writeln!(out, "{}", record.puzzle)?;
  }
  Ok(())
}
