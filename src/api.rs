//! The library's entry points over plain byte buffers, also exported to
//! JavaScript.

use crate::core::*;
use crate::dispatch::{self, Backend, UNRATED};
use crate::gen::{self, GeneratedRecord, Generator, Options};
use crate::random::seeded;
use wasm_bindgen::prelude::*;

/// Installs a panic hook that reports panics on the JavaScript console.
#[cfg(feature = "console_error_panic_hook")]
#[wasm_bindgen(js_name = "setPanicHook")]
pub fn set_panic_hook() {
  console_error_panic_hook::set_once();
}

/// Generates up to `num` puzzles with default options, writing each into
/// `buffer` as its symbols followed by `separator`.  A zero `seed` draws one
/// from entropy, which in a browser means `Math.random`.  Stops early when
/// `buffer` can't hold another puzzle.  Returns the number of puzzles written.
#[wasm_bindgen]
pub fn generate(num: usize, pencilmark: bool, seed: u64, buffer: &mut [u8], separator: u8) -> usize {
  let options = Options {
    max_puzzles: num,
    pencilmark,
    random_seed: seed,
    ..Options::default()
  };
  let stride = options.variant().size() + 1;
  if buffer.len() < stride {
    return 0;
  }
  let mut written = 0;
  Generator::new(options).generate_with(|record| {
    let out = &mut buffer[written * stride..];
    let Ok(n) = record.puzzle.copy_to(out) else {
      return false;
    };
    out[n] = separator;
    written += 1;
    buffer.len() >= (written + 1) * stride
  });
  written
}

/// Generates puzzles with fully specified options.
pub fn generate_records(options: &Options) -> Vec<GeneratedRecord> {
  gen::generate(options)
}

/// Generates puzzles from options given as a JavaScript object, returning an
/// array of record objects.  Omitted options take their defaults.
#[wasm_bindgen(js_name = "generateRecords")]
pub fn generate_records_js(options: JsValue) -> Result<JsValue, JsError> {
  let options: Options = if options.is_undefined() || options.is_null() {
    Options::default()
  } else {
    serde_wasm_bindgen::from_value(options)?
  };
  Ok(serde_wasm_bindgen::to_value(&generate_records(&options))?)
}

/// Rates the puzzle in `input` by solving `num_evals` randomly permuted copies
/// with the given backend.  Returns 100 when the input is malformed, the
/// backend unknown or unable to solve any copy.
#[wasm_bindgen]
pub fn rate(input: &[u8], backend: i32, num_evals: i32) -> i32 {
  let (Ok(puzzle), Some(backend)) = (Puzzle::from_wire(input), Backend::from_id(backend)) else {
    return UNRATED;
  };
  let num_evals = usize::try_from(num_evals).unwrap_or(0);
  dispatch::rate(&puzzle, backend, num_evals, &mut seeded(0))
}

/// The outcome of `solve`.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SolveSummary {
  /// Whether a solution was found and written.
  pub found: bool,
  /// The guesses the backend made finding it.
  pub guesses: u64,
}

/// Solves the puzzle in `input` with the given backend, writing the solution's
/// 81 digits to the front of `solution`.  Nothing is written unless a
/// solution is found and `solution` has room for it.
#[wasm_bindgen]
pub fn solve(input: &[u8], backend: i32, solution: &mut [u8]) -> SolveSummary {
  let Ok(puzzle) = Puzzle::from_wire(input) else {
    return SolveSummary::default();
  };
  let Some(solved) = dispatch::solve_by_id(&puzzle, backend) else {
    return SolveSummary::default();
  };
  let Some(out) = solution.get_mut(..CLASSIC_SIZE) else {
    return SolveSummary::default();
  };
  out.copy_from_slice(&solved.solution.to_text());
  SolveSummary {
    found: true,
    guesses: solved.guesses,
  }
}
