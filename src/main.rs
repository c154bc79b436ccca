#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod args;
mod word_csv;

use std::fs;

use clap::Parser;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use util::{
  error::{WordgridError, WordgridResult},
  time::time_fn,
};
use wordgrid_dict::word_pool::WordPool;
use wordgrid_gen::layout::{GridLayout, Placement};

use crate::{args::Args, word_csv::parse_word_csv};

const TWO_WORD_SIZE: u32 = 9;
const THREE_WORD_SIZE: u32 = 12;

/// One generated puzzle, in the driver's output shape: the source words and
/// the grid letters in row-major reading order. `word3` is empty for
/// two-word puzzles.
#[derive(Clone, Debug, Serialize)]
struct PuzzleRecord {
  word1: String,
  word2: String,
  word3: String,
  cells: Vec<String>,
}

fn validate_args(args: &Args) -> WordgridResult {
  if args.count == 0 {
    return Err(WordgridError::Config("count must be at least 1".to_owned()).into());
  }
  if args.size != TWO_WORD_SIZE && args.size != THREE_WORD_SIZE {
    return Err(
      WordgridError::Config(format!(
        "grid size ({}) must be {TWO_WORD_SIZE} or {THREE_WORD_SIZE}",
        args.size
      ))
      .into(),
    );
  }
  if !(0.0..=1.0).contains(&args.ratio) {
    return Err(
      WordgridError::Config(format!(
        "ratio ({}) must be between 0 and 1 (inclusive)",
        args.ratio
      ))
      .into(),
    );
  }
  Ok(())
}

/// Picks the words for one puzzle. 9-cell puzzles take two words; 12-cell
/// puzzles take three 4-letter words with probability `ratio`, otherwise two.
fn pick_puzzle_words<R: Rng>(
  pool: &mut WordPool,
  size: u32,
  ratio: f64,
  rng: &mut R,
) -> WordgridResult<Vec<String>> {
  if size == TWO_WORD_SIZE {
    let (word1, word2) = pool.pick_pair_for9(rng)?;
    return Ok(vec![word1, word2]);
  }
  if rng.random::<f64>() <= ratio {
    let (word1, word2, word3) = pool.pick_triple_for12(rng)?;
    Ok(vec![word1, word2, word3])
  } else {
    let (word1, word2) = pool.pick_pair_for12(rng)?;
    Ok(vec![word1, word2])
  }
}

fn to_record(words: &[String], cells: impl Iterator<Item = char>) -> PuzzleRecord {
  PuzzleRecord {
    word1: words.first().cloned().unwrap_or_default(),
    word2: words.get(1).cloned().unwrap_or_default(),
    word3: words.get(2).cloned().unwrap_or_default(),
    cells: cells.map(String::from).collect(),
  }
}

fn generate(args: &Args) -> WordgridResult<Vec<PuzzleRecord>> {
  let contents = fs::read_to_string(&args.words)?;
  let records = parse_word_csv(&contents)?;

  let seed = args.seed.unwrap_or_else(|| rand::rng().random());
  tracing::debug!(seed, "base seed");
  let mut rng = StdRng::seed_from_u64(seed);

  let (mut pool, stats) = WordPool::load(records, &mut rng);
  if !stats.all_used() {
    tracing::warn!(
      read = stats.read,
      used = stats.used,
      "ignored {} word-list records",
      stats.read - stats.used
    );
  }

  let grid = GridLayout::new(args.size)?;
  let picked = (0..args.count)
    .map(|_| pick_puzzle_words(&mut pool, args.size, args.ratio, &mut rng))
    .collect::<WordgridResult<Vec<_>>>()?;

  // Each attempt owns its grid state and an RNG stream derived from the base
  // seed, so a batch is reproducible and embarrassingly parallel.
  let results = picked
    .par_iter()
    .enumerate()
    .map(|(idx, words)| -> WordgridResult<Option<PuzzleRecord>> {
      let mut rng = StdRng::seed_from_u64(seed.wrapping_add(idx as u64 + 1));
      let word_refs: Vec<&str> = words.iter().map(String::as_str).collect();
      match grid.layout(&word_refs, &mut rng)? {
        Placement::Found(placed) => Ok(Some(to_record(words, placed.cells()))),
        Placement::Exhausted => {
          tracing::warn!(?words, "failed to lay out words, skipping puzzle");
          Ok(None)
        }
      }
    })
    .collect::<WordgridResult<Vec<_>>>()?;

  Ok(results.into_iter().flatten().collect())
}

fn main() -> WordgridResult {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "wordgrid=info".into()),
    )
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();

  let args = Args::parse();
  validate_args(&args)?;

  let (time, results) = time_fn(|| generate(&args));
  let results = results?;
  tracing::info!(
    puzzles = results.len(),
    "generated in {:.3}s",
    time.as_secs_f32()
  );

  let json = if args.pretty {
    serde_json::to_string_pretty(&results)?
  } else {
    serde_json::to_string(&results)?
  };
  println!("{json}");
  Ok(())
}
