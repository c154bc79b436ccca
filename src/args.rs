use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
  /// Number of puzzles to generate.
  #[arg(short, long, default_value_t = 1)]
  pub count: u32,

  /// Number of letters in each puzzle (9 or 12).
  #[arg(short, long, default_value_t = 12)]
  pub size: u32,

  /// Fraction of 12-letter puzzles built from three 4-letter words.
  #[arg(short, long, default_value_t = 0.33)]
  pub ratio: f64,

  /// Base RNG seed; omitted, a fresh seed is drawn from the OS.
  #[arg(long)]
  pub seed: Option<u64>,

  /// Word-list CSV with `Word` and `Word length` columns.
  #[arg(short, long, default_value = "words.csv")]
  pub words: PathBuf,

  /// Pretty-print the JSON output.
  #[arg(long)]
  pub pretty: bool,
}
