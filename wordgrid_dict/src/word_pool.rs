use std::ops::RangeInclusive;

use itertools::Itertools;
use rand::{seq::SliceRandom, Rng};
use util::error::{WordgridError, WordgridResult};

pub const MIN_WORD_LEN: u32 = 3;
pub const MAX_WORD_LEN: u32 = 8;
const NUM_BUCKETS: usize = (MAX_WORD_LEN - MIN_WORD_LEN + 1) as usize;

/// One row of a word list: a word and its stated length.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordRecord {
  pub word: String,
  pub length: u32,
}

impl WordRecord {
  /// Whether this record can enter the pool: the stated length must be in
  /// the selectable range and agree with the word itself, and the word must
  /// be plain letters. Runs of a single repeated letter longer than three
  /// make degenerate puzzles and are skipped.
  fn selectable(&self) -> bool {
    let char_count = self.word.chars().count() as u32;
    (MIN_WORD_LEN..=MAX_WORD_LEN).contains(&self.length)
      && char_count == self.length
      && self.word.chars().all(|c| c.is_ascii_alphabetic())
      && !(self.word.chars().all_equal() && char_count > 3)
  }
}

/// Load diagnostics: how many records were offered vs. kept. A shortfall is
/// the caller's to report; it is not an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadStats {
  pub read: u32,
  pub used: u32,
}

impl LoadStats {
  pub fn all_used(&self) -> bool {
    self.read == self.used
  }
}

/// Words bucketed by length, dispensed round-robin in shuffled order. Each
/// bucket reshuffles whenever its cursor wraps, so a long run of requests
/// cycles through every word before repeating any.
#[derive(Clone, Debug)]
pub struct WordPool {
  buckets: [Vec<String>; NUM_BUCKETS],
  cursors: [usize; NUM_BUCKETS],
  requested: [u32; NUM_BUCKETS],
}

impl WordPool {
  pub fn load<R: Rng>(
    records: impl IntoIterator<Item = WordRecord>,
    rng: &mut R,
  ) -> (Self, LoadStats) {
    let mut buckets: [Vec<String>; NUM_BUCKETS] = Default::default();
    let (mut read, mut used) = (0, 0);
    for record in records {
      read += 1;
      if !record.selectable() {
        continue;
      }
      used += 1;
      buckets[(record.length - MIN_WORD_LEN) as usize].push(record.word.to_ascii_uppercase());
    }
    for bucket in buckets.iter_mut() {
      bucket.shuffle(rng);
    }
    tracing::debug!(
      sizes = ?buckets.iter().map(Vec::len).collect::<Vec<_>>(),
      "loaded word pool"
    );

    (
      Self {
        buckets,
        cursors: [0; NUM_BUCKETS],
        requested: [0; NUM_BUCKETS],
      },
      LoadStats { read, used },
    )
  }

  fn bucket_index(length: u32) -> WordgridResult<usize> {
    if !(MIN_WORD_LEN..=MAX_WORD_LEN).contains(&length) {
      return Err(
        WordgridError::Config(format!(
          "word length {length} is outside the selectable range {MIN_WORD_LEN}-{MAX_WORD_LEN}"
        ))
        .into(),
      );
    }
    Ok((length - MIN_WORD_LEN) as usize)
  }

  /// How many words of the given length are loaded. Zero for lengths outside
  /// the selectable range.
  pub fn available(&self, length: u32) -> usize {
    Self::bucket_index(length)
      .map(|idx| self.buckets[idx].len())
      .unwrap_or(0)
  }

  /// The next word of the given length, cycling through the bucket. The
  /// bucket is reshuffled each time the cursor wraps around.
  pub fn next_word<R: Rng>(&mut self, length: u32, rng: &mut R) -> WordgridResult<String> {
    let idx = Self::bucket_index(length)?;
    self.requested[idx] += 1;
    let bucket = &mut self.buckets[idx];
    if bucket.is_empty() {
      return Err(
        WordgridError::EmptyBucket {
          length,
          requested: self.requested[idx],
        }
        .into(),
      );
    }

    let cursor = self.cursors[idx];
    let word = bucket[cursor].clone();
    let next = (cursor + 1) % bucket.len();
    self.cursors[idx] = next;
    if next == 0 {
      bucket.shuffle(rng);
    }
    Ok(word)
  }

  /// Two words whose lengths sum to `total`. The shorter word's length is
  /// drawn uniformly from a window below half the total, clamped so both
  /// lengths stay selectable; the shorter word comes first.
  pub fn pick_pair<R: Rng>(&mut self, total: u32, rng: &mut R) -> WordgridResult<(String, String)> {
    let half = total / 2;
    let low = half
      .saturating_sub(2)
      .max(MIN_WORD_LEN)
      .max(total.saturating_sub(MAX_WORD_LEN));
    let high = half.min(MAX_WORD_LEN);
    if low > high {
      return Err(
        WordgridError::Config(format!("no valid two-word split of {total} total letters")).into(),
      );
    }
    self.pick_split(low..=high, total, rng)
  }

  /// Two words for a 9-cell puzzle: 3+6 or 4+5.
  pub fn pick_pair_for9<R: Rng>(&mut self, rng: &mut R) -> WordgridResult<(String, String)> {
    self.pick_split(3..=4, 9, rng)
  }

  /// Two words for a 12-cell puzzle: 5+7 or 6+6.
  pub fn pick_pair_for12<R: Rng>(&mut self, rng: &mut R) -> WordgridResult<(String, String)> {
    self.pick_split(5..=6, 12, rng)
  }

  /// Three 4-letter words for a 12-cell puzzle.
  pub fn pick_triple_for12<R: Rng>(
    &mut self,
    rng: &mut R,
  ) -> WordgridResult<(String, String, String)> {
    Ok((
      self.next_word(4, rng)?,
      self.next_word(4, rng)?,
      self.next_word(4, rng)?,
    ))
  }

  fn pick_split<R: Rng>(
    &mut self,
    shorter: RangeInclusive<u32>,
    total: u32,
    rng: &mut R,
  ) -> WordgridResult<(String, String)> {
    let len1 = rng.random_range(shorter);
    let word1 = self.next_word(len1, rng)?;
    let word2 = self.next_word(total - len1, rng)?;
    Ok((word1, word2))
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

  use googletest::prelude::*;
  use rand::{rngs::StdRng, SeedableRng};
  use util::error::WordgridError;

  use super::{LoadStats, WordPool, WordRecord};

  fn sorted(words: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut words: Vec<_> = words.into_iter().collect();
    words.sort();
    words
  }

  fn record(word: &str, length: u32) -> WordRecord {
    WordRecord { word: word.to_owned(), length }
  }

  fn records(words: &[&str]) -> Vec<WordRecord> {
    words
      .iter()
      .map(|word| record(word, word.len() as u32))
      .collect()
  }

  #[gtest]
  fn test_load_buckets_by_length() {
    let mut rng = StdRng::seed_from_u64(1);
    let (pool, stats) = WordPool::load(records(&["cat", "dog", "apple", "banana"]), &mut rng);
    expect_that!(stats, eq(LoadStats { read: 4, used: 4 }));
    expect_true!(stats.all_used());
    expect_that!(pool.available(3), eq(2));
    expect_that!(pool.available(5), eq(1));
    expect_that!(pool.available(6), eq(1));
    expect_that!(pool.available(4), eq(0));
  }

  #[gtest]
  fn test_load_ignores_unusable_records() {
    let mut rng = StdRng::seed_from_u64(1);
    let (pool, stats) = WordPool::load(
      vec![
        record("at", 2),        // too short
        record("wordiness", 9), // too long
        record("cat", 4),       // stated length disagrees
        record("no-op", 5),     // not a plain word
        record("eeeee", 5),     // single repeated letter
        record("pillow", 6),
      ],
      &mut rng,
    );
    expect_that!(stats, eq(LoadStats { read: 6, used: 1 }));
    expect_false!(stats.all_used());
    expect_that!(pool.available(6), eq(1));
    expect_that!(pool.available(5), eq(0));
  }

  #[gtest]
  fn test_next_word_uppercases() {
    let mut rng = StdRng::seed_from_u64(2);
    let (mut pool, _) = WordPool::load(records(&["cat"]), &mut rng);
    expect_that!(pool.next_word(3, &mut rng).unwrap(), eq("CAT"));
  }

  #[gtest]
  fn test_next_word_cycles_through_bucket() {
    let mut rng = StdRng::seed_from_u64(3);
    let (mut pool, _) = WordPool::load(records(&["cat", "dog", "owl"]), &mut rng);

    let first_cycle = sorted((0..3).map(|_| pool.next_word(3, &mut rng).unwrap()));
    let second_cycle = sorted((0..3).map(|_| pool.next_word(3, &mut rng).unwrap()));

    let all_words = ["CAT".to_owned(), "DOG".to_owned(), "OWL".to_owned()];
    expect_that!(first_cycle, container_eq(all_words.clone()));
    expect_that!(second_cycle, container_eq(all_words));
  }

  #[gtest]
  fn test_next_word_empty_bucket() {
    let mut rng = StdRng::seed_from_u64(4);
    let (mut pool, _) = WordPool::load(records(&["cat"]), &mut rng);
    let err = pool.next_word(5, &mut rng).unwrap_err();
    expect_that!(
      err.downcast_ref::<WordgridError>(),
      some(eq(&WordgridError::EmptyBucket { length: 5, requested: 1 }))
    );
  }

  #[gtest]
  fn test_next_word_rejects_out_of_range_length() {
    let mut rng = StdRng::seed_from_u64(5);
    let (mut pool, _) = WordPool::load(records(&["cat"]), &mut rng);
    expect_that!(pool.next_word(2, &mut rng), err(anything()));
    expect_that!(pool.next_word(9, &mut rng), err(anything()));
  }

  #[gtest]
  fn test_pick_pair_for9_splits() {
    let mut rng = StdRng::seed_from_u64(6);
    let (mut pool, _) = WordPool::load(
      records(&["cat", "dog", "lion", "bear", "tiger", "mouse", "pillow", "turtle"]),
      &mut rng,
    );
    for _ in 0..20 {
      let (word1, word2) = pool.pick_pair_for9(&mut rng).unwrap();
      expect_that!(word1.len() + word2.len(), eq(9));
      expect_that!(word1.len(), any![eq(3), eq(4)]);
      expect_le!(word1.len(), word2.len());
    }
  }

  #[gtest]
  fn test_pick_pair_for12_splits() {
    let mut rng = StdRng::seed_from_u64(7);
    let (mut pool, _) = WordPool::load(
      records(&["tiger", "mouse", "pillow", "turtle", "bananas", "pelican"]),
      &mut rng,
    );
    for _ in 0..20 {
      let (word1, word2) = pool.pick_pair_for12(&mut rng).unwrap();
      expect_that!(word1.len() + word2.len(), eq(12));
      expect_that!(word1.len(), any![eq(5), eq(6)]);
      expect_le!(word1.len(), word2.len());
    }
  }

  #[gtest]
  fn test_pick_triple_for12() {
    let mut rng = StdRng::seed_from_u64(8);
    let (mut pool, _) = WordPool::load(records(&["echo", "limb", "sand"]), &mut rng);
    let (word1, word2, word3) = pool.pick_triple_for12(&mut rng).unwrap();
    expect_that!(word1.len(), eq(4));
    expect_that!(
      sorted([word1, word2, word3]),
      container_eq(["ECHO".to_owned(), "LIMB".to_owned(), "SAND".to_owned()])
    );
  }

  #[gtest]
  fn test_pick_pair_window_clamps_to_selectable_lengths() {
    let mut rng = StdRng::seed_from_u64(9);
    let (mut pool, _) = WordPool::load(
      records(&["amortize", "blinkers", "charcoal", "dwelling"]),
      &mut rng,
    );
    // 16 letters only splits as 8+8.
    let (word1, word2) = pool.pick_pair(16, &mut rng).unwrap();
    expect_that!(word1.len(), eq(8));
    expect_that!(word2.len(), eq(8));
  }

  #[gtest]
  fn test_pick_pair_rejects_impossible_total() {
    let mut rng = StdRng::seed_from_u64(10);
    let (mut pool, _) = WordPool::load(records(&["amortize"]), &mut rng);
    expect_that!(pool.pick_pair(17, &mut rng), err(anything()));
  }
}
