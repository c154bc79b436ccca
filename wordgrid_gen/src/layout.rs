use itertools::Itertools;
use rand::{seq::SliceRandom, Rng};
use util::{
  error::{WordgridError, WordgridResult},
  grid::Grid,
  pos::Pos,
};

pub const GRID_ROWS: u32 = 3;

/// Outcome of one layout attempt. Exhaustion is an expected result, not an
/// error: the caller discards the attempt and may retry with fresh words.
#[derive(Clone, Debug)]
pub enum Placement {
  Found(PlacedWords),
  Exhausted,
}

/// A completed layout: the filled grid plus, for each input word, the cells
/// its letters occupy in placement order.
#[derive(Clone, Debug)]
pub struct PlacedWords {
  grid: Grid<char>,
  paths: Vec<Vec<Pos>>,
}

impl PlacedWords {
  pub fn grid(&self) -> &Grid<char> {
    &self.grid
  }

  /// The puzzle letters in row-major reading order.
  pub fn cells(&self) -> impl Iterator<Item = char> + '_ {
    self.grid.cells().copied()
  }

  /// The cells each input word occupies, in placement order.
  pub fn paths(&self) -> &[Vec<Pos>] {
    &self.paths
  }

  /// Reads a word back off the grid along its recorded path.
  pub fn path_word(&self, word: usize) -> Option<String> {
    self.paths.get(word).map(|path| {
      path
        .iter()
        .filter_map(|&pos| self.grid.get(pos).copied())
        .collect()
    })
  }
}

/// The unplaced remainder of one word mid-search: its suffix of letters, the
/// cell its most recent letter occupies, and the cells used so far.
#[derive(Clone, Debug)]
struct Tail<'a> {
  word: usize,
  rest: &'a [char],
  cursor: Pos,
  path: Vec<Pos>,
}

type SearchHit = (Grid<Option<char>>, Vec<(usize, Vec<Pos>)>);

/// The layout search over a 3-row grid. Words are interleaved letter by
/// letter onto empty cells, each letter 8-adjacent to its predecessor, until
/// the grid is exactly full.
#[derive(Clone, Debug)]
pub struct GridLayout {
  rows: u32,
  cols: u32,
}

impl GridLayout {
  pub fn new(size: u32) -> WordgridResult<Self> {
    if size == 0 || size % GRID_ROWS != 0 {
      return Err(
        WordgridError::Config(format!(
          "grid size {size} does not divide into {GRID_ROWS} equal rows"
        ))
        .into(),
      );
    }
    Ok(Self { rows: GRID_ROWS, cols: size / GRID_ROWS })
  }

  pub fn rows(&self) -> u32 {
    self.rows
  }

  pub fn cols(&self) -> u32 {
    self.cols
  }

  pub fn size(&self) -> u32 {
    self.rows * self.cols
  }

  /// Searches for a simultaneous placement of two or three words.
  ///
  /// The combined word length must equal the cell count; for two words the
  /// first must not be longer than the second, and for three the second and
  /// third must be the longest, of equal length. Candidate start cells are
  /// tried from one random permutation of the grid, every distinct
  /// combination in turn, so a start that strands a word in a dead corner
  /// costs one inner search, not the whole attempt.
  pub fn layout<R: Rng>(&self, words: &[&str], rng: &mut R) -> WordgridResult<Placement> {
    let letters: Vec<Vec<char>> = words.iter().map(|word| word.chars().collect()).collect();
    self.validate(&letters)?;
    tracing::debug!(?words, rows = self.rows, cols = self.cols, "searching for a layout");

    let mut starts: Vec<Pos> = self.positions().collect();
    starts.shuffle(rng);

    for combo in starts.iter().permutations(letters.len()) {
      if let Some((grid, paths)) = self.try_from_starts(&letters, &combo, rng) {
        return Ok(Placement::Found(self.assemble(grid, paths)?));
      }
    }
    Ok(Placement::Exhausted)
  }

  fn validate(&self, letters: &[Vec<char>]) -> WordgridResult {
    if letters.len() < 2 || letters.len() > 3 {
      return Err(
        WordgridError::Config(format!(
          "a puzzle takes two or three words, got {}",
          letters.len()
        ))
        .into(),
      );
    }
    if letters.iter().any(|word| word.is_empty()) {
      return Err(WordgridError::Config("words must not be empty".to_owned()).into());
    }
    let total: usize = letters.iter().map(Vec::len).sum();
    if total != self.size() as usize {
      return Err(
        WordgridError::Config(format!(
          "word lengths sum to {total}, but the grid holds {} letters",
          self.size()
        ))
        .into(),
      );
    }
    if letters.len() == 2 && letters[0].len() > letters[1].len() {
      return Err(
        WordgridError::Config("the first word must not be longer than the second".to_owned())
          .into(),
      );
    }
    if letters.len() == 3 && (letters[1].len() != letters[2].len() || letters[0].len() > letters[1].len())
    {
      return Err(
        WordgridError::Config(
          "the second and third words must be equal length and at least as long as the first"
            .to_owned(),
        )
        .into(),
      );
    }
    Ok(())
  }

  fn positions(&self) -> impl Iterator<Item = Pos> {
    let cols = self.cols;
    (0..self.rows as i32).flat_map(move |y| (0..cols as i32).map(move |x| Pos { x, y }))
  }

  fn empty_neighbors(&self, grid: &Grid<Option<char>>, pos: Pos) -> Vec<Pos> {
    pos
      .moore_neighbors()
      .filter(|&neighbor| grid.get(neighbor).is_some_and(|cell| cell.is_none()))
      .collect()
  }

  /// Places each word's first letter on its chosen start cell and runs the
  /// interleaved placement from there.
  fn try_from_starts<R: Rng>(
    &self,
    letters: &[Vec<char>],
    starts: &[&Pos],
    rng: &mut R,
  ) -> Option<SearchHit> {
    let mut grid: Grid<Option<char>> = Grid::new(self.cols, self.rows);
    for (word, &&start) in letters.iter().zip(starts) {
      if let Some(slot) = grid.get_mut(start) {
        *slot = Some(word[0]);
      }
    }

    // Rounds advance the pacing word (the second, longest word) first; it
    // alone drives the base case, the others run out before it does.
    let order: &[usize] = if letters.len() == 2 { &[1, 0] } else { &[1, 0, 2] };
    let tails: Vec<Tail> = order
      .iter()
      .map(|&word| Tail {
        word,
        rest: &letters[word][1..],
        cursor: *starts[word],
        path: vec![*starts[word]],
      })
      .collect();
    self.place_round(&grid, &tails, rng)
  }

  /// One round places the next letter of every unfinished word. The grid is
  /// complete once the pacing word is out of letters.
  fn place_round<'a, R: Rng>(
    &self,
    grid: &Grid<Option<char>>,
    tails: &[Tail<'a>],
    rng: &mut R,
  ) -> Option<SearchHit> {
    if tails[0].rest.is_empty() {
      debug_assert!(tails.iter().all(|tail| tail.rest.is_empty()));
      return Some((
        grid.clone(),
        tails
          .iter()
          .map(|tail| (tail.word, tail.path.clone()))
          .collect(),
      ));
    }
    self.advance(grid, tails, 0, &mut Vec::with_capacity(tails.len()), rng)
  }

  /// Advances the word at `idx` by one letter, trying its shuffled empty
  /// neighbors in turn, then moves to the next word; after the last word the
  /// next round begins. Each branch works on its own grid snapshot, so
  /// backtracking is just returning.
  fn advance<'a, R: Rng>(
    &self,
    grid: &Grid<Option<char>>,
    tails: &[Tail<'a>],
    idx: usize,
    advanced: &mut Vec<Tail<'a>>,
    rng: &mut R,
  ) -> Option<SearchHit> {
    let Some(tail) = tails.get(idx) else {
      return self.place_round(grid, advanced, rng);
    };

    let Some((&letter, rest)) = tail.rest.split_first() else {
      // Exhausted word: carry it through the round unchanged.
      advanced.push(tail.clone());
      let result = self.advance(grid, tails, idx + 1, advanced, rng);
      advanced.pop();
      return result;
    };

    let mut candidates = self.empty_neighbors(grid, tail.cursor);
    if candidates.is_empty() {
      return None;
    }
    candidates.shuffle(rng);

    for cell in candidates {
      let mut branch = grid.clone();
      if let Some(slot) = branch.get_mut(cell) {
        *slot = Some(letter);
      }
      let mut path = tail.path.clone();
      path.push(cell);
      advanced.push(Tail { word: tail.word, rest, cursor: cell, path });
      let result = self.advance(&branch, tails, idx + 1, advanced, rng);
      advanced.pop();
      if result.is_some() {
        return result;
      }
    }
    None
  }

  fn assemble(
    &self,
    grid: Grid<Option<char>>,
    mut paths: Vec<(usize, Vec<Pos>)>,
  ) -> WordgridResult<PlacedWords> {
    let mut letters = Vec::with_capacity(self.size() as usize);
    for (cell, pos) in grid.cells().copied().zip(grid.positions()) {
      letters.push(cell.ok_or_else(|| {
        WordgridError::Internal(format!("cell {pos} left empty in a completed layout"))
      })?);
    }
    let grid = Grid::from_vec(letters, self.cols, self.rows)?;

    paths.sort_by_key(|&(word, _)| word);
    let paths = paths.into_iter().map(|(_, path)| path).collect();
    Ok(PlacedWords { grid, paths })
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

  use std::collections::HashSet;

  use googletest::prelude::*;
  use rand::{rngs::StdRng, SeedableRng};

  use super::{GridLayout, PlacedWords, Placement};

  fn layout_with_seed(size: u32, words: &[&str], seed: u64) -> Placement {
    let mut rng = StdRng::seed_from_u64(seed);
    GridLayout::new(size)
      .unwrap()
      .layout(words, &mut rng)
      .unwrap()
  }

  fn placed(size: u32, words: &[&str], seed: u64) -> PlacedWords {
    match layout_with_seed(size, words, seed) {
      Placement::Found(placed) => placed,
      Placement::Exhausted => panic!("expected a layout for {words:?}"),
    }
  }

  /// Checks every structural property of a successful layout: full cell
  /// coverage, per-word path contiguity, no sharing, and letter round-trip.
  fn expect_valid_layout(placed: &PlacedWords, words: &[&str]) {
    let total: usize = words.iter().map(|word| word.len()).sum();
    expect_that!(placed.cells().count(), eq(total));

    for (idx, word) in words.iter().enumerate() {
      let path = &placed.paths()[idx];
      expect_that!(path.len(), eq(word.len()));
      expect_that!(placed.path_word(idx), some(eq(*word)));
      for pair in path.windows(2) {
        expect_true!(pair[0].is_adjacent(pair[1]));
      }
    }

    let distinct: HashSet<_> = placed.paths().iter().flatten().collect();
    expect_that!(distinct.len(), eq(total));
  }

  #[gtest]
  fn test_two_words_fill_3x3() {
    let placed = placed(9, &["CAT", "PILLOW"], 42);
    expect_valid_layout(&placed, &["CAT", "PILLOW"]);
  }

  #[gtest]
  fn test_two_words_fill_3x4() {
    let placed = placed(12, &["APPLE", "BANDANA"], 42);
    expect_valid_layout(&placed, &["APPLE", "BANDANA"]);
  }

  #[gtest]
  fn test_equal_length_pair_fills_3x4() {
    let placed = placed(12, &["TURTLE", "PILLOW"], 42);
    expect_valid_layout(&placed, &["TURTLE", "PILLOW"]);
  }

  #[gtest]
  fn test_three_words_fill_3x4() {
    let placed = placed(12, &["ECHO", "LIMB", "SAND"], 42);
    expect_valid_layout(&placed, &["ECHO", "LIMB", "SAND"]);
  }

  #[gtest]
  fn test_layouts_vary_across_seeds() {
    let distinct: HashSet<Vec<char>> = (0..16)
      .map(|seed| placed(9, &["CAT", "PILLOW"], seed).cells().collect())
      .collect();
    expect_gt!(distinct.len(), 1);
  }

  #[gtest]
  fn test_fixed_seed_is_deterministic() {
    let first = placed(12, &["APPLE", "BANDANA"], 7);
    let second = placed(12, &["APPLE", "BANDANA"], 7);
    expect_that!(
      first.cells().collect::<Vec<_>>(),
      container_eq(second.cells().collect::<Vec<_>>())
    );
    expect_that!(first.paths(), eq(second.paths()));
  }

  #[gtest]
  fn test_rejects_size_not_divisible_into_rows() {
    expect_that!(GridLayout::new(10), err(anything()));
    expect_that!(GridLayout::new(0), err(anything()));
  }

  #[gtest]
  fn test_rejects_mismatched_length_sum() {
    let mut rng = StdRng::seed_from_u64(1);
    let grid = GridLayout::new(9).unwrap();
    expect_that!(grid.layout(&["CAT", "DOG"], &mut rng), err(anything()));
  }

  #[gtest]
  fn test_rejects_longer_first_word() {
    let mut rng = StdRng::seed_from_u64(1);
    let grid = GridLayout::new(9).unwrap();
    expect_that!(grid.layout(&["PILLOW", "CAT"], &mut rng), err(anything()));
  }

  #[gtest]
  fn test_rejects_unequal_trailing_words() {
    let mut rng = StdRng::seed_from_u64(1);
    let grid = GridLayout::new(12).unwrap();
    expect_that!(
      grid.layout(&["CAT", "FOUR", "TREES"], &mut rng),
      err(anything())
    );
  }

  #[gtest]
  fn test_rejects_wrong_word_count() {
    let mut rng = StdRng::seed_from_u64(1);
    let grid = GridLayout::new(9).unwrap();
    expect_that!(grid.layout(&["WATERFALL"], &mut rng), err(anything()));
    expect_that!(
      grid.layout(&["AB", "AB", "AB", "ABC"], &mut rng),
      err(anything())
    );
  }
}
