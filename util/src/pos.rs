use std::{
  fmt::Display,
  ops::{Add, AddAssign, Sub},
};

/// A cell coordinate: `x` is the column, `y` is the row.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct Pos {
  pub x: i32,
  pub y: i32,
}

impl Pos {
  pub const fn zero() -> Self {
    Self { x: 0, y: 0 }
  }

  /// The eight Moore-neighborhood offsets, in reading order.
  const NEIGHBOR_OFFSETS: [Diff; 8] = [
    Diff { x: -1, y: -1 },
    Diff { x: 0, y: -1 },
    Diff { x: 1, y: -1 },
    Diff { x: -1, y: 0 },
    Diff { x: 1, y: 0 },
    Diff { x: -1, y: 1 },
    Diff { x: 0, y: 1 },
    Diff { x: 1, y: 1 },
  ];

  /// All eight neighbors of this cell, without any bounds filtering.
  pub fn moore_neighbors(self) -> impl Iterator<Item = Pos> {
    Self::NEIGHBOR_OFFSETS.into_iter().map(move |diff| self + diff)
  }

  /// Two cells are adjacent if they differ by at most 1 in each coordinate
  /// and are not the same cell.
  pub fn is_adjacent(self, other: Pos) -> bool {
    let Diff { x, y } = other - self;
    (x != 0 || y != 0) && x.abs() <= 1 && y.abs() <= 1
  }
}

impl Sub for Pos {
  type Output = Diff;

  fn sub(self, rhs: Self) -> Diff {
    Diff { x: self.x - rhs.x, y: self.y - rhs.y }
  }
}

impl Add<Diff> for Pos {
  type Output = Self;

  fn add(self, rhs: Diff) -> Self {
    Self { x: self.x + rhs.x, y: self.y + rhs.y }
  }
}

impl AddAssign<Diff> for Pos {
  fn add_assign(&mut self, rhs: Diff) {
    self.x += rhs.x;
    self.y += rhs.y;
  }
}

impl Display for Pos {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "({}, {})", self.x, self.y)
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Diff {
  pub x: i32,
  pub y: i32,
}

impl Display for Diff {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "({}, {})", self.x, self.y)
  }
}
