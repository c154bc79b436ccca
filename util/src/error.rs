use core::fmt;
use std::{
  error::Error,
  fmt::{Display, Formatter},
};

#[derive(Debug, PartialEq, Eq)]
pub enum WordgridError {
  /// Invalid parameters, rejected before any search starts.
  Config(String),
  /// Malformed word-list input.
  Parse(String),
  /// A length bucket ran dry. `requested` counts every request that bucket
  /// has served, including the failing one.
  EmptyBucket { length: u32, requested: u32 },
  Internal(String),
}

impl Display for WordgridError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      WordgridError::Config(msg) => write!(f, "Configuration error: {msg}"),
      WordgridError::Parse(msg) => write!(f, "Parse error: {msg}"),
      WordgridError::EmptyBucket { length, requested } => write!(
        f,
        "No {length}-letter words available ({requested} requested from that bucket)"
      ),
      WordgridError::Internal(msg) => write!(f, "Internal error: {msg}"),
    }
  }
}

impl Error for WordgridError {}

pub type WordgridResult<T = ()> = Result<T, Box<dyn Error + Send + Sync>>;
