use util::error::{WordgridError, WordgridResult};
use wordgrid_dict::word_pool::WordRecord;

const WORD_COLUMN: &str = "Word";
const LENGTH_COLUMN: &str = "Word length";

fn split_row(line: &str) -> Vec<&str> {
  line.split(',').map(str::trim).collect()
}

/// Parses a word-list CSV into records. The first line must be a header
/// naming the `Word` and `Word length` columns; other columns are ignored.
/// Blank lines are skipped.
pub fn parse_word_csv(contents: &str) -> WordgridResult<Vec<WordRecord>> {
  let mut lines = contents.lines();
  let header = lines
    .next()
    .ok_or_else(|| WordgridError::Parse("empty word list".to_owned()))?;
  let columns = split_row(header);
  let word_column = columns
    .iter()
    .position(|&name| name == WORD_COLUMN)
    .ok_or_else(|| WordgridError::Parse(format!("missing \"{WORD_COLUMN}\" column")))?;
  let length_column = columns
    .iter()
    .position(|&name| name == LENGTH_COLUMN)
    .ok_or_else(|| WordgridError::Parse(format!("missing \"{LENGTH_COLUMN}\" column")))?;

  lines
    .filter(|line| !line.trim().is_empty())
    .map(|line| {
      let fields = split_row(line);
      let word = *fields.get(word_column).ok_or_else(|| {
        WordgridError::Parse(format!("failed to parse \"{line}\" as a word record"))
      })?;
      let length = fields
        .get(length_column)
        .and_then(|field| field.parse().ok())
        .ok_or_else(|| {
          WordgridError::Parse(format!("failed to parse \"{line}\" as a word record"))
        })?;
      Ok(WordRecord { word: word.to_owned(), length })
    })
    .collect()
}
