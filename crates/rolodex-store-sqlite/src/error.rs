//! Error type for `rolodex-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] rolodex_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date parse error: {0}")]
  DateParse(String),

  /// The person row was committed but one of its initial contacts was not.
  #[error("person {person_id} was created, but adding a contact failed: {source}")]
  PartialInsert {
    person_id: i64,
    #[source]
    source:    Box<Error>,
  },
}

impl Error {
  /// The domain error behind this one, if any.
  pub fn as_core(&self) -> Option<&rolodex_core::Error> {
    match self {
      Error::Core(e) => Some(e),
      Error::PartialInsert { source, .. } => source.as_core(),
      _ => None,
    }
  }

  /// False only when the storage engine itself failed; everything else is
  /// bad input that the caller can report and move past.
  pub fn is_recoverable(&self) -> bool {
    match self {
      Error::Core(_) => true,
      Error::Database(_) | Error::DateParse(_) => false,
      Error::PartialInsert { source, .. } => source.is_recoverable(),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
