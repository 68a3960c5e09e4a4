//! Error types for `rolodex-core`.

use chrono::NaiveDate;
use thiserror::Error;

/// Coarse classification of a domain [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// Malformed phone number, email address or person field.
  Validation,
  /// The referenced person or contact row does not exist.
  NotFound,
  /// The (value, person_id) pair is already recorded.
  UniquenessViolation,
  /// Input that could not be parsed at all (e.g. a date).
  MalformedInput,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("phone number {0:?} must be non-empty and contain only digits")]
  InvalidPhone(String),

  #[error("{0:?} does not look like an email address")]
  InvalidEmail(String),

  #[error("{0} is required")]
  MissingField(&'static str),

  #[error("date of birth {0} is later than the current date")]
  BirthDateInFuture(NaiveDate),

  #[error("unrecognised date {0:?}, expected YYYY-MM-DD")]
  MalformedDate(String),

  #[error("person not found: {0}")]
  PersonNotFound(i64),

  #[error("person {person_id} already has phone number {number}")]
  DuplicatePhone { number: String, person_id: i64 },

  #[error("person {person_id} already has email address {email}")]
  DuplicateEmail { email: String, person_id: i64 },

  #[error("person {person_id} has no phone number matching {pattern:?}")]
  PhoneNotFound { person_id: i64, pattern: String },

  #[error("person {person_id} has no email address matching {pattern:?}")]
  EmailNotFound { person_id: i64, pattern: String },
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Error::InvalidPhone(_)
      | Error::InvalidEmail(_)
      | Error::MissingField(_)
      | Error::BirthDateInFuture(_) => ErrorKind::Validation,
      Error::MalformedDate(_) => ErrorKind::MalformedInput,
      Error::PersonNotFound(_)
      | Error::PhoneNotFound { .. }
      | Error::EmailNotFound { .. } => ErrorKind::NotFound,
      Error::DuplicatePhone { .. } | Error::DuplicateEmail { .. } => {
        ErrorKind::UniquenessViolation
      }
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn kinds() {
    assert_eq!(Error::InvalidPhone("1-2".into()).kind(), ErrorKind::Validation);
    assert_eq!(Error::MissingField("first name").kind(), ErrorKind::Validation);
    assert_eq!(Error::MalformedDate("31.12.1990".into()).kind(), ErrorKind::MalformedInput);
    assert_eq!(Error::PersonNotFound(7).kind(), ErrorKind::NotFound);
    assert_eq!(
      Error::DuplicateEmail { email: "a@b.cd".into(), person_id: 1 }.kind(),
      ErrorKind::UniquenessViolation
    );
  }

  #[test]
  fn messages_are_readable() {
    let err = Error::InvalidEmail("bad@@x".into());
    assert_eq!(err.to_string(), "\"bad@@x\" does not look like an email address");
  }
}
