//! Shape checks for contact channels and person fields.
//!
//! These are heuristics, not full format validation: a phone number is any
//! non-empty run of digits, and an email address only has to look like one.

use chrono::{NaiveDate, Utc};

use crate::{Error, Result};

/// True iff `s` is non-empty and every character is a decimal digit.
///
/// No length bound is applied here even though generated numbers are always
/// 11 to 15 digits long.
pub fn validate_phone(s: &str) -> bool {
  !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// True iff `s` roughly resembles an email address:
///
/// - at least 6 characters long;
/// - exactly one `@`, which is neither the first character nor inside the
///   last 4 characters;
/// - exactly one `.` among the 4 characters preceding the final one.
pub fn validate_email(s: &str) -> bool {
  let chars: Vec<char> = s.chars().collect();
  let len = chars.len();
  if len < 6 {
    return false;
  }

  let count = |range: &[char], needle: char| {
    range.iter().filter(|&&c| c == needle).count()
  };

  count(&chars, '@') == 1
    && count(&chars[1..len - 4], '@') == 1
    && count(&chars[len - 5..len - 1], '.') == 1
}

/// Parse a user-supplied `YYYY-MM-DD` date.
///
/// Blank input means "no value" and yields `Ok(None)`; anything else that
/// fails to parse is rejected rather than silently dropped.
pub fn parse_date(s: &str) -> Result<Option<NaiveDate>> {
  let s = s.trim();
  if s.is_empty() {
    return Ok(None);
  }
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map(Some)
    .map_err(|_| Error::MalformedDate(s.to_owned()))
}

/// The current date as the storage engine sees it (UTC).
pub fn today() -> NaiveDate { Utc::now().date_naive() }

/// Reject birth dates later than `today`.
pub fn check_birth_date(date: NaiveDate, today: NaiveDate) -> Result<()> {
  if date > today {
    return Err(Error::BirthDateInFuture(date));
  }
  Ok(())
}

/// Reject a required text field that is empty or whitespace only.
pub fn check_required(value: &str, field: &'static str) -> Result<()> {
  if value.trim().is_empty() {
    return Err(Error::MissingField(field));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn phone_accepts_digits_only() {
    assert!(validate_phone("12345678901"));
    assert!(validate_phone("7"));
    assert!(validate_phone("1234567890123456789012"));
    assert!(!validate_phone(""));
    assert!(!validate_phone("12-345"));
    assert!(!validate_phone("+79990001122"));
    assert!(!validate_phone("8 999 000"));
  }

  #[test]
  fn email_accepts_plausible_addresses() {
    assert!(validate_email("a.b.ivanov@mail.ru"));
    assert!(validate_email("i.p@mail.ru"));
    assert!(validate_email("mark_popov@protonmail.com"));
    assert!(validate_email("petra@ya.ru"));
  }

  #[test]
  fn email_rejects_malformed_addresses() {
    assert!(!validate_email("bad@@x"));
    assert!(!validate_email("a@b.c"));
    assert!(!validate_email("no-at-sign.ru"));
    assert!(!validate_email("@mail.ru"));
    assert!(!validate_email("ivanov@mailru"));
    assert!(!validate_email("ivanov@ma.i.ru"));
    assert!(!validate_email("abcdef@x.y"));
    assert!(!validate_email("a@b@mail.ru"));
  }

  #[test]
  fn email_counts_characters_not_bytes() {
    assert!(validate_email("иван@почта.рф"));
  }

  #[test]
  fn parse_date_blank_is_none() {
    assert_eq!(parse_date("").unwrap(), None);
    assert_eq!(parse_date("   ").unwrap(), None);
  }

  #[test]
  fn parse_date_iso() {
    assert_eq!(
      parse_date("1990-01-01").unwrap(),
      NaiveDate::from_ymd_opt(1990, 1, 1)
    );
  }

  #[test]
  fn parse_date_rejects_garbage() {
    for bad in ["01.01.1990", "1990-13-01", "1990-02-30", "yesterday"] {
      let err = parse_date(bad).unwrap_err();
      assert!(matches!(err, Error::MalformedDate(ref s) if s == bad));
    }
  }

  #[test]
  fn birth_date_not_in_future() {
    let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    assert!(check_birth_date(today, today).is_ok());
    assert!(check_birth_date(today.pred_opt().unwrap(), today).is_ok());
    let tomorrow = today.succ_opt().unwrap();
    assert!(matches!(
      check_birth_date(tomorrow, today),
      Err(Error::BirthDateInFuture(d)) if d == tomorrow
    ));
  }

  #[test]
  fn required_fields() {
    assert!(check_required("Ivan", "first name").is_ok());
    assert!(matches!(
      check_required("  ", "first name"),
      Err(Error::MissingField("first name"))
    ));
  }
}
