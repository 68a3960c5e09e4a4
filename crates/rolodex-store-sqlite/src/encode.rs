//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD` strings, which sort and compare
//! correctly as text and match SQLite's own `date()` output.

use chrono::NaiveDate;
use rolodex_core::person::DirectoryRow;

use crate::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(date: NaiveDate) -> String { date.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawRow::from_row`]; `person` is aliased `p`, the
/// contact tables `pn` and `ea`.
pub const ROW_COLUMNS: &str = "p.person_id, p.first_name, p.last_name, p.patronymic, \
                               p.date_of_birth, pn.number, ea.email";

/// Raw values read directly from a `person` row joined with both contact
/// tables.
pub struct RawRow {
  pub person_id:     i64,
  pub first_name:    String,
  pub last_name:     String,
  pub patronymic:    Option<String>,
  pub date_of_birth: String,
  pub number:        Option<String>,
  pub email:         Option<String>,
}

impl RawRow {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawRow {
      person_id:     row.get(0)?,
      first_name:    row.get(1)?,
      last_name:     row.get(2)?,
      patronymic:    row.get(3)?,
      date_of_birth: row.get(4)?,
      number:        row.get(5)?,
      email:         row.get(6)?,
    })
  }

  pub fn into_row(self) -> Result<DirectoryRow> {
    Ok(DirectoryRow {
      person_id:     self.person_id,
      first_name:    self.first_name,
      last_name:     self.last_name,
      patronymic:    self.patronymic,
      date_of_birth: decode_date(&self.date_of_birth)?,
      number:        self.number,
      email:         self.email,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn date_text_form() {
    let date = NaiveDate::from_ymd_opt(1961, 3, 9).unwrap();
    assert_eq!(encode_date(date), "1961-03-09");
    assert_eq!(decode_date("1961-03-09").unwrap(), date);
  }

  #[test]
  fn bad_stored_date() {
    assert!(matches!(decode_date("09/03/1961"), Err(Error::DateParse(_))));
  }
}
