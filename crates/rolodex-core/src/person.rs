//! Person records and the payloads used to create and change them.
//!
//! A person owns zero or more phone numbers and email addresses. Contact
//! channels are never shared between people and are never edited in place;
//! replacing one is a delete followed by an insert.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  validate::{check_birth_date, check_required, validate_email, validate_phone},
};

// ─── Stored records ──────────────────────────────────────────────────────────

/// An identity record as stored in the `person` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub person_id:     i64,
  pub first_name:    String,
  pub last_name:     String,
  pub patronymic:    Option<String>,
  pub date_of_birth: NaiveDate,
}

/// One row of a directory search.
///
/// Searches left-join both contact tables onto `person`, so a person with
/// N phone numbers and M email addresses comes back as N×M rows, and a
/// person without phones (or emails) comes back with `None` in that column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryRow {
  pub person_id:     i64,
  pub first_name:    String,
  pub last_name:     String,
  pub patronymic:    Option<String>,
  pub date_of_birth: NaiveDate,
  pub number:        Option<String>,
  pub email:         Option<String>,
}

impl DirectoryRow {
  /// The person part of the row, without contact columns.
  pub fn person(&self) -> Person {
    Person {
      person_id:     self.person_id,
      first_name:    self.first_name.clone(),
      last_name:     self.last_name.clone(),
      patronymic:    self.patronymic.clone(),
      date_of_birth: self.date_of_birth,
    }
  }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`Directory::insert_person`](crate::store::Directory::insert_person).
///
/// `phone` and `email` are optional initial contacts; empty strings are
/// treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPerson {
  pub first_name:    String,
  pub last_name:     String,
  pub patronymic:    Option<String>,
  pub date_of_birth: NaiveDate,
  pub phone:         Option<String>,
  pub email:         Option<String>,
}

impl NewPerson {
  pub fn new(
    first_name: impl Into<String>,
    last_name: impl Into<String>,
    date_of_birth: NaiveDate,
  ) -> Self {
    Self {
      first_name: first_name.into(),
      last_name: last_name.into(),
      patronymic: None,
      date_of_birth,
      phone: None,
      email: None,
    }
  }

  pub fn with_patronymic(mut self, patronymic: impl Into<String>) -> Self {
    self.patronymic = Some(patronymic.into());
    self
  }

  pub fn with_phone(mut self, number: impl Into<String>) -> Self {
    self.phone = Some(number.into());
    self
  }

  pub fn with_email(mut self, email: impl Into<String>) -> Self {
    self.email = Some(email.into());
    self
  }

  /// Check every field before anything is written.
  ///
  /// Contacts are checked here too, so a malformed phone or email never
  /// leaves a freshly inserted person behind without its contacts.
  pub fn validate(&self, today: NaiveDate) -> Result<()> {
    check_required(&self.first_name, "first name")?;
    check_required(&self.last_name, "last name")?;
    check_birth_date(self.date_of_birth, today)?;

    if let Some(number) = present(&self.phone)
      && !validate_phone(number)
    {
      return Err(Error::InvalidPhone(number.to_owned()));
    }
    if let Some(email) = present(&self.email)
      && !validate_email(email)
    {
      return Err(Error::InvalidEmail(email.to_owned()));
    }
    Ok(())
  }

  pub fn patronymic(&self) -> Option<&str> { trimmed(&self.patronymic) }

  pub fn phone(&self) -> Option<&str> { present(&self.phone) }

  pub fn email(&self) -> Option<&str> { present(&self.email) }
}

/// Changes to the mutable fields of a person.
///
/// `None` or an empty string leaves the field untouched, so a patronymic
/// can be changed but not cleared. Names made only of whitespace are
/// rejected; a whitespace-only patronymic counts as empty. Values are
/// stored trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonUpdate {
  pub first_name:    Option<String>,
  pub last_name:     Option<String>,
  pub patronymic:    Option<String>,
  pub date_of_birth: Option<NaiveDate>,
}

impl PersonUpdate {
  /// True when no field would be assigned.
  pub fn is_empty(&self) -> bool {
    present(&self.first_name).is_none()
      && present(&self.last_name).is_none()
      && trimmed(&self.patronymic).is_none()
      && self.date_of_birth.is_none()
  }

  pub fn validate(&self, today: NaiveDate) -> Result<()> {
    if let Some(first_name) = present(&self.first_name) {
      check_required(first_name, "first name")?;
    }
    if let Some(last_name) = present(&self.last_name) {
      check_required(last_name, "last name")?;
    }
    if let Some(date) = self.date_of_birth {
      check_birth_date(date, today)?;
    }
    Ok(())
  }
}

/// Result of [`Directory::update_person`](crate::store::Directory::update_person).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
  Applied,
  /// Every field was empty; no statement was executed.
  NothingToUpdate,
}

/// Rows removed by a cascade delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletedPerson {
  pub person_id: i64,
  pub phones:    usize,
  pub emails:    usize,
}

/// `Some(s)` only if `s` is present and non-empty.
pub fn present(value: &Option<String>) -> Option<&str> {
  value.as_deref().filter(|s| !s.is_empty())
}

/// Like [`present`], but trims `s` first, so whitespace alone is absent.
pub fn trimmed(value: &Option<String>) -> Option<&str> {
  value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  fn today() -> NaiveDate { date(2024, 6, 1) }

  #[test]
  fn new_person_valid() {
    let p = NewPerson::new("Ivan", "Petrov", date(1990, 1, 1))
      .with_phone("79990001122")
      .with_email("i.p@mail.ru");
    assert!(p.validate(today()).is_ok());
  }

  #[test]
  fn new_person_requires_names() {
    let p = NewPerson::new("", "Petrov", date(1990, 1, 1));
    assert!(matches!(p.validate(today()), Err(Error::MissingField("first name"))));
    let p = NewPerson::new("Ivan", " ", date(1990, 1, 1));
    assert!(matches!(p.validate(today()), Err(Error::MissingField("last name"))));
  }

  #[test]
  fn new_person_rejects_future_birth_date() {
    let p = NewPerson::new("Ivan", "Petrov", date(2030, 1, 1));
    assert!(matches!(p.validate(today()), Err(Error::BirthDateInFuture(_))));
  }

  #[test]
  fn new_person_rejects_bad_contacts() {
    let p = NewPerson::new("Ivan", "Petrov", date(1990, 1, 1)).with_phone("12-345");
    assert!(matches!(p.validate(today()), Err(Error::InvalidPhone(_))));
    let p = NewPerson::new("Ivan", "Petrov", date(1990, 1, 1)).with_email("bad@@x");
    assert!(matches!(p.validate(today()), Err(Error::InvalidEmail(_))));
  }

  #[test]
  fn empty_contacts_are_absent() {
    let p = NewPerson::new("Ivan", "Petrov", date(1990, 1, 1))
      .with_patronymic("")
      .with_phone("")
      .with_email("");
    assert!(p.validate(today()).is_ok());
    assert_eq!(p.patronymic(), None);
    assert_eq!(p.phone(), None);
    assert_eq!(p.email(), None);
  }

  #[test]
  fn update_emptiness() {
    assert!(PersonUpdate::default().is_empty());

    let blank = PersonUpdate {
      first_name: Some(String::new()),
      last_name: Some(String::new()),
      patronymic: Some(String::new()),
      date_of_birth: None,
    };
    assert!(blank.is_empty());

    let dated = PersonUpdate {
      date_of_birth: Some(date(1980, 2, 2)),
      ..Default::default()
    };
    assert!(!dated.is_empty());
  }

  #[test]
  fn whitespace_patronymic_is_absent() {
    let p = NewPerson::new("Ivan", "Petrov", date(1990, 1, 1)).with_patronymic("   ");
    assert_eq!(p.patronymic(), None);
    let p = p.with_patronymic(" Sergeevich ");
    assert_eq!(p.patronymic(), Some("Sergeevich"));
  }

  #[test]
  fn update_rejects_blank_names() {
    let update = PersonUpdate {
      first_name: Some("   ".into()),
      ..Default::default()
    };
    assert!(matches!(update.validate(today()), Err(Error::MissingField("first name"))));

    let update = PersonUpdate {
      last_name: Some("\t".into()),
      ..Default::default()
    };
    assert!(matches!(update.validate(today()), Err(Error::MissingField("last name"))));

    let update = PersonUpdate {
      patronymic: Some("  ".into()),
      ..Default::default()
    };
    assert!(update.is_empty());
    assert!(update.validate(today()).is_ok());
  }

  #[test]
  fn update_rejects_future_birth_date() {
    let update = PersonUpdate {
      date_of_birth: Some(date(2099, 1, 1)),
      ..Default::default()
    };
    assert!(matches!(update.validate(today()), Err(Error::BirthDateInFuture(_))));
  }
}
