//! The `Directory` trait and its search criteria.
//!
//! The trait is implemented by storage backends (e.g.
//! `rolodex-store-sqlite`). The CLI depends on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::person::{DeletedPerson, DirectoryRow, NewPerson, PersonUpdate, UpdateOutcome};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Criteria for [`Directory::find_person`].
///
/// Text fields are pattern matches (`%` and `_` are wildcards, passed
/// through as typed); `None` or an empty string means "don't filter".
/// When `person_id` is set, `date_of_birth` is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonQuery {
  pub person_id:     Option<i64>,
  pub first_name:    Option<String>,
  pub last_name:     Option<String>,
  pub patronymic:    Option<String>,
  pub date_of_birth: Option<NaiveDate>,
  pub number:        Option<String>,
  pub email:         Option<String>,
}

impl PersonQuery {
  /// Criteria selecting a single person by id.
  pub fn by_id(person_id: i64) -> Self {
    Self { person_id: Some(person_id), ..Default::default() }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a person directory backend.
///
/// Every mutation commits on its own. `insert_person` is not atomic across
/// the person and its initial contacts; `delete_person` is.
pub trait Directory: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Search people joined with their phone numbers and email addresses,
  /// ordered by `person_id`.
  fn find_person<'a>(
    &'a self,
    query: &'a PersonQuery,
  ) -> impl Future<Output = Result<Vec<DirectoryRow>, Self::Error>> + Send + 'a;

  /// Whether a person with this id exists.
  fn person_exists(
    &self,
    person_id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── People ────────────────────────────────────────────────────────────

  /// Insert a person and any initial contacts, returning the new id.
  fn insert_person(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// Change name fields and/or date of birth of an existing person.
  fn update_person(
    &self,
    person_id: i64,
    update: PersonUpdate,
  ) -> impl Future<Output = Result<UpdateOutcome, Self::Error>> + Send + '_;

  /// Delete a person together with all their phone numbers and email
  /// addresses.
  fn delete_person(
    &self,
    person_id: i64,
  ) -> impl Future<Output = Result<DeletedPerson, Self::Error>> + Send + '_;

  /// Cascade-delete every person. Returns how many were removed.
  fn delete_all(&self) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Contact channels ──────────────────────────────────────────────────

  /// Record a phone number for an existing person.
  fn insert_phone(
    &self,
    number: String,
    person_id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Record an email address for an existing person.
  fn insert_email(
    &self,
    email: String,
    person_id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete the person's phone numbers matching `pattern`. Returns the
  /// number of rows removed.
  fn delete_phone(
    &self,
    person_id: i64,
    pattern: String,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Delete the person's email addresses matching `pattern`. Returns the
  /// number of rows removed.
  fn delete_email(
    &self,
    person_id: i64,
    pattern: String,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;
}
