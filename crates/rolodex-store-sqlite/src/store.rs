//! [`SqliteDirectory`], the SQLite implementation of [`Directory`].

use std::path::Path;

use rolodex_core::{
  Error as CoreError,
  person::{DeletedPerson, DirectoryRow, NewPerson, PersonUpdate, UpdateOutcome},
  store::{Directory, PersonQuery},
  validate::{today, validate_email, validate_phone},
};
use rusqlite::OptionalExtension as _;
use tracing::{debug, info, warn};

use crate::{
  Error, Result,
  encode::{ROW_COLUMNS, RawRow, encode_date},
  query::{build_search_predicate, build_update_assignment},
  schema::SCHEMA,
};

// ─── Contact channels ────────────────────────────────────────────────────────

/// The two dependent contact tables. They share one shape, so inserts and
/// deletes are written once against this.
#[derive(Debug, Clone, Copy)]
enum Channel {
  Phone,
  Email,
}

impl Channel {
  fn table(self) -> &'static str {
    match self {
      Channel::Phone => "phone_number",
      Channel::Email => "email_address",
    }
  }

  fn column(self) -> &'static str {
    match self {
      Channel::Phone => "number",
      Channel::Email => "email",
    }
  }

  fn is_valid(self, value: &str) -> bool {
    match self {
      Channel::Phone => validate_phone(value),
      Channel::Email => validate_email(value),
    }
  }

  fn invalid(self, value: String) -> CoreError {
    match self {
      Channel::Phone => CoreError::InvalidPhone(value),
      Channel::Email => CoreError::InvalidEmail(value),
    }
  }

  fn duplicate(self, value: String, person_id: i64) -> CoreError {
    match self {
      Channel::Phone => CoreError::DuplicatePhone { number: value, person_id },
      Channel::Email => CoreError::DuplicateEmail { email: value, person_id },
    }
  }

  fn not_found(self, person_id: i64, pattern: String) -> CoreError {
    match self {
      Channel::Phone => CoreError::PhoneNotFound { person_id, pattern },
      Channel::Email => CoreError::EmailNotFound { person_id, pattern },
    }
  }
}

/// True when `e` is a primary-key collision, i.e. the (value, person_id)
/// pair is already recorded.
fn is_duplicate_key(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(err, _)
      if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
  )
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A person directory backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteDirectory {
  conn: tokio_rusqlite::Connection,
}

impl SqliteDirectory {
  /// Open (or create) a directory at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory directory for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  #[cfg(test)]
  pub(crate) fn connection(&self) -> &tokio_rusqlite::Connection { &self.conn }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Validate and insert one contact row.
  async fn insert_contact(&self, channel: Channel, value: String, person_id: i64) -> Result<()> {
    if !channel.is_valid(&value) {
      warn!(person_id, %value, table = channel.table(), "rejected malformed contact");
      return Err(channel.invalid(value).into());
    }
    if !self.person_exists(person_id).await? {
      return Err(CoreError::PersonNotFound(person_id).into());
    }

    let sql = format!(
      "INSERT INTO {} ({}, person_id) VALUES (?1, ?2)",
      channel.table(),
      channel.column()
    );
    let bound = value.clone();

    let inserted: bool = self
      .conn
      .call(move |conn| {
        match conn.execute(&sql, rusqlite::params![bound, person_id]) {
          Ok(_) => Ok(true),
          Err(e) if is_duplicate_key(&e) => Ok(false),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    if !inserted {
      return Err(channel.duplicate(value, person_id).into());
    }
    info!(person_id, %value, table = channel.table(), "contact added");
    Ok(())
  }

  /// Delete a person's contact rows matching `pattern`, after checking at
  /// least one matches.
  async fn delete_contact(&self, channel: Channel, person_id: i64, pattern: String) -> Result<usize> {
    let exists_sql = format!(
      "SELECT 1 FROM {} WHERE person_id = ?1 AND {} LIKE ?2 LIMIT 1",
      channel.table(),
      channel.column()
    );
    let delete_sql = format!(
      "DELETE FROM {} WHERE person_id = ?1 AND {} LIKE ?2",
      channel.table(),
      channel.column()
    );
    let bound = pattern.clone();

    let removed: Option<usize> = self
      .conn
      .call(move |conn| {
        let matched = conn
          .query_row(&exists_sql, rusqlite::params![person_id, bound], |_| Ok(()))
          .optional()?
          .is_some();
        if !matched {
          return Ok(None);
        }
        Ok(Some(conn.execute(&delete_sql, rusqlite::params![person_id, bound])?))
      })
      .await?;

    let Some(removed) = removed else {
      return Err(channel.not_found(person_id, pattern).into());
    };
    info!(person_id, %pattern, removed, table = channel.table(), "contacts deleted");
    Ok(removed)
  }
}

// ─── Directory impl ──────────────────────────────────────────────────────────

impl Directory for SqliteDirectory {
  type Error = Error;

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn find_person(&self, query: &PersonQuery) -> Result<Vec<DirectoryRow>> {
    let (filter, params) = build_search_predicate(query).into_parts();
    let sql = format!(
      "SELECT {ROW_COLUMNS}
       FROM person p
       LEFT JOIN phone_number  pn ON pn.person_id = p.person_id
       LEFT JOIN email_address ea ON ea.person_id = p.person_id
       {filter}"
    );
    debug!(%filter, params = params.len(), "searching directory");

    let raws: Vec<RawRow> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params.iter()), RawRow::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRow::into_row).collect()
  }

  async fn person_exists(&self, person_id: i64) -> Result<bool> {
    let exists = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM person WHERE person_id = ?1",
              rusqlite::params![person_id],
              |_| Ok(()),
            )
            .optional()?
            .is_some(),
        )
      })
      .await?;
    Ok(exists)
  }

  // ── People ────────────────────────────────────────────────────────────────

  async fn insert_person(&self, input: NewPerson) -> Result<i64> {
    if let Err(e) = input.validate(today()) {
      warn!(error = %e, "rejected new person");
      return Err(e.into());
    }

    let first_name = input.first_name.trim().to_owned();
    let last_name  = input.last_name.trim().to_owned();
    let patronymic = input.patronymic().map(str::to_owned);
    let dob_str    = encode_date(input.date_of_birth);

    // RETURNING runs in the same connection call as the insert, so the id
    // cannot belong to anyone else's row.
    let person_id: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "INSERT INTO person (first_name, last_name, patronymic, date_of_birth)
           VALUES (?1, ?2, ?3, ?4)
           RETURNING person_id",
          rusqlite::params![first_name, last_name, patronymic, dob_str],
          |row| row.get(0),
        )?)
      })
      .await?;
    info!(person_id, "person added");

    // Each contact commits on its own; a failure here leaves the person in
    // place and is reported as a partial insert.
    let contacts = [
      (Channel::Phone, input.phone().map(str::to_owned)),
      (Channel::Email, input.email().map(str::to_owned)),
    ];
    for (channel, value) in contacts {
      let Some(value) = value else { continue };
      self
        .insert_contact(channel, value, person_id)
        .await
        .map_err(|source| Error::PartialInsert { person_id, source: Box::new(source) })?;
    }

    Ok(person_id)
  }

  async fn update_person(&self, person_id: i64, update: PersonUpdate) -> Result<UpdateOutcome> {
    if !self.person_exists(person_id).await? {
      return Err(CoreError::PersonNotFound(person_id).into());
    }
    update.validate(today())?;

    let Some(statement) = build_update_assignment(person_id, &update) else {
      debug!(person_id, "update has no fields, skipping");
      return Ok(UpdateOutcome::NothingToUpdate);
    };
    let fields = statement.assignments().len();
    let (sql, params) = statement.into_parts();
    debug!(%sql, "updating person");

    self
      .conn
      .call(move |conn| {
        conn.execute(&sql, rusqlite::params_from_iter(params.iter()))?;
        Ok(())
      })
      .await?;

    info!(person_id, fields, "person updated");
    Ok(UpdateOutcome::Applied)
  }

  async fn delete_person(&self, person_id: i64) -> Result<DeletedPerson> {
    if !self.person_exists(person_id).await? {
      return Err(CoreError::PersonNotFound(person_id).into());
    }

    // Dependents first, then the person, all in one transaction.
    let deleted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let phones = tx.execute(
          "DELETE FROM phone_number WHERE person_id = ?1",
          rusqlite::params![person_id],
        )?;
        let emails = tx.execute(
          "DELETE FROM email_address WHERE person_id = ?1",
          rusqlite::params![person_id],
        )?;
        tx.execute(
          "DELETE FROM person WHERE person_id = ?1",
          rusqlite::params![person_id],
        )?;
        tx.commit()?;
        Ok(DeletedPerson { person_id, phones, emails })
      })
      .await?;

    info!(person_id, phones = deleted.phones, emails = deleted.emails, "person deleted");
    Ok(deleted)
  }

  async fn delete_all(&self) -> Result<usize> {
    let ids: Vec<i64> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT person_id FROM person ORDER BY person_id")?;
        let ids = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(ids)
      })
      .await?;

    for &person_id in &ids {
      self.delete_person(person_id).await?;
    }
    Ok(ids.len())
  }

  // ── Contact channels ──────────────────────────────────────────────────────

  async fn insert_phone(&self, number: String, person_id: i64) -> Result<()> {
    self.insert_contact(Channel::Phone, number, person_id).await
  }

  async fn insert_email(&self, email: String, person_id: i64) -> Result<()> {
    self.insert_contact(Channel::Email, email, person_id).await
  }

  async fn delete_phone(&self, person_id: i64, pattern: String) -> Result<usize> {
    self.delete_contact(Channel::Phone, person_id, pattern).await
  }

  async fn delete_email(&self, person_id: i64, pattern: String) -> Result<usize> {
    self.delete_contact(Channel::Email, person_id, pattern).await
  }
}
