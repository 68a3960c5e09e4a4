//! SQL schema for the Rolodex SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS person (
    person_id     INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name    TEXT NOT NULL CHECK (first_name <> ''),
    last_name     TEXT NOT NULL CHECK (last_name <> ''),
    patronymic    TEXT,
    date_of_birth TEXT NOT NULL    -- YYYY-MM-DD
);

CREATE TABLE IF NOT EXISTS phone_number (
    number    TEXT    NOT NULL CHECK (number <> ''),
    person_id INTEGER NOT NULL REFERENCES person(person_id),
    PRIMARY KEY (number, person_id)
);

CREATE TABLE IF NOT EXISTS email_address (
    email     TEXT    NOT NULL CHECK (email <> ''),
    person_id INTEGER NOT NULL REFERENCES person(person_id),
    PRIMARY KEY (email, person_id)
);

-- date('now') is not allowed in a CHECK constraint.
CREATE TRIGGER IF NOT EXISTS person_dob_insert
BEFORE INSERT ON person
WHEN NEW.date_of_birth > date('now')
BEGIN
    SELECT RAISE(ABORT, 'date_of_birth is later than the current date');
END;

CREATE TRIGGER IF NOT EXISTS person_dob_update
BEFORE UPDATE OF date_of_birth ON person
WHEN NEW.date_of_birth > date('now')
BEGIN
    SELECT RAISE(ABORT, 'date_of_birth is later than the current date');
END;

CREATE INDEX IF NOT EXISTS phone_number_person_idx  ON phone_number(person_id);
CREATE INDEX IF NOT EXISTS email_address_person_idx ON email_address(person_id);

PRAGMA user_version = 1;
";
