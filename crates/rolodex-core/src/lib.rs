//! Core types and trait definitions for the Rolodex person directory.
//!
//! This crate is deliberately free of database and terminal dependencies.
//! The SQLite backend and the CLI depend on it; it depends on nothing of
//! theirs.

// Native `async fn` in traits; see `Directory`.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod person;
pub mod store;
pub mod validate;

pub use error::{Error, ErrorKind, Result};
