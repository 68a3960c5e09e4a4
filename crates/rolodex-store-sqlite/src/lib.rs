//! SQLite backend for the Rolodex person directory.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on the connection's
//! own thread without blocking the async runtime. Every call is serialised
//! on that one connection.

mod encode;
mod schema;
mod store;

pub mod error;
pub mod query;

pub use error::{Error, Result};
pub use store::SqliteDirectory;
