//! SQLite backend for the gratitude journal.
//!
//! Provides a key-value storage area of named slots; the diary occupies one
//! of them. Access is synchronous through [`rusqlite`].

mod schema;
mod slot;

pub mod error;

pub use error::{Error, Result};
pub use slot::SqliteSlot;
