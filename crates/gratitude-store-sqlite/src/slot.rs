//! [`SqliteSlot`] — the SQLite implementation of [`Slot`].

use std::path::Path;

use chrono::Utc;
use gratitude_core::store::Slot;
use rusqlite::{Connection, OptionalExtension as _};
use tracing::debug;

use crate::{Error, Result, schema::SCHEMA};

// ─── Slot ────────────────────────────────────────────────────────────────────

/// One named slot in a SQLite file.
///
/// Several slots may share a database; each handle reads and writes only the
/// row named at construction.
pub struct SqliteSlot {
  conn: Connection,
  name: String,
}

impl SqliteSlot {
  /// Open (or create) the database at `path` and bind to slot `name`.
  pub fn open(path: impl AsRef<Path>, name: impl Into<String>) -> Result<Self> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }
    debug!(path = %path.display(), "opening slot database");
    Self::init(Connection::open(path)?, name.into())
  }

  /// Open an in-memory database.
  pub fn open_in_memory(name: impl Into<String>) -> Result<Self> {
    Self::init(Connection::open_in_memory()?, name.into())
  }

  fn init(conn: Connection, name: String) -> Result<Self> {
    if name.is_empty() {
      return Err(Error::EmptySlotName);
    }
    conn.execute_batch(SCHEMA)?;
    Ok(Self { conn, name })
  }

  pub fn name(&self) -> &str { &self.name }
}

impl Slot for SqliteSlot {
  type Error = Error;

  fn read(&self) -> Result<Option<String>> {
    let value = self
      .conn
      .query_row(
        "SELECT value FROM slots WHERE name = ?1",
        rusqlite::params![self.name],
        |r| r.get(0),
      )
      .optional()?;
    Ok(value)
  }

  fn write(&mut self, value: &str) -> Result<()> {
    let updated_at = Utc::now().to_rfc3339();
    self.conn.execute(
      "INSERT INTO slots (name, value, updated_at) VALUES (?1, ?2, ?3)
       ON CONFLICT(name) DO UPDATE SET value = excluded.value,
                                       updated_at = excluded.updated_at",
      rusqlite::params![self.name, value, updated_at],
    )?;
    debug!(slot = %self.name, bytes = value.len(), "wrote slot");
    Ok(())
  }
}
