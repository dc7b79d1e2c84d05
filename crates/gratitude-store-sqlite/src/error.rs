//! Error type for `gratitude-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] rusqlite::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("slot name must not be empty")]
  EmptySlotName,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
