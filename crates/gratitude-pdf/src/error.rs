//! Error type for `gratitude-pdf`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("pdf error: {0}")]
  Pdf(#[from] printpdf::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
