//! Error types for `gratitude-core`.

use thiserror::Error;

use crate::flow::Step;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid date {0:?}: expected YYYY-MM-DD")]
  InvalidDate(String),

  #[error("prompt index {0} is out of range")]
  PromptIndex(usize),

  #[error("cannot {action} while in {step:?}")]
  InvalidTransition { step: Step, action: &'static str },

  #[error("answer {index} is blank")]
  BlankAnswer { index: usize },

  #[error("every answer must be filled in before saving")]
  IncompleteAnswers,

  #[error("storage slot error: {0}")]
  Slot(#[source] BoxError),

  #[error("rendering failed: {0}")]
  Render(#[source] BoxError),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

impl Error {
  pub(crate) fn slot(err: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Slot(Box::new(err))
  }

  pub(crate) fn render(err: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Render(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
