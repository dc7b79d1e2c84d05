//! Answer sets and persisted diary entries.

use std::ops::Index;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  date::EntryDate,
  prompt::{PROMPT_COUNT, PromptId},
};

// ─── AnswerSet ───────────────────────────────────────────────────────────────

/// The free-text responses for one day, index-aligned with
/// [`PROMPTS`](crate::prompt::PROMPTS).
///
/// The fixed-size array guarantees there is always exactly one answer per
/// prompt, both in memory and in the persisted form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet([String; PROMPT_COUNT]);

impl AnswerSet {
  /// One empty answer per prompt.
  pub fn blank() -> Self { Self::default() }

  pub fn new(answers: [String; PROMPT_COUNT]) -> Self { Self(answers) }

  pub fn get(&self, index: usize) -> Option<&str> {
    self.0.get(index).map(String::as_str)
  }

  pub fn answer(&self, id: PromptId) -> &str { &self.0[id.index()] }

  /// Replace the answer at `index`.
  pub fn set(&mut self, index: usize, text: impl Into<String>) -> Result<()> {
    let slot = self.0.get_mut(index).ok_or(Error::PromptIndex(index))?;
    *slot = text.into();
    Ok(())
  }

  pub fn iter(&self) -> impl Iterator<Item = &str> { self.0.iter().map(String::as_str) }

  /// A copy with surrounding whitespace removed from every answer.
  pub fn trimmed(&self) -> Self {
    Self(self.0.clone().map(|a| a.trim().to_owned()))
  }

  pub fn is_blank_at(&self, index: usize) -> bool {
    self.get(index).is_none_or(|a| a.trim().is_empty())
  }

  /// `true` when no answer has any non-whitespace content.
  pub fn is_all_blank(&self) -> bool { self.0.iter().all(|a| a.trim().is_empty()) }

  /// `true` when every answer has non-whitespace content.
  pub fn is_complete(&self) -> bool { self.first_blank().is_none() }

  pub fn first_blank(&self) -> Option<usize> {
    self.0.iter().position(|a| a.trim().is_empty())
  }
}

impl Index<usize> for AnswerSet {
  type Output = str;

  fn index(&self, index: usize) -> &str { &self.0[index] }
}

impl From<[String; PROMPT_COUNT]> for AnswerSet {
  fn from(answers: [String; PROMPT_COUNT]) -> Self { Self(answers) }
}

impl From<[&str; PROMPT_COUNT]> for AnswerSet {
  fn from(answers: [&str; PROMPT_COUNT]) -> Self { Self(answers.map(str::to_owned)) }
}

// ─── DiaryEntry ──────────────────────────────────────────────────────────────

/// One day's answers as held by the [`EntryStore`](crate::store::EntryStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiaryEntry {
  pub date:     EntryDate,
  pub answers:  AnswerSet,
  pub saved_at: DateTime<Utc>,
}
