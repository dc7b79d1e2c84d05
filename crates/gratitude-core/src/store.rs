//! The [`Slot`] trait and the [`EntryStore`] built on top of it.
//!
//! A slot is a single named value in some key-value storage area. The store
//! keeps the whole diary in memory and rewrites the slot in full after every
//! mutation; there is no incremental persistence.

use std::collections::BTreeMap;

use chrono::{DateTime, SubsecRound as _, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
  Error, Result,
  date::EntryDate,
  entry::{AnswerSet, DiaryEntry},
};

/// Name of the slot the diary lives in unless configured otherwise.
pub const DEFAULT_SLOT: &str = "gratitudeDiaryV1";

// ─── Slot ────────────────────────────────────────────────────────────────────

/// A single named value in a persistent key-value storage area.
///
/// Implemented by storage backends (e.g. `gratitude-store-sqlite`).
pub trait Slot {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Return the stored value, or `None` if the slot has never been written.
  fn read(&self) -> Result<Option<String>, Self::Error>;

  /// Replace the stored value.
  fn write(&mut self, value: &str) -> Result<(), Self::Error>;
}

#[derive(Debug, Error)]
pub enum MemorySlotError {
  #[error("slot is read-only")]
  ReadOnly,
}

/// An in-process slot. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
  value:     Option<String>,
  read_only: bool,
}

impl MemorySlot {
  pub fn new() -> Self { Self::default() }

  /// A slot that already holds `value`.
  pub fn with_value(value: impl Into<String>) -> Self {
    Self { value: Some(value.into()), read_only: false }
  }

  /// Reject every subsequent write with [`MemorySlotError::ReadOnly`].
  pub fn set_read_only(&mut self, read_only: bool) { self.read_only = read_only; }

  pub fn value(&self) -> Option<&str> { self.value.as_deref() }
}

impl Slot for MemorySlot {
  type Error = MemorySlotError;

  fn read(&self) -> Result<Option<String>, MemorySlotError> { Ok(self.value.clone()) }

  fn write(&mut self, value: &str) -> Result<(), MemorySlotError> {
    if self.read_only {
      return Err(MemorySlotError::ReadOnly);
    }
    self.value = Some(value.to_owned());
    Ok(())
  }
}

// ─── Persisted form ──────────────────────────────────────────────────────────

/// One value of the persisted mapping: `{"answers": [..], "savedAt": ms}`.
#[derive(Serialize, Deserialize)]
struct StoredEntry {
  answers:  AnswerSet,
  #[serde(rename = "savedAt", with = "chrono::serde::ts_milliseconds")]
  saved_at: DateTime<Utc>,
}

/// The current time at the millisecond resolution of the persisted form,
/// rounded up so it is never earlier than the moment of the call.
fn saved_now() -> DateTime<Utc> {
  let now = Utc::now();
  let truncated = now.trunc_subsecs(3);
  if truncated < now { truncated + TimeDelta::milliseconds(1) } else { truncated }
}

fn encode(entries: &BTreeMap<EntryDate, DiaryEntry>) -> Result<String> {
  let snapshot: BTreeMap<&EntryDate, StoredEntry> = entries
    .iter()
    .map(|(date, e)| {
      (date, StoredEntry { answers: e.answers.clone(), saved_at: e.saved_at })
    })
    .collect();
  Ok(serde_json::to_string(&snapshot)?)
}

fn decode(raw: &str) -> Result<BTreeMap<EntryDate, DiaryEntry>> {
  let snapshot: BTreeMap<EntryDate, StoredEntry> = serde_json::from_str(raw)?;
  Ok(
    snapshot
      .into_iter()
      .map(|(date, s)| {
        (date, DiaryEntry { date, answers: s.answers, saved_at: s.saved_at })
      })
      .collect(),
  )
}

// ─── EntryStore ──────────────────────────────────────────────────────────────

/// The diary: one [`DiaryEntry`] per date, backed by a [`Slot`].
#[derive(Debug)]
pub struct EntryStore<S: Slot> {
  slot:    S,
  entries: BTreeMap<EntryDate, DiaryEntry>,
}

impl<S: Slot> EntryStore<S> {
  /// Load the diary from `slot`.
  ///
  /// Never fails: a missing, unreadable or undecodable slot yields an empty
  /// diary. The bad value is left in place until the next successful `put`
  /// overwrites it.
  pub fn load(slot: S) -> Self {
    let entries = match slot.read() {
      Ok(Some(raw)) => match decode(&raw) {
        Ok(entries) => {
          debug!(count = entries.len(), "loaded diary");
          entries
        }
        Err(error) => {
          warn!(%error, "discarding undecodable diary data");
          BTreeMap::new()
        }
      },
      Ok(None) => {
        debug!("no diary data yet");
        BTreeMap::new()
      }
      Err(error) => {
        warn!(%error, "diary slot unreadable, starting empty");
        BTreeMap::new()
      }
    };
    Self { slot, entries }
  }

  pub fn get(&self, date: EntryDate) -> Option<&DiaryEntry> { self.entries.get(&date) }

  pub fn contains(&self, date: EntryDate) -> bool { self.entries.contains_key(&date) }

  /// Save the answers for `date`, replacing any previous entry.
  ///
  /// Answers are trimmed first. If every answer is blank nothing is written
  /// and `Ok(None)` is returned. When the slot write fails the in-memory
  /// diary is rolled back so it keeps matching what is persisted.
  pub fn put(&mut self, date: EntryDate, answers: &AnswerSet) -> Result<Option<&DiaryEntry>> {
    let answers = answers.trimmed();
    if answers.is_all_blank() {
      debug!(%date, "ignoring blank answers");
      return Ok(None);
    }

    let saved_at = saved_now();
    let previous = self
      .entries
      .insert(date, DiaryEntry { date, answers, saved_at });

    if let Err(error) = self.persist() {
      match previous {
        Some(entry) => self.entries.insert(date, entry),
        None => self.entries.remove(&date),
      };
      return Err(error);
    }

    debug!(%date, "saved entry");
    Ok(self.entries.get(&date))
  }

  /// All entries, newest date first.
  pub fn list(&self) -> Vec<&DiaryEntry> { self.entries.values().rev().collect() }

  /// All entries in ascending date order.
  pub fn iter(&self) -> impl DoubleEndedIterator<Item = &DiaryEntry> { self.entries.values() }

  pub fn len(&self) -> usize { self.entries.len() }

  pub fn is_empty(&self) -> bool { self.entries.is_empty() }

  pub fn slot(&self) -> &S { &self.slot }

  fn persist(&mut self) -> Result<()> {
    let raw = encode(&self.entries)?;
    self.slot.write(&raw).map_err(Error::slot)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(s: &str) -> EntryDate { s.parse().unwrap() }

  fn empty() -> EntryStore<MemorySlot> { EntryStore::load(MemorySlot::new()) }

  #[test]
  fn put_then_get_returns_trimmed_answers() {
    let mut store = empty();
    let before = Utc::now();

    let saved = store
      .put(date("2024-01-01"), &AnswerSet::from([" a ", "b\n", "c", "  d"]))
      .unwrap()
      .cloned()
      .expect("entry saved");
    assert_eq!(saved.answers, AnswerSet::from(["a", "b", "c", "d"]));

    let got = store.get(date("2024-01-01")).unwrap();
    assert_eq!(got, &saved);
    assert!(got.saved_at >= before);
  }

  #[test]
  fn saved_at_is_never_before_the_call_and_survives_reload() {
    let mut store = empty();
    for _ in 0..200 {
      let before = Utc::now();
      let saved_at = store
        .put(date("2024-01-01"), &AnswerSet::from(["a", "b", "c", "d"]))
        .unwrap()
        .unwrap()
        .saved_at;
      assert!(saved_at >= before, "saved_at {saved_at} earlier than {before}");
      assert_eq!(saved_at.timestamp_subsec_nanos() % 1_000_000, 0);
    }

    let saved = store.get(date("2024-01-01")).cloned().unwrap();
    let reloaded = EntryStore::load(store.slot().clone());
    assert_eq!(reloaded.get(date("2024-01-01")), Some(&saved));
  }

  #[test]
  fn all_blank_put_is_a_no_op() {
    let mut store = empty();
    let result = store
      .put(date("2024-01-01"), &AnswerSet::from(["", " ", "\n", "\t"]))
      .unwrap();
    assert!(result.is_none());
    assert!(store.is_empty());
    assert!(store.slot().value().is_none(), "nothing written");
  }

  #[test]
  fn partial_answers_are_persisted_by_the_store() {
    let mut store = empty();
    store
      .put(date("2024-01-01"), &AnswerSet::from(["a", "", "", ""]))
      .unwrap()
      .expect("partial set saved");
    assert_eq!(store.len(), 1);
  }

  #[test]
  fn put_overwrites_existing_date() {
    let mut store = empty();
    store.put(date("2024-01-01"), &AnswerSet::from(["a", "b", "c", "d"])).unwrap();
    store.put(date("2024-01-01"), &AnswerSet::from(["w", "x", "y", "z"])).unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(
      store.get(date("2024-01-01")).unwrap().answers,
      AnswerSet::from(["w", "x", "y", "z"])
    );
  }

  #[test]
  fn single_put_lists_one_entry() {
    let mut store = empty();
    store.put(date("2024-01-01"), &AnswerSet::from(["a", "b", "c", "d"])).unwrap();
    let list = store.list();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].date, date("2024-01-01"));
    assert_eq!(list[0].answers, AnswerSet::from(["a", "b", "c", "d"]));
  }

  #[test]
  fn list_is_newest_first() {
    let mut store = empty();
    for d in ["2024-01-02", "2023-12-31", "2024-02-10"] {
      store.put(date(d), &AnswerSet::from(["a", "b", "c", "d"])).unwrap();
    }
    let dates: Vec<String> = store.list().iter().map(|e| e.date.to_string()).collect();
    assert_eq!(dates, ["2024-02-10", "2024-01-02", "2023-12-31"]);
  }

  #[test]
  fn reload_round_trips_through_the_slot() {
    let mut store = empty();
    store
      .put(date("2024-03-05"), &AnswerSet::from(["uno\ndue", "b", "c", "d"]))
      .unwrap();
    let original = store.get(date("2024-03-05")).cloned().unwrap();

    let reloaded = EntryStore::load(store.slot().clone());
    assert_eq!(reloaded.get(date("2024-03-05")), Some(&original));
  }

  #[test]
  fn persisted_layout_matches_the_documented_shape() {
    let raw = r#"{"2024-01-01":{"answers":["a","b","c","d"],"savedAt":1704067200000}}"#;
    let store = EntryStore::load(MemorySlot::with_value(raw));
    let entry = store.get(date("2024-01-01")).unwrap();
    assert_eq!(entry.saved_at.timestamp_millis(), 1_704_067_200_000);
    assert_eq!(entry.answers, AnswerSet::from(["a", "b", "c", "d"]));
  }

  #[test]
  fn corrupt_or_missing_data_loads_empty() {
    for raw in [
      "not json",
      "[]",
      r#"{"2024-13-01":{"answers":["a","b","c","d"],"savedAt":0}}"#,
      r#"{"2024-01-01":{"answers":["a","b"],"savedAt":0}}"#,
    ] {
      let store = EntryStore::load(MemorySlot::with_value(raw));
      assert!(store.is_empty(), "{raw:?} should load empty");
    }
    assert!(empty().is_empty());
  }

  #[test]
  fn failed_write_rolls_back_memory() {
    let mut store = empty();
    store.put(date("2024-01-01"), &AnswerSet::from(["a", "b", "c", "d"])).unwrap();

    let mut slot = store.slot().clone();
    slot.set_read_only(true);
    let mut store = EntryStore::load(slot);

    let err = store
      .put(date("2024-01-01"), &AnswerSet::from(["w", "x", "y", "z"]))
      .unwrap_err();
    assert!(matches!(err, Error::Slot(_)));
    assert_eq!(
      store.get(date("2024-01-01")).unwrap().answers,
      AnswerSet::from(["a", "b", "c", "d"])
    );

    assert!(store.put(date("2024-01-02"), &AnswerSet::from(["a", "b", "c", "d"])).is_err());
    assert!(!store.contains(date("2024-01-02")));
  }
}
