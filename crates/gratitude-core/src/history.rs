//! Read-only projections over the diary for the history view.

use std::collections::BTreeSet;

use crate::{
  entry::DiaryEntry,
  store::{EntryStore, Slot},
};

/// Year/month restriction for [`history`].
///
/// Equivalent to a prefix match on the `YYYY-MM-DD` key. A month without a
/// year matches that month in every year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryFilter {
  pub year:  Option<i32>,
  pub month: Option<u32>,
}

impl HistoryFilter {
  pub fn year(year: i32) -> Self { Self { year: Some(year), month: None } }

  pub fn matches(&self, entry: &DiaryEntry) -> bool {
    self.year.is_none_or(|y| entry.date.year() == y)
      && self.month.is_none_or(|m| entry.date.month() == m)
  }

  pub fn is_empty(&self) -> bool { self.year.is_none() && self.month.is_none() }
}

/// Entries matching `filter`, newest first.
pub fn history<'a, S: Slot>(store: &'a EntryStore<S>, filter: &HistoryFilter) -> Vec<&'a DiaryEntry> {
  store.iter().rev().filter(|e| filter.matches(e)).collect()
}

/// Distinct years present in the diary, newest first.
pub fn available_years<S: Slot>(store: &EntryStore<S>) -> Vec<i32> {
  let years: BTreeSet<i32> = store.iter().map(|e| e.date.year()).collect();
  years.into_iter().rev().collect()
}

/// Distinct months (1–12) present in the diary, ascending. With `year` set,
/// only months that have an entry in that year.
pub fn available_months<S: Slot>(store: &EntryStore<S>, year: Option<i32>) -> Vec<u32> {
  let months: BTreeSet<u32> = store
    .iter()
    .filter(|e| year.is_none_or(|y| e.date.year() == y))
    .map(|e| e.date.month())
    .collect();
  months.into_iter().collect()
}
