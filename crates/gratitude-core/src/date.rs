//! The calendar day an entry belongs to.

use std::{fmt, str::FromStr};

use chrono::{Datelike, Days, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::{Error, Result};

const KEY_FORMAT: &str = "%Y-%m-%d";

/// Abbreviated month names for the journal's locale (it-IT).
const MONTHS_SHORT: [&str; 12] = [
  "gen", "feb", "mar", "apr", "mag", "giu", "lug", "ago", "set", "ott", "nov", "dic",
];

/// A calendar day, the unique key of a diary entry.
///
/// Serialises as a zero-padded `YYYY-MM-DD` string, which is also the key
/// format of the persisted mapping. Ordering is chronological, and because the
/// key is zero padded it agrees with lexicographic ordering of the keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryDate(NaiveDate);

impl EntryDate {
  pub fn new(date: NaiveDate) -> Self { Self(date) }

  pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
    NaiveDate::from_ymd_opt(year, month, day).map(Self)
  }

  /// The current day on the local calendar.
  pub fn today() -> Self { Self(Local::now().date_naive()) }

  pub fn naive(&self) -> NaiveDate { self.0 }

  pub fn year(&self) -> i32 { self.0.year() }

  pub fn month(&self) -> u32 { self.0.month() }

  pub fn day(&self) -> u32 { self.0.day() }

  /// Move forwards (positive) or backwards (negative) by whole days.
  /// Returns `None` if the result falls outside chrono's range.
  pub fn shift_days(&self, delta: i64) -> Option<Self> {
    let days = Days::new(delta.unsigned_abs());
    let shifted = if delta >= 0 {
      self.0.checked_add_days(days)
    } else {
      self.0.checked_sub_days(days)
    };
    shifted.map(Self)
  }

  /// Human form used in titles and lists, e.g. `01 gen 2024`.
  pub fn format_long(&self) -> String {
    format!(
      "{:02} {} {}",
      self.0.day(),
      MONTHS_SHORT[self.0.month0() as usize],
      self.0.year()
    )
  }
}

impl fmt::Display for EntryDate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0.format(KEY_FORMAT))
  }
}

impl FromStr for EntryDate {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let bytes = s.as_bytes();
    // chrono alone accepts unpadded fields and signed years.
    let shaped = bytes.len() == 10
      && bytes[4] == b'-'
      && bytes[7] == b'-'
      && bytes
        .iter()
        .enumerate()
        .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shaped {
      return Err(Error::InvalidDate(s.to_owned()));
    }
    NaiveDate::parse_from_str(s, KEY_FORMAT)
      .map(Self)
      .map_err(|_| Error::InvalidDate(s.to_owned()))
  }
}

impl From<NaiveDate> for EntryDate {
  fn from(date: NaiveDate) -> Self { Self(date) }
}

impl Serialize for EntryDate {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for EntryDate {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(de::Error::custom)
  }
}
