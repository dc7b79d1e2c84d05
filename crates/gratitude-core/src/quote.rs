//! Quote of the day shown above the date picker.

use chrono::Datelike as _;

use crate::date::EntryDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
  pub text:   &'static str,
  pub author: Option<&'static str>,
}

pub const QUOTES: &[Quote] = &[
  Quote {
    text:   "La gratitudine è la memoria del cuore.",
    author: Some("Jean-Baptiste Massieu"),
  },
  Quote {
    text:   "Non è la felicità a renderci grati, è la gratitudine a renderci felici.",
    author: Some("David Steindl-Rast"),
  },
  Quote {
    text:   "Non tutti i giorni sono buoni, ma c'è qualcosa di buono in ogni giorno.",
    author: None,
  },
  Quote {
    text:   "Il segreto per andare avanti è iniziare.",
    author: Some("Mark Twain"),
  },
  Quote {
    text:   "Le piccole cose fanno la differenza, per chi sa vederle.",
    author: None,
  },
];

/// The quote for `date`; the same day always gets the same quote.
pub fn for_date(date: EntryDate) -> &'static Quote {
  let day = date.naive().num_days_from_ce();
  &QUOTES[day.rem_euclid(QUOTES.len() as i32) as usize]
}
