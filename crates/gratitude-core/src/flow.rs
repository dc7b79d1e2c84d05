//! The authoring state machine.
//!
//! ```text
//! SelectDate ──start──▶ Answering(0) ──next──▶ … Answering(last) ──next──▶ Review
//!     ▲                      │                                              │
//!     └──────previous────────┘                         commit (all filled)  ▼
//!                                                                      Committed
//! ```
//!
//! Gating: `next` requires the current answer to be non-blank; `commit`
//! requires every answer to be non-blank. Rejected actions leave the flow
//! untouched.

use crate::{
  Error, Result,
  date::EntryDate,
  entry::{AnswerSet, DiaryEntry},
  prompt::{PROMPT_COUNT, PROMPTS, Prompt},
  store::{EntryStore, Slot},
};

const LAST_PROMPT: usize = PROMPT_COUNT - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
  SelectDate,
  /// Showing the prompt at this index.
  Answering(usize),
  Review,
  Committed,
}

/// View-state for writing one day's entry.
#[derive(Debug, Clone)]
pub struct PromptFlow {
  step:    Step,
  date:    EntryDate,
  answers: AnswerSet,
  saved:   bool,
}

impl PromptFlow {
  /// Start at [`Step::SelectDate`] with `date` selected and answers loaded
  /// from `store`.
  pub fn new<S: Slot>(date: EntryDate, store: &EntryStore<S>) -> Self {
    let mut flow = Self {
      step:    Step::SelectDate,
      date,
      answers: AnswerSet::blank(),
      saved:   false,
    };
    flow.load_from(store);
    flow
  }

  pub fn step(&self) -> Step { self.step }

  pub fn date(&self) -> EntryDate { self.date }

  pub fn answers(&self) -> &AnswerSet { &self.answers }

  /// Whether the selected date has an entry in the store.
  pub fn is_saved(&self) -> bool { self.saved }

  /// The prompt being answered, if any.
  pub fn current_prompt(&self) -> Option<&'static Prompt> {
    match self.step {
      Step::Answering(i) => PROMPTS.get(i),
      _ => None,
    }
  }

  /// The answer bound to the current prompt, if any.
  pub fn current_answer(&self) -> Option<&str> {
    match self.step {
      Step::Answering(i) => self.answers.get(i),
      _ => None,
    }
  }

  // ── SelectDate ────────────────────────────────────────────────────────────

  /// Pick the day to write about, loading its saved answers or blanks.
  pub fn select_date<S: Slot>(&mut self, date: EntryDate, store: &EntryStore<S>) -> Result<()> {
    self.expect(Step::SelectDate, "select a date")?;
    self.date = date;
    self.load_from(store);
    Ok(())
  }

  pub fn start(&mut self) -> Result<()> {
    self.expect(Step::SelectDate, "start answering")?;
    self.step = Step::Answering(0);
    Ok(())
  }

  // ── Answering ─────────────────────────────────────────────────────────────

  /// Replace the answer to the current prompt.
  pub fn set_answer(&mut self, text: impl Into<String>) -> Result<()> {
    let Step::Answering(i) = self.step else {
      return Err(self.invalid("edit the current answer"));
    };
    self.answers.set(i, text)
  }

  /// Whether [`next`](Self::next) would currently succeed.
  pub fn can_advance(&self) -> bool {
    matches!(self.step, Step::Answering(i) if !self.answers.is_blank_at(i))
  }

  /// Advance to the next prompt, or to [`Step::Review`] after the last one.
  pub fn next(&mut self) -> Result<Step> {
    let Step::Answering(i) = self.step else {
      return Err(self.invalid("advance"));
    };
    if self.answers.is_blank_at(i) {
      return Err(Error::BlankAnswer { index: i });
    }
    self.step = if i < LAST_PROMPT { Step::Answering(i + 1) } else { Step::Review };
    Ok(self.step)
  }

  /// Step back one prompt; from the first prompt, back to date selection.
  /// From [`Step::Review`], back to the last prompt.
  pub fn previous(&mut self) -> Result<Step> {
    self.step = match self.step {
      Step::Answering(0) => Step::SelectDate,
      Step::Answering(i) => Step::Answering(i - 1),
      Step::Review => Step::Answering(LAST_PROMPT),
      _ => return Err(self.invalid("go back")),
    };
    Ok(self.step)
  }

  // ── Review ────────────────────────────────────────────────────────────────

  /// Edit any answer in place.
  pub fn edit_answer(&mut self, index: usize, text: impl Into<String>) -> Result<()> {
    self.expect(Step::Review, "edit answers")?;
    self.answers.set(index, text)
  }

  pub fn can_commit(&self) -> bool { self.step == Step::Review && self.answers.is_complete() }

  /// Save the answers to `store` and move to [`Step::Committed`].
  pub fn commit<'s, S: Slot>(&mut self, store: &'s mut EntryStore<S>) -> Result<&'s DiaryEntry> {
    self.expect(Step::Review, "commit")?;
    if !self.answers.is_complete() {
      return Err(Error::IncompleteAnswers);
    }
    let entry = store
      .put(self.date, &self.answers)?
      .ok_or(Error::IncompleteAnswers)?;
    self.answers = entry.answers.clone();
    self.saved = true;
    self.step = Step::Committed;
    Ok(entry)
  }

  // ── Committed ─────────────────────────────────────────────────────────────

  /// Reopen the saved answers for editing.
  pub fn edit(&mut self) -> Result<()> {
    self.expect(Step::Committed, "edit")?;
    self.step = Step::Review;
    Ok(())
  }

  /// Begin a fresh diary: back to date selection with blank answers.
  pub fn restart(&mut self) -> Result<()> {
    self.expect(Step::Committed, "start over")?;
    self.step = Step::SelectDate;
    self.answers = AnswerSet::blank();
    self.saved = false;
    Ok(())
  }

  /// Return to date selection from anywhere, keeping the selected date.
  pub fn reset<S: Slot>(&mut self, store: &EntryStore<S>) {
    self.step = Step::SelectDate;
    self.load_from(store);
  }

  // ── History ───────────────────────────────────────────────────────────────

  /// Load a stored entry for editing, from any step.
  pub fn open_entry(&mut self, entry: &DiaryEntry) {
    self.date = entry.date;
    self.answers = entry.answers.clone();
    self.saved = true;
    self.step = Step::Review;
  }

  // ── Helpers ───────────────────────────────────────────────────────────────

  fn load_from<S: Slot>(&mut self, store: &EntryStore<S>) {
    match store.get(self.date) {
      Some(entry) => {
        self.answers = entry.answers.clone();
        self.saved = true;
      }
      None => {
        self.answers = AnswerSet::blank();
        self.saved = false;
      }
    }
  }

  fn expect(&self, step: Step, action: &'static str) -> Result<()> {
    if self.step == step { Ok(()) } else { Err(self.invalid(action)) }
  }

  fn invalid(&self, action: &'static str) -> Error {
    Error::InvalidTransition { step: self.step, action }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{prompt::PromptId, store::MemorySlot};

  fn date(s: &str) -> EntryDate { s.parse().unwrap() }

  fn fixture() -> (PromptFlow, EntryStore<MemorySlot>) {
    let store = EntryStore::load(MemorySlot::new());
    let flow = PromptFlow::new(date("2024-01-01"), &store);
    (flow, store)
  }

  fn answer_all(flow: &mut PromptFlow, answers: [&str; PROMPT_COUNT]) {
    flow.start().unwrap();
    for a in answers {
      flow.set_answer(a).unwrap();
      flow.next().unwrap();
    }
  }

  #[test]
  fn full_walk_commits_to_store() {
    let (mut flow, mut store) = fixture();
    answer_all(&mut flow, ["a", "b", "c", "d"]);
    assert_eq!(flow.step(), Step::Review);
    assert!(flow.can_commit());

    let entry = flow.commit(&mut store).unwrap().clone();
    assert_eq!(flow.step(), Step::Committed);
    assert!(flow.is_saved());
    assert_eq!(entry.answers, AnswerSet::from(["a", "b", "c", "d"]));
    assert_eq!(store.get(date("2024-01-01")), Some(&entry));
  }

  #[test]
  fn blank_answer_blocks_next() {
    let (mut flow, _) = fixture();
    flow.start().unwrap();
    assert_eq!(flow.current_prompt().map(|p| p.id), Some(PromptId::Gratitude));
    flow.set_answer("   ").unwrap();
    assert!(!flow.can_advance());
    assert!(matches!(flow.next(), Err(Error::BlankAnswer { index: 0 })));
    assert_eq!(flow.step(), Step::Answering(0));
  }

  #[test]
  fn previous_from_first_prompt_returns_to_date() {
    let (mut flow, _) = fixture();
    flow.start().unwrap();
    flow.set_answer("a").unwrap();
    flow.next().unwrap();
    assert_eq!(flow.previous().unwrap(), Step::Answering(0));
    assert_eq!(flow.previous().unwrap(), Step::SelectDate);
    assert_eq!(flow.answers()[0], *"a");
  }

  #[test]
  fn review_commit_requires_every_answer() {
    let (mut flow, mut store) = fixture();
    answer_all(&mut flow, ["a", "b", "c", "d"]);
    for i in 1..PROMPT_COUNT {
      flow.edit_answer(i, "").unwrap();
    }
    assert!(!flow.can_commit());
    assert!(matches!(flow.commit(&mut store), Err(Error::IncompleteAnswers)));
    assert_eq!(flow.step(), Step::Review);
    assert!(store.is_empty());
  }

  #[test]
  fn review_edits_are_saved_trimmed() {
    let (mut flow, mut store) = fixture();
    answer_all(&mut flow, ["a", "b", "c", "d"]);
    flow.edit_answer(2, "  changed\n").unwrap();
    flow.commit(&mut store).unwrap();
    assert_eq!(flow.answers()[2], *"changed");
    assert_eq!(store.get(date("2024-01-01")).unwrap().answers[2], *"changed");
  }

  #[test]
  fn review_previous_returns_to_last_prompt() {
    let (mut flow, _) = fixture();
    answer_all(&mut flow, ["a", "b", "c", "d"]);
    assert_eq!(flow.previous().unwrap(), Step::Answering(PROMPT_COUNT - 1));
  }

  #[test]
  fn selecting_a_saved_date_loads_its_answers() {
    let (_, mut store) = fixture();
    store.put(date("2024-02-02"), &AnswerSet::from(["w", "x", "y", "z"])).unwrap();

    let mut flow = PromptFlow::new(date("2024-01-01"), &store);
    assert!(!flow.is_saved());
    flow.select_date(date("2024-02-02"), &store).unwrap();
    assert!(flow.is_saved());
    assert_eq!(flow.answers(), &AnswerSet::from(["w", "x", "y", "z"]));

    flow.select_date(date("2024-02-03"), &store).unwrap();
    assert!(!flow.is_saved());
    assert!(flow.answers().is_all_blank());
  }

  #[test]
  fn actions_outside_their_step_are_rejected() {
    let (mut flow, mut store) = fixture();
    assert!(matches!(flow.next(), Err(Error::InvalidTransition { step: Step::SelectDate, .. })));
    assert!(flow.set_answer("x").is_err());
    assert!(flow.commit(&mut store).is_err());
    assert!(flow.edit().is_err());
    flow.start().unwrap();
    assert!(flow.select_date(date("2024-05-05"), &store).is_err());
    assert_eq!(flow.date(), date("2024-01-01"));
  }

  #[test]
  fn committed_can_edit_or_restart() {
    let (mut flow, mut store) = fixture();
    answer_all(&mut flow, ["a", "b", "c", "d"]);
    flow.commit(&mut store).unwrap();

    flow.edit().unwrap();
    assert_eq!(flow.step(), Step::Review);
    flow.commit(&mut store).unwrap();

    flow.restart().unwrap();
    assert_eq!(flow.step(), Step::SelectDate);
    assert!(flow.answers().is_all_blank());
    assert_eq!(flow.date(), date("2024-01-01"));
  }

  #[test]
  fn open_entry_jumps_to_review() {
    let (mut flow, mut store) = fixture();
    store.put(date("2023-06-01"), &AnswerSet::from(["w", "x", "y", "z"])).unwrap();
    let entry = store.get(date("2023-06-01")).cloned().unwrap();

    flow.start().unwrap();
    flow.open_entry(&entry);
    assert_eq!(flow.step(), Step::Review);
    assert_eq!(flow.date(), date("2023-06-01"));
    assert!(flow.is_saved());
    assert!(flow.can_commit());
  }
}
