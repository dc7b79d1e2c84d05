//! Application state and key dispatch.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use gratitude_core::{
  DiaryEntry, EntryDate, EntryStore, Error, PROMPT_COUNT, PROMPTS, PromptFlow, Slot, Step,
  document::Document,
  history::{HistoryFilter, available_months, available_years, history},
};

use crate::export::Exporter;

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  /// Writing an entry; what is shown follows [`PromptFlow::step`].
  Compose,
  /// Browsing saved entries.
  History,
}

// ─── Status line ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
  Info,
  Success,
  Error,
}

/// A one-line notification, dismissed by the next key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
  pub kind: StatusKind,
  pub text: String,
}

impl Status {
  fn info(text: impl Into<String>) -> Self { Self { kind: StatusKind::Info, text: text.into() } }

  fn success(text: impl Into<String>) -> Self {
    Self { kind: StatusKind::Success, text: text.into() }
  }

  fn error(text: impl Into<String>) -> Self { Self { kind: StatusKind::Error, text: text.into() } }
}

// ─── History view state ───────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct HistoryView {
  pub filter:       HistoryFilter,
  /// Fuzzy text filter applied on top of the year/month filter.
  pub query:        String,
  /// Whether the user is typing into `query`.
  pub query_active: bool,
  /// Cursor position within the filtered list.
  pub cursor:       usize,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App<S: Slot> {
  pub screen:        Screen,
  pub store:         EntryStore<S>,
  pub flow:          PromptFlow,
  /// Owner of the diary, shown in the header.
  pub name:          Option<String>,
  /// Focused answer on the review step.
  pub review_cursor: usize,
  pub history:       HistoryView,
  pub status:        Option<Status>,
  pub exporter:      Exporter,
}

impl<S: Slot> App<S> {
  /// Start on today's date.
  pub fn new(store: EntryStore<S>, exporter: Exporter, name: Option<String>) -> Self {
    let flow = PromptFlow::new(EntryDate::today(), &store);
    Self {
      screen: Screen::Compose,
      store,
      flow,
      name,
      review_cursor: 0,
      history: HistoryView::default(),
      status: None,
      exporter,
    }
  }

  /// Surface any finished background exports.
  pub fn poll_exports(&mut self) {
    while let Some(outcome) = self.exporter.try_recv() {
      self.status = Some(match outcome {
        Ok(path) => Status::success(format!("Esportato in {}", path.display())),
        Err(e) => Status::error(format!("Esportazione non riuscita: {e}")),
      });
    }
  }

  // ── History projection ────────────────────────────────────────────────────

  /// Entries passing the year/month filter and the fuzzy query, newest first.
  pub fn filtered_entries(&self) -> Vec<&DiaryEntry> {
    let entries = history(&self.store, &self.history.filter);
    if self.history.query.is_empty() {
      return entries;
    }
    let matcher = SkimMatcherV2::default();
    entries
      .into_iter()
      .filter(|e| {
        let haystack = format!(
          "{} {}",
          e.date.format_long(),
          e.answers.iter().collect::<Vec<_>>().join(" ")
        );
        matcher.fuzzy_match(&haystack, &self.history.query).is_some()
      })
      .collect()
  }

  /// The entry under the history cursor, if any.
  pub fn cursor_entry(&self) -> Option<&DiaryEntry> {
    self.filtered_entries().get(self.history.cursor).copied()
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
      return false;
    }
    self.status = None;

    match self.screen {
      Screen::History if self.history.query_active => {
        self.handle_query_key(key);
        true
      }
      Screen::History => self.handle_history_key(key),
      Screen::Compose => match self.flow.step() {
        Step::SelectDate => self.handle_date_key(key),
        Step::Answering(_) => {
          self.handle_answer_key(key);
          true
        }
        Step::Review => {
          self.handle_review_key(key);
          true
        }
        Step::Committed => self.handle_committed_key(key),
      },
    }
  }

  fn handle_date_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Char('q') => return false,
      KeyCode::Left => self.shift_date(-1),
      KeyCode::Right => self.shift_date(1),
      KeyCode::Up => self.shift_date(-7),
      KeyCode::Down => self.shift_date(7),
      KeyCode::Char('t') => self.select_date(EntryDate::today()),
      KeyCode::Char('h') => self.open_history(),
      KeyCode::Enter => {
        if let Err(e) = self.flow.start() {
          self.report(e);
        }
      }
      _ => {}
    }
    true
  }

  fn handle_answer_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Tab => match self.flow.next() {
        Ok(Step::Review) => self.review_cursor = 0,
        Ok(_) => {}
        Err(Error::BlankAnswer { .. }) => {
          self.status = Some(Status::info("Scrivi una risposta prima di andare avanti."));
        }
        Err(e) => self.report(e),
      },
      KeyCode::BackTab | KeyCode::Esc => {
        if let Err(e) = self.flow.previous() {
          self.report(e);
        }
      }
      _ => self.edit_text(key),
    }
  }

  fn handle_review_key(&mut self, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
      KeyCode::Char('s') if ctrl => self.commit(),
      KeyCode::Up | KeyCode::BackTab => {
        self.review_cursor = self.review_cursor.saturating_sub(1);
      }
      KeyCode::Down | KeyCode::Tab => {
        self.review_cursor = (self.review_cursor + 1).min(PROMPT_COUNT - 1);
      }
      KeyCode::Esc => {
        if let Err(e) = self.flow.previous() {
          self.report(e);
        }
      }
      _ => self.edit_text(key),
    }
  }

  fn handle_committed_key(&mut self, key: KeyEvent) -> bool {
    let result = match key.code {
      KeyCode::Char('q') => return false,
      KeyCode::Char('h') => {
        self.open_history();
        Ok(())
      }
      KeyCode::Char('e') => {
        self.export(Document::for_entry(self.flow.date(), &PROMPTS, self.flow.answers()));
        Ok(())
      }
      KeyCode::Char('m') => self.flow.edit(),
      KeyCode::Char('n') => self.flow.restart(),
      _ => Ok(()),
    };
    if let Err(e) = result {
      self.report(e);
    }
    true
  }

  fn handle_history_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Char('q') => return false,
      KeyCode::Esc => {
        self.flow.reset(&self.store);
        self.screen = Screen::Compose;
      }
      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.filtered_entries().len();
        if self.history.cursor + 1 < len {
          self.history.cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.history.cursor = self.history.cursor.saturating_sub(1);
      }
      KeyCode::Char('y') => {
        let years = available_years(&self.store);
        self.history.filter.year = cycle(self.history.filter.year, &years);
        // Drop a month the new year has no entries for.
        if let Some(month) = self.history.filter.month
          && !available_months(&self.store, self.history.filter.year).contains(&month)
        {
          self.history.filter.month = None;
        }
        self.history.cursor = 0;
      }
      KeyCode::Char('m') => {
        let months = available_months(&self.store, self.history.filter.year);
        self.history.filter.month = cycle(self.history.filter.month, &months);
        self.history.cursor = 0;
      }
      KeyCode::Char('c') => {
        self.history.filter = HistoryFilter::default();
        self.history.query.clear();
        self.history.cursor = 0;
      }
      KeyCode::Char('/') => {
        self.history.query_active = true;
        self.history.query.clear();
        self.history.cursor = 0;
      }
      KeyCode::Enter => {
        if let Some(entry) = self.cursor_entry().cloned() {
          self.flow.open_entry(&entry);
          self.review_cursor = 0;
          self.screen = Screen::Compose;
        }
      }
      KeyCode::Char('e') => {
        let doc = self
          .cursor_entry()
          .map(|entry| Document::for_entry(entry.date, &PROMPTS, &entry.answers));
        if let Some(doc) = doc {
          self.export(doc);
        }
      }
      KeyCode::Char('E') => {
        let doc = Document::for_history(&self.filtered_entries());
        self.export(doc);
      }
      _ => {}
    }
    true
  }

  fn handle_query_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.history.query_active = false;
        self.history.query.clear();
      }
      KeyCode::Enter => self.history.query_active = false,
      KeyCode::Backspace => {
        self.history.query.pop();
      }
      KeyCode::Char(c) => self.history.query.push(c),
      _ => {}
    }
    self.history.cursor = 0;
  }

  // ── Actions ───────────────────────────────────────────────────────────────

  fn shift_date(&mut self, days: i64) {
    if let Some(date) = self.flow.date().shift_days(days) {
      self.select_date(date);
    }
  }

  fn select_date(&mut self, date: EntryDate) {
    if let Err(e) = self.flow.select_date(date, &self.store) {
      self.report(e);
    }
  }

  fn open_history(&mut self) {
    self.screen = Screen::History;
    self.history.cursor = 0;
    self.history.query_active = false;
  }

  /// Apply a typing key to the answer currently being edited.
  fn edit_text(&mut self, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
      return;
    }
    let index = match self.flow.step() {
      Step::Answering(i) => i,
      Step::Review => self.review_cursor,
      _ => return,
    };
    let mut text = self.flow.answers()[index].to_owned();
    match key.code {
      KeyCode::Char(c) => text.push(c),
      KeyCode::Enter => text.push('\n'),
      KeyCode::Backspace => {
        text.pop();
      }
      _ => return,
    }
    let result = match self.flow.step() {
      Step::Review => self.flow.edit_answer(index, text),
      _ => self.flow.set_answer(text),
    };
    if let Err(e) = result {
      self.report(e);
    }
  }

  fn commit(&mut self) {
    match self.flow.commit(&mut self.store) {
      Ok(entry) => {
        let text = format!("Risposte registrate per {}.", entry.date.format_long());
        self.status = Some(Status::success(text));
      }
      Err(Error::IncompleteAnswers) => {
        self.status = Some(Status::info("Compila tutte le risposte prima di registrare."));
      }
      Err(e) => self.report(e),
    }
  }

  fn export(&mut self, document: Document) {
    self.status = Some(Status::info(format!(
      "Esportazione di {} in {}…",
      document.file_stem,
      self.exporter.dir().display()
    )));
    self.exporter.spawn(document);
  }

  fn report(&mut self, error: impl std::fmt::Display) {
    tracing::warn!(%error, "action failed");
    self.status = Some(Status::error(format!("Errore: {error}")));
  }
}

/// Step through `choices`, wrapping back to "no filter" after the last one.
fn cycle<T: Copy + PartialEq>(current: Option<T>, choices: &[T]) -> Option<T> {
  match current {
    None => choices.first().copied(),
    Some(c) => choices
      .iter()
      .position(|x| *x == c)
      .and_then(|i| choices.get(i + 1))
      .copied(),
  }
}

#[cfg(test)]
mod tests {
  use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
  };

  use gratitude_core::{AnswerSet, MemorySlot};

  use super::*;
  use crate::export::ExportFormat;

  fn app_with(slot: MemorySlot) -> App<MemorySlot> {
    let exporter = Exporter::new(PathBuf::from("unused"), ExportFormat::Txt);
    App::new(EntryStore::load(slot), exporter, None)
  }

  fn app() -> App<MemorySlot> { app_with(MemorySlot::new()) }

  fn app_exporting_to(dir: &Path) -> App<MemorySlot> {
    let exporter = Exporter::new(dir.to_path_buf(), ExportFormat::Txt);
    App::new(EntryStore::load(MemorySlot::new()), exporter, None)
  }

  /// Drain the exporter until a finished export replaces the "in progress"
  /// notice.
  async fn finished_export(app: &mut App<MemorySlot>) -> Status {
    for _ in 0..500 {
      app.poll_exports();
      if let Some(status) = &app.status
        && status.kind != StatusKind::Info
      {
        return status.clone();
      }
      tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("export never finished");
  }

  fn key(code: KeyCode) -> KeyEvent { KeyEvent::new(code, KeyModifiers::NONE) }

  fn ctrl(c: char) -> KeyEvent { KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL) }

  fn press(app: &mut App<MemorySlot>, code: KeyCode) -> bool { app.handle_key(key(code)) }

  fn type_text(app: &mut App<MemorySlot>, text: &str) {
    for c in text.chars() {
      let code = if c == '\n' { KeyCode::Enter } else { KeyCode::Char(c) };
      press(app, code);
    }
  }

  fn answer_everything(app: &mut App<MemorySlot>) {
    press(app, KeyCode::Enter);
    for text in ["uno", "due\ntre", "quattro", "cinque"] {
      type_text(app, text);
      press(app, KeyCode::Tab);
    }
  }

  #[test]
  fn keyboard_walkthrough_saves_todays_entry() {
    let mut app = app();
    answer_everything(&mut app);
    assert_eq!(app.flow.step(), Step::Review);

    app.handle_key(ctrl('s'));
    assert_eq!(app.flow.step(), Step::Committed);
    assert_eq!(app.status.as_ref().unwrap().kind, StatusKind::Success);

    let saved = app.store.get(EntryDate::today()).unwrap();
    assert_eq!(saved.answers, AnswerSet::from(["uno", "due\ntre", "quattro", "cinque"]));
  }

  #[test]
  fn tab_on_blank_answer_stays_put() {
    let mut app = app();
    press(&mut app, KeyCode::Enter);
    type_text(&mut app, "  ");
    press(&mut app, KeyCode::Tab);
    assert_eq!(app.flow.step(), Step::Answering(0));
    assert_eq!(app.status.as_ref().unwrap().kind, StatusKind::Info);
  }

  #[test]
  fn letters_are_text_while_answering() {
    let mut app = app();
    press(&mut app, KeyCode::Enter);
    assert!(press(&mut app, KeyCode::Char('q')));
    press(&mut app, KeyCode::Char('x'));
    press(&mut app, KeyCode::Backspace);
    assert_eq!(app.flow.current_answer(), Some("q"));
  }

  #[test]
  fn review_rejects_commit_with_a_cleared_answer() {
    let mut app = app();
    answer_everything(&mut app);
    press(&mut app, KeyCode::Down);
    for _ in 0.."due\ntre".len() {
      press(&mut app, KeyCode::Backspace);
    }
    assert!(app.flow.answers().is_blank_at(1));

    app.handle_key(ctrl('s'));
    assert_eq!(app.flow.step(), Step::Review);
    assert!(app.store.is_empty());
  }

  #[test]
  fn failed_save_is_reported_not_fatal() {
    let mut slot = MemorySlot::new();
    slot.set_read_only(true);
    let mut app = app_with(slot);
    answer_everything(&mut app);

    assert!(app.handle_key(ctrl('s')));
    assert_eq!(app.flow.step(), Step::Review);
    assert_eq!(app.status.as_ref().unwrap().kind, StatusKind::Error);
    assert!(app.store.is_empty());
  }

  #[test]
  fn history_entry_opens_in_review() {
    let mut app = app();
    let date: EntryDate = "2023-05-01".parse().unwrap();
    app.store.put(date, &AnswerSet::from(["a", "b", "c", "d"])).unwrap();

    press(&mut app, KeyCode::Char('h'));
    assert_eq!(app.screen, Screen::History);
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.screen, Screen::Compose);
    assert_eq!(app.flow.step(), Step::Review);
    assert_eq!(app.flow.date(), date);
  }

  #[test]
  fn year_and_month_filters_cycle() {
    let mut app = app();
    for d in ["2023-05-01", "2024-01-02", "2024-05-03"] {
      app.store.put(d.parse().unwrap(), &AnswerSet::from(["a", "b", "c", "d"])).unwrap();
    }
    press(&mut app, KeyCode::Char('h'));

    press(&mut app, KeyCode::Char('y'));
    assert_eq!(app.history.filter.year, Some(2024));
    assert_eq!(app.filtered_entries().len(), 2);

    press(&mut app, KeyCode::Char('m'));
    assert_eq!(app.history.filter.month, Some(1));
    assert_eq!(app.filtered_entries().len(), 1);

    press(&mut app, KeyCode::Char('y'));
    press(&mut app, KeyCode::Char('y'));
    assert_eq!(app.history.filter.year, None);

    press(&mut app, KeyCode::Char('c'));
    assert_eq!(app.filtered_entries().len(), 3);
  }

  #[test]
  fn month_choices_are_limited_to_the_selected_year() {
    let mut app = app();
    for d in ["2023-02-01", "2024-07-02", "2024-09-03"] {
      app.store.put(d.parse().unwrap(), &AnswerSet::from(["a", "b", "c", "d"])).unwrap();
    }
    press(&mut app, KeyCode::Char('h'));
    press(&mut app, KeyCode::Char('y'));
    assert_eq!(app.history.filter.year, Some(2024));

    press(&mut app, KeyCode::Char('m'));
    assert_eq!(app.history.filter.month, Some(7));
    press(&mut app, KeyCode::Char('m'));
    assert_eq!(app.history.filter.month, Some(9));
    assert_eq!(app.filtered_entries().len(), 1);
    press(&mut app, KeyCode::Char('m'));
    assert_eq!(app.history.filter.month, None);

    // September has no 2023 entries, so switching year clears it.
    press(&mut app, KeyCode::Char('m'));
    press(&mut app, KeyCode::Char('m'));
    press(&mut app, KeyCode::Char('y'));
    assert_eq!(app.history.filter.year, Some(2023));
    assert_eq!(app.history.filter.month, None);
    assert_eq!(app.filtered_entries().len(), 1);
  }

  #[tokio::test]
  async fn failed_export_shows_an_error_and_the_app_keeps_running() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    fs::write(&blocker, "x").unwrap();

    // A regular file where the export directory should be.
    let mut app = app_exporting_to(&blocker);
    answer_everything(&mut app);
    app.handle_key(ctrl('s'));
    assert!(press(&mut app, KeyCode::Char('e')));
    assert_eq!(app.status.as_ref().unwrap().kind, StatusKind::Info);

    let status = finished_export(&mut app).await;
    assert_eq!(status.kind, StatusKind::Error);
    assert_eq!(app.flow.step(), Step::Committed);
    assert!(press(&mut app, KeyCode::Char('m')));
    assert_eq!(app.flow.step(), Step::Review);
  }

  #[tokio::test]
  async fn exports_write_day_and_history_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app_exporting_to(dir.path());
    let older: EntryDate = "2023-05-01".parse().unwrap();
    app.store.put(older, &AnswerSet::from(["vecchio", "b", "c", "d"])).unwrap();

    // Committed: exports the answers held by the flow.
    answer_everything(&mut app);
    app.handle_key(ctrl('s'));
    press(&mut app, KeyCode::Char('e'));
    let status = finished_export(&mut app).await;
    assert_eq!(status.kind, StatusKind::Success);
    let today = dir.path().join(format!("Diario_{}.txt", EntryDate::today()));
    let text = fs::read_to_string(&today).unwrap();
    assert!(text.contains("quattro"));

    // History: `e` exports the entry under the cursor, `E` the whole list.
    press(&mut app, KeyCode::Char('h'));
    press(&mut app, KeyCode::Char('j'));
    assert_eq!(app.cursor_entry().map(|e| e.date), Some(older));
    press(&mut app, KeyCode::Char('e'));
    assert_eq!(finished_export(&mut app).await.kind, StatusKind::Success);
    let day = fs::read_to_string(dir.path().join("Diario_2023-05-01.txt")).unwrap();
    assert!(day.contains("vecchio"));

    press(&mut app, KeyCode::Char('E'));
    assert_eq!(finished_export(&mut app).await.kind, StatusKind::Success);
    let all = fs::read_to_string(dir.path().join("diario-gratitudine.txt")).unwrap();
    assert!(all.contains("vecchio") && all.contains("cinque"));
  }

  #[test]
  fn esc_from_history_returns_to_date_selection() {
    let mut app = app();
    answer_everything(&mut app);
    app.handle_key(ctrl('s'));
    press(&mut app, KeyCode::Char('h'));
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.screen, Screen::Compose);
    assert_eq!(app.flow.step(), Step::SelectDate);
    assert!(app.flow.is_saved());
  }

  #[test]
  fn arrows_move_the_selected_date() {
    let mut app = app();
    let today = EntryDate::today();
    press(&mut app, KeyCode::Right);
    assert_eq!(app.flow.date(), today.shift_days(1).unwrap());
    press(&mut app, KeyCode::Up);
    assert_eq!(app.flow.date(), today.shift_days(-6).unwrap());
    press(&mut app, KeyCode::Char('t'));
    assert_eq!(app.flow.date(), today);
  }

  #[test]
  fn quit_keys() {
    let mut app = app();
    assert!(!app.handle_key(ctrl('c')));
    assert!(!press(&mut app, KeyCode::Char('q')));
  }

  #[test]
  fn cycle_wraps_to_none() {
    assert_eq!(cycle(None, &[3, 2]), Some(3));
    assert_eq!(cycle(Some(3), &[3, 2]), Some(2));
    assert_eq!(cycle(Some(2), &[3, 2]), None);
    assert_eq!(cycle::<i32>(None, &[]), None);
  }
}
