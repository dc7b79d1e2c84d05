//! `gratitude` — a daily gratitude journal for the terminal.
//!
//! # Usage
//!
//! ```
//! gratitude                                # interactive journal
//! gratitude list --year 2024
//! gratitude export 2024-01-15 --format pdf
//! gratitude export-history --year 2024 --month 1
//! ```

mod app;
mod export;
mod settings;
mod theme;
mod ui;

use std::{
  fs::{self, File},
  io,
  path::{Path, PathBuf},
  sync::Mutex,
  time::Duration,
};

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, Subcommand};
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use export::{ExportFormat, Exporter};
use gratitude_core::{
  EntryDate, EntryStore, PROMPTS, Slot,
  document::{Document, PlainTextRenderer},
  history::{HistoryFilter, history},
};
use gratitude_store_sqlite::SqliteSlot;
use ratatui::{Terminal, backend::CrosstermBackend};
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "gratitude", about = "A daily gratitude journal for the terminal")]
struct Cli {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE", env = "GRATITUDE_CONFIG")]
  config: Option<PathBuf>,

  /// SQLite database holding the diary.
  #[arg(long, value_name = "FILE")]
  store: Option<PathBuf>,

  /// Directory exported documents are written to.
  #[arg(long, value_name = "DIR")]
  export_dir: Option<PathBuf>,

  /// Your name, shown in the header.
  #[arg(long)]
  name: Option<String>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Print saved days, newest first.
  List {
    #[arg(long)]
    year:  Option<i32>,
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,
  },
  /// Export a single day.
  Export {
    /// Day to export, as YYYY-MM-DD.
    date:   EntryDate,
    #[arg(long, value_enum, default_value_t = ExportFormat::Pdf)]
    format: ExportFormat,
  },
  /// Export every saved day matching the filters into one document.
  ExportHistory {
    #[arg(long)]
    year:   Option<i32>,
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month:  Option<u32>,
    #[arg(long, value_enum, default_value_t = ExportFormat::Pdf)]
    format: ExportFormat,
  },
}

impl Cli {
  /// Flags override the config file and environment.
  fn apply(&self, settings: &mut Settings) {
    if let Some(store) = &self.store {
      settings.store_path = settings::expand_tilde(store);
    }
    if let Some(dir) = &self.export_dir {
      settings.export_dir = settings::expand_tilde(dir);
    }
    if let Some(name) = &self.name {
      settings.name = Some(name.clone());
    }
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  let mut settings = settings::load(cli.config.as_deref())?;
  cli.apply(&mut settings);

  init_tracing(&settings, cli.command.is_none())?;

  let slot = SqliteSlot::open(&settings.store_path, settings.slot.clone())
    .with_context(|| format!("opening diary at {}", settings.store_path.display()))?;
  let store = EntryStore::load(slot);
  tracing::info!(entries = store.len(), path = %settings.store_path.display(), "diary loaded");

  match cli.command {
    None => run_tui(store, settings).await,
    Some(Command::List { year, month }) => {
      print!("{}", list_text(&store, &HistoryFilter { year, month }));
      Ok(())
    }
    Some(Command::Export { date, format }) => {
      let path = export_day(&store, date, format, &settings.export_dir)?;
      println!("{}", path.display());
      Ok(())
    }
    Some(Command::ExportHistory { year, month, format }) => {
      let filter = HistoryFilter { year, month };
      let path = export_history(&store, &filter, format, &settings.export_dir)?;
      println!("{}", path.display());
      Ok(())
    }
  }
}

/// The terminal UI owns the screen, so its logs go to a file. Subcommands log
/// warnings to stderr.
fn init_tracing(settings: &Settings, tui: bool) -> Result<()> {
  let builder = tracing_subscriber::fmt();
  if tui {
    if let Some(parent) = settings.log_file.parent() {
      fs::create_dir_all(parent)
        .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = File::options()
      .create(true)
      .append(true)
      .open(&settings.log_file)
      .with_context(|| format!("opening log file {}", settings.log_file.display()))?;
    builder
      .with_env_filter(env_filter(LevelFilter::INFO))
      .with_ansi(false)
      .with_writer(Mutex::new(file))
      .init();
  } else {
    builder
      .with_env_filter(env_filter(LevelFilter::WARN))
      .with_writer(io::stderr)
      .init();
  }
  Ok(())
}

fn env_filter(default: LevelFilter) -> EnvFilter {
  EnvFilter::builder()
    .with_default_directive(default.into())
    .from_env_lossy()
}

// ─── Subcommands ──────────────────────────────────────────────────────────────

fn list_text<S: Slot>(store: &EntryStore<S>, filter: &HistoryFilter) -> String {
  let entries = history(store, filter);
  if entries.is_empty() {
    return "Non hai ancora registrato nulla.\n".to_owned();
  }
  PlainTextRenderer.render_string(&Document::for_history(&entries))
}

/// Export the saved entry for `date`. A day with nothing saved is an error.
fn export_day<S: Slot>(
  store: &EntryStore<S>,
  date: EntryDate,
  format: ExportFormat,
  dir: &Path,
) -> Result<PathBuf> {
  let entry = store
    .get(date)
    .with_context(|| format!("no entry saved for {date}"))?;
  format.write(&Document::for_entry(date, &PROMPTS, &entry.answers), dir)
}

fn export_history<S: Slot>(
  store: &EntryStore<S>,
  filter: &HistoryFilter,
  format: ExportFormat,
  dir: &Path,
) -> Result<PathBuf> {
  let entries = history(store, filter);
  format.write(&Document::for_history(&entries), dir)
}

// ─── Terminal UI ──────────────────────────────────────────────────────────────

async fn run_tui<S: Slot>(store: EntryStore<S>, settings: Settings) -> Result<()> {
  let exporter = Exporter::new(settings.export_dir, ExportFormat::Pdf);
  let mut app = App::new(store, exporter, settings.name);

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let result = run_event_loop(&mut terminal, &mut app).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  result
}

async fn run_event_loop<S: Slot>(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App<S>,
) -> Result<()> {
  loop {
    app.poll_exports();
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    match maybe_event {
      Some(Event::Key(key)) if key.kind == KeyEventKind::Press => {
        if !app.handle_key(key) {
          break;
        }
      }
      // Resize and everything else: redraw on the next iteration.
      _ => {}
    }
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use std::fs;

  use gratitude_core::{AnswerSet, MemorySlot};

  use super::*;

  fn store_with(dates: &[&str]) -> EntryStore<MemorySlot> {
    let mut store = EntryStore::load(MemorySlot::new());
    for d in dates {
      store
        .put(d.parse().unwrap(), &AnswerSet::from([*d, "b", "c", "d"]))
        .unwrap();
    }
    store
  }

  #[test]
  fn exporting_a_day_without_an_entry_fails() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_with(&["2024-01-01"]);
    let err = export_day(&store, "2024-01-02".parse().unwrap(), ExportFormat::Txt, dir.path())
      .unwrap_err();
    assert!(err.to_string().contains("2024-01-02"));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
  }

  #[test]
  fn exporting_a_saved_day_writes_its_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_with(&["2024-01-01"]);
    let path =
      export_day(&store, "2024-01-01".parse().unwrap(), ExportFormat::Txt, dir.path()).unwrap();
    assert_eq!(path, dir.path().join("Diario_2024-01-01.txt"));
    assert!(fs::read_to_string(path).unwrap().contains("01 gen 2024"));
  }

  #[test]
  fn history_export_respects_the_filter() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_with(&["2023-06-01", "2024-01-01", "2024-02-01"]);
    let path = export_history(&store, &HistoryFilter::year(2024), ExportFormat::Txt, dir.path())
      .unwrap();
    assert_eq!(path, dir.path().join("diario-gratitudine.txt"));

    let text = fs::read_to_string(path).unwrap();
    assert!(text.contains("2024-02-01") && text.contains("2024-01-01"));
    assert!(!text.contains("2023-06-01"));
    assert!(text.find("2024-02-01") < text.find("2024-01-01"));
  }

  #[test]
  fn empty_list_says_so() {
    let store = store_with(&["2023-06-01"]);
    let filter = HistoryFilter::year(2024);
    assert_eq!(list_text(&store, &filter), "Non hai ancora registrato nulla.\n");
    assert!(list_text(&store, &HistoryFilter::default()).contains("01 giu 2023"));
  }
}
