//! TUI rendering — orchestrates all screens.

pub mod compose;
pub mod history;

use gratitude_core::{EntryDate, Slot, Step};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::{
  app::{App, Screen, StatusKind},
  theme,
};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw<S: Slot>(f: &mut Frame, app: &App<S>) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(f.area());

  draw_header(f, rows[0], app);
  match app.screen {
    Screen::Compose => compose::draw(f, rows[1], app),
    Screen::History => history::draw(f, rows[1], app),
  }
  draw_status(f, rows[2], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header<S: Slot>(f: &mut Frame, area: Rect, app: &App<S>) {
  let title = match &app.name {
    Some(name) => format!(" 🌻 Diario di {name}"),
    None => " 🌻 Diario della Gratitudine".to_owned(),
  };
  let left = Span::styled(
    title,
    Style::default()
      .fg(Color::Black)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(
    format!("{} ", EntryDate::today().format_long()),
    Style::default().fg(theme::PRIMARY_DARK),
  );

  let pad = area
    .width
    .saturating_sub(left.width() as u16)
    .saturating_sub(right.width() as u16);
  let line = Line::from(vec![left, Span::raw(" ".repeat(pad as usize)), right]);

  let block = Block::default().style(Style::default().bg(theme::PRIMARY));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status<S: Slot>(f: &mut Frame, area: Rect, app: &App<S>) {
  let (mode_label, hints) = match app.screen {
    Screen::History if app.history.query_active => {
      ("CERCA", "Scrivi per filtrare  Invio conferma  Esc annulla")
    }
    Screen::History => (
      "DIARIO",
      "↑↓/jk scorri  y anno  m mese  / cerca  c azzera  Invio apri  e/E esporta  Esc indietro",
    ),
    Screen::Compose => match app.flow.step() {
      Step::SelectDate => ("DATA", "←→ giorno  ↑↓ settimana  t oggi  Invio inizia  h diario  q esci"),
      Step::Answering(_) => ("SCRIVI", "Tab avanti  Shift-Tab/Esc indietro  Invio a capo"),
      Step::Review if app.flow.can_commit() => ("RIVEDI", "↑↓ risposta  Ctrl-S registra  Esc indietro"),
      Step::Review => ("RIVEDI", "↑↓ risposta  Ctrl-S (compila tutte le risposte)  Esc indietro"),
      Step::Committed => ("SALVATO", "e esporta  m modifica  n nuova  h diario  q esci"),
    },
  };

  let (text, color) = match &app.status {
    Some(status) => {
      let color = match status.kind {
        StatusKind::Info => theme::PRIMARY_LIGHT,
        StatusKind::Success => theme::SUCCESS,
        StatusKind::Error => theme::SECONDARY,
      };
      (status.text.as_str(), color)
    }
    None => (hints, theme::MUTED),
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(theme::ACCENT)
      .add_modifier(Modifier::BOLD),
  );
  let text_span = Span::styled(format!("  {text}"), Style::default().fg(color));

  f.render_widget(
    Paragraph::new(Line::from(vec![mode_span, text_span])).style(Style::default().bg(Color::Black)),
    area,
  );
}
