//! History screen: filterable list of saved days with a preview pane.

use gratitude_core::{DiaryEntry, PROMPTS, Slot};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::{app::App, theme};

const MONTH_NAMES: [&str; 12] = [
  "gennaio",
  "febbraio",
  "marzo",
  "aprile",
  "maggio",
  "giugno",
  "luglio",
  "agosto",
  "settembre",
  "ottobre",
  "novembre",
  "dicembre",
];

pub fn draw<S: Slot>(f: &mut Frame, area: Rect, app: &App<S>) {
  let entries = app.filtered_entries();
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(1), Constraint::Min(0)])
    .split(area);
  draw_filters(f, rows[0], app);

  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
    .split(rows[1]);

  draw_list(f, cols[0], app, &entries);
  match entries.get(app.history.cursor) {
    Some(entry) => draw_preview(f, cols[1], entry),
    None => draw_empty(f, cols[1], app.store.is_empty()),
  }
}

fn draw_filters<S: Slot>(f: &mut Frame, area: Rect, app: &App<S>) {
  let filter = &app.history.filter;
  let year = filter.year.map_or_else(|| "tutti".to_owned(), |y| y.to_string());
  let month = filter
    .month
    .and_then(|m| MONTH_NAMES.get(m.checked_sub(1)? as usize))
    .copied()
    .unwrap_or("tutti");

  let label = Style::default().fg(theme::MUTED);
  let value = Style::default()
    .fg(theme::ACCENT)
    .add_modifier(Modifier::BOLD);
  let mut spans = vec![
    Span::styled(" Anno ", label),
    Span::styled(year, value),
    Span::styled("   Mese ", label),
    Span::styled(month, value),
  ];
  if app.history.query_active || !app.history.query.is_empty() {
    let cursor = if app.history.query_active { "_" } else { "" };
    spans.push(Span::styled(
      format!("   /{}{cursor}", app.history.query),
      Style::default().fg(theme::PRIMARY),
    ));
  }
  f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_list<S: Slot>(f: &mut Frame, area: Rect, app: &App<S>, entries: &[&DiaryEntry]) {
  let title = if app.history.filter.is_empty() && app.history.query.is_empty() {
    format!(" Giornate ({}) ", app.store.len())
  } else {
    format!(" Giornate ({}/{}) ", entries.len(), app.store.len())
  };
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(theme::MUTED));

  let items: Vec<ListItem> = entries
    .iter()
    .map(|entry| {
      let first = entry
        .answers
        .iter()
        .find(|a| !a.trim().is_empty())
        .and_then(|a| a.lines().next())
        .unwrap_or_default();
      ListItem::new(Line::from(vec![
        Span::styled(
          format!("{}  ", entry.date.format_long()),
          Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(first.to_owned(), Style::default().fg(theme::MUTED)),
      ]))
    })
    .collect();

  let mut state = ListState::default();
  state.select((!entries.is_empty()).then_some(app.history.cursor));

  f.render_stateful_widget(
    List::new(items).block(block).highlight_style(
      Style::default()
        .bg(theme::PRIMARY_DARK)
        .fg(Color::Black)
        .add_modifier(Modifier::BOLD),
    ),
    area,
    &mut state,
  );
}

fn draw_preview(f: &mut Frame, area: Rect, entry: &DiaryEntry) {
  let block = Block::default()
    .title(format!(" {} ", entry.date.format_long()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(theme::PRIMARY));

  let mut lines = Vec::new();
  for (prompt, answer) in PROMPTS.iter().zip(entry.answers.iter()) {
    lines.push(Line::from(vec![
      Span::raw(format!("{} ", prompt.icon)),
      Span::styled(
        prompt.text,
        Style::default()
          .fg(theme::prompt_color(prompt.id))
          .add_modifier(Modifier::ITALIC),
      ),
    ]));
    if answer.trim().is_empty() {
      lines.push(Line::from(Span::styled("—", Style::default().fg(theme::MUTED))));
    } else {
      lines.extend(answer.lines().map(|l| Line::from(l.to_owned())));
    }
    lines.push(Line::default());
  }

  f.render_widget(
    Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
    area,
  );
}

fn draw_empty(f: &mut Frame, area: Rect, nothing_saved: bool) {
  let text = if nothing_saved {
    "Non hai ancora registrato nulla."
  } else {
    "Nessuna giornata corrisponde ai filtri."
  };
  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(theme::MUTED));
  f.render_widget(
    Paragraph::new(Span::styled(text, Style::default().fg(theme::MUTED))).block(block),
    area,
  );
}
