//! Compose screen: date picker, one prompt at a time, review and summary.

use gratitude_core::{PROMPT_COUNT, PROMPTS, Prompt, Slot, Step, quote};
use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Direction, Layout, Rect},
  style::{Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::{app::App, theme};

pub fn draw<S: Slot>(f: &mut Frame, area: Rect, app: &App<S>) {
  match app.flow.step() {
    Step::SelectDate => draw_date_select(f, area, app),
    Step::Answering(index) => draw_prompt(f, area, app, index),
    Step::Review => draw_answers(f, area, app, Some(app.review_cursor)),
    Step::Committed => draw_answers(f, area, app, None),
  }
}

// ─── Date selection ───────────────────────────────────────────────────────────

fn draw_date_select<S: Slot>(f: &mut Frame, area: Rect, app: &App<S>) {
  let date = app.flow.date();
  let quote = quote::for_date(date);

  let mut lines = vec![
    Line::default(),
    Line::from(Span::styled(
      format!("“{}”", quote.text),
      Style::default()
        .fg(theme::PRIMARY_LIGHT)
        .add_modifier(Modifier::ITALIC),
    )),
  ];
  if let Some(author) = quote.author {
    lines.push(Line::from(Span::styled(
      format!("— {author}"),
      Style::default().fg(theme::MUTED),
    )));
  }
  lines.extend([
    Line::default(),
    Line::default(),
    Line::from("Per quale giorno vuoi scrivere?"),
    Line::default(),
    Line::from(vec![
      Span::styled("‹  ", Style::default().fg(theme::MUTED)),
      Span::styled(
        date.format_long(),
        Style::default()
          .fg(theme::PRIMARY)
          .add_modifier(Modifier::BOLD),
      ),
      Span::styled("  ›", Style::default().fg(theme::MUTED)),
    ]),
    Line::default(),
  ]);
  if app.flow.is_saved() {
    lines.push(Line::from(Span::styled(
      "Hai già registrato questa giornata: puoi aggiornarla.",
      Style::default().fg(theme::SUCCESS),
    )));
  }

  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(theme::MUTED));
  f.render_widget(
    Paragraph::new(lines)
      .block(block)
      .alignment(Alignment::Center)
      .wrap(Wrap { trim: true }),
    area,
  );
}

// ─── One prompt ───────────────────────────────────────────────────────────────

fn draw_prompt<S: Slot>(f: &mut Frame, area: Rect, app: &App<S>, index: usize) {
  let Some(prompt) = app.flow.current_prompt() else { return };
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // progress
      Constraint::Length(3), // question
      Constraint::Min(3),    // answer
    ])
    .split(area);

  let dots: Vec<Span> = (0..PROMPT_COUNT)
    .map(|i| {
      let (glyph, color) = match i.cmp(&index) {
        std::cmp::Ordering::Less => ("● ", theme::PRIMARY),
        std::cmp::Ordering::Equal => ("● ", theme::PRIMARY_DARK),
        std::cmp::Ordering::Greater => ("○ ", theme::MUTED),
      };
      Span::styled(glyph, Style::default().fg(color))
    })
    .collect();
  let mut progress = vec![Span::raw(" ")];
  progress.extend(dots);
  progress.push(Span::styled(
    format!(" {}/{}   {}", index + 1, PROMPT_COUNT, app.flow.date().format_long()),
    Style::default().fg(theme::MUTED),
  ));
  f.render_widget(Paragraph::new(Line::from(progress)), rows[0]);

  f.render_widget(
    Paragraph::new(question(prompt)).wrap(Wrap { trim: true }),
    rows[1],
  );

  let answer = app.flow.current_answer().unwrap_or_default();
  f.render_widget(
    answer_paragraph(prompt, answer, true).block(
      Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::prompt_color(prompt.id))),
    ),
    rows[2],
  );
}

// ─── Review / summary ─────────────────────────────────────────────────────────

/// All four answers stacked. `focus` is the answer being edited, if any.
fn draw_answers<S: Slot>(f: &mut Frame, area: Rect, app: &App<S>, focus: Option<usize>) {
  let committed = focus.is_none();
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(1), Constraint::Min(0)])
    .split(area);

  let heading = if committed {
    Span::styled(
      format!(" ✓ Risposte registrate per {}", app.flow.date().format_long()),
      Style::default()
        .fg(theme::SUCCESS)
        .add_modifier(Modifier::BOLD),
    )
  } else {
    Span::styled(
      format!(" Rivedi le risposte per {}", app.flow.date().format_long()),
      Style::default().add_modifier(Modifier::BOLD),
    )
  };
  f.render_widget(Paragraph::new(Line::from(heading)), rows[0]);

  let cells = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Ratio(1, PROMPT_COUNT as u32); PROMPT_COUNT])
    .split(rows[1]);

  for (i, prompt) in PROMPTS.iter().enumerate() {
    let focused = focus == Some(i);
    let border = if focused { theme::prompt_color(prompt.id) } else { theme::MUTED };
    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(border))
      .title(question(prompt));
    f.render_widget(
      answer_paragraph(prompt, &app.flow.answers()[i], focused).block(block),
      cells[i],
    );
  }
}

// ─── Shared pieces ────────────────────────────────────────────────────────────

fn question(prompt: &Prompt) -> Line<'static> {
  Line::from(vec![
    Span::raw(format!("{} ", prompt.icon)),
    Span::styled(
      prompt.text,
      Style::default()
        .fg(theme::prompt_color(prompt.id))
        .add_modifier(Modifier::BOLD),
    ),
  ])
}

/// The answer text, or the placeholder when empty. `editing` adds a cursor.
fn answer_paragraph<'a>(prompt: &Prompt, answer: &'a str, editing: bool) -> Paragraph<'a> {
  if answer.is_empty() {
    let mut spans = vec![];
    if editing {
      spans.push(Span::raw("▏"));
    }
    spans.push(Span::styled(prompt.placeholder, Style::default().fg(theme::MUTED)));
    return Paragraph::new(Line::from(spans));
  }

  let mut lines: Vec<Line> = answer.split('\n').map(Line::from).collect();
  if editing && let Some(last) = lines.last_mut() {
    last.push_span(Span::styled("▏", Style::default().fg(theme::PRIMARY_DARK)));
  }
  Paragraph::new(lines).wrap(Wrap { trim: false })
}
