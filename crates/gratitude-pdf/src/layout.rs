//! Line wrapping and pagination.
//!
//! Widths are estimated from an average glyph width rather than measured, so
//! the usable width keeps some slack for wide glyphs.

use gratitude_core::document::{Block, Document};

const PT_TO_MM: f32 = 0.352_778;
/// Average Helvetica advance as a fraction of the font size, rounded up.
const AVG_GLYPH_EM: f32 = 0.55;
const LINE_SPACING: f32 = 1.4;

/// Physical page geometry in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSetup {
  pub width_mm:  f32,
  pub height_mm: f32,
  pub margin_mm: f32,
}

impl PageSetup {
  /// A4 portrait with 10 mm margins.
  pub const A4: Self = Self { width_mm: 210.0, height_mm: 297.0, margin_mm: 10.0 };

  fn usable_width(&self) -> f32 { self.width_mm - 2.0 * self.margin_mm }

  fn top(&self) -> f32 { self.height_mm - self.margin_mm }
}

impl Default for PageSetup {
  fn default() -> Self { Self::A4 }
}

// ─── Styles ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
  Regular,
  Bold,
  Oblique,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
  Title,
  Heading,
  Prompt,
  Body,
}

impl Style {
  pub fn face(self) -> Face {
    match self {
      Style::Title | Style::Heading => Face::Bold,
      Style::Prompt => Face::Oblique,
      Style::Body => Face::Regular,
    }
  }

  pub fn size_pt(self) -> f32 {
    match self {
      Style::Title => 18.0,
      Style::Heading => 14.0,
      Style::Prompt | Style::Body => 11.0,
    }
  }

  /// Vertical gap inserted before a block of this style.
  fn space_before_mm(self) -> f32 {
    match self {
      Style::Title => 0.0,
      Style::Heading => 6.0,
      Style::Prompt => 3.0,
      Style::Body => 1.0,
    }
  }

  fn line_height_mm(self) -> f32 { self.size_pt() * PT_TO_MM * LINE_SPACING }

  fn max_chars(self, width_mm: f32) -> usize {
    let glyph = self.size_pt() * PT_TO_MM * AVG_GLYPH_EM;
    ((width_mm / glyph).floor() as usize).max(1)
  }
}

fn block_style(block: &Block) -> (Style, &str) {
  match block {
    Block::Title(t) => (Style::Title, t),
    Block::Heading(t) => (Style::Heading, t),
    Block::Prompt(t) => (Style::Prompt, t),
    Block::Answer(t) | Block::Paragraph(t) => (Style::Body, t),
  }
}

// ─── Placement ───────────────────────────────────────────────────────────────

/// One line of text at its final position. `y_mm` is the baseline measured
/// from the bottom of the page, as PDF expects.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
  pub page:  usize,
  pub x_mm:  f32,
  pub y_mm:  f32,
  pub style: Style,
  pub text:  String,
}

/// Wrap and paginate every block of `document`.
pub fn layout(document: &Document, setup: &PageSetup) -> Vec<PlacedLine> {
  let mut placed = Vec::new();
  let mut page = 0;
  let mut y = setup.top();

  for block in &document.blocks {
    let (style, text) = block_style(block);
    if y < setup.top() {
      y -= style.space_before_mm();
    }
    for line in wrap(text, style.max_chars(setup.usable_width())) {
      let height = style.line_height_mm();
      if y - height < setup.margin_mm {
        page += 1;
        y = setup.top();
      }
      y -= height;
      placed.push(PlacedLine { page, x_mm: setup.margin_mm, y_mm: y, style, text: line });
    }
  }
  placed
}

/// Greedy word wrap to at most `max_chars` characters per line.
///
/// Explicit line breaks are kept, including blank lines. Words longer than a
/// whole line are split.
pub fn wrap(text: &str, max_chars: usize) -> Vec<String> {
  let mut lines = Vec::new();
  for paragraph in text.split('\n') {
    let mut current = String::new();
    let mut len = 0;
    for word in paragraph.split_whitespace() {
      let mut word: Vec<char> = word.chars().collect();
      while word.len() > max_chars {
        if len > 0 {
          lines.push(std::mem::take(&mut current));
          len = 0;
        }
        let rest = word.split_off(max_chars);
        lines.push(word.into_iter().collect());
        word = rest;
      }
      if word.is_empty() {
        continue;
      }
      if len > 0 && len + 1 + word.len() > max_chars {
        lines.push(std::mem::take(&mut current));
        len = 0;
      }
      if len > 0 {
        current.push(' ');
        len += 1;
      }
      len += word.len();
      current.extend(word);
    }
    lines.push(current);
  }
  lines
}

#[cfg(test)]
mod tests {
  use gratitude_core::{AnswerSet, EntryDate, PROMPTS};

  use super::*;

  #[test]
  fn wrap_breaks_on_word_boundaries() {
    assert_eq!(wrap("the quick brown fox", 10), ["the quick", "brown fox"]);
  }

  #[test]
  fn wrap_keeps_explicit_and_blank_lines() {
    assert_eq!(wrap("uno\n\ndue", 80), ["uno", "", "due"]);
    assert_eq!(wrap("", 80), [""]);
  }

  #[test]
  fn wrap_splits_overlong_words() {
    assert_eq!(wrap("ab abcdefghij", 4), ["ab", "abcd", "efgh", "ij"]);
  }

  #[test]
  fn wrap_counts_characters_not_bytes() {
    assert_eq!(wrap("città più", 5), ["città", "più"]);
  }

  #[test]
  fn short_entry_fits_on_one_page_top_down() {
    let date: EntryDate = "2024-01-01".parse().unwrap();
    let doc = Document::for_entry(date, &PROMPTS, &AnswerSet::from(["a", "b", "c", "d"]));
    let lines = layout(&doc, &PageSetup::A4);

    assert_eq!(lines.len(), 1 + 2 * PROMPTS.len());
    assert!(lines.iter().all(|l| l.page == 0));
    assert_eq!(lines[0].style, Style::Title);
    assert!(lines.windows(2).all(|w| w[0].y_mm > w[1].y_mm));
    assert!(lines.iter().all(|l| l.y_mm >= PageSetup::A4.margin_mm));
  }

  #[test]
  fn long_answers_spill_onto_new_pages() {
    let date: EntryDate = "2024-01-01".parse().unwrap();
    let long = vec!["riga"; 300].join("\n");
    let answers = AnswerSet::from([long.as_str(), "b", "c", "d"]);
    let doc = Document::for_entry(date, &PROMPTS, &answers);
    let lines = layout(&doc, &PageSetup::A4);

    let last_page = lines.last().unwrap().page;
    assert!(last_page >= 1);
    for l in &lines {
      assert!(l.y_mm >= PageSetup::A4.margin_mm, "line below margin: {l:?}");
      assert!(l.y_mm <= PageSetup::A4.top());
    }
  }
}
