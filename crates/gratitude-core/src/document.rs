//! Export documents and the renderer seam.
//!
//! The core only assembles structured content and a file name. Turning a
//! [`Document`] into bytes (page breaks, fonts) is the job of a
//! [`DocumentRenderer`]; `gratitude-pdf` provides the PDF one.

use std::{
  convert::Infallible,
  fs,
  path::{Path, PathBuf},
};

use tracing::info;

use crate::{
  Error, Result,
  date::EntryDate,
  entry::{AnswerSet, DiaryEntry},
  prompt::{PROMPTS, Prompt},
};

pub const HISTORY_TITLE: &str = "Il mio diario";
const HISTORY_FILE_STEM: &str = "diario-gratitudine";
const EMPTY_HISTORY: &str = "Non hai ancora registrato nulla.";

// ─── Document model ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
  /// Document title, rendered bold.
  Title(String),
  /// Per-day heading in a multi-day document.
  Heading(String),
  /// Prompt text, rendered in emphasis.
  Prompt(String),
  /// Answer text, verbatim including line breaks.
  Answer(String),
  /// Free text in the body style.
  Paragraph(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
  pub title:     String,
  pub file_stem: String,
  pub blocks:    Vec<Block>,
}

impl Document {
  /// A single day: title, then each prompt followed by its answer.
  pub fn for_entry(date: EntryDate, prompts: &[Prompt], answers: &AnswerSet) -> Self {
    let title = format!("Diario – {}", date.format_long());
    let mut blocks = vec![Block::Title(title.clone())];
    push_answers(&mut blocks, prompts, answers);
    Self { title, file_stem: format!("Diario_{date}"), blocks }
  }

  /// Several days, in the order given.
  pub fn for_history(entries: &[&DiaryEntry]) -> Self {
    let mut blocks = vec![Block::Title(HISTORY_TITLE.to_owned())];
    if entries.is_empty() {
      blocks.push(Block::Paragraph(EMPTY_HISTORY.to_owned()));
    }
    for entry in entries {
      blocks.push(Block::Heading(entry.date.format_long()));
      push_answers(&mut blocks, &PROMPTS, &entry.answers);
    }
    Self {
      title: HISTORY_TITLE.to_owned(),
      file_stem: HISTORY_FILE_STEM.to_owned(),
      blocks,
    }
  }

  pub fn file_name(&self, extension: &str) -> String {
    format!("{}.{extension}", self.file_stem)
  }
}

fn push_answers(blocks: &mut Vec<Block>, prompts: &[Prompt], answers: &AnswerSet) {
  for (prompt, answer) in prompts.iter().zip(answers.iter()) {
    blocks.push(Block::Prompt(prompt.text.to_owned()));
    blocks.push(Block::Answer(answer.to_owned()));
  }
}

// ─── Renderers ───────────────────────────────────────────────────────────────

/// Turns a [`Document`] into the bytes of a downloadable file.
pub trait DocumentRenderer {
  type Error: std::error::Error + Send + Sync + 'static;

  /// File extension, without the dot.
  fn extension(&self) -> &'static str;

  fn render(&self, document: &Document) -> Result<Vec<u8>, Self::Error>;
}

/// UTF-8 plain text: underlined title and headings, `»`-marked prompts and
/// indented answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextRenderer;

impl PlainTextRenderer {
  pub fn render_string(&self, document: &Document) -> String {
    let mut out = String::new();
    for block in &document.blocks {
      match block {
        Block::Title(t) => underline(&mut out, t, '='),
        Block::Heading(h) => {
          out.push('\n');
          underline(&mut out, h, '-');
        }
        Block::Prompt(p) => {
          out.push_str("» ");
          out.push_str(p);
          out.push('\n');
        }
        Block::Answer(a) => {
          for line in a.lines() {
            out.push_str("  ");
            out.push_str(line);
            out.push('\n');
          }
          out.push('\n');
        }
        Block::Paragraph(p) => {
          out.push_str(p);
          out.push('\n');
        }
      }
    }
    out
  }
}

fn underline(out: &mut String, text: &str, mark: char) {
  out.push_str(text);
  out.push('\n');
  out.extend(std::iter::repeat_n(mark, text.chars().count()));
  out.push_str("\n\n");
}

impl DocumentRenderer for PlainTextRenderer {
  type Error = Infallible;

  fn extension(&self) -> &'static str { "txt" }

  fn render(&self, document: &Document) -> Result<Vec<u8>, Infallible> {
    Ok(self.render_string(document).into_bytes())
  }
}

/// Render `document` with `renderer` and write it into `dir`.
///
/// Returns the path of the written file.
pub fn export_to<R: DocumentRenderer>(
  renderer: &R,
  document: &Document,
  dir: &Path,
) -> Result<PathBuf> {
  let bytes = renderer.render(document).map_err(Error::render)?;
  fs::create_dir_all(dir)?;
  let path = dir.join(document.file_name(renderer.extension()));
  fs::write(&path, bytes)?;
  info!(path = %path.display(), "exported document");
  Ok(path)
}
