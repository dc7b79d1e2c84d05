//! Fire-and-forget document export.
//!
//! Rendering runs on tokio's blocking pool; the UI never waits for it. Each
//! finished export reports back over a channel so the UI can show a
//! notification.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::ValueEnum;
use gratitude_core::document::{Document, PlainTextRenderer, export_to};
use gratitude_pdf::PdfRenderer;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
  Pdf,
  Txt,
}

impl ExportFormat {
  /// Render `document` and write it into `dir`, returning the file path.
  pub fn write(self, document: &Document, dir: &Path) -> Result<PathBuf> {
    let path = match self {
      ExportFormat::Pdf => export_to(&PdfRenderer::default(), document, dir)?,
      ExportFormat::Txt => export_to(&PlainTextRenderer, document, dir)?,
    };
    Ok(path)
  }
}

/// Result of one background export: the written file, or a printable error.
pub type ExportOutcome = Result<PathBuf, String>;

pub struct Exporter {
  dir:    PathBuf,
  format: ExportFormat,
  tx:     UnboundedSender<ExportOutcome>,
  rx:     UnboundedReceiver<ExportOutcome>,
}

impl Exporter {
  pub fn new(dir: PathBuf, format: ExportFormat) -> Self {
    let (tx, rx) = unbounded_channel();
    Self { dir, format, tx, rx }
  }

  pub fn dir(&self) -> &Path { &self.dir }

  /// Start exporting `document` in the background. Must be called from
  /// within a tokio runtime.
  pub fn spawn(&self, document: Document) {
    let tx = self.tx.clone();
    let dir = self.dir.clone();
    let format = self.format;
    tokio::task::spawn_blocking(move || {
      let outcome = format
        .write(&document, &dir)
        .map_err(|e| format!("{e:#}"));
      if let Err(error) = &outcome {
        warn!(%error, file = %document.file_stem, "export failed");
      }
      // The receiver only goes away when the app is shutting down.
      let _ = tx.send(outcome);
    });
  }

  /// A finished export, if one is waiting.
  pub fn try_recv(&mut self) -> Option<ExportOutcome> { self.rx.try_recv().ok() }

  #[cfg(test)]
  pub async fn recv(&mut self) -> Option<ExportOutcome> { self.rx.recv().await }
}
