//! [`PdfRenderer`] — lays out a document and draws it with `printpdf`.

use gratitude_core::document::{Document, DocumentRenderer};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use tracing::debug;

use crate::{
  Error, Result,
  layout::{Face, PageSetup, layout},
};

const LAYER: &str = "Layer 1";

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfRenderer {
  pub setup: PageSetup,
}

struct Fonts {
  regular: IndirectFontRef,
  bold:    IndirectFontRef,
  oblique: IndirectFontRef,
}

impl Fonts {
  fn get(&self, face: Face) -> &IndirectFontRef {
    match face {
      Face::Regular => &self.regular,
      Face::Bold => &self.bold,
      Face::Oblique => &self.oblique,
    }
  }
}

impl DocumentRenderer for PdfRenderer {
  type Error = Error;

  fn extension(&self) -> &'static str { "pdf" }

  fn render(&self, document: &Document) -> Result<Vec<u8>> {
    let width = Mm(self.setup.width_mm);
    let height = Mm(self.setup.height_mm);

    let (pdf, first_page, first_layer) = PdfDocument::new(&document.title, width, height, LAYER);
    let fonts = Fonts {
      regular: pdf.add_builtin_font(BuiltinFont::Helvetica)?,
      bold:    pdf.add_builtin_font(BuiltinFont::HelveticaBold)?,
      oblique: pdf.add_builtin_font(BuiltinFont::HelveticaOblique)?,
    };

    let mut layers: Vec<PdfLayerReference> =
      vec![pdf.get_page(first_page).get_layer(first_layer)];

    let lines = layout(document, &self.setup);
    for line in &lines {
      while layers.len() <= line.page {
        let (page, layer) = pdf.add_page(width, height, LAYER);
        layers.push(pdf.get_page(page).get_layer(layer));
      }
      layers[line.page].use_text(
        line.text.as_str(),
        line.style.size_pt(),
        Mm(line.x_mm),
        Mm(line.y_mm),
        fonts.get(line.style.face()),
      );
    }

    debug!(pages = layers.len(), lines = lines.len(), "rendered pdf");
    Ok(pdf.save_to_bytes()?)
  }
}
