//! PDF rendering for gratitude journal documents.
//!
//! [`PdfRenderer`] implements [`DocumentRenderer`](gratitude_core::document::DocumentRenderer)
//! with the built-in Helvetica family, so no font files are needed. Layout
//! (wrapping and pagination) lives in [`layout`] and is independent of the
//! PDF backend.

pub mod error;
pub mod layout;
mod render;

pub use error::{Error, Result};
pub use layout::PageSetup;
pub use render::PdfRenderer;
