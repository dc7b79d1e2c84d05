//! Warm colour palette.

use gratitude_core::PromptId;
use ratatui::style::Color;

pub const PRIMARY_LIGHT: Color = Color::Rgb(0xfe, 0xf3, 0xc7); // warm yellow
pub const PRIMARY: Color = Color::Rgb(0xfc, 0xd3, 0x4d); // gold
pub const PRIMARY_DARK: Color = Color::Rgb(0xd9, 0x77, 0x06); // amber

pub const SECONDARY: Color = Color::Rgb(0xfc, 0xa5, 0xa5); // soft red
pub const SECONDARY_DARK: Color = Color::Rgb(0xef, 0x44, 0x44); // red

pub const ACCENT: Color = Color::Rgb(0xc5, 0xca, 0xe9); // pastel purple
pub const ACCENT_DARK: Color = Color::Rgb(0x8e, 0x99, 0xf3); // periwinkle

pub const MUTED: Color = Color::DarkGray;
pub const SUCCESS: Color = Color::Rgb(0x15, 0x80, 0x3d);

/// Highlight colour for each prompt's heading.
pub fn prompt_color(id: PromptId) -> Color {
  match id {
    PromptId::Gratitude | PromptId::Proud => PRIMARY_DARK,
    PromptId::Learned => SECONDARY_DARK,
    PromptId::Qualities => ACCENT_DARK,
  }
}
