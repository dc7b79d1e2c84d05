//! The fixed set of reflective prompts.

use strum::{EnumCount, EnumIter};

/// Identifies one prompt. Declaration order is presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumCount, EnumIter)]
pub enum PromptId {
  Gratitude,
  Learned,
  Qualities,
  Proud,
}

impl PromptId {
  /// Position of this prompt within [`PROMPTS`] and every answer set.
  pub fn index(self) -> usize { self as usize }

  pub fn prompt(self) -> &'static Prompt { &PROMPTS[self.index()] }
}

pub const PROMPT_COUNT: usize = <PromptId as EnumCount>::COUNT;

/// A reflective question shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prompt {
  pub id:          PromptId,
  pub icon:        &'static str,
  pub text:        &'static str,
  pub placeholder: &'static str,
}

pub const PROMPTS: [Prompt; PROMPT_COUNT] = [
  Prompt {
    id:          PromptId::Gratitude,
    icon:        "❤️",
    text:        "Ripensando alla giornata di oggi, elenca le cose per cui essere grato.",
    placeholder: "Scrivi qui le cose di cui sei grato...",
  },
  Prompt {
    id:          PromptId::Learned,
    icon:        "💡",
    text:        "Che cosa hai imparato oggi? Piccole o grandi lezioni vanno benissimo.",
    placeholder: "Scrivi qui quello che hai imparato...",
  },
  Prompt {
    id:          PromptId::Qualities,
    icon:        "⭐",
    text:        "Fai un elenco delle qualità o azioni di cui vai fiero di te stesso.",
    placeholder: "Scrivi qui le tue qualità o azioni positive...",
  },
  Prompt {
    id:          PromptId::Proud,
    icon:        "🏅",
    text:        "Quali sono le cose di cui sei orgoglioso oggi?",
    placeholder: "Scrivi qui i tuoi successi o traguardi...",
  },
];
