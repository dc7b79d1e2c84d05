//! Core types for the gratitude journal.
//!
//! This crate is deliberately free of database, terminal and PDF
//! dependencies. Storage backends implement [`store::Slot`]; renderers
//! implement [`document::DocumentRenderer`].

pub mod date;
pub mod document;
pub mod entry;
pub mod error;
pub mod flow;
pub mod history;
pub mod prompt;
pub mod quote;
pub mod store;

pub use date::EntryDate;
pub use entry::{AnswerSet, DiaryEntry};
pub use error::{Error, Result};
pub use flow::{PromptFlow, Step};
pub use prompt::{PROMPT_COUNT, PROMPTS, Prompt, PromptId};
pub use store::{EntryStore, MemorySlot, Slot};
