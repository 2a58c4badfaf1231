//! Interactive chat with an expert persona.
//!
//! [`Conversation`] drives one submit cycle at a time against any
//! [`CompletionGateway`](crate::completion::CompletionGateway);
//! [`ChatSession`] wraps it in a REPL with slash commands.

/// Slash command parsing and autocomplete.
pub mod command;
mod conversation;
mod session;
mod ui;

pub use conversation::{ChatError, ChatState, Conversation, RequestConfig};
pub use session::{ChatSession, PersonaOption, persona_options};
