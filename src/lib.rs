//! # expert-chat - Persona Chat CLI
//!
//! `expert-chat` is a command-line chat client for OpenAI-compatible API endpoints.
//! Every question is answered through a selectable "expert persona": a system
//! prompt that is prepended to the conversation on each request.
//!
//! ## Features
//!
//! - **Expert personas**: Built-in presets plus custom personas from the config file
//! - **Streaming or blocking replies**: Watch the answer arrive, or wait for it in one piece
//! - **In-memory history**: The whole conversation is sent on each turn until `/reset`
//! - **Multiple providers**: Configure and switch between different API providers
//!
//! ## Quick Start
//!
//! ```bash
//! # Interactive chat with the default persona
//! expert-chat
//!
//! # Pick a persona and model up front
//! expert-chat chat --persona automation_consultant --model gpt-4o
//!
//! # One-shot question from stdin
//! echo "Excelの自動化方法は？" | expert-chat ask
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/expert-chat/config.toml`:
//!
//! ```toml
//! [chat]
//! provider = "openai"
//! model = "gpt-4o-mini"
//! persona = "python_mentor"
//! temperature = 0.7
//! mode = "stream"
//!
//! [providers.openai]
//! endpoint = "https://api.openai.com"
//! api_key_env = "OPENAI_API_KEY"
//! models = ["gpt-4o-mini", "gpt-4o"]
//! ```

/// Interactive chat: conversation driver and REPL.
pub mod chat;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Completion gateway for OpenAI-compatible APIs.
pub mod completion;

/// Configuration file management and provider settings.
pub mod config;

/// File system utilities.
pub mod fs;

/// Input reading from files and stdin.
pub mod input;

/// Diagnostic logging setup.
pub mod logging;

/// Global output configuration (quiet mode, colors, stderr/stdout routing).
pub mod output;

/// XDG-style path utilities for configuration.
pub mod paths;

/// Expert persona catalog (presets and custom personas).
pub mod persona;

/// In-memory conversation history.
pub mod session;

/// Terminal UI components (spinner, colors).
pub mod ui;
