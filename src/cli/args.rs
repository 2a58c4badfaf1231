use clap::{Parser, Subcommand};

use crate::completion::{ResponseMode, Temperature};
use crate::config::ResolveOptions;

#[derive(Parser, Debug)]
#[command(name = "expert-chat")]
#[command(about = "Chat with AI expert personas from the terminal")]
#[command(version)]
pub struct Args {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress status messages
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Options for chat mode when no subcommand is given
    #[command(flatten)]
    pub chat: ChatArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Options shared by `chat` and `ask`.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ChatArgs {
    /// Persona key or label (e.g., python_mentor, AI活用プランナー)
    #[arg(short = 'p', long)]
    pub persona: Option<String>,

    /// Model name
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// Provider name from the config file
    #[arg(long)]
    pub provider: Option<String>,

    /// Sampling temperature between 0.0 and 1.0
    #[arg(short = 't', long)]
    pub temperature: Option<Temperature>,

    /// How the reply is delivered
    #[arg(long, value_enum)]
    pub mode: Option<ResponseMode>,
}

impl From<ChatArgs> for ResolveOptions {
    fn from(args: ChatArgs) -> Self {
        Self {
            provider: args.provider,
            model: args.model,
            persona: args.persona,
            temperature: args.temperature,
            mode: args.mode,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive chat with a persona (default)
    Chat(ChatArgs),
    /// Ask a single question from a file or stdin
    Ask {
        /// File containing the question (reads from stdin if not provided)
        file: Option<String>,

        #[command(flatten)]
        options: ChatArgs,
    },
    /// List and manage personas
    Personas {
        #[command(subcommand)]
        command: Option<PersonasCommand>,
    },
    /// List configured providers
    Providers {
        /// Show details for a specific provider
        provider: Option<String>,
    },
    /// Configure default settings
    Configure,
}

#[derive(Subcommand, Debug)]
pub enum PersonasCommand {
    /// Show a persona's details and prompt
    Show {
        /// Persona key or label
        name: String,
    },
    /// Add a custom persona
    Add,
    /// Edit a custom persona
    Edit {
        /// Persona key
        name: String,
    },
    /// Remove a custom persona
    Remove {
        /// Persona key
        name: String,
    },
}
