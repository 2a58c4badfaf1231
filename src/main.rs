use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

use expert_chat::chat::ChatError;
use expert_chat::cli::commands::{ask, chat, configure, personas, providers};
use expert_chat::cli::{Args, Command, PersonasCommand};
use expert_chat::config::ConfigError;
use expert_chat::persona::PersonaError;
use expert_chat::{logging, output, ui};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine; variables may come from the environment
    let dotenv = dotenvy::dotenv();

    let args = Args::parse();

    output::init(output::OutputConfig::from_flags(args.quiet, args.no_color));
    if let Err(e) = logging::init(args.verbose) {
        ui::print_warning(&e.to_string());
    }
    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "loaded .env");
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            ui::print_error(&format!("{e:#}"));
            ExitCode::from(exit_code(&e))
        }
    }
}

async fn run(args: Args) -> Result<()> {
    match args.command {
        None => chat::run_chat(args.chat.into()).await,
        Some(Command::Chat(options)) => chat::run_chat(options.into()).await,
        Some(Command::Ask { file, options }) => {
            ask::run_ask(ask::AskOptions {
                file,
                resolve: options.into(),
            })
            .await
        }
        Some(Command::Personas { command }) => match command {
            None => personas::list_personas(),
            Some(PersonasCommand::Show { name }) => personas::show_persona(&name),
            Some(PersonasCommand::Add) => personas::add_persona(),
            Some(PersonasCommand::Edit { name }) => personas::edit_persona(&name),
            Some(PersonasCommand::Remove { name }) => personas::remove_persona(&name),
        },
        Some(Command::Providers { provider }) => providers::print_providers(provider.as_deref()),
        Some(Command::Configure) => configure::run_configure(),
    }
}

/// Maps an error to a sysexits-style exit code.
fn exit_code(error: &anyhow::Error) -> u8 {
    let code = if error.downcast_ref::<ConfigError>().is_some()
        || error.downcast_ref::<PersonaError>().is_some()
    {
        exitcode::CONFIG
    } else if let Some(chat_error) = error.downcast_ref::<ChatError>() {
        match chat_error {
            ChatError::EmptyInput => exitcode::DATAERR,
            ChatError::Persona(_) | ChatError::UnknownModel { .. } => exitcode::CONFIG,
            ChatError::Completion(_) => exitcode::UNAVAILABLE,
        }
    } else {
        exitcode::SOFTWARE
    };
    code as u8
}
