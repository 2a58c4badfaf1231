use anyhow::Result;
use std::io::{self, Write};

use crate::chat::Conversation;
use crate::completion::CompletionClient;
use crate::config::ResolveOptions;
use crate::input::InputReader;
use crate::ui::{Spinner, Style};

pub struct AskOptions {
    pub file: Option<String>,
    pub resolve: ResolveOptions,
}

/// Answers one question read from a file or stdin, printing the reply to stdout.
pub async fn run_ask(options: AskOptions) -> Result<()> {
    let resolved = super::load_resolved(&options.resolve)?;
    let question = InputReader::read(options.file.as_deref())?;

    let client = CompletionClient::new(resolved.endpoint.clone(), resolved.api_key.clone());
    let mut conversation = Conversation::from_resolved(client, &resolved);

    let persona = conversation.persona()?;
    crate::status!(
        "{} {}  {} {}",
        Style::label("persona"),
        Style::value(persona.label()),
        Style::label("model"),
        Style::value(&resolved.model)
    );

    let spinner = Spinner::new("Thinking...");
    let mut printed = false;

    let result = conversation
        .submit(question.trim(), |fragment| {
            if !printed {
                spinner.stop();
                printed = true;
            }
            print!("{fragment}");
            io::stdout().flush().ok();
        })
        .await;
    spinner.stop();

    if printed {
        println!();
    }

    result?;
    Ok(())
}
