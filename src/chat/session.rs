use anyhow::Result;
use inquire::ui::{Attributes, Color, RenderConfig, StyleSheet, Styled};
use inquire::{InquireError, Select, Text};
use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};
use tracing::debug;

use super::command::{Input, SlashCommand, SlashCommandCompleter, parse_input};
use super::conversation::Conversation;
use super::ui;
use crate::completion::{CompletionClient, CompletionGateway, ResponseMode, Temperature};
use crate::config::{CustomPersona, ResolvedConfig};
use crate::persona::{self, PRESETS};
use crate::ui::{Spinner, Style, is_prompt_cancelled, print_error, print_warning};

/// One entry of the persona selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaOption {
    pub key: String,
    pub label: String,
}

impl fmt::Display for PersonaOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.key == self.label {
            write!(f, "{}", self.label)
        } else {
            write!(f, "{} ({})", self.label, self.key)
        }
    }
}

/// Presets first, in their fixed order, then custom personas sorted by key.
pub fn persona_options(custom: &HashMap<String, CustomPersona>) -> Vec<PersonaOption> {
    let presets = PRESETS.iter().map(|p| PersonaOption {
        key: p.key.to_string(),
        label: p.label.to_string(),
    });
    let customs = persona::sorted_custom_keys(custom).into_iter().map(|key| {
        PersonaOption {
            key: key.clone(),
            label: custom[key].display_label(key).to_string(),
        }
    });
    presets.chain(customs).collect()
}

/// An interactive chat session with an expert persona.
pub struct ChatSession<G = CompletionClient> {
    conversation: Conversation<G>,
    provider_name: String,
    endpoint: String,
}

impl ChatSession<CompletionClient> {
    /// Creates a chat session talking to the resolved provider.
    pub fn new(resolved: &ResolvedConfig) -> Self {
        let client = CompletionClient::new(resolved.endpoint.clone(), resolved.api_key.clone());
        Self::with_gateway(client, resolved)
    }
}

impl<G: CompletionGateway> ChatSession<G> {
    pub fn with_gateway(gateway: G, resolved: &ResolvedConfig) -> Self {
        Self {
            conversation: Conversation::from_resolved(gateway, resolved),
            provider_name: resolved.provider_name.clone(),
            endpoint: resolved.endpoint.clone(),
        }
    }

    fn persona_label(&self) -> String {
        self.conversation.persona().map_or_else(
            |_| self.conversation.config().persona.clone(),
            |p| p.label().to_string(),
        )
    }

    pub async fn run(&mut self) -> Result<()> {
        ui::print_header(&self.persona_label(), &self.conversation.config().model);

        let prompt_style = Styled::new("❯")
            .with_fg(Color::LightBlue)
            .with_attr(Attributes::BOLD);
        let mut render_config = RenderConfig::default()
            .with_prompt_prefix(prompt_style)
            .with_answered_prompt_prefix(prompt_style);

        // Non-highlighted suggestions: gray
        render_config.option = StyleSheet::new().with_fg(Color::Grey);
        // Highlighted suggestion: purple
        render_config.selected_option = Some(StyleSheet::new().with_fg(Color::DarkMagenta));

        loop {
            let input = Text::new("")
                .with_render_config(render_config)
                .with_autocomplete(SlashCommandCompleter)
                .with_help_message("Ask a question, /help for commands, Ctrl+C to quit")
                .prompt();

            match input {
                Ok(line) => match parse_input(&line) {
                    Input::Empty => print_warning("Please enter a question."),
                    Input::Command(cmd) => {
                        if !self.handle_command(cmd)? {
                            break;
                        }
                    }
                    Input::Text(text) => self.ask_and_print(&text).await?,
                },
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                    println!(); // Clear line before goodbye message
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }

        ui::print_goodbye();
        Ok(())
    }

    /// Returns `false` when the session should end.
    fn handle_command(&mut self, cmd: SlashCommand) -> Result<bool> {
        match cmd {
            SlashCommand::Persona(name) => self.switch_persona(name)?,
            SlashCommand::Model(name) => self.switch_model(name)?,
            SlashCommand::Temperature(value) => self.set_temperature(value.as_deref()),
            SlashCommand::Mode(value) => self.set_mode(value.as_deref()),
            SlashCommand::Reset => {
                self.conversation.reset();
                println!("{} Conversation cleared", Style::success("✓"));
                println!();
            }
            SlashCommand::History => ui::print_history(self.conversation.history()),
            SlashCommand::Config => ui::print_config(
                &self.provider_name,
                &self.endpoint,
                &self.persona_label(),
                self.conversation.config(),
            ),
            SlashCommand::Help => ui::print_help(),
            SlashCommand::Quit => return Ok(false),
            SlashCommand::Unknown(cmd) => {
                print_error(&format!("Unknown command: /{cmd}\n\nType /help for commands."));
            }
        }
        Ok(true)
    }

    fn switch_persona(&mut self, name: Option<String>) -> Result<()> {
        let name = match name {
            Some(name) => name,
            None => {
                let options = persona_options(self.conversation.custom_personas());
                let current = self.conversation.config().persona.clone();
                let cursor = options.iter().position(|o| o.key == current).unwrap_or(0);
                match pick(Select::new("Persona:", options).with_starting_cursor(cursor))? {
                    Some(option) => option.key,
                    None => return Ok(()),
                }
            }
        };

        match self.conversation.set_persona(&name) {
            Ok(persona) => ui::print_changed("Persona", persona.label()),
            Err(e) => print_error(&e.to_string()),
        }
        Ok(())
    }

    fn switch_model(&mut self, name: Option<String>) -> Result<()> {
        let name = match name {
            Some(name) => name,
            None if self.conversation.models().is_empty() => {
                println!(
                    "{} {}",
                    Style::label("model"),
                    Style::value(&self.conversation.config().model)
                );
                println!("Usage: /model <name>");
                println!();
                return Ok(());
            }
            None => {
                let models = self.conversation.models().to_vec();
                let current = &self.conversation.config().model;
                let cursor = models.iter().position(|m| m == current).unwrap_or(0);
                match pick(Select::new("Model:", models).with_starting_cursor(cursor))? {
                    Some(model) => model,
                    None => return Ok(()),
                }
            }
        };

        match self.conversation.set_model(&name) {
            Ok(()) => ui::print_changed("Model", &name),
            Err(e) => print_error(&e.to_string()),
        }
        Ok(())
    }

    fn set_temperature(&mut self, value: Option<&str>) {
        let Some(value) = value else {
            println!(
                "{} {}",
                Style::label("temperature"),
                Style::value(self.conversation.config().temperature)
            );
            println!("Usage: /temperature <{} - {}>", Temperature::MIN, Temperature::MAX);
            println!();
            return;
        };

        match value.parse::<Temperature>() {
            Ok(temperature) => {
                self.conversation.set_temperature(temperature);
                ui::print_changed("Temperature", temperature);
            }
            Err(e) => print_error(&e),
        }
    }

    fn set_mode(&mut self, value: Option<&str>) {
        let Some(value) = value else {
            println!(
                "{} {}",
                Style::label("mode"),
                Style::value(self.conversation.config().mode)
            );
            println!("Usage: /mode <stream|blocking>");
            println!();
            return;
        };

        match value.parse::<ResponseMode>() {
            Ok(mode) => {
                self.conversation.set_mode(mode);
                ui::print_changed("Mode", mode);
            }
            Err(e) => print_error(&e),
        }
    }

    async fn ask_and_print(&mut self, text: &str) -> Result<()> {
        let spinner = Spinner::new("Thinking...");
        let mut started = false;

        let render = |fragment: &str| {
            if !started {
                spinner.stop();
                started = true;
            }
            print!("{fragment}");
            // A failed flush only delays output; the text is still buffered
            io::stdout().flush().ok();
        };

        let outcome = tokio::select! {
            result = self.conversation.submit(text, render) => Some(result),
            _ = tokio::signal::ctrl_c() => None,
        };
        spinner.stop();

        if started {
            println!();
        }

        match outcome {
            Some(Ok(_)) => println!(),
            Some(Err(e)) => {
                debug!(error = ?e, "turn failed");
                print_error(&e.to_string());
            }
            None => {
                println!("{}", Style::warning("(interrupted)"));
                println!();
            }
        }

        Ok(())
    }
}

/// Runs a selector, mapping Esc/Ctrl+C to `None`.
fn pick<T: fmt::Display>(select: Select<'_, T>) -> Result<Option<T>> {
    match select.prompt() {
        Ok(choice) => Ok(Some(choice)),
        Err(e) if is_prompt_cancelled(&e) => {
            println!();
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
