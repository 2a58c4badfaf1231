use inquire::autocompletion::{Autocomplete, Replacement};

// Available slash commands: (command, description)
pub const SLASH_COMMANDS: &[(&str, &str)] = &[
    ("/persona", "Switch persona (/persona <name>, or pick from a list)"),
    ("/model", "Switch model (/model <name>, or pick from a list)"),
    ("/temperature", "Set sampling temperature (0.0 - 1.0)"),
    ("/mode", "Set response mode (stream or blocking)"),
    ("/reset", "Clear the conversation history"),
    ("/history", "Show the conversation so far"),
    ("/config", "Show current configuration"),
    ("/help", "Show available commands"),
    ("/quit", "Exit chat mode"),
];

/// Slash command autocompleter
#[derive(Clone, Default)]
pub struct SlashCommandCompleter;

impl Autocomplete for SlashCommandCompleter {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, inquire::CustomUserError> {
        // Only the command word is completed, never its argument
        if !input.starts_with('/') || input.contains(char::is_whitespace) {
            return Ok(vec![]);
        }

        let suggestions: Vec<String> = SLASH_COMMANDS
            .iter()
            .filter(|(cmd, _)| cmd.starts_with(input))
            .map(|(cmd, desc)| format!("{cmd}  {desc}"))
            .collect();

        Ok(suggestions)
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, inquire::CustomUserError> {
        let replacement =
            highlighted_suggestion.map(|s| s.split_whitespace().next().unwrap_or("").to_string());
        Ok(replacement)
    }
}

/// Slash command types. An argument of `None` means the command was given bare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Persona(Option<String>),
    Model(Option<String>),
    Temperature(Option<String>),
    Mode(Option<String>),
    Reset,
    History,
    Config,
    Help,
    Quit,
    Unknown(String),
}

/// Input types
#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    Text(String),
    Command(SlashCommand),
    Empty,
}

pub fn parse_input(input: &str) -> Input {
    let input = input.trim();

    if input.is_empty() {
        return Input::Empty;
    }

    input
        .strip_prefix('/')
        .map_or_else(|| Input::Text(input.to_string()), parse_slash_command)
}

fn parse_slash_command(cmd: &str) -> Input {
    let (name, arg) = cmd
        .split_once(char::is_whitespace)
        .map_or((cmd, None), |(name, rest)| {
            let rest = rest.trim();
            (name, (!rest.is_empty()).then(|| rest.to_string()))
        });

    let command = match name {
        "persona" => SlashCommand::Persona(arg),
        "model" => SlashCommand::Model(arg),
        "temperature" | "temp" => SlashCommand::Temperature(arg),
        "mode" => SlashCommand::Mode(arg),
        "reset" | "clear" => SlashCommand::Reset,
        "history" => SlashCommand::History,
        "config" => SlashCommand::Config,
        "help" => SlashCommand::Help,
        "quit" | "exit" | "q" => SlashCommand::Quit,
        _ => SlashCommand::Unknown(cmd.split_whitespace().collect::<Vec<_>>().join(" ")),
    };

    Input::Command(command)
}
