//! Configure command handler for editing default settings.

use anyhow::{Result, bail};
use inquire::{Select, Text};

use crate::chat::{PersonaOption, persona_options};
use crate::completion::{ResponseMode, Temperature};
use crate::config::{BUILTIN_PROVIDER, ChatConfig, ConfigFile, ConfigManager};
use crate::persona::DEFAULT_PERSONA;
use crate::ui::{Style, handle_prompt_cancellation};

/// Runs the configure command to edit default settings.
///
/// Lets the user pick the default provider, model, persona, temperature and response mode.
pub fn run_configure() -> Result<()> {
    handle_prompt_cancellation(run_configure_inner)
}

fn run_configure_inner() -> Result<()> {
    let manager = ConfigManager::new()?;
    let mut config = manager.load_or_default()?;

    print_current_defaults(&config);

    let provider_names = config.provider_names();
    let provider = select_provider(&provider_names, config.chat.provider.as_deref())?;

    let available_models = config
        .provider(&provider)
        .map(|p| p.models)
        .unwrap_or_default();
    let model = select_model(&available_models, config.chat.model.as_deref())?;

    let persona = select_persona(&config, config.chat.persona.as_deref())?;
    let temperature = input_temperature(config.chat.temperature.unwrap_or_default())?;
    let mode = select_mode(config.chat.mode.unwrap_or_default())?;

    config.chat = ChatConfig {
        provider: Some(provider),
        model: Some(model),
        persona: Some(persona),
        temperature: Some(temperature),
        mode: Some(mode),
    };

    manager.save(&config)?;

    println!();
    println!(
        "{} Configuration saved to {}",
        Style::success("✓"),
        Style::secondary(manager.config_path().display().to_string())
    );

    Ok(())
}

fn print_current_defaults(config: &ConfigFile) {
    let show = |value: Option<String>| value.map_or_else(|| Style::secondary("(not set)"), Style::value);

    println!("{}", Style::header("Current defaults"));
    println!(
        "  {}     {}",
        Style::label("provider"),
        show(config.chat.provider.clone())
    );
    println!(
        "  {}        {}",
        Style::label("model"),
        show(config.chat.model.clone())
    );
    println!(
        "  {}      {}",
        Style::label("persona"),
        show(config.chat.persona.clone())
    );
    println!(
        "  {}  {}",
        Style::label("temperature"),
        show(config.chat.temperature.map(|t| t.to_string()))
    );
    println!(
        "  {}         {}",
        Style::label("mode"),
        show(config.chat.mode.map(|m| m.to_string()))
    );
    println!();
}

fn select_provider(providers: &[String], default: Option<&str>) -> Result<String> {
    let default = default.unwrap_or(BUILTIN_PROVIDER);
    let default_index = providers.iter().position(|p| p == default).unwrap_or(0);

    let selection = Select::new("Default provider:", providers.to_vec())
        .with_starting_cursor(default_index)
        .prompt()?;

    Ok(selection)
}

fn select_model(available_models: &[String], default: Option<&str>) -> Result<String> {
    if available_models.is_empty() {
        // No model list for this provider, fall back to text input
        let mut prompt = Text::new("Default model:").with_help_message("Enter the model name");

        if let Some(d) = default {
            prompt = prompt.with_default(d);
        }

        let model = prompt.prompt()?;

        if model.trim().is_empty() {
            bail!("Model name cannot be empty");
        }

        Ok(model.trim().to_string())
    } else {
        let default_index = default
            .and_then(|d| available_models.iter().position(|m| m == d))
            .unwrap_or(0);

        let selection = Select::new("Default model:", available_models.to_vec())
            .with_starting_cursor(default_index)
            .prompt()?;

        Ok(selection)
    }
}

fn select_persona(config: &ConfigFile, default: Option<&str>) -> Result<String> {
    let options: Vec<PersonaOption> = persona_options(&config.personas);
    let default = default.unwrap_or(DEFAULT_PERSONA);
    let default_index = options
        .iter()
        .position(|o| o.key == default || o.label == default)
        .unwrap_or(0);

    let selection = Select::new("Default persona:", options)
        .with_starting_cursor(default_index)
        .prompt()?;

    Ok(selection.key)
}

fn input_temperature(default: Temperature) -> Result<Temperature> {
    let value = Text::new("Default temperature:")
        .with_default(&default.to_string())
        .with_help_message("Between 0.0 (focused) and 1.0 (creative)")
        .prompt()?;

    value.parse::<Temperature>().map_err(anyhow::Error::msg)
}

fn select_mode(default: ResponseMode) -> Result<ResponseMode> {
    let modes = vec![ResponseMode::Stream, ResponseMode::Blocking];
    let default_index = modes.iter().position(|m| *m == default).unwrap_or(0);

    let selection = Select::new("Default response mode:", modes)
        .with_starting_cursor(default_index)
        .prompt()?;

    Ok(selection)
}
