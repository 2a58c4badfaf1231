//! Personas command handler for listing and managing personas.

use anyhow::{Result, bail};
use inquire::{Confirm, Editor, Text};

use crate::config::{ConfigFile, ConfigManager, CustomPersona};
use crate::persona::{
    DEFAULT_PERSONA, PRESETS, ResolvedPersona, is_preset, resolve_persona, sorted_custom_keys,
    validate_custom_key,
};
use crate::ui::{Style, handle_prompt_cancellation};

fn default_persona(config: &ConfigFile) -> &str {
    config.chat.persona.as_deref().unwrap_or(DEFAULT_PERSONA)
}

fn marker(is_default: bool) -> String {
    if is_default {
        format!(" {}", Style::default_marker())
    } else {
        String::new()
    }
}

/// Lists all available personas (presets and custom).
pub fn list_personas() -> Result<()> {
    let manager = ConfigManager::new()?;
    let config = manager.load_or_default()?;
    let default = default_persona(&config);

    println!("{}", Style::header("Preset personas"));
    for preset in PRESETS {
        let is_default = preset.key == default || preset.label == default;
        println!(
            "  {}  {}{}",
            Style::value(format!("{:22}", preset.key)),
            Style::secondary(preset.label),
            marker(is_default)
        );
    }

    if !config.personas.is_empty() {
        println!();
        println!("{}", Style::header("Custom personas"));
        for key in sorted_custom_keys(&config.personas) {
            let persona = &config.personas[key];
            let is_default = key == default || persona.label.as_deref() == Some(default);
            let text = if persona.description.is_empty() {
                persona.display_label(key).to_string()
            } else {
                format!("{} - {}", persona.display_label(key), persona.description)
            };
            println!(
                "  {}  {}{}",
                Style::value(format!("{key:22}")),
                Style::secondary(text),
                marker(is_default)
            );
        }
    }

    Ok(())
}

/// Shows details of a persona (label and system prompt).
pub fn show_persona(name: &str) -> Result<()> {
    let manager = ConfigManager::new()?;
    let config = manager.load_or_default()?;

    let persona = resolve_persona(name, &config.personas)?;
    let kind = match persona {
        ResolvedPersona::Preset(_) => "Preset persona",
        ResolvedPersona::Custom { .. } => "Custom persona",
    };

    println!("{}", Style::header(kind));
    println!();
    println!("  {}   {}", Style::label("Key:"), Style::value(persona.key()));
    println!("  {}  {}", Style::label("Name:"), Style::value(persona.label()));
    if let Some(custom) = config.personas.get(persona.key())
        && !custom.description.is_empty()
    {
        println!(
            "  {}  {}",
            Style::label("Desc:"),
            Style::secondary(&custom.description)
        );
    }
    println!();
    println!("{}", Style::label("Prompt:"));
    println!("{}", persona.prompt());

    Ok(())
}

/// Adds a new custom persona interactively.
pub fn add_persona() -> Result<()> {
    handle_prompt_cancellation(add_persona_inner)
}

fn add_persona_inner() -> Result<()> {
    let manager = ConfigManager::new()?;
    let mut config = manager.load_or_default()?;

    let key = Text::new("Persona key:")
        .with_help_message("Alphanumeric and underscores only (e.g., code_reviewer)")
        .prompt()?;
    let key = key.trim().to_string();

    validate_custom_key(&key)?;

    if config.personas.contains_key(&key) {
        bail!("Persona '{key}' already exists. Use 'expert-chat personas edit {key}' to modify it.");
    }

    let label = Text::new("Display name:")
        .with_help_message("Shown in selectors; leave empty to use the key")
        .prompt()?;
    let label = non_empty(&label);
    if label.as_deref().is_some_and(is_preset) {
        bail!("Display name conflicts with a preset persona");
    }

    let description = Text::new("Description:")
        .with_help_message("Short description for listings (optional)")
        .prompt()?;

    let prompt = Editor::new("System prompt (opens editor):")
        .with_help_message("Instructions for the assistant. Save and close editor when done.")
        .with_predefined_text(
            "# Enter the system prompt below.\n# Lines starting with # are ignored.\n\n",
        )
        .prompt()?;
    let prompt = filter_comment_lines(&prompt);

    if prompt.is_empty() {
        bail!("Prompt cannot be empty");
    }

    config.personas.insert(
        key.clone(),
        CustomPersona {
            label,
            description: description.trim().to_string(),
            prompt,
        },
    );
    manager.save(&config)?;

    println!();
    println!(
        "{} Persona '{}' added",
        Style::success("✓"),
        Style::value(&key)
    );

    Ok(())
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Filters out comment lines (starting with #) and trims the result.
fn filter_comment_lines(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Edits an existing custom persona.
pub fn edit_persona(name: &str) -> Result<()> {
    handle_prompt_cancellation(|| edit_persona_inner(name))
}

fn edit_persona_inner(name: &str) -> Result<()> {
    if is_preset(name) {
        bail!("Cannot edit preset persona '{name}'. Preset personas are immutable.");
    }

    let manager = ConfigManager::new()?;
    let mut config = manager.load_or_default()?;

    let current = config.personas.get(name).cloned().ok_or_else(|| {
        anyhow::anyhow!("Persona '{name}' not found. Use 'expert-chat personas add' to create it.")
    })?;

    println!(
        "{} '{}':",
        Style::header("Editing persona"),
        Style::value(name)
    );
    println!();

    let label = Text::new("Display name:")
        .with_default(current.label.as_deref().unwrap_or(""))
        .prompt()?;
    let label = non_empty(&label);
    if label.as_deref().is_some_and(is_preset) {
        bail!("Display name conflicts with a preset persona");
    }

    let description = Text::new("Description:")
        .with_default(&current.description)
        .prompt()?;

    let prompt = Editor::new("System prompt (opens editor):")
        .with_help_message("Edit the system prompt. Save and close editor when done.")
        .with_predefined_text(&current.prompt)
        .prompt()?;
    let prompt = prompt.trim().to_string();

    if prompt.is_empty() {
        bail!("Prompt cannot be empty");
    }

    config.personas.insert(
        name.to_string(),
        CustomPersona {
            label,
            description: description.trim().to_string(),
            prompt,
        },
    );
    manager.save(&config)?;

    println!();
    println!(
        "{} Persona '{}' updated",
        Style::success("✓"),
        Style::value(name)
    );

    Ok(())
}

/// Removes a custom persona.
pub fn remove_persona(name: &str) -> Result<()> {
    handle_prompt_cancellation(|| remove_persona_inner(name))
}

fn remove_persona_inner(name: &str) -> Result<()> {
    if is_preset(name) {
        bail!("Cannot remove preset persona '{name}'. Preset personas are immutable.");
    }

    let manager = ConfigManager::new()?;
    let mut config = manager.load_or_default()?;

    if !config.personas.contains_key(name) {
        bail!("Persona '{name}' not found");
    }

    let confirm = Confirm::new(&format!("Remove persona '{name}'?"))
        .with_default(false)
        .prompt()?;

    if !confirm {
        println!("Cancelled");
        return Ok(());
    }

    if config.chat.persona.as_deref() == Some(name) {
        println!(
            "{} This is your default persona. Run 'expert-chat configure' to pick a new default.",
            Style::warning("Warning:")
        );
    }

    config.personas.remove(name);
    manager.save(&config)?;

    println!();
    println!(
        "{} Persona '{}' removed",
        Style::success("✓"),
        Style::value(name)
    );

    Ok(())
}
