//! Chat mode UI components.

use crate::session::{Role, Turn};
use crate::ui::Style;

use super::command::SLASH_COMMANDS;
use super::conversation::RequestConfig;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn print_header(persona_label: &str, model: &str) {
    println!(
        "{} {} - Expert Persona Chat",
        Style::header("expert-chat"),
        Style::version(format!("v{VERSION}"))
    );
    println!(
        "{} {}  {} {}",
        Style::label("persona"),
        Style::value(persona_label),
        Style::label("model"),
        Style::value(model)
    );
    println!();
}

pub fn print_goodbye() {
    println!("{}", Style::success("Goodbye!"));
}

pub fn print_config(provider: &str, endpoint: &str, persona_label: &str, config: &RequestConfig) {
    println!("{}", Style::header("Configuration"));
    println!(
        "  {}     {}",
        Style::label("provider"),
        Style::value(provider)
    );
    println!(
        "  {}      {} {}",
        Style::label("persona"),
        Style::value(persona_label),
        Style::secondary(format!("({})", config.persona))
    );
    println!(
        "  {}        {}",
        Style::label("model"),
        Style::value(&config.model)
    );
    println!(
        "  {}  {}",
        Style::label("temperature"),
        Style::value(config.temperature)
    );
    println!(
        "  {}         {}",
        Style::label("mode"),
        Style::value(config.mode)
    );
    println!(
        "  {}     {}",
        Style::label("endpoint"),
        Style::secondary(endpoint)
    );
    println!();
}

pub fn print_help() {
    println!("{}", Style::header("Available commands"));
    let width = SLASH_COMMANDS
        .iter()
        .map(|(cmd, _)| cmd.len())
        .max()
        .unwrap_or(0);
    for (cmd, desc) in SLASH_COMMANDS {
        println!(
            "  {}{}  {}",
            Style::command(cmd),
            " ".repeat(width - cmd.len()),
            Style::secondary(desc)
        );
    }
    println!();
}

pub fn print_history(turns: &[Turn]) {
    if turns.is_empty() {
        println!("{}", Style::secondary("No messages yet."));
        println!();
        return;
    }

    println!("{}", Style::header("History"));
    for turn in turns {
        let marker = match turn.role() {
            Role::User => Style::user("you"),
            Role::Assistant => Style::assistant("assistant"),
            Role::System => Style::secondary("system"),
        };
        println!("{marker}");
        println!("{}", turn.content());
        println!();
    }
}

pub fn print_changed(what: &str, value: impl std::fmt::Display) {
    println!(
        "{} {what} set to {}",
        Style::success("✓"),
        Style::value(value)
    );
    println!();
}
