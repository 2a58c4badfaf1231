//! Provider listing command handler.

use anyhow::{Result, bail};

use crate::config::{BUILTIN_PROVIDER, ConfigManager, ProviderConfig};
use crate::ui::Style;

/// Prints providers to stdout, including the built-in `openai` one.
///
/// If `specific_provider` is provided, shows detailed information for that provider.
pub fn print_providers(specific_provider: Option<&str>) -> Result<()> {
    let manager = ConfigManager::new()?;
    let config = manager.load_or_default()?;

    let default_provider = config
        .chat
        .provider
        .as_deref()
        .unwrap_or(BUILTIN_PROVIDER);

    if let Some(provider_name) = specific_provider {
        let Some(provider) = config.provider(provider_name) else {
            bail!(
                "Provider '{provider_name}' not found\n\nAvailable providers: {}",
                config.provider_names().join(", ")
            );
        };
        print_details(provider_name, &provider, default_provider == provider_name);
        return Ok(());
    }

    println!("{}", Style::header("Providers"));
    for name in config.provider_names() {
        let Some(provider) = config.provider(&name) else {
            continue;
        };
        let marker = if name == default_provider {
            format!(" {}", Style::default_marker())
        } else {
            String::new()
        };
        println!("  {}{marker}", Style::value(&name));
        println!(
            "    {} {}",
            Style::label("endpoint:"),
            Style::secondary(&provider.endpoint)
        );
        if !provider.models.is_empty() {
            println!(
                "    {}   {}",
                Style::label("models:"),
                provider.models.join(", ")
            );
        }
    }

    Ok(())
}

fn print_details(name: &str, provider: &ProviderConfig, is_default: bool) {
    println!(
        "Provider: {}{}",
        Style::value(name),
        if is_default {
            format!(" {}", Style::default_marker())
        } else {
            String::new()
        }
    );
    println!("  endpoint = {}", provider.endpoint);
    if provider.requires_api_key() {
        let status = if provider.get_api_key().is_some() {
            Style::success("(set)")
        } else {
            Style::warning("(not set)")
        };
        let source = provider
            .api_key_env
            .as_deref()
            .map(|env| format!(" from {env}"))
            .unwrap_or_default();
        println!("  api_key  = {status}{source}");
    }
    if provider.models.is_empty() {
        println!("  models   = (any)");
    } else {
        println!("  models:");
        for model in &provider.models {
            println!("    - {model}");
        }
    }
}
