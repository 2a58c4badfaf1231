//! Subcommand implementations.

use anyhow::Result;
use tracing::debug;

use crate::config::{ConfigManager, ResolveOptions, ResolvedConfig, resolve_config};

/// One-shot question command handler.
pub mod ask;

/// Chat mode command handler.
pub mod chat;

/// Configure command handler.
pub mod configure;

/// Persona management command handler.
pub mod personas;

/// Provider listing command handler.
pub mod providers;

/// Loads the config file and merges it with CLI options.
///
/// A configuration error is returned as-is so callers can map it to an exit code.
fn load_resolved(options: &ResolveOptions) -> Result<ResolvedConfig> {
    let manager = ConfigManager::new()?;
    let file_config = manager.load_or_default()?;
    let resolved = resolve_config(options, &file_config)?;

    debug!(
        provider = %resolved.provider_name,
        model = %resolved.model,
        persona = %resolved.persona,
        temperature = %resolved.temperature,
        mode = %resolved.mode,
        "resolved configuration"
    );

    Ok(resolved)
}
