//! XDG-style path utilities for the configuration directory.
//!
//! This module provides consistent path resolution across platforms,
//! preferring XDG Base Directory Specification conventions over
//! OS-specific locations.

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_DIR: &str = "expert-chat";

/// Returns the configuration directory for expert-chat.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/expert-chat` if `XDG_CONFIG_HOME` is set and not empty
/// 2. `~/.config/expert-chat` otherwise
pub fn config_dir() -> Result<PathBuf> {
    match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => Ok(PathBuf::from(xdg).join(APP_DIR)),
        _ => Ok(home_dir()?.join(".config").join(APP_DIR)),
    }
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().context("Failed to determine home directory")
}
