//! Diagnostic logging via tracing-subscriber.
//!
//! Logs go to stderr so they never mix with replies on stdout. The level is
//! taken from `EXPERT_CHAT_LOG` when set, otherwise from the CLI flags.

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the log filter.
pub const LOG_ENV: &str = "EXPERT_CHAT_LOG";

/// Default filter level for the given verbosity flag.
pub const fn default_level(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "warn" }
}

/// Initialise the global tracing subscriber.
pub fn init(verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_level(verbose)))
        .map_err(|e| anyhow!("Invalid log filter: {e}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to set log subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level() {
        assert_eq!(default_level(true), "debug");
        assert_eq!(default_level(false), "warn");
    }

    #[test]
    fn test_init_succeeds_or_already_init() {
        // Another test in the same process may have installed a subscriber already
        match init(false) {
            Ok(()) => {}
            Err(e) => assert!(e.to_string().contains("subscriber")),
        }
    }
}
