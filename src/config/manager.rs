use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

use crate::completion::{ResponseMode, Temperature};
use crate::fs::atomic_write;
use crate::paths;
use crate::persona::{self, DEFAULT_PERSONA};

/// Name of the provider that exists even without a config file.
pub const BUILTIN_PROVIDER: &str = "openai";
/// Endpoint of the built-in provider.
pub const BUILTIN_ENDPOINT: &str = "https://api.openai.com";
/// Environment variable holding the built-in provider's API key.
pub const BUILTIN_API_KEY_ENV: &str = "OPENAI_API_KEY";
/// Models offered by the built-in provider; the first one is the default.
pub const BUILTIN_MODELS: &[&str] = &["gpt-4o-mini", "gpt-4o"];

/// Default settings in the `[chat]` section of config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Default provider name.
    pub provider: Option<String>,
    /// Default model name.
    pub model: Option<String>,
    /// Default persona key or label.
    pub persona: Option<String>,
    /// Default sampling temperature.
    pub temperature: Option<Temperature>,
    /// Default response mode.
    pub mode: Option<ResponseMode>,
}

/// Configuration for a completion provider.
///
/// Each provider has an endpoint and optional API key settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// The OpenAI-compatible API endpoint URL.
    pub endpoint: String,
    /// API key stored directly in config (not recommended).
    #[serde(default)]
    pub api_key: Option<String>,
    /// Environment variable name containing the API key.
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// List of models that may be selected for this provider.
    #[serde(default)]
    pub models: Vec<String>,
}

impl ProviderConfig {
    /// The provider used when the config file does not define `openai`.
    pub fn builtin() -> Self {
        Self {
            endpoint: BUILTIN_ENDPOINT.to_string(),
            api_key: None,
            api_key_env: Some(BUILTIN_API_KEY_ENV.to_string()),
            models: BUILTIN_MODELS.iter().map(ToString::to_string).collect(),
        }
    }

    /// Gets the API key, preferring environment variable over config file.
    pub fn get_api_key(&self) -> Option<String> {
        if let Some(env_var) = &self.api_key_env
            && let Ok(key) = std::env::var(env_var)
            && !key.is_empty()
        {
            return Some(key);
        }
        self.api_key.clone()
    }

    /// Returns `true` if this provider requires an API key.
    pub const fn requires_api_key(&self) -> bool {
        self.api_key.is_some() || self.api_key_env.is_some()
    }

    /// Returns `true` if `model` may be used with this provider.
    ///
    /// An empty model list accepts any model name.
    pub fn accepts_model(&self, model: &str) -> bool {
        self.models.is_empty() || self.models.iter().any(|m| m == model)
    }
}

/// A user-defined persona from the `[personas]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomPersona {
    /// Label shown in selectors (defaults to the key).
    #[serde(default)]
    pub label: Option<String>,
    /// Short description shown in listings.
    #[serde(default)]
    pub description: String,
    /// System prompt sent ahead of the conversation.
    pub prompt: String,
}

impl CustomPersona {
    pub fn display_label<'a>(&'a self, key: &'a str) -> &'a str {
        self.label.as_deref().unwrap_or(key)
    }
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/expert-chat/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Default settings.
    #[serde(default)]
    pub chat: ChatConfig,
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Custom personas keyed by name.
    #[serde(default)]
    pub personas: HashMap<String, CustomPersona>,
}

impl ConfigFile {
    /// Looks up a provider, falling back to the built-in `openai` provider.
    pub fn provider(&self, name: &str) -> Option<ProviderConfig> {
        self.providers.get(name).cloned().or_else(|| {
            (name == BUILTIN_PROVIDER).then(ProviderConfig::builtin)
        })
    }

    /// Provider names, including the built-in one, sorted alphabetically.
    pub fn provider_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.providers.keys().cloned().collect();
        if !self.providers.contains_key(BUILTIN_PROVIDER) {
            names.push(BUILTIN_PROVIDER.to_string());
        }
        names.sort();
        names
    }
}

/// A configuration problem that prevents the chat from starting.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct ConfigError(pub String);

/// Resolved configuration after merging CLI arguments and config file.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The selected provider name.
    pub provider_name: String,
    /// The API endpoint URL.
    pub endpoint: String,
    /// The API key (if required).
    pub api_key: Option<String>,
    /// Models offered by the provider (empty means unrestricted).
    pub models: Vec<String>,
    /// The model to use.
    pub model: String,
    /// The persona key.
    pub persona: String,
    /// The sampling temperature.
    pub temperature: Temperature,
    /// The response mode.
    pub mode: ResponseMode,
    /// Custom personas from the config file.
    pub custom_personas: HashMap<String, CustomPersona>,
}

/// Options for resolving configuration.
///
/// Contains CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Provider name override.
    pub provider: Option<String>,
    /// Model name override.
    pub model: Option<String>,
    /// Persona override.
    pub persona: Option<String>,
    /// Temperature override.
    pub temperature: Option<Temperature>,
    /// Response mode override.
    pub mode: Option<ResponseMode>,
}

/// Resolves configuration by merging CLI options with config file settings.
///
/// CLI options take precedence over config file values, which take precedence
/// over built-in defaults.
///
/// # Errors
///
/// Returns an error if the provider is unknown, the model is not offered by
/// the provider, the persona does not exist, or a required API key is missing.
pub fn resolve_config(
    options: &ResolveOptions,
    config_file: &ConfigFile,
) -> Result<ResolvedConfig, ConfigError> {
    // Resolve provider
    let provider_name = options
        .provider
        .as_ref()
        .or(config_file.chat.provider.as_ref())
        .cloned()
        .unwrap_or_else(|| BUILTIN_PROVIDER.to_string());

    let provider_config = config_file.provider(&provider_name).ok_or_else(|| {
        ConfigError(format!(
            "Provider '{provider_name}' not found\n\n\
             Available providers:\n  \
             - {}\n\n\
             Add providers to ~/.config/expert-chat/config.toml",
            config_file.provider_names().join("\n  - ")
        ))
    })?;

    // Resolve model
    let model = options
        .model
        .as_ref()
        .or(config_file.chat.model.as_ref())
        .cloned()
        .or_else(|| provider_config.models.first().cloned())
        .ok_or_else(|| {
            ConfigError(format!(
                "Missing required configuration: 'model'\n\n\
                 Provider '{provider_name}' has no models configured. Please provide it via:\n  \
                 - CLI option: expert-chat --model <name>\n  \
                 - Config file: ~/.config/expert-chat/config.toml"
            ))
        })?;

    if !provider_config.accepts_model(&model) {
        return Err(ConfigError(format!(
            "Model '{model}' is not available for provider '{provider_name}'\n\n\
             Available models: {}",
            provider_config.models.join(", ")
        )));
    }

    // Resolve persona
    let persona_name = options
        .persona
        .as_deref()
        .or(config_file.chat.persona.as_deref())
        .unwrap_or(DEFAULT_PERSONA);
    let persona = persona::resolve_persona(persona_name, &config_file.personas)
        .map_err(|e| ConfigError(e.to_string()))?
        .key()
        .to_string();

    let temperature = options
        .temperature
        .or(config_file.chat.temperature)
        .unwrap_or_default();

    let mode = options.mode.or(config_file.chat.mode).unwrap_or_default();

    // Get API key
    let api_key = provider_config.get_api_key();

    // Check if API key is required but missing
    if provider_config.requires_api_key() && api_key.is_none() {
        let env_var = provider_config.api_key_env.as_deref().unwrap_or("API_KEY");
        return Err(ConfigError(format!(
            "Provider '{provider_name}' requires an API key\n\n\
             Set the {env_var} environment variable (or add it to a .env file):\n  \
             export {env_var}=\"your-api-key\"\n\n\
             Or set api_key in ~/.config/expert-chat/config.toml"
        )));
    }

    Ok(ResolvedConfig {
        provider_name,
        endpoint: provider_config.endpoint,
        api_key,
        models: provider_config.models,
        model,
        persona,
        temperature,
        mode,
        custom_personas: config_file.personas.clone(),
    })
}

/// Manages loading and saving configuration files.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/expert-chat/config.toml`
    /// or `~/.config/expert-chat/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_dir()?.join("config.toml"),
        })
    }

    /// Creates a config manager for an explicit file path.
    pub const fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn exists(&self) -> bool {
        self.config_path.exists()
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile = toml::from_str(&contents).with_context(|| {
            format!(
                "Failed to parse config file: {}",
                self.config_path.display()
            )
        })?;

        Ok(config_file)
    }

    /// Loads the config file, treating a missing file as an empty config.
    ///
    /// A file that exists but cannot be parsed is still an error.
    pub fn load_or_default(&self) -> Result<ConfigFile> {
        if self.exists() {
            self.load()
        } else {
            Ok(ConfigFile::default())
        }
    }

    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;

        atomic_write(&self.config_path, &contents).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;

        Ok(())
    }
}
