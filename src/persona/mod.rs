//! Expert persona catalog.
//!
//! A persona is a named system prompt that steers the model's answers toward a
//! domain and tone. Presets are built in; custom personas come from the
//! `[personas]` table of the config file.

use std::collections::HashMap;
use thiserror::Error;

use crate::config::CustomPersona;

/// A preset persona (hardcoded, not modifiable by users).
#[derive(Debug, Clone)]
pub struct PresetPersona {
    /// The persona key used on the command line (e.g., "python_mentor").
    pub key: &'static str,
    /// Human-readable label shown in selectors.
    pub label: &'static str,
    /// System prompt sent ahead of the conversation.
    pub prompt: &'static str,
}

/// All available preset personas.
pub const PRESETS: &[PresetPersona] = &[
    PresetPersona {
        key: "python_mentor",
        label: "Pythonメンター",
        prompt: "あなたは初学者にやさしいPython講師です。\
                 短く、具体的なサンプルコードを交えて説明してください。",
    },
    PresetPersona {
        key: "ai_planner",
        label: "AI活用プランナー",
        prompt: "あなたは業務課題をAIで解決するプランナーです。\
                 現実的な導入手順とユースケース、注意点を簡潔に提案してください。",
    },
    PresetPersona {
        key: "automation_consultant",
        label: "業務自動化コンサルタント",
        prompt: "あなたは企業の業務効率化コンサルタントです。\
                 Excel/メール/定型処理の自動化を、Pythonサンプルと手順で提案してください。",
    },
];

/// Key of the persona used when nothing else is configured.
pub const DEFAULT_PERSONA: &str = "python_mentor";

/// Resolved persona information.
#[derive(Debug, Clone)]
pub enum ResolvedPersona {
    /// A preset persona.
    Preset(&'static PresetPersona),
    /// A custom user-defined persona.
    Custom {
        key: String,
        label: String,
        prompt: String,
    },
}

impl ResolvedPersona {
    /// Returns the system prompt for this persona.
    pub fn prompt(&self) -> &str {
        match self {
            Self::Preset(preset) => preset.prompt,
            Self::Custom { prompt, .. } => prompt,
        }
    }

    /// Returns the key for this persona.
    pub fn key(&self) -> &str {
        match self {
            Self::Preset(preset) => preset.key,
            Self::Custom { key, .. } => key,
        }
    }

    /// Returns the display label for this persona.
    pub fn label(&self) -> &str {
        match self {
            Self::Preset(preset) => preset.label,
            Self::Custom { label, .. } => label,
        }
    }
}

/// Persona-related errors.
#[derive(Debug, Clone, Error)]
pub enum PersonaError {
    /// Persona not found. Contains the requested name and the custom persona keys.
    #[error("Persona '{}' not found\n\nAvailable personas: {}", .key, available_keys(.custom_keys))]
    NotFound {
        key: String,
        custom_keys: Vec<String>,
    },
    /// A custom persona tried to reuse a preset key or label.
    #[error("Custom persona '{0}' conflicts with a preset persona")]
    PresetConflict(String),
    /// Invalid persona key format.
    #[error(
        "Invalid persona key '{0}': must start with a letter and contain only alphanumeric characters and underscores"
    )]
    InvalidKey(String),
    /// Custom persona without a prompt.
    #[error("Custom persona '{0}' has an empty prompt")]
    EmptyPrompt(String),
}

fn available_keys(custom_keys: &[String]) -> String {
    PRESETS
        .iter()
        .map(|p| p.key)
        .chain(custom_keys.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Looks up a preset persona by key or label.
pub fn get_preset(name: &str) -> Option<&'static PresetPersona> {
    PRESETS.iter().find(|p| p.key == name || p.label == name)
}

/// Returns true if the name is a preset key or label.
pub fn is_preset(name: &str) -> bool {
    get_preset(name).is_some()
}

/// Returns custom persona keys sorted alphabetically.
#[allow(clippy::implicit_hasher)]
pub fn sorted_custom_keys(personas: &HashMap<String, CustomPersona>) -> Vec<&String> {
    let mut keys: Vec<_> = personas.keys().collect();
    keys.sort();
    keys
}

/// Resolves a persona key or label to a `ResolvedPersona`.
///
/// Presets are checked first, then custom personas (by key, then by label).
/// Unknown names are an error; there is no fallback persona.
#[allow(clippy::implicit_hasher)]
pub fn resolve_persona(
    name: &str,
    custom_personas: &HashMap<String, CustomPersona>,
) -> Result<ResolvedPersona, PersonaError> {
    if let Some(preset) = get_preset(name) {
        return Ok(ResolvedPersona::Preset(preset));
    }

    let custom = custom_personas.get_key_value(name).or_else(|| {
        custom_personas
            .iter()
            .find(|(_, persona)| persona.label.as_deref() == Some(name))
    });

    if let Some((key, persona)) = custom {
        validate_custom_persona(key, persona)?;
        return Ok(ResolvedPersona::Custom {
            key: key.clone(),
            label: persona.display_label(key).to_string(),
            prompt: persona.prompt.clone(),
        });
    }

    let custom_keys: Vec<String> = sorted_custom_keys(custom_personas)
        .into_iter()
        .cloned()
        .collect();
    Err(PersonaError::NotFound {
        key: name.to_string(),
        custom_keys,
    })
}

/// Validates a custom persona key.
///
/// Keys must start with a letter, contain only alphanumeric characters and underscores,
/// and cannot conflict with presets.
pub fn validate_custom_key(key: &str) -> Result<(), PersonaError> {
    if !key.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
        return Err(PersonaError::InvalidKey(key.to_string()));
    }

    if !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(PersonaError::InvalidKey(key.to_string()));
    }

    if is_preset(key) {
        return Err(PersonaError::PresetConflict(key.to_string()));
    }

    Ok(())
}

fn validate_custom_persona(key: &str, persona: &CustomPersona) -> Result<(), PersonaError> {
    validate_custom_key(key)?;

    if persona.label.as_deref().is_some_and(is_preset) {
        return Err(PersonaError::PresetConflict(key.to_string()));
    }

    if persona.prompt.trim().is_empty() {
        return Err(PersonaError::EmptyPrompt(key.to_string()));
    }

    Ok(())
}
