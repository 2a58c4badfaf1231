#![allow(clippy::unwrap_used)]
//! Config priority contract tests.
//!
//! These tests verify that CLI options take priority over config file settings.
//! Priority order (highest to lowest):
//! 1. CLI arguments
//! 2. Config file defaults
//! 3. Built-in defaults

use expert_chat::completion::{ResponseMode, Temperature};
use expert_chat::config::{
    ChatConfig, ConfigFile, CustomPersona, ProviderConfig, ResolveOptions, resolve_config,
};
use std::collections::HashMap;

fn provider(endpoint: &str, models: &[&str]) -> ProviderConfig {
    ProviderConfig {
        endpoint: endpoint.to_string(),
        api_key: Some("test_key".to_string()),
        api_key_env: None,
        models: models.iter().map(ToString::to_string).collect(),
    }
}

fn make_config_with_defaults() -> ConfigFile {
    let mut providers = HashMap::new();
    providers.insert(
        "test_provider".to_string(),
        provider("http://test.local", &["config_model", "cli_model"]),
    );

    let mut personas = HashMap::new();
    personas.insert(
        "code_reviewer".to_string(),
        CustomPersona {
            label: Some("コードレビュアー".to_string()),
            description: "Strict reviewer".to_string(),
            prompt: "You review code.".to_string(),
        },
    );

    ConfigFile {
        chat: ChatConfig {
            provider: Some("test_provider".to_string()),
            model: Some("config_model".to_string()),
            persona: Some("ai_planner".to_string()),
            temperature: Some(Temperature::new(0.3).unwrap()),
            mode: Some(ResponseMode::Blocking),
        },
        providers,
        personas,
    }
}

#[test]
fn test_config_values_used_when_cli_not_specified() {
    let config = make_config_with_defaults();

    let resolved = resolve_config(&ResolveOptions::default(), &config).unwrap();

    assert_eq!(resolved.provider_name, "test_provider");
    assert_eq!(resolved.model, "config_model");
    assert_eq!(resolved.persona, "ai_planner");
    assert_eq!(resolved.temperature, Temperature::new(0.3).unwrap());
    assert_eq!(resolved.mode, ResponseMode::Blocking);
}

#[test]
fn test_cli_persona_overrides_config_persona() {
    let config = make_config_with_defaults();
    let options = ResolveOptions {
        persona: Some("python_mentor".to_string()),
        ..ResolveOptions::default()
    };

    let resolved = resolve_config(&options, &config).unwrap();

    assert_eq!(resolved.persona, "python_mentor");
}

#[test]
fn test_cli_persona_can_use_custom_label() {
    let config = make_config_with_defaults();
    let options = ResolveOptions {
        persona: Some("コードレビュアー".to_string()),
        ..ResolveOptions::default()
    };

    let resolved = resolve_config(&options, &config).unwrap();

    assert_eq!(resolved.persona, "code_reviewer");
    assert!(resolved.custom_personas.contains_key("code_reviewer"));
}

#[test]
fn test_cli_model_overrides_config_model() {
    let config = make_config_with_defaults();
    let options = ResolveOptions {
        model: Some("cli_model".to_string()),
        ..ResolveOptions::default()
    };

    let resolved = resolve_config(&options, &config).unwrap();

    assert_eq!(resolved.model, "cli_model");
}

#[test]
fn test_cli_temperature_and_mode_override_config() {
    let config = make_config_with_defaults();
    let options = ResolveOptions {
        temperature: Some(Temperature::new(1.0).unwrap()),
        mode: Some(ResponseMode::Stream),
        ..ResolveOptions::default()
    };

    let resolved = resolve_config(&options, &config).unwrap();

    assert_eq!(resolved.temperature.value(), 1.0);
    assert_eq!(resolved.mode, ResponseMode::Stream);
}

#[test]
fn test_cli_provider_overrides_config_provider() {
    let mut config = make_config_with_defaults();
    config.chat.model = None;
    config.providers.insert(
        "other_provider".to_string(),
        provider("http://other.local", &["other_model"]),
    );

    let options = ResolveOptions {
        provider: Some("other_provider".to_string()),
        ..ResolveOptions::default()
    };

    let resolved = resolve_config(&options, &config).unwrap();

    assert_eq!(resolved.provider_name, "other_provider");
    assert_eq!(resolved.endpoint, "http://other.local");
    assert_eq!(resolved.model, "other_model");
}

#[test]
fn test_config_model_must_belong_to_cli_provider() {
    let mut config = make_config_with_defaults();
    config.providers.insert(
        "other_provider".to_string(),
        provider("http://other.local", &["other_model"]),
    );

    // config_model is not offered by other_provider
    let options = ResolveOptions {
        provider: Some("other_provider".to_string()),
        ..ResolveOptions::default()
    };

    let err = resolve_config(&options, &config).unwrap_err();
    assert!(err.to_string().contains("config_model"));
}

#[test]
fn test_builtin_defaults_without_config_file() {
    let config = ConfigFile {
        providers: HashMap::from([(
            "openai".to_string(),
            provider("https://api.openai.com", &["gpt-4o-mini", "gpt-4o"]),
        )]),
        ..ConfigFile::default()
    };

    let resolved = resolve_config(&ResolveOptions::default(), &config).unwrap();

    assert_eq!(resolved.provider_name, "openai");
    assert_eq!(resolved.model, "gpt-4o-mini");
    assert_eq!(resolved.persona, "python_mentor");
    assert_eq!(resolved.temperature, Temperature::DEFAULT);
    assert_eq!(resolved.mode, ResponseMode::Stream);
}

#[test]
fn test_invalid_persona_returns_error() {
    let config = make_config_with_defaults();
    let options = ResolveOptions {
        persona: Some("nonexistent_persona".to_string()),
        ..ResolveOptions::default()
    };

    let err = resolve_config(&options, &config).unwrap_err();
    assert!(err.to_string().contains("nonexistent_persona"));
}

#[test]
fn test_all_cli_options_override_config() {
    let mut config = make_config_with_defaults();
    config.providers.insert(
        "cli_provider".to_string(),
        provider("http://cli.local", &["cli_specified_model"]),
    );

    let options = ResolveOptions {
        provider: Some("cli_provider".to_string()),
        model: Some("cli_specified_model".to_string()),
        persona: Some("automation_consultant".to_string()),
        temperature: Some(Temperature::new(0.0).unwrap()),
        mode: Some(ResponseMode::Stream),
    };

    let resolved = resolve_config(&options, &config).unwrap();

    assert_eq!(resolved.provider_name, "cli_provider");
    assert_eq!(resolved.model, "cli_specified_model");
    assert_eq!(resolved.persona, "automation_consultant");
    assert_eq!(resolved.temperature.value(), 0.0);
    assert_eq!(resolved.mode, ResponseMode::Stream);
}
