//! Conversation driver.
//!
//! A [`Conversation`] owns the session history and the current request
//! settings, and turns one submitted question into one completion call.
//! Submissions take `&mut self`, so a second submission cannot start while a
//! reply is still in flight.

use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

use crate::completion::{
    CompletionGateway, CompletionRequest, GatewayError, ResponseMode, Temperature,
};
use crate::config::{CustomPersona, ResolvedConfig};
use crate::persona::{self, PersonaError, ResolvedPersona};
use crate::session::{SessionStore, Turn};

/// Where the conversation is in its submit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    /// Waiting for the next question.
    Idle,
    /// A completion call is in flight.
    AwaitingResponse,
}

/// Settings applied to the next submission.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestConfig {
    /// Persona key.
    pub persona: String,
    pub model: String,
    pub temperature: Temperature,
    pub mode: ResponseMode,
}

impl From<&ResolvedConfig> for RequestConfig {
    fn from(resolved: &ResolvedConfig) -> Self {
        Self {
            persona: resolved.persona.clone(),
            model: resolved.model.clone(),
            temperature: resolved.temperature,
            mode: resolved.mode,
        }
    }
}

/// Errors surfaced to the user for a single turn. None of them end the session.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Input is empty; nothing was sent")]
    EmptyInput,
    #[error(transparent)]
    Persona(#[from] PersonaError),
    #[error("Model '{}' is not available\n\nAvailable models: {}", .model, .available.join(", "))]
    UnknownModel {
        model: String,
        available: Vec<String>,
    },
    #[error(transparent)]
    Completion(#[from] GatewayError),
}

/// Marks the conversation as awaiting a response until dropped.
///
/// Dropping the submit future (e.g. on Ctrl+C) also returns the state to idle.
struct InFlight<'a> {
    state: &'a mut ChatState,
}

impl<'a> InFlight<'a> {
    fn enter(state: &'a mut ChatState) -> Self {
        *state = ChatState::AwaitingResponse;
        Self { state }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.state = ChatState::Idle;
    }
}

/// One chat session: history, settings and the gateway that answers.
pub struct Conversation<G> {
    gateway: G,
    store: SessionStore,
    config: RequestConfig,
    models: Vec<String>,
    custom_personas: HashMap<String, CustomPersona>,
    state: ChatState,
}

impl<G: CompletionGateway> Conversation<G> {
    pub fn new(gateway: G, config: RequestConfig) -> Self {
        Self {
            gateway,
            store: SessionStore::new(),
            config,
            models: Vec::new(),
            custom_personas: HashMap::new(),
            state: ChatState::Idle,
        }
    }

    /// Builds a conversation from resolved startup configuration.
    pub fn from_resolved(gateway: G, resolved: &ResolvedConfig) -> Self {
        Self::new(gateway, RequestConfig::from(resolved))
            .with_models(resolved.models.clone())
            .with_custom_personas(resolved.custom_personas.clone())
    }

    /// Restricts model selection to `models` (empty means unrestricted).
    #[must_use]
    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.models = models;
        self
    }

    #[must_use]
    pub fn with_custom_personas(mut self, personas: HashMap<String, CustomPersona>) -> Self {
        self.custom_personas = personas;
        self
    }

    pub const fn state(&self) -> ChatState {
        self.state
    }

    pub fn history(&self) -> &[Turn] {
        self.store.all()
    }

    pub const fn config(&self) -> &RequestConfig {
        &self.config
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub const fn custom_personas(&self) -> &HashMap<String, CustomPersona> {
        &self.custom_personas
    }

    /// The persona that will be used for the next submission.
    pub fn persona(&self) -> Result<ResolvedPersona, PersonaError> {
        persona::resolve_persona(&self.config.persona, &self.custom_personas)
    }

    /// Switches persona. Earlier turns are left untouched.
    pub fn set_persona(&mut self, name: &str) -> Result<ResolvedPersona, ChatError> {
        let resolved = persona::resolve_persona(name, &self.custom_personas)?;
        self.config.persona = resolved.key().to_string();
        Ok(resolved)
    }

    pub fn set_model(&mut self, model: &str) -> Result<(), ChatError> {
        self.check_model(model)?;
        self.config.model = model.to_string();
        Ok(())
    }

    pub const fn set_temperature(&mut self, temperature: Temperature) {
        self.config.temperature = temperature;
    }

    pub const fn set_mode(&mut self, mode: ResponseMode) {
        self.config.mode = mode;
    }

    /// Forgets every turn of the session.
    pub fn reset(&mut self) {
        self.store.reset();
    }

    fn check_model(&self, model: &str) -> Result<(), ChatError> {
        if self.models.is_empty() || self.models.iter().any(|m| m == model) {
            Ok(())
        } else {
            Err(ChatError::UnknownModel {
                model: model.to_string(),
                available: self.models.clone(),
            })
        }
    }

    /// Sends `input` with the current persona and history, and records the reply.
    ///
    /// `render` is called with each fragment as it arrives in streaming mode,
    /// or once with the complete reply in blocking mode. On success the user
    /// turn and exactly one assistant turn are appended, and the full reply is
    /// returned. If the call fails, the user turn stays in the history and no
    /// assistant turn is added. Empty input and unknown persona or model are
    /// rejected before anything is recorded or sent.
    pub async fn submit<F>(&mut self, input: &str, render: F) -> Result<String, ChatError>
    where
        F: FnMut(&str),
    {
        if input.trim().is_empty() {
            return Err(ChatError::EmptyInput);
        }

        let persona = persona::resolve_persona(&self.config.persona, &self.custom_personas)?;
        self.check_model(&self.config.model)?;

        let _in_flight = InFlight::enter(&mut self.state);

        self.store.append(Turn::user(input));

        let request = CompletionRequest::new(
            persona.prompt(),
            self.store.all(),
            self.config.model.as_str(),
            self.config.temperature,
        );

        debug!(
            persona = persona.key(),
            model = %self.config.model,
            mode = %self.config.mode,
            turns = self.store.len(),
            "submitting turn"
        );

        let reply = self
            .gateway
            .complete(&request, self.config.mode)
            .await?
            .render_each(render)
            .await?;

        self.store.append(Turn::assistant(reply.as_str()));
        Ok(reply)
    }
}
