use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::session::Turn;

/// Sampling temperature in the closed range `[0.0, 1.0]`.
///
/// Values outside the range are rejected at construction; an accepted value is
/// sent to the API exactly as given.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct Temperature(f32);

/// Rejected temperature value.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("Temperature must be between 0.0 and 1.0 (got {0})")]
pub struct TemperatureError(pub f32);

impl Temperature {
    pub const MIN: f32 = 0.0;
    pub const MAX: f32 = 1.0;
    pub const DEFAULT: Self = Self(0.7);

    pub fn new(value: f32) -> Result<Self, TemperatureError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(TemperatureError(value))
        }
    }

    pub const fn value(self) -> f32 {
        self.0
    }
}

impl Default for Temperature {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f32> for Temperature {
    type Error = TemperatureError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Temperature> for f32 {
    fn from(temperature: Temperature) -> Self {
        temperature.0
    }
}

impl FromStr for Temperature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f32 = s
            .trim()
            .parse()
            .map_err(|_| format!("'{s}' is not a number"))?;
        Self::new(value).map_err(|e| e.to_string())
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the reply is delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    /// Fragments are rendered as they are generated.
    #[default]
    Stream,
    /// The complete reply is rendered once generation finishes.
    Blocking,
}

impl ResponseMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stream => "stream",
            Self::Blocking => "blocking",
        }
    }
}

impl fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "stream" | "streaming" => Ok(Self::Stream),
            "blocking" | "block" => Ok(Self::Blocking),
            other => Err(format!(
                "Unknown response mode '{other}' (expected 'stream' or 'blocking')"
            )),
        }
    }
}

/// A single chat-completion call.
///
/// The message list is always the persona system prompt followed by the
/// session history, in that order.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    messages: Vec<Turn>,
    model: String,
    temperature: Temperature,
}

impl CompletionRequest {
    pub fn new(
        persona_prompt: &str,
        history: &[Turn],
        model: impl Into<String>,
        temperature: Temperature,
    ) -> Self {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(Turn::system(persona_prompt));
        messages.extend_from_slice(history);

        Self {
            messages,
            model: model.into(),
            temperature,
        }
    }

    pub fn messages(&self) -> &[Turn] {
        &self.messages
    }

    pub fn persona_prompt(&self) -> &str {
        self.messages.first().map_or("", Turn::content)
    }

    pub fn history(&self) -> &[Turn] {
        self.messages.get(1..).unwrap_or_default()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub const fn temperature(&self) -> Temperature {
        self.temperature
    }
}
