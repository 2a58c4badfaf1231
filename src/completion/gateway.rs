use async_trait::async_trait;
use futures_util::{Stream, StreamExt};
use std::fmt;
use std::pin::Pin;
use thiserror::Error;

use super::request::{CompletionRequest, ResponseMode};

/// Lazy, finite stream of reply fragments in generation order.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, GatewayError>> + Send>>;

/// Failures of a completion call. None of them are retried.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Failed to connect to API endpoint {url}: {source}")]
    Connect {
        url: String,
        source: reqwest::Error,
    },
    #[error("API request failed with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Stream error: {0}")]
    Stream(String),
    #[error("Malformed API response: {0}")]
    Decode(String),
    #[error("API response did not contain any message content")]
    MissingContent,
}

/// Reply of a completion call, shaped by the requested [`ResponseMode`].
pub enum TextResult {
    Stream(TextStream),
    Complete(String),
}

impl TextResult {
    /// Calls `render` with each fragment in arrival order, or once with the
    /// complete text, and returns the concatenated reply.
    ///
    /// Stops at the first stream error; fragments already rendered are not
    /// part of the error.
    pub async fn render_each<F>(self, mut render: F) -> Result<String, GatewayError>
    where
        F: FnMut(&str),
    {
        match self {
            Self::Complete(text) => {
                render(&text);
                Ok(text)
            }
            Self::Stream(mut stream) => {
                let mut text = String::new();
                while let Some(fragment) = stream.next().await {
                    let fragment = fragment?;
                    render(&fragment);
                    text.push_str(&fragment);
                }
                Ok(text)
            }
        }
    }

    /// Concatenates all fragments without rendering them.
    pub async fn collect(self) -> Result<String, GatewayError> {
        self.render_each(|_| {}).await
    }
}

impl fmt::Debug for TextResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stream(_) => f.write_str("TextResult::Stream(..)"),
            Self::Complete(text) => f.debug_tuple("TextResult::Complete").field(text).finish(),
        }
    }
}

/// Anything that can answer a [`CompletionRequest`].
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    async fn complete(
        &self,
        request: &CompletionRequest,
        mode: ResponseMode,
    ) -> Result<TextResult, GatewayError>;
}
