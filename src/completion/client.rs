use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::gateway::{CompletionGateway, GatewayError, TextResult, TextStream};
use super::request::{CompletionRequest, ResponseMode};
use super::sse_parser::sse_to_text_stream;
use crate::session::Turn;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Turn],
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Completion gateway for OpenAI-compatible `/v1/chat/completions` endpoints.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl CompletionClient {
    pub fn new(endpoint: String, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            api_key,
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.endpoint.trim_end_matches('/')
        )
    }

    async fn send(
        &self,
        request: &CompletionRequest,
        stream: bool,
    ) -> Result<Response, GatewayError> {
        let url = self.url();

        let chat_request = ChatCompletionRequest {
            model: request.model(),
            messages: request.messages(),
            temperature: request.temperature().value(),
            stream,
        };

        debug!(
            url = %url,
            model = %chat_request.model,
            temperature = chat_request.temperature,
            messages = chat_request.messages.len(),
            stream,
            "sending completion request"
        );

        let mut http_request = self.client.post(&url).json(&chat_request);

        // Add Authorization header if API key is present
        if let Some(api_key) = &self.api_key {
            http_request = http_request.header("Authorization", format!("Bearer {api_key}"));
        }

        let response = http_request.send().await.map_err(|source| {
            warn!(url = %url, error = %source, "completion request failed (transport)");
            GatewayError::Connect {
                url: url.clone(),
                source,
            }
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!(status, "completion request rejected");
            return Err(GatewayError::Status { status, body });
        }

        Ok(response)
    }

    /// Streams the reply as it is generated.
    pub async fn complete_stream(
        &self,
        request: &CompletionRequest,
    ) -> Result<TextStream, GatewayError> {
        let response = self.send(request, true).await?;
        Ok(Box::pin(sse_to_text_stream(response.bytes_stream())))
    }

    /// Waits for the complete reply.
    pub async fn complete_blocking(
        &self,
        request: &CompletionRequest,
    ) -> Result<String, GatewayError> {
        let response = self.send(request, false).await?;

        let parsed = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(GatewayError::MissingContent)?;

        debug!(chars = content.chars().count(), "received completion");
        Ok(content)
    }
}

#[async_trait]
impl CompletionGateway for CompletionClient {
    async fn complete(
        &self,
        request: &CompletionRequest,
        mode: ResponseMode,
    ) -> Result<TextResult, GatewayError> {
        match mode {
            ResponseMode::Stream => self.complete_stream(request).await.map(TextResult::Stream),
            ResponseMode::Blocking => self
                .complete_blocking(request)
                .await
                .map(TextResult::Complete),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::Temperature;

    #[test]
    fn test_url_trims_trailing_slash() {
        let client = CompletionClient::new("https://api.openai.com/".to_string(), None);
        assert_eq!(client.url(), "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn test_request_body_shape() {
        let history = vec![Turn::user("Excelの自動化方法は？")];
        let request = CompletionRequest::new("persona", &history, "gpt-4o-mini", Temperature::DEFAULT);
        let body = ChatCompletionRequest {
            model: request.model(),
            messages: request.messages(),
            temperature: request.temperature().value(),
            stream: true,
        };

        let json = serde_json::to_value(&body).unwrap_or_default();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["stream"], true);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "persona");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_blocking_response_parsing() {
        let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"答え"}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(body).unwrap_or(ChatCompletionResponse {
            choices: vec![],
        });
        assert_eq!(
            parsed.choices.first().and_then(|c| c.message.content.as_deref()),
            Some("答え")
        );
    }
}
