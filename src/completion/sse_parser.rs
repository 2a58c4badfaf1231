//! Server-Sent Events (SSE) parser for OpenAI-compatible streaming responses.
//!
//! This module provides utilities for parsing SSE streams from chat completion APIs.

use bytes::Bytes;
use futures_util::Stream;
use serde::Deserialize;
use tracing::warn;

use super::gateway::GatewayError;

/// Response structure for streaming chat completions.
#[derive(Debug, Deserialize)]
struct StreamResponse {
    #[serde(default)]
    choices: Vec<StreamChoice>,
    error: Option<StreamError>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: Delta,
}

#[derive(Debug, Deserialize)]
struct Delta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamError {
    message: String,
}

/// A single interpreted SSE line.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum SseEvent {
    /// A non-empty text fragment.
    Content(String),
    /// The `data: [DONE]` terminator.
    Done,
    /// An error object sent inside the stream.
    Error(String),
    /// A `data:` payload that is not a valid chunk.
    Malformed(String),
    /// Comments, blank lines, non-data fields and role-only deltas.
    Skip,
}

/// Converts a raw SSE byte stream into a stream of text fragments.
///
/// Lines are split on raw bytes before decoding so that multi-byte characters
/// spanning two network chunks are decoded intact. The returned stream ends at
/// `data: [DONE]`, at the end of the body, or after yielding the first error.
/// A payload that does not decode as a chunk is a [`GatewayError::Decode`].
pub fn sse_to_text_stream(
    byte_stream: impl Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
) -> impl Stream<Item = Result<String, GatewayError>> + Send {
    async_stream::stream! {
        use futures_util::StreamExt;

        let mut byte_stream = std::pin::pin!(byte_stream);
        let mut buffer: Vec<u8> = Vec::new();

        while let Some(chunk_result) = byte_stream.next().await {
            let chunk = match chunk_result {
                Ok(c) => c,
                Err(e) => {
                    yield Err(GatewayError::Stream(e.to_string()));
                    return;
                }
            };

            buffer.extend_from_slice(&chunk);

            while let Some(line_end) = buffer.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=line_end).collect();
                let line = String::from_utf8_lossy(&line);

                match parse_sse_line(line.trim()) {
                    SseEvent::Content(content) => yield Ok(content),
                    SseEvent::Done => return,
                    SseEvent::Error(message) => {
                        yield Err(GatewayError::Stream(message));
                        return;
                    }
                    SseEvent::Malformed(message) => {
                        yield Err(GatewayError::Decode(message));
                        return;
                    }
                    SseEvent::Skip => {}
                }
            }
        }

        // Body ended without a trailing newline
        let rest = String::from_utf8_lossy(&buffer);
        match parse_sse_line(rest.trim()) {
            SseEvent::Content(content) => yield Ok(content),
            SseEvent::Done => return,
            SseEvent::Error(message) => {
                yield Err(GatewayError::Stream(message));
                return;
            }
            SseEvent::Malformed(message) => {
                yield Err(GatewayError::Decode(message));
                return;
            }
            SseEvent::Skip => {}
        }

        warn!("stream ended without [DONE]; the reply may be cut off");
    }
}

/// Parses a single trimmed SSE line (e.g., `data: {"choices":[...]}`).
pub(crate) fn parse_sse_line(line: &str) -> SseEvent {
    let Some(data) = line.strip_prefix("data:") else {
        return SseEvent::Skip;
    };
    let data = data.trim_start();

    if data == "[DONE]" {
        return SseEvent::Done;
    }

    let response = match serde_json::from_str::<StreamResponse>(data) {
        Ok(response) => response,
        Err(e) => return SseEvent::Malformed(e.to_string()),
    };

    if let Some(error) = response.error {
        return SseEvent::Error(error.message);
    }

    let content: String = response
        .choices
        .into_iter()
        .filter_map(|c| c.delta.content)
        .collect();

    if content.is_empty() {
        SseEvent::Skip
    } else {
        SseEvent::Content(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    fn content(s: &str) -> SseEvent {
        SseEvent::Content(s.to_string())
    }

    #[test]
    fn test_parse_sse_line_with_content() {
        let line = r#"data: {"choices":[{"delta":{"content":"Hello"}}]}"#;
        assert_eq!(parse_sse_line(line), content("Hello"));
    }

    #[test]
    fn test_parse_sse_line_without_space_after_colon() {
        let line = r#"data:{"choices":[{"delta":{"content":"Hi"}}]}"#;
        assert_eq!(parse_sse_line(line), content("Hi"));
    }

    #[test]
    fn test_parse_sse_line_with_empty_or_null_content() {
        assert_eq!(
            parse_sse_line(r#"data: {"choices":[{"delta":{"content":""}}]}"#),
            SseEvent::Skip
        );
        assert_eq!(
            parse_sse_line(r#"data: {"choices":[{"delta":{"role":"assistant"}}]}"#),
            SseEvent::Skip
        );
    }

    #[test]
    fn test_parse_sse_line_multiple_choices() {
        let line =
            r#"data: {"choices":[{"delta":{"content":"Hello"}},{"delta":{"content":" World"}}]}"#;
        assert_eq!(parse_sse_line(line), content("Hello World"));
    }

    #[test]
    fn test_parse_sse_line_done_marker() {
        assert_eq!(parse_sse_line("data: [DONE]"), SseEvent::Done);
    }

    #[test]
    fn test_parse_sse_line_error_object() {
        let line = r#"data: {"error":{"message":"quota exceeded","type":"insufficient_quota"}}"#;
        assert_eq!(
            parse_sse_line(line),
            SseEvent::Error("quota exceeded".to_string())
        );
    }

    #[test]
    fn test_parse_sse_line_ignored_lines() {
        assert_eq!(parse_sse_line(""), SseEvent::Skip);
        assert_eq!(parse_sse_line(": keep-alive"), SseEvent::Skip);
        assert_eq!(parse_sse_line("event: message"), SseEvent::Skip);
        assert_eq!(parse_sse_line("id: 7"), SseEvent::Skip);
    }

    #[test]
    fn test_parse_sse_line_malformed_data() {
        assert!(matches!(parse_sse_line("data: not json"), SseEvent::Malformed(_)));
        assert!(matches!(parse_sse_line("data: {not json}"), SseEvent::Malformed(_)));
    }

    #[test]
    fn test_parse_sse_line_unicode_content() {
        let line = r#"data: {"choices":[{"delta":{"content":"こんにちは"}}]}"#;
        assert_eq!(parse_sse_line(line), content("こんにちは"));
    }

    async fn collect_fragments(chunks: Vec<Vec<u8>>) -> Vec<Result<String, GatewayError>> {
        let byte_stream =
            futures_util::stream::iter(chunks.into_iter().map(|c| Ok::<_, reqwest::Error>(Bytes::from(c))));
        sse_to_text_stream(byte_stream).collect().await
    }

    #[tokio::test]
    async fn test_stream_stops_at_done() {
        let body = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"A\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"B\"}}]}\n\n",
            "data: [DONE]\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"C\"}}]}\n\n",
        );
        let fragments = collect_fragments(vec![body.as_bytes().to_vec()]).await;
        let texts: Vec<String> = fragments.into_iter().filter_map(Result::ok).collect();
        assert_eq!(texts, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_stream_handles_multibyte_split_across_chunks() {
        let line = "data: {\"choices\":[{\"delta\":{\"content\":\"自動化\"}}]}\n";
        let bytes = line.as_bytes();
        // Split inside the first character of the content
        let split = line.find('自').unwrap_or(0) + 1;
        let chunks = vec![bytes[..split].to_vec(), bytes[split..].to_vec()];

        let fragments = collect_fragments(chunks).await;
        let texts: Vec<String> = fragments.into_iter().filter_map(Result::ok).collect();
        assert_eq!(texts, vec!["自動化"]);
    }

    #[tokio::test]
    async fn test_stream_without_trailing_newline() {
        let body = "data: {\"choices\":[{\"delta\":{\"content\":\"tail\"}}]}";
        let fragments = collect_fragments(vec![body.as_bytes().to_vec()]).await;
        let texts: Vec<String> = fragments.into_iter().filter_map(Result::ok).collect();
        assert_eq!(texts, vec!["tail"]);
    }

    #[tokio::test]
    async fn test_stream_error_event_ends_stream() {
        let body = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"partial\"}}]}\n",
            "data: {\"error\":{\"message\":\"server overloaded\"}}\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"never\"}}]}\n",
        );
        let fragments = collect_fragments(vec![body.as_bytes().to_vec()]).await;
        assert_eq!(fragments.len(), 2);
        assert!(matches!(&fragments[0], Ok(text) if text == "partial"));
        assert!(matches!(&fragments[1], Err(GatewayError::Stream(msg)) if msg == "server overloaded"));
    }

    #[tokio::test]
    async fn test_stream_malformed_chunk_ends_stream() {
        let body = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"ok\"}}]}\n\n",
            "data: {not json}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"never\"}}]}\n\n",
        );
        let fragments = collect_fragments(vec![body.as_bytes().to_vec()]).await;
        assert_eq!(fragments.len(), 2);
        assert!(matches!(&fragments[0], Ok(text) if text == "ok"));
        assert!(matches!(&fragments[1], Err(GatewayError::Decode(_))));
    }

    #[tokio::test]
    async fn test_stream_without_done_keeps_received_text() {
        let body = "data: {\"choices\":[{\"delta\":{\"content\":\"Half an ans\"}}]}\n\n";
        let fragments = collect_fragments(vec![body.as_bytes().to_vec()]).await;
        let texts: Vec<String> = fragments.into_iter().filter_map(Result::ok).collect();
        assert_eq!(texts, vec!["Half an ans"]);
    }
}
