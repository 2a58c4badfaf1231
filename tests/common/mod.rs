#![allow(dead_code, clippy::unwrap_used)]
//! A minimal HTTP server that replays canned responses.
//!
//! Runs on a background thread so it works from both sync tests (driving the
//! binary through `assert_cmd`) and `tokio::test` tests.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

/// A request as seen by the fake server.
#[derive(Debug)]
pub struct CapturedRequest {
    /// Request line and headers, lowercased.
    pub head: String,
    pub body: String,
}

impl CapturedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

pub struct FakeServer {
    pub url: String,
    requests: Receiver<CapturedRequest>,
}

impl FakeServer {
    /// Serves `responses` in order, one connection each.
    pub fn start(responses: Vec<String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            for response in responses {
                let Ok((mut stream, _)) = listener.accept() else {
                    return;
                };
                let request = read_request(&mut stream);
                let _ = tx.send(request);
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
            }
        });

        Self { url, requests: rx }
    }

    pub fn next_request(&self) -> CapturedRequest {
        self.requests.recv_timeout(Duration::from_secs(10)).unwrap()
    }
}

fn read_request(stream: &mut TcpStream) -> CapturedRequest {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = find(&data, b"\r\n\r\n") {
            break pos + 4;
        }
        let n = stream.read(&mut buf).unwrap();
        if n == 0 {
            break data.len();
        }
        data.extend_from_slice(&buf[..n]);
    };

    let head = String::from_utf8_lossy(&data[..header_end]).to_lowercase();
    let content_length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while data.len() < header_end + content_length {
        let n = stream.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);
    }

    let body = String::from_utf8_lossy(&data[header_end..]).to_string();
    CapturedRequest { head, body }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// A `text/event-stream` reply carrying `fragments`, terminated by `[DONE]`.
pub fn sse_response(fragments: &[&str]) -> String {
    let mut body = String::from("data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n");
    for fragment in fragments {
        let event = serde_json::json!({ "choices": [{ "delta": { "content": fragment } }] });
        body.push_str(&format!("data: {event}\n\n"));
    }
    body.push_str("data: [DONE]\n\n");
    sse_body(&body)
}

/// A `text/event-stream` reply with an arbitrary raw body.
pub fn sse_body(body: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\nConnection: close\r\n\r\n{body}"
    )
}

/// A non-streaming chat completion reply.
pub fn json_response(content: &str) -> String {
    let body = serde_json::json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    })
    .to_string();
    raw_response(200, "application/json", &body)
}

pub fn error_response(status: u16, body: &str) -> String {
    raw_response(status, "application/json", body)
}

fn raw_response(status: u16, content_type: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status} Status\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}
