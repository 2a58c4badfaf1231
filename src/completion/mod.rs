mod client;
mod gateway;
mod request;
mod sse_parser;

pub use client::CompletionClient;
pub use gateway::{CompletionGateway, GatewayError, TextResult, TextStream};
pub use request::{CompletionRequest, ResponseMode, Temperature, TemperatureError};
pub use sse_parser::sse_to_text_stream;
