//! Scholarlink Text Encoder
//!
//! Ollama embeddings API client behind the `TextEncoder` trait

mod client;
mod encoder_trait;
mod types;

pub use client::OllamaEncoder;
pub use encoder_trait::TextEncoder;
pub use types::{EmbedRequest, EmbedResponse};
