pub mod gemini;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::GeminiClient;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("request to model provider failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("model provider rejected credentials (HTTP {status}): {body}")]
    Auth { status: u16, body: String },
    #[error("model provider returned HTTP {status}: {body}")]
    Api { status: u16, body: String },
    #[error("unexpected response from model provider: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("prompt blocked by model provider: {0}")]
    Blocked(String),
    #[error("model provider returned no text")]
    EmptyResponse,
}

/// Prompt text in, generated text out.
///
/// Implementations make a single attempt per call.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, InferenceError>;

    fn model_name(&self) -> &str;
}
