pub mod models;
pub mod openai;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc::Sender;

use models::{ChatOptions, Message};

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Network Error: {0}")]
    Network(String),
    #[error("API Error: {0}")]
    Api(String),
    #[error("Invalid Response")]
    InvalidResponse,
    #[error("Rate Limited")]
    RateLimited,
}

/// Upstream token producer. Tokens (or a terminal error) are pushed into the
/// channel in arrival order; the consumer cancels by dropping the receiver,
/// which stops the producer on its next send.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn stream_chat(
        &self,
        messages: &[Message],
        options: ChatOptions,
        tx: Sender<Result<String, LlmError>>,
    );
}

#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    async fn transcribe(&self, audio: Vec<u8>) -> Result<String, LlmError>;
}
