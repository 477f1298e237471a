use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tokio::sync::mpsc::Sender;

use crate::config::OpenAiConfig;
use crate::llm::{
    models::{ChatOptions, Message},
    CompletionProvider, LlmError, TranscriptionProvider,
};

pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
    chat_model: String,
    transcribe_model: String,
    transcribe_language: String,
}

impl OpenAiClient {
    pub fn new(config: &OpenAiConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.api_base.clone(),
            chat_model: config.chat_model.clone(),
            transcribe_model: config.transcribe_model.clone(),
            transcribe_language: config.transcribe_language.clone(),
        }
    }

    async fn request_stream(
        &self,
        messages: &[Message],
        options: &ChatOptions,
    ) -> Result<reqwest::Response, LlmError> {
        let model = options.model.as_deref().unwrap_or(&self.chat_model);

        let body = json!({
            "model": model,
            "messages": messages,
            "stream": true,
            "temperature": options.temperature.unwrap_or(0.7),
            "max_tokens": options.max_tokens.unwrap_or(2000),
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(LlmError::RateLimited);
            }
            return Err(LlmError::Api(format!("OpenAI Error {}: {}", status, text)));
        }

        Ok(response)
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    fn name(&self) -> &str {
        "openai"
    }

    async fn stream_chat(
        &self,
        messages: &[Message],
        options: ChatOptions,
        tx: Sender<Result<String, LlmError>>,
    ) {
        let response = match self.request_stream(messages, &options).await {
            Ok(r) => r,
            Err(e) => {
                let _ = tx.send(Err(e)).await;
                return;
            }
        };

        let mut stream = response.bytes_stream();
        use futures_util::StreamExt;

        // SSE events may be split across network chunks; keep the trailing
        // partial line around until the rest arrives.
        let mut buffer = String::new();

        while let Some(chunk) = stream.next().await {
            let bytes = match chunk {
                Ok(b) => b,
                Err(e) => {
                    let _ = tx.send(Err(LlmError::Network(e.to_string()))).await;
                    return;
                }
            };
            buffer.push_str(&String::from_utf8_lossy(&bytes));

            while let Some(pos) = buffer.find('\n') {
                let line = buffer[..pos].trim().to_string();
                buffer.drain(..=pos);

                if line.is_empty() || line == "data: [DONE]" {
                    continue;
                }
                if let Some(data) = line.strip_prefix("data: ") {
                    if let Ok(json) = serde_json::from_str::<serde_json::Value>(data) {
                        if let Some(content) = json["choices"][0]["delta"]["content"].as_str() {
                            if tx.send(Ok(content.to_string())).await.is_err() {
                                // Receiver dropped: caller aborted the stream.
                                return;
                            }
                        }
                    }
                }
            }
        }
    }
}

#[async_trait]
impl TranscriptionProvider for OpenAiClient {
    async fn transcribe(&self, audio: Vec<u8>) -> Result<String, LlmError> {
        let part = reqwest::multipart::Part::bytes(audio)
            .file_name("audio.webm")
            .mime_str("audio/webm")
            .map_err(|e| LlmError::Api(e.to_string()))?;

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.transcribe_model.clone())
            .text("language", self.transcribe_language.clone());

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(LlmError::RateLimited);
            }
            return Err(LlmError::Api(format!(
                "Transcription Error {}: {}",
                status, text
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        json["text"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or(LlmError::InvalidResponse)
    }
}
