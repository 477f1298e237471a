use actix_web::{post, web, HttpResponse};
use bytes::Bytes;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::error;

use crate::api::error::ApiError;
use crate::api::models::ChatRelayRequest;
use crate::config::AppConfig;
use crate::context::compose_system_message;
use crate::llm::{
    models::{ChatOptions, Message},
    CompletionProvider, LlmError,
};

/// Streaming chat-completion relay. Composes the system message from the
/// supplied prompt/role/profile context, forwards the conversation upstream
/// with fixed sampling parameters, and pipes tokens back as a chunked
/// plain-text body in arrival order.
///
/// The relay is stateless: nothing is persisted here. Clients append
/// whatever they want to keep through the chats API, including partial
/// output from an aborted generation.
#[post("/chat")]
pub async fn chat_relay(
    config: web::Data<AppConfig>,
    llm: web::Data<Arc<dyn CompletionProvider>>,
    req: web::Json<ChatRelayRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();

    let system = compose_system_message(
        req.prompt_content.as_deref(),
        req.role_content.as_deref(),
        req.user_profile.as_ref(),
    );

    let mut messages = req.messages;
    if !system.is_empty() {
        messages.insert(0, Message::system(system));
    }

    let options = ChatOptions {
        model: Some(config.openai.chat_model.clone()),
        temperature: Some(config.relay.temperature),
        max_tokens: Some(config.relay.max_tokens),
    };

    let (tx, mut rx) = mpsc::channel::<Result<String, LlmError>>(100);
    let provider = llm.as_ref().clone();

    // Producer runs in the background; dropping the receiver (client abort
    // or handler teardown) stops it on its next send.
    tokio::spawn(async move {
        provider.stream_chat(&messages, options, tx).await;
    });

    // An upstream failure before the first token is still a regular JSON
    // error response; once streaming has begun partial output stands.
    let first = match rx.recv().await {
        Some(Err(e)) => {
            error!("Completion request failed: {}", e);
            return Err(ApiError::internal(
                "There was an error processing your request",
            ));
        }
        Some(Ok(token)) => Some(token),
        None => None,
    };

    let stream = async_stream::stream! {
        let Some(token) = first else { return };
        yield Ok::<Bytes, actix_web::Error>(Bytes::from(token));

        while let Some(event) = rx.recv().await {
            match event {
                Ok(token) => yield Ok(Bytes::from(token)),
                Err(e) => {
                    error!("Stream failed mid-flight: {}", e);
                    yield Err(actix_web::error::ErrorInternalServerError("stream error"));
                    return;
                }
            }
        }
    };

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .insert_header(("Cache-Control", "no-cache"))
        .streaming(stream))
}
