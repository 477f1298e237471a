use actix_web::{test, web, App};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::Sender;

use optimaize::api::relay::chat_relay;
use optimaize::config::{
    AppConfig, AuthConfig, DatabaseConfig, OpenAiConfig, RelayConfig, ServerConfig, UploadConfig,
};
use optimaize::llm::{
    models::{ChatOptions, Message},
    CompletionProvider, LlmError,
};

fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            path: ":memory:".to_string(),
        },
        auth: AuthConfig {
            api_keys: vec!["test-key".to_string()],
        },
        openai: OpenAiConfig {
            api_base: "http://127.0.0.1:1".to_string(),
            api_key: "unused".to_string(),
            chat_model: "gpt-test".to_string(),
            transcribe_model: "whisper-1".to_string(),
            transcribe_language: "en".to_string(),
        },
        relay: RelayConfig::default(),
        uploads: UploadConfig::default(),
    }
}

/// Replays a fixed token script and records every message list it was
/// handed, standing in for the hosted completion API.
struct ScriptedProvider {
    chunks: Vec<&'static str>,
    fail_after_chunks: bool,
    seen: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedProvider {
    fn new(chunks: Vec<&'static str>) -> Self {
        Self {
            chunks,
            fail_after_chunks: false,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Fails before the first token when `chunks` is empty, otherwise
    /// mid-stream after replaying them.
    fn failing_after(chunks: Vec<&'static str>) -> Self {
        Self {
            chunks,
            fail_after_chunks: true,
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn stream_chat(
        &self,
        messages: &[Message],
        _options: ChatOptions,
        tx: Sender<Result<String, LlmError>>,
    ) {
        self.seen.lock().unwrap().push(messages.to_vec());

        for chunk in &self.chunks {
            if tx.send(Ok(chunk.to_string())).await.is_err() {
                return;
            }
        }

        if self.fail_after_chunks {
            let _ = tx.send(Err(LlmError::Api("upstream down".to_string()))).await;
        }
    }
}

macro_rules! relay_app {
    ($provider:expr) => {{
        let dyn_provider: Arc<dyn CompletionProvider> = $provider;
        test::init_service(
            App::new()
                .app_data(web::Data::new(test_config()))
                .app_data(web::Data::new(dyn_provider))
                .service(web::scope("/api").service(chat_relay)),
        )
        .await
    }};
}

#[actix_web::test]
async fn relay_concatenates_chunks_in_order() {
    let provider = Arc::new(ScriptedProvider::new(vec!["Hel", "lo"]));
    let app = relay_app!(provider.clone());

    let req = test::TestRequest::post()
        .uri("/api/chat")
        .set_json(serde_json::json!({
            "messages": [{"role": "user", "content": "Say hello"}]
        }))
        .to_request();

    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(&body[..], b"Hello");
}

#[actix_web::test]
async fn relay_without_context_forwards_messages_unmodified() {
    let provider = Arc::new(ScriptedProvider::new(vec!["ok"]));
    let app = relay_app!(provider.clone());

    let req = test::TestRequest::post()
        .uri("/api/chat")
        .set_json(serde_json::json!({
            "messages": [
                {"role": "user", "content": "first"},
                {"role": "assistant", "content": "second"},
                {"role": "user", "content": "third"}
            ]
        }))
        .to_request();

    let _ = test::call_and_read_body(&app, req).await;

    let seen = provider.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let forwarded = &seen[0];
    assert_eq!(forwarded.len(), 3);
    assert_eq!(forwarded[0].role, "user");
    assert_eq!(forwarded[0].content, "first");
    assert_eq!(forwarded[2].content, "third");
}

#[actix_web::test]
async fn relay_prepends_composed_system_message() {
    let provider = Arc::new(ScriptedProvider::new(vec!["ok"]));
    let app = relay_app!(provider.clone());

    let req = test::TestRequest::post()
        .uri("/api/chat")
        .set_json(serde_json::json!({
            "messages": [{"role": "user", "content": "hi"}],
            "promptContent": "Review this.",
            "roleContent": "Be strict.",
            "userProfile": {"name": "Ann"}
        }))
        .to_request();

    let _ = test::call_and_read_body(&app, req).await;

    let seen = provider.seen.lock().unwrap();
    let forwarded = &seen[0];
    assert_eq!(forwarded.len(), 2);
    assert_eq!(forwarded[0].role, "system");
    assert!(forwarded[0].content.contains("Review this."));
    assert!(forwarded[0].content.contains("Role Instructions:"));
    assert!(forwarded[0].content.contains("Name: Ann"));
    assert_eq!(forwarded[1].role, "user");
}

#[actix_web::test]
async fn relay_failure_before_streaming_is_a_json_500() {
    let app = relay_app!(Arc::new(ScriptedProvider::failing_after(vec![])));

    let req = test::TestRequest::post()
        .uri("/api/chat")
        .set_json(serde_json::json!({
            "messages": [{"role": "user", "content": "hi"}]
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 500);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body.get("error").is_some());
}

#[actix_web::test]
async fn relay_failure_mid_stream_keeps_partial_output() {
    let app = relay_app!(Arc::new(ScriptedProvider::failing_after(vec!["Hel", "lo"])));

    let req = test::TestRequest::post()
        .uri("/api/chat")
        .set_json(serde_json::json!({
            "messages": [{"role": "user", "content": "hi"}]
        }))
        .to_request();

    // Headers are already out when the upstream dies, so the status is 200
    // and the chunked body carries everything sent before the error.
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    use actix_web::body::MessageBody;
    let (_, resp) = resp.into_parts();
    let mut body = std::pin::pin!(resp.into_body());

    let mut collected = String::new();
    let mut terminated_with_error = false;
    loop {
        match futures_util::future::poll_fn(|cx| body.as_mut().poll_next(cx)).await {
            Some(Ok(bytes)) => collected.push_str(&String::from_utf8_lossy(&bytes)),
            Some(Err(_)) => {
                terminated_with_error = true;
                break;
            }
            None => break,
        }
    }

    assert_eq!(collected, "Hello");
    assert!(terminated_with_error);
}

#[actix_web::test]
async fn relay_empty_upstream_yields_empty_body() {
    let provider = Arc::new(ScriptedProvider::new(vec![]));
    let app = relay_app!(provider);

    let req = test::TestRequest::post()
        .uri("/api/chat")
        .set_json(serde_json::json!({
            "messages": [{"role": "user", "content": "hi"}]
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let body = test::read_body(resp).await;
    assert!(body.is_empty());
}
