use actix_web::{test, web, App};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::sync::{Arc, Mutex};

use optimaize::api::media::transcribe;
use optimaize::llm::{LlmError, TranscriptionProvider};

/// Returns a canned transcript (or a canned failure) and records the audio
/// payloads it received.
struct ScriptedTranscriber {
    reply: Result<&'static str, ()>,
    received: Mutex<Vec<Vec<u8>>>,
}

impl ScriptedTranscriber {
    fn replying(text: &'static str) -> Self {
        Self {
            reply: Ok(text),
            received: Mutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            reply: Err(()),
            received: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TranscriptionProvider for ScriptedTranscriber {
    async fn transcribe(&self, audio: Vec<u8>) -> Result<String, LlmError> {
        self.received.lock().unwrap().push(audio);
        match self.reply {
            Ok(text) => Ok(text.to_string()),
            Err(()) => Err(LlmError::Api("upstream down".to_string())),
        }
    }
}

macro_rules! transcribe_app {
    ($stt:expr) => {{
        let dyn_stt: Arc<dyn TranscriptionProvider> = $stt;
        test::init_service(
            App::new()
                .app_data(web::Data::new(dyn_stt))
                .service(web::scope("/api").service(transcribe)),
        )
        .await
    }};
}

#[actix_web::test]
async fn transcribe_decodes_audio_and_returns_text() {
    let stt = Arc::new(ScriptedTranscriber::replying("hello world"));
    let app = transcribe_app!(stt.clone());

    let req = test::TestRequest::post()
        .uri("/api/transcribe")
        .set_json(serde_json::json!({"audio": BASE64.encode(b"fake-webm-bytes")}))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["text"], "hello world");

    let received = stt.received.lock().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0], b"fake-webm-bytes");
}

#[actix_web::test]
async fn transcribe_without_audio_is_a_400() {
    let app = transcribe_app!(Arc::new(ScriptedTranscriber::replying("unused")));

    for payload in [
        serde_json::json!({}),
        serde_json::json!({"audio": null}),
        serde_json::json!({"audio": ""}),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/transcribe")
            .set_json(payload)
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "No audio data provided");
    }
}

#[actix_web::test]
async fn transcribe_rejects_invalid_base64() {
    let stt = Arc::new(ScriptedTranscriber::replying("unused"));
    let app = transcribe_app!(stt.clone());

    let req = test::TestRequest::post()
        .uri("/api/transcribe")
        .set_json(serde_json::json!({"audio": "not base64!!!"}))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid base64 audio payload");

    // Upstream is never called for a bad payload
    assert!(stt.received.lock().unwrap().is_empty());
}

#[actix_web::test]
async fn transcribe_upstream_failure_is_a_500() {
    let app = transcribe_app!(Arc::new(ScriptedTranscriber::failing()));

    let req = test::TestRequest::post()
        .uri("/api/transcribe")
        .set_json(serde_json::json!({"audio": BASE64.encode(b"audio")}))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 500);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Failed to transcribe audio");
    assert_eq!(body["statusCode"], 500);
}
