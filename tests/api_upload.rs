use actix_web::{test, web, App};

use optimaize::api::media::upload;
use optimaize::config::{
    AppConfig, AuthConfig, DatabaseConfig, OpenAiConfig, RelayConfig, ServerConfig, UploadConfig,
};

fn test_config(uploads_dir: &str) -> AppConfig {
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
        uploads: UploadConfig {
            dir: uploads_dir.to_string(),
        },
    }
}

const BOUNDARY: &str = "------------------------abcdef0123456789";

fn multipart_body(field_name: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field_name, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

#[actix_web::test]
async fn upload_stores_file_and_returns_public_url() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path().to_str().unwrap());

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(config))
            .service(web::scope("/api").service(upload)),
    )
    .await;

    let body = multipart_body("file", "note.txt", "text/plain", b"hello upload");
    let req = test::TestRequest::post()
        .uri("/api/upload")
        .insert_header((
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(body)
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let json: serde_json::Value = test::read_body_json(resp).await;
    let url = json["url"].as_str().unwrap();
    assert!(url.starts_with("/uploads/"));
    assert!(url.ends_with(".plain"));
    assert_eq!(json["filename"], "note.txt");
    assert_eq!(json["size"], 12);

    let stored = dir.path().join(url.trim_start_matches("/uploads/"));
    let on_disk = std::fs::read(stored).unwrap();
    assert_eq!(on_disk, b"hello upload");
}

#[actix_web::test]
async fn upload_without_file_field_is_a_400() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path().to_str().unwrap());

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(config))
            .service(web::scope("/api").service(upload)),
    )
    .await;

    let body = multipart_body("attachment", "note.txt", "text/plain", b"hello");
    let req = test::TestRequest::post()
        .uri("/api/upload")
        .insert_header((
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(body)
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let json: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(json["error"], "No file provided");
    assert_eq!(json["status"], "error");

    // Nothing written for a rejected upload
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
