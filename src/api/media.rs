use actix_multipart::Multipart;
use actix_web::{post, web, HttpResponse};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use futures_util::TryStreamExt;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::models::{TranscribeRequest, TranscribeResponse, UploadResponse};
use crate::config::AppConfig;
use crate::llm::TranscriptionProvider;

/// Forwards base64-encoded audio to the hosted transcription API and
/// returns the transcript. No retry on upstream failure.
#[post("/transcribe")]
pub async fn transcribe(
    stt: web::Data<Arc<dyn TranscriptionProvider>>,
    req: web::Json<TranscribeRequest>,
) -> Result<HttpResponse, ApiError> {
    let audio = match req.into_inner().audio {
        Some(a) if !a.is_empty() => a,
        _ => return Err(ApiError::bad_request("No audio data provided")),
    };

    let bytes = BASE64
        .decode(audio.as_bytes())
        .map_err(|_| ApiError::bad_request("Invalid base64 audio payload"))?;

    match stt.transcribe(bytes).await {
        Ok(text) => Ok(HttpResponse::Ok().json(TranscribeResponse { text })),
        Err(e) => {
            error!("Transcription error: {}", e);
            Err(ApiError::internal("Failed to transcribe audio"))
        }
    }
}

/// Persists one multipart file under the public uploads directory with a
/// randomized name and returns its public URL. No dedup, no server-side
/// size cap.
#[post("/upload")]
pub async fn upload(
    config: web::Data<AppConfig>,
    mut payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?
    {
        let disposition = field.content_disposition();
        if disposition.get_name() != Some("file") {
            continue;
        }

        let original_name = disposition
            .get_filename()
            .unwrap_or("file")
            .to_string();
        let content_type = field
            .content_type()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let extension = field
            .content_type()
            .map(|m| m.subtype().as_str().to_string())
            .unwrap_or_default();

        let mut data: Vec<u8> = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| ApiError::bad_request(e.to_string()))?
        {
            data.extend_from_slice(&chunk);
        }

        let stored_name = if extension.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            format!("{}.{}", Uuid::new_v4(), extension)
        };

        let dir = Path::new(&config.uploads.dir);
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to store file: {}", e)))?;
        tokio::fs::write(dir.join(&stored_name), &data)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to store file: {}", e)))?;

        info!("Stored upload {} ({} bytes) as {}", original_name, data.len(), stored_name);

        return Ok(HttpResponse::Ok().json(UploadResponse {
            url: format!("/uploads/{}", stored_name),
            filename: original_name,
            size: data.len(),
            content_type,
        }));
    }

    Err(ApiError::bad_request("No file provided"))
}
