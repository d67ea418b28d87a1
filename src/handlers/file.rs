use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderMap},
    Json,
};
use bytes::Bytes;

use crate::config::Config;
use crate::error::{AppError, MessageResponse, Result};
use crate::handlers::multipart_error;
use crate::models::{MedicalFile, SaveMetadataRequest, UploadResponse};
use crate::services::FileService;
use crate::AppState;

/// Upload a file into the uploads area
/// POST /api/auth/upload
pub async fn upload_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let mut file: Option<(Option<String>, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Failed to process multipart", e))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().map(|s| s.to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error("Failed to read file", e))?;
        file = Some((file_name, data));
    }

    let (file_name, data) =
        file.ok_or_else(|| AppError::BadRequest("No file uploaded.".to_string()))?;

    let base_url = public_base_url(&state.config, &headers);
    let response =
        FileService::upload_file(&state.storage, file_name.as_deref(), data, &base_url).await?;
    Ok(Json(response))
}

/// Save metadata for an uploaded file
/// POST /api/auth/upload-metadata
pub async fn save_metadata(
    State(state): State<AppState>,
    Json(req): Json<SaveMetadataRequest>,
) -> Result<Json<MedicalFile>> {
    let file = FileService::save_metadata(&state.db, req).await?;
    Ok(Json(file))
}

/// List files uploaded by an email, newest first
/// GET /api/auth/files/:email
pub async fn files_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Vec<MedicalFile>>> {
    let files = FileService::list_by_email(&state.db, &email).await?;
    Ok(Json(files))
}

/// Delete a file record and its blob
/// DELETE /api/auth/file/:id
pub async fn delete_file(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>> {
    FileService::delete_file(&state.db, &state.storage, id).await?;
    Ok(Json(MessageResponse::new("File deleted")))
}

/// Scheme and host the client used, unless a public base URL is configured
fn public_base_url(config: &Config, headers: &HeaderMap) -> String {
    if let Some(base) = &config.server.public_base_url {
        return base.trim_end_matches('/').to_string();
    }

    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "http".to_string());

    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("localhost:{}", config.server.port));

    format!("{}://{}", scheme, host)
}
