use bytes::Bytes;
use chrono::Utc;

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::{format_timestamp, MedicalFile, SaveMetadataRequest, UploadResponse};
use crate::storage::{blob_name_from_url, sanitize_file_name, BlobArea, StorageManager};

/// Medical file service
pub struct FileService;

impl FileService {
    /// Store an upload under its original name, replacing any blob with that name.
    /// No metadata is written; clients follow up with `save_metadata`.
    pub async fn upload_file(
        storage: &StorageManager,
        file_name: Option<&str>,
        data: Bytes,
        base_url: &str,
    ) -> Result<UploadResponse> {
        if data.is_empty() {
            return Err(AppError::BadRequest("No file uploaded.".to_string()));
        }

        let file_name = file_name
            .and_then(sanitize_file_name)
            .ok_or_else(|| AppError::BadRequest("Invalid file name".to_string()))?;

        storage
            .provider(BlobArea::Uploads)
            .put(&file_name, data)
            .await?;

        let file_url = format!(
            "{}{}/{}",
            base_url.trim_end_matches('/'),
            BlobArea::Uploads.route(),
            urlencoding::encode(&file_name)
        );
        tracing::info!("Uploaded {}", file_url);

        Ok(UploadResponse {
            message: "File uploaded successfully".to_string(),
            file_url,
        })
    }

    /// Persist a metadata record. The URL and uploader email are taken as given.
    pub async fn save_metadata(db: &Database, req: SaveMetadataRequest) -> Result<MedicalFile> {
        if req.file_name.is_empty() || req.file_url.is_empty() {
            return Err(AppError::BadRequest("Missing required fields.".to_string()));
        }

        let uploaded_at = format_timestamp(req.uploaded_at.unwrap_or_else(Utc::now));

        let id = sqlx::query(
            r#"
            INSERT INTO medical_files (file_name, file_type, file_url, uploaded_by_email, uploaded_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&req.file_name)
        .bind(&req.file_type)
        .bind(&req.file_url)
        .bind(&req.uploaded_by_email)
        .bind(&uploaded_at)
        .execute(db.pool())
        .await?
        .last_insert_rowid();

        Self::get_file(db, id).await
    }

    /// Get a file record by id
    pub async fn get_file(db: &Database, id: i64) -> Result<MedicalFile> {
        let file: MedicalFile = sqlx::query_as("SELECT * FROM medical_files WHERE id = ?")
            .bind(id)
            .fetch_optional(db.pool())
            .await?
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        Ok(file)
    }

    /// All files uploaded by `email`, most recent first
    pub async fn list_by_email(db: &Database, email: &str) -> Result<Vec<MedicalFile>> {
        let files: Vec<MedicalFile> = sqlx::query_as(
            r#"
            SELECT * FROM medical_files
            WHERE uploaded_by_email = ?
            ORDER BY uploaded_at DESC, id DESC
            "#,
        )
        .bind(email)
        .fetch_all(db.pool())
        .await?;

        Ok(files)
    }

    /// Delete the backing blob (if present), then the record.
    pub async fn delete_file(db: &Database, storage: &StorageManager, id: i64) -> Result<()> {
        let file = Self::get_file(db, id).await?;

        match blob_name_from_url(&file.file_url) {
            Some(name) => {
                if !storage.provider(BlobArea::Uploads).delete(&name).await? {
                    tracing::warn!("Blob {} for file {} was already gone", name, id);
                }
            }
            None => tracing::warn!("File {} has no blob name in URL {}", id, file.file_url),
        }

        sqlx::query("DELETE FROM medical_files WHERE id = ?")
            .bind(id)
            .execute(db.pool())
            .await?;

        tracing::info!("Deleted file {}", id);
        Ok(())
    }
}
