use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Medical file metadata. `uploaded_by_email` is a logical reference to
/// `users.email` and is not checked against the users table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalFile {
    pub id: i64,
    pub file_name: String,
    pub file_type: String,
    pub file_url: String,
    pub uploaded_by_email: String,
    pub uploaded_at: String,
}

/// Save metadata request
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveMetadataRequest {
    pub file_name: String,
    pub file_type: String,
    pub file_url: String,
    pub uploaded_by_email: String,
    /// Defaults to the time of the request
    pub uploaded_at: Option<DateTime<Utc>>,
}

/// Upload response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    pub file_url: String,
}

/// Fixed-width RFC 3339 so that string order is time order.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}
