use axum::{extract::multipart::MultipartError, http::StatusCode};

use crate::error::AppError;

pub mod auth;
pub mod file;
pub mod user;

#[cfg(test)]
pub(crate) mod test_support;

/// Map a multipart read failure, keeping the 413 axum reports when the body limit is hit
pub(crate) fn multipart_error(context: &str, e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("{}: {}", context, e.body_text()))
    } else {
        AppError::BadRequest(format!("{}: {}", context, e))
    }
}
