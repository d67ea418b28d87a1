use axum::{extract::State, Json};

use crate::error::{MessageResponse, Result};
use crate::models::{LoginRequest, SignupRequest};
use crate::services::AuthService;
use crate::AppState;

/// Register a new user
/// POST /api/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<MessageResponse>> {
    AuthService::signup(&state.db, state.config.security.password_scheme, req).await?;
    Ok(Json(MessageResponse::new("Signup successful")))
}

/// Check credentials. No session is issued.
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<MessageResponse>> {
    AuthService::login(&state.db, state.config.security.password_scheme, req).await?;
    Ok(Json(MessageResponse::new("Login successful")))
}
