use axum::{
    extract::{Multipart, Path, State},
    Json,
};

use crate::error::{AppError, Result};
use crate::handlers::multipart_error;
use crate::models::{ProfileImage, UpdateProfileRequest, UserResponse};
use crate::services::UserService;
use crate::AppState;

/// Update profile fields and optionally the profile image
/// PUT /api/auth/update-profile
pub async fn update_profile(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UserResponse>> {
    let mut email: Option<String> = None;
    let mut req = UpdateProfileRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Failed to process multipart", e))?
    {
        let name = field.name().unwrap_or("").to_string();

        if name == "profileImage" {
            let file_name = field.file_name().map(|s| s.to_string());
            let data = field
                .bytes()
                .await
                .map_err(|e| multipart_error("Failed to read file", e))?;
            req.profile_image = Some(ProfileImage { file_name, data });
            continue;
        }

        let target = match name.as_str() {
            "email" => email.get_or_insert_with(String::new),
            "fullName" => &mut req.full_name,
            "gender" => &mut req.gender,
            "phoneNumber" => &mut req.phone_number,
            _ => continue,
        };
        *target = field
            .text()
            .await
            .map_err(|e| multipart_error(&format!("Failed to read field {}", name), e))?;
    }

    req.email = email.ok_or_else(|| AppError::BadRequest("Email is required".to_string()))?;

    let profile = UserService::update_profile(&state.db, &state.storage, req).await?;
    Ok(Json(profile))
}

/// Get a user by email
/// GET /api/auth/get-user/:email
pub async fn get_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<UserResponse>> {
    let profile = UserService::get_profile(&state.db, &email).await?;
    Ok(Json(profile))
}
