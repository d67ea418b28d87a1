use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{AppError, Result};

/// User model
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub gender: String,
    pub phone_number: String,
    pub password_hash: String,
    pub profile_image_path: Option<String>,
}

/// User response (without the password hash)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub gender: String,
    pub phone_number: String,
    pub profile_image_path: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            gender: user.gender,
            phone_number: user.phone_number,
            profile_image_path: user.profile_image_path,
        }
    }
}

/// Signup request
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignupRequest {
    pub full_name: String,
    pub email: String,
    pub gender: String,
    pub phone_number: String,
    pub password: String,
}

impl SignupRequest {
    /// All fields are required; no format checks beyond presence.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("fullName", &self.full_name),
            ("email", &self.email),
            ("gender", &self.gender),
            ("phoneNumber", &self.phone_number),
            ("password", &self.password),
        ];
        let missing: Vec<&str> = fields
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::BadRequest(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )))
        }
    }
}

/// Login request
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Profile update. Every text field overwrites the stored value, empty strings included.
#[derive(Debug, Default)]
pub struct UpdateProfileRequest {
    pub email: String,
    pub full_name: String,
    pub gender: String,
    pub phone_number: String,
    pub profile_image: Option<ProfileImage>,
}

/// Image payload from the update-profile form
#[derive(Debug)]
pub struct ProfileImage {
    pub file_name: Option<String>,
    pub data: bytes::Bytes,
}
