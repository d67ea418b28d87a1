use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::{LoginRequest, SignupRequest, User};
use crate::services::PasswordScheme;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Authentication service
pub struct AuthService;

impl AuthService {
    /// Register a new user.
    ///
    /// The existence check and the insert are separate statements, so two
    /// concurrent signups with the same email can both succeed.
    pub async fn signup(db: &Database, scheme: PasswordScheme, req: SignupRequest) -> Result<()> {
        req.validate()?;

        let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?")
            .bind(&req.email)
            .fetch_optional(db.pool())
            .await?;

        if existing.is_some() {
            return Err(AppError::Conflict("Email already registered.".to_string()));
        }

        let password_hash = scheme.hash(&req.password)?;

        let result = sqlx::query(
            r#"
            INSERT INTO users (full_name, email, gender, phone_number, password_hash)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&req.full_name)
        .bind(&req.email)
        .bind(&req.gender)
        .bind(&req.phone_number)
        .bind(&password_hash)
        .execute(db.pool())
        .await?;

        tracing::info!("Registered user {} ({})", result.last_insert_rowid(), req.email);
        Ok(())
    }

    /// Check credentials. Unknown email and wrong password fail identically.
    pub async fn login(db: &Database, scheme: PasswordScheme, req: LoginRequest) -> Result<()> {
        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = ?")
            .bind(&req.email)
            .fetch_optional(db.pool())
            .await?;

        let verified = match &user {
            Some(user) => scheme.verify(&req.password, &user.password_hash)?,
            None => false,
        };

        if !verified {
            tracing::warn!("Rejected login for {}", req.email);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        Ok(())
    }
}
