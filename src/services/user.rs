use uuid::Uuid;

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::{UpdateProfileRequest, User, UserResponse};
use crate::storage::{sanitize_file_name, BlobArea, StorageManager};

/// User service
pub struct UserService;

impl UserService {
    /// Get user by email
    pub async fn get_by_email(db: &Database, email: &str) -> Result<User> {
        let user: User = sqlx::query_as("SELECT * FROM users WHERE email = ? ORDER BY id LIMIT 1")
            .bind(email)
            .fetch_optional(db.pool())
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(user)
    }

    /// Get user profile
    pub async fn get_profile(db: &Database, email: &str) -> Result<UserResponse> {
        let user = Self::get_by_email(db, email).await?;
        Ok(UserResponse::from(user))
    }

    /// Overwrite name, gender and phone, and replace the profile image when one is given.
    /// The previous image file is left on disk.
    pub async fn update_profile(
        db: &Database,
        storage: &StorageManager,
        req: UpdateProfileRequest,
    ) -> Result<UserResponse> {
        let user = Self::get_by_email(db, &req.email).await?;

        let mut profile_image_path = user.profile_image_path;
        if let Some(image) = req.profile_image.filter(|image| !image.data.is_empty()) {
            let file_name = Self::profile_image_name(image.file_name.as_deref());
            storage
                .provider(BlobArea::Profiles)
                .put(&file_name, image.data)
                .await?;

            tracing::info!("Stored profile image {} for user {}", file_name, user.id);
            profile_image_path = Some(format!("{}/{}", BlobArea::Profiles.route(), file_name));
        }

        sqlx::query(
            r#"
            UPDATE users
            SET full_name = ?, gender = ?, phone_number = ?, profile_image_path = ?
            WHERE id = ?
            "#,
        )
        .bind(&req.full_name)
        .bind(&req.gender)
        .bind(&req.phone_number)
        .bind(&profile_image_path)
        .bind(user.id)
        .execute(db.pool())
        .await?;

        let user: User = sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(user.id)
            .fetch_one(db.pool())
            .await?;
        Ok(UserResponse::from(user))
    }

    /// Fresh unique name keeping the original extension, if any.
    /// Everything after the last dot counts, so `.png` keeps `png`.
    fn profile_image_name(original: Option<&str>) -> String {
        let extension = original
            .and_then(sanitize_file_name)
            .and_then(|name| name.rsplit_once('.').map(|(_, ext)| ext.to_string()))
            .filter(|ext| !ext.is_empty());

        match extension {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProfileImage, SignupRequest};
    use crate::services::{AuthService, PasswordScheme};
    use bytes::Bytes;
    use tempfile::TempDir;

    async fn seeded_db(email: &str) -> Database {
        let db = Database::in_memory().await.unwrap();
        AuthService::signup(
            &db,
            PasswordScheme::Sha256,
            SignupRequest {
                full_name: "Original Name".to_string(),
                email: email.to_string(),
                gender: "other".to_string(),
                phone_number: "000".to_string(),
                password: "pw".to_string(),
            },
        )
        .await
        .unwrap();
        db
    }

    fn update(email: &str, image: Option<ProfileImage>) -> UpdateProfileRequest {
        UpdateProfileRequest {
            email: email.to_string(),
            full_name: "New Name".to_string(),
            gender: String::new(),
            phone_number: "111".to_string(),
            profile_image: image,
        }
    }

    fn image(name: &str, data: &'static [u8]) -> ProfileImage {
        ProfileImage {
            file_name: Some(name.to_string()),
            data: Bytes::from_static(data),
        }
    }

    #[test]
    fn test_profile_image_name_keeps_extension() {
        let name = UserService::profile_image_name(Some("me.jpeg"));
        assert!(name.ends_with(".jpeg"));
        assert_eq!(name.len(), 36 + ".jpeg".len());

        let bare = UserService::profile_image_name(Some("README"));
        assert_eq!(bare.len(), 36);
        assert!(!bare.contains('.'));

        let dotfile = UserService::profile_image_name(Some(".png"));
        assert!(dotfile.ends_with(".png"));
        assert_eq!(dotfile.len(), 36 + ".png".len());

        assert!(UserService::profile_image_name(Some("scan.tar.gz")).ends_with(".gz"));
        assert_eq!(UserService::profile_image_name(Some("trailing.")).len(), 36);
        assert_eq!(UserService::profile_image_name(None).len(), 36);

        assert_ne!(
            UserService::profile_image_name(Some("a.png")),
            UserService::profile_image_name(Some("a.png"))
        );
    }

    #[tokio::test]
    async fn test_update_unknown_user_is_not_found() {
        let temp = TempDir::new().unwrap();
        let db = Database::in_memory().await.unwrap();
        let storage = StorageManager::new(temp.path());

        let err = UserService::update_profile(&db, &storage, update("ghost@example.org", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_overwrites_fields_with_empty_values() {
        let temp = TempDir::new().unwrap();
        let db = seeded_db("u@example.org").await;
        let storage = StorageManager::new(temp.path());

        let profile = UserService::update_profile(&db, &storage, update("u@example.org", None))
            .await
            .unwrap();

        assert_eq!(profile.full_name, "New Name");
        assert_eq!(profile.gender, "");
        assert_eq!(profile.phone_number, "111");
        assert!(profile.profile_image_path.is_none());
    }

    #[tokio::test]
    async fn test_new_image_replaces_path_and_keeps_old_file() {
        let temp = TempDir::new().unwrap();
        let db = seeded_db("pic@example.org").await;
        let storage = StorageManager::new(temp.path());

        let first = UserService::update_profile(
            &db,
            &storage,
            update("pic@example.org", Some(image("one.png", b"first image"))),
        )
        .await
        .unwrap();
        let second = UserService::update_profile(
            &db,
            &storage,
            update("pic@example.org", Some(image("two.png", b"second image"))),
        )
        .await
        .unwrap();

        let first_path = first.profile_image_path.unwrap();
        let second_path = second.profile_image_path.unwrap();
        assert_ne!(first_path, second_path);
        assert!(second_path.starts_with("/profiles/"));
        assert!(second_path.ends_with(".png"));

        let old_name = first_path.trim_start_matches("/profiles/");
        assert_eq!(
            std::fs::read(temp.path().join("profiles").join(old_name)).unwrap(),
            b"first image"
        );
    }

    #[tokio::test]
    async fn test_empty_image_keeps_existing_path() {
        let temp = TempDir::new().unwrap();
        let db = seeded_db("keep@example.org").await;
        let storage = StorageManager::new(temp.path());

        let with_image = UserService::update_profile(
            &db,
            &storage,
            update("keep@example.org", Some(image("a.gif", b"gif"))),
        )
        .await
        .unwrap();
        let after_empty = UserService::update_profile(
            &db,
            &storage,
            update("keep@example.org", Some(image("b.gif", b""))),
        )
        .await
        .unwrap();

        assert_eq!(with_image.profile_image_path, after_empty.profile_image_path);
    }
}
