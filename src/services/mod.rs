pub mod auth;
pub mod file;
pub mod password;
pub mod user;

pub use auth::AuthService;
pub use file::FileService;
pub use password::PasswordScheme;
pub use user::UserService;
