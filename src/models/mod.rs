pub mod medical_file;
pub mod user;

pub use medical_file::*;
pub use user::*;
