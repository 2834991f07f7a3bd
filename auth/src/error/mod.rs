mod auth_error;

pub use auth_error::AuthError;
pub type Result<T> = std::result::Result<T, AuthError>;
