use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Username already taken")]
    UsernameTaken,
    #[error("Login failed. Check username and password.")]
    InvalidCredentials,
    #[error("Internal error: {0}")]
    Internal(String),
}
