use service_core::error::{AppError, AuthFailure};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Password hashing failed: {0}")]
    Hashing(anyhow::Error),

    #[error("Storage error: {0}")]
    Storage(anyhow::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ServiceError {
    /// Short machine-readable kind for the security log.
    pub fn kind(&self) -> String {
        match self {
            ServiceError::InvalidCredentials => "InvalidCredentials".to_string(),
            ServiceError::InvalidToken(e) => format!("{:?}", e.kind()),
            ServiceError::Hashing(_) => "Hashing".to_string(),
            ServiceError::Storage(_) => "Storage".to_string(),
            ServiceError::Internal(_) => "Internal".to_string(),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidCredentials => AppError::AuthError(AuthFailure::InvalidCredentials),
            ServiceError::InvalidToken(_) => AppError::AuthError(AuthFailure::InvalidToken),
            ServiceError::Hashing(e) | ServiceError::Storage(e) | ServiceError::Internal(e) => {
                AppError::InternalError(e)
            }
        }
    }
}
