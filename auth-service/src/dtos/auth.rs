use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(
        required(message = "Email is required"),
        length(min = 1, message = "Email is required")
    )]
    #[schema(example = "alice@x.com")]
    pub email: Option<String>,

    #[validate(
        required(message = "Password is required"),
        length(min = 1, message = "Password is required")
    )]
    #[schema(example = "pw123")]
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    #[schema(example = "User registered successfully")]
    pub message: String,
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub user_id: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(
        required(message = "Email is required"),
        length(min = 1, message = "Email is required")
    )]
    #[schema(example = "alice@x.com")]
    pub email: Option<String>,

    #[validate(
        required(message = "Password is required"),
        length(min = 1, message = "Password is required")
    )]
    #[schema(example = "pw123")]
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub user_id: String,
}

/// Body form of a verification request. The `Authorization` header wins when both are sent.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct VerifyRequest {
    pub token: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "Invalid token")]
    pub error: Option<String>,
}

impl VerifyResponse {
    pub fn valid(user_id: String, email: String) -> Self {
        Self {
            valid: true,
            user_id: Some(user_id),
            email: Some(email),
            error: None,
        }
    }

    pub fn invalid(error: &str) -> Self {
        Self {
            valid: false,
            user_id: None,
            email: None,
            error: Some(error.to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    #[schema(example = "auth-service")]
    pub service: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}
