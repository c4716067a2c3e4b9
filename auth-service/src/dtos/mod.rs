pub mod auth;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error body documented for the OpenAPI schema; matches `service_core::error::ErrorResponse`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Invalid credentials")]
    pub error: String,
}
