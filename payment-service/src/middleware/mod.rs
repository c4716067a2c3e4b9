pub mod auth;

pub use auth::{auth_middleware, unreachable_classification, AuthUser};
