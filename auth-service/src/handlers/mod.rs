//! HTTP handlers for the identity service.

pub mod auth;
pub mod health;

pub use auth::*;
pub use health::*;
