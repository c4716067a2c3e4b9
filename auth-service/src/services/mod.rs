//! Business logic for the identity service: accounts, credentials and tokens.

mod auth;
pub mod error;
mod jwt;
mod repository;

pub use auth::{AuthService, IssuedToken, RegisteredAccount, VerifiedToken};
pub use error::ServiceError;
pub use jwt::{Claims, JwtService};
pub use repository::{AccountRepository, InMemoryAccountRepository};
