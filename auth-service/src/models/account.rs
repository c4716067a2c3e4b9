//! Registered account.

use uuid::Uuid;

/// Account record. Created on registration, never mutated or deleted.
///
/// Emails are stored exactly as received; no uniqueness is enforced.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub password_hash: String,
}

impl Account {
    pub fn new(email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email,
            password_hash,
        }
    }
}
