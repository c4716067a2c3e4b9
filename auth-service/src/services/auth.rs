use std::sync::Arc;

use crate::{
    models::Account,
    services::{AccountRepository, Claims, JwtService, ServiceError},
    utils::{hash_password, verify_password, Password, PasswordHashString, DUMMY_HASH},
};

/// Result of a successful registration.
#[derive(Debug, Clone)]
pub struct RegisteredAccount {
    pub account_id: String,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub account_id: String,
}

/// Identity carried by a valid token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub account_id: String,
    pub email: String,
}

impl From<Claims> for VerifiedToken {
    fn from(claims: Claims) -> Self {
        Self {
            account_id: claims.sub,
            email: claims.email,
        }
    }
}

#[derive(Clone)]
pub struct AuthService {
    accounts: Arc<dyn AccountRepository>,
    jwt: JwtService,
}

impl AuthService {
    pub fn new(accounts: Arc<dyn AccountRepository>, jwt: JwtService) -> Self {
        Self { accounts, jwt }
    }

    /// Store a new account with a salted hash of `password`.
    ///
    /// Registering an email twice creates a second account.
    pub async fn register(
        &self,
        email: String,
        password: Password,
    ) -> Result<RegisteredAccount, ServiceError> {
        let hash = run_blocking(move || hash_password(&password))
            .await
            .map_err(ServiceError::Hashing)?;

        let account = Account::new(email, hash.into_string());
        let account_id = account.id.clone();

        self.accounts
            .save(account)
            .await
            .map_err(ServiceError::Storage)?;

        Ok(RegisteredAccount { account_id })
    }

    /// Check credentials and issue a token.
    ///
    /// Unknown email and wrong password both fail with `InvalidCredentials`,
    /// and both pay for one hash verification.
    pub async fn login(
        &self,
        email: &str,
        password: Password,
    ) -> Result<IssuedToken, ServiceError> {
        let account = self
            .accounts
            .find_by_email(email)
            .await
            .map_err(ServiceError::Storage)?;

        let stored_hash = PasswordHashString::new(
            account
                .as_ref()
                .map(|a| a.password_hash.clone())
                .unwrap_or_else(|| DUMMY_HASH.to_string()),
        );

        let matches = run_blocking(move || Ok(verify_password(&password, &stored_hash).is_ok()))
            .await
            .map_err(ServiceError::Internal)?;

        let account = match account {
            Some(account) if matches => account,
            _ => return Err(ServiceError::InvalidCredentials),
        };

        let token = self.jwt.generate_token(&account.id, &account.email)?;

        Ok(IssuedToken {
            token,
            account_id: account.id,
        })
    }

    /// Validate a presented token. Stateless: signature and expiry only.
    pub fn verify(&self, token: &str) -> Result<VerifiedToken, ServiceError> {
        let claims = self.jwt.validate_token(token)?;
        Ok(claims.into())
    }
}

/// Run CPU-heavy hashing off the async workers.
async fn run_blocking<T, F>(f: F) -> Result<T, anyhow::Error>
where
    F: FnOnce() -> Result<T, anyhow::Error> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| anyhow::anyhow!("Hashing task failed: {}", e))?
}
