//! Domain service for authentication.
//!
//! Handles password login, bearer token issuance and token-based account lookup.

use serde::Serialize;
use thiserror::Error;

use crate::db::{Account, StoreError};

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username or wrong password. Deliberately does not say which.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing, malformed, expired or forged token, or its account is gone.
    #[error("Invalid token")]
    InvalidToken,

    #[error("Forbidden")]
    Forbidden,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Token returned by a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: &'static str,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials and issues a bearer token for the account name.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown user or a wrong password.
    async fn login(&self, username: &str, password: &str) -> Result<IssuedToken, AuthError>;

    /// Resolves a bearer token to its account.
    async fn authenticate(&self, token: &str) -> Result<Account, AuthError>;

    /// Like [`AuthService::authenticate`], additionally requiring an active administrator.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Forbidden`] for valid tokens of non-admin or inactive accounts.
    async fn authorize_admin(&self, token: &str) -> Result<Account, AuthError>;
}
