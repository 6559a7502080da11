//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::task;

use crate::auth::{TokenError, TokenIssuer, verify_dummy, verify_password};
use crate::constants::token::TOKEN_TYPE;
use crate::db::{Account, Store};
use crate::services::auth_service::{AuthError, AuthService, IssuedToken};

pub struct SeaOrmAuthService {
    store: Store,
    tokens: Arc<TokenIssuer>,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, tokens: Arc<TokenIssuer>) -> Self {
        Self { store, tokens }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(&self, username: &str, password: &str) -> Result<IssuedToken, AuthError> {
        let account = self.store.accounts().find_by_username(username).await?;

        // Argon2 verification is CPU-bound
        let password = password.to_string();

        let Some(account) = account else {
            task::spawn_blocking(move || verify_dummy(&password))
                .await
                .map_err(|e| AuthError::Internal(format!("Password verification task failed: {e}")))?;
            tracing::debug!("Login attempt for unknown account");
            return Err(AuthError::InvalidCredentials);
        };

        let digest = account.password_hash.clone();
        let is_valid = task::spawn_blocking(move || verify_password(&password, &digest))
            .await
            .map_err(|e| AuthError::Internal(format!("Password verification task failed: {e}")))?;

        if !is_valid {
            tracing::debug!(account_id = account.id, "Login attempt with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = self
            .tokens
            .issue(&account.username)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        tracing::info!(account_id = account.id, "Issued token for {}", account.username);

        Ok(IssuedToken {
            access_token,
            token_type: TOKEN_TYPE,
        })
    }

    async fn authenticate(&self, token: &str) -> Result<Account, AuthError> {
        let username = self.tokens.verify(token).map_err(|e| {
            if matches!(e, TokenError::Expired) {
                tracing::debug!("Rejected expired token");
            }
            AuthError::InvalidToken
        })?;

        self.store
            .accounts()
            .find_by_username(&username)
            .await?
            .ok_or(AuthError::InvalidToken)
    }

    async fn authorize_admin(&self, token: &str) -> Result<Account, AuthError> {
        let account = self.authenticate(token).await?;

        if !account.is_admin || !account.is_active {
            tracing::warn!(account_id = account.id, "Non-admin token used on admin route");
            return Err(AuthError::Forbidden);
        }

        Ok(account)
    }
}
