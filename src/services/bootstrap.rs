//! Startup seeding of the administrator account.

use sea_orm::ConnectionTrait;
use tracing::{info, warn};

use crate::config::AdminConfig;
use crate::db::{AccountRepository, NewAccount, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    AlreadyPresent,
    Created { id: i32 },
}

/// Make sure the configured administrator exists.
///
/// An existing account is never modified, so changing `admin.password` after
/// the first start has no effect.
pub async fn ensure_admin<C: ConnectionTrait>(
    conn: &C,
    admin: &AdminConfig,
) -> Result<BootstrapOutcome, StoreError> {
    let accounts = AccountRepository::new(conn);

    if let Some(existing) = accounts.find_by_username(&admin.username).await? {
        if !existing.is_admin {
            warn!(
                "Configured administrator '{}' exists but is not flagged as admin",
                existing.username
            );
        }
        return Ok(BootstrapOutcome::AlreadyPresent);
    }

    seed_admin(&accounts, admin).await
}

/// Insert step of [`ensure_admin`]; losing the insert to a concurrent
/// creator counts as already present.
async fn seed_admin<C: ConnectionTrait>(
    accounts: &AccountRepository<'_, C>,
    admin: &AdminConfig,
) -> Result<BootstrapOutcome, StoreError> {
    let new = NewAccount {
        is_admin: true,
        ..NewAccount::new(admin.username.as_str(), admin.password.as_str())
    };

    match accounts.create(new).await {
        Ok(account) => {
            info!("Administrator account '{}' created", account.username);
            Ok(BootstrapOutcome::Created { id: account.id })
        }
        // Another process created it between the lookup and the insert
        Err(StoreError::AlreadyExists(_)) => Ok(BootstrapOutcome::AlreadyPresent),
        Err(e) => Err(e),
    }
}
