use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use std::fmt;
use tokio::task;
use tracing::info;
use uuid::Uuid;

use crate::auth::hash_password;
use crate::constants::traffic::{BYTES_PER_GB, DEFAULT_LIMIT_GB};
use crate::db::StoreError;
use crate::entities::{prelude::*, users};

/// Account row as seen by the rest of the crate.
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    /// External identifier (canonical UUID string)
    pub uuid: String,
    pub traffic_limit: i64,
    pub traffic_used: i64,
    pub due_date: Option<DateTime<Utc>>,
    pub is_admin: bool,
    pub is_active: bool,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("uuid", &self.uuid)
            .field("traffic_limit", &self.traffic_limit)
            .field("traffic_used", &self.traffic_used)
            .field("due_date", &self.due_date)
            .field("is_admin", &self.is_admin)
            .field("is_active", &self.is_active)
            .finish()
    }
}

impl Account {
    /// True once the due date has been reached. Accounts without one never expire.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.due_date.is_some_and(|due| due <= now)
    }
}

impl From<users::Model> for Account {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            password_hash: model.password_hash,
            uuid: model.uuid,
            traffic_limit: model.traffic_limit,
            traffic_used: model.traffic_used,
            due_date: model.due_date,
            is_admin: model.is_admin,
            is_active: model.is_active,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub password: String,
    pub traffic_limit_gb: f64,
    pub due_date: Option<DateTime<Utc>>,
    pub is_admin: bool,
}

impl NewAccount {
    /// Regular account with the default 100 GB limit and no expiry.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            traffic_limit_gb: DEFAULT_LIMIT_GB,
            due_date: None,
            is_admin: false,
        }
    }
}

/// Partial update; `None` leaves a field unchanged.
/// `due_date: Some(None)` clears the expiry.
#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    pub password: Option<String>,
    pub traffic_limit_gb: Option<f64>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub is_active: Option<bool>,
    pub is_admin: Option<bool>,
}

/// Convert a gigabyte amount to bytes (x 2^30), truncating.
/// Negative and NaN inputs become zero.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn gb_to_bytes(gb: f64) -> i64 {
    (gb.max(0.0) * BYTES_PER_GB as f64) as i64
}

async fn hash_blocking(password: String) -> Result<String, StoreError> {
    Ok(task::spawn_blocking(move || hash_password(&password)).await??)
}

/// Account queries over any connection or transaction.
pub struct AccountRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> AccountRepository<'a, C> {
    #[must_use]
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Account>, StoreError> {
        let row = Users::find_by_id(id).one(self.conn).await?;
        Ok(row.map(Account::from))
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let row = Users::find()
            .filter(users::Column::Username.eq(username))
            .one(self.conn)
            .await?;

        Ok(row.map(Account::from))
    }

    pub async fn find_by_uuid(&self, uuid: &str) -> Result<Option<Account>, StoreError> {
        let row = Users::find()
            .filter(users::Column::Uuid.eq(uuid))
            .one(self.conn)
            .await?;

        Ok(row.map(Account::from))
    }

    /// Accounts in insertion order.
    pub async fn list(&self, offset: u64, limit: u64) -> Result<Vec<Account>, StoreError> {
        let rows = Users::find()
            .order_by_asc(users::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(self.conn)
            .await?;

        Ok(rows.into_iter().map(Account::from).collect())
    }

    pub async fn count(&self) -> Result<u64, StoreError> {
        Ok(Users::find().count(self.conn).await?)
    }

    /// Hash the password, assign a fresh uuid and insert.
    ///
    /// # Errors
    ///
    /// [`StoreError::AlreadyExists`] when the username is taken.
    pub async fn create(&self, new: NewAccount) -> Result<Account, StoreError> {
        let password_hash = hash_blocking(new.password).await?;

        let active = users::ActiveModel {
            username: Set(new.username),
            password_hash: Set(password_hash),
            uuid: Set(Uuid::new_v4().to_string()),
            traffic_limit: Set(gb_to_bytes(new.traffic_limit_gb)),
            traffic_used: Set(0),
            due_date: Set(new.due_date),
            is_admin: Set(new.is_admin),
            is_active: Set(true),
            ..Default::default()
        };

        let model = active.insert(self.conn).await?;
        info!(account_id = model.id, "Created account {}", model.username);
        Ok(Account::from(model))
    }

    /// Returns `None` if no account has this id.
    pub async fn update(
        &self,
        id: i32,
        update: AccountUpdate,
    ) -> Result<Option<Account>, StoreError> {
        let Some(model) = Users::find_by_id(id).one(self.conn).await? else {
            return Ok(None);
        };

        let mut active: users::ActiveModel = model.clone().into();

        if let Some(password) = update.password {
            active.password_hash = Set(hash_blocking(password).await?);
        }
        if let Some(gb) = update.traffic_limit_gb {
            active.traffic_limit = Set(gb_to_bytes(gb));
        }
        if let Some(due_date) = update.due_date {
            active.due_date = Set(due_date);
        }
        if let Some(is_active) = update.is_active {
            active.is_active = Set(is_active);
        }
        if let Some(is_admin) = update.is_admin {
            active.is_admin = Set(is_admin);
        }

        if !active.is_changed() {
            return Ok(Some(Account::from(model)));
        }

        let model = active.update(self.conn).await?;
        Ok(Some(Account::from(model)))
    }

    pub async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let result = Users::delete_by_id(id).exec(self.conn).await?;
        Ok(result.rows_affected > 0)
    }
}
