use anyhow::Result;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement, TransactionTrait,
};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod error;
pub mod migrator;
pub mod repositories;

pub use error::StoreError;
pub use repositories::account::{Account, AccountRepository, AccountUpdate, NewAccount};
pub use repositories::node::{NewNode, Node, NodeRepository, NodeUpdate};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if let Some(path_str) = sqlite_file_path(db_url) {
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    #[must_use]
    pub const fn accounts(&self) -> AccountRepository<'_, DatabaseConnection> {
        AccountRepository::new(&self.conn)
    }

    #[must_use]
    pub const fn nodes(&self) -> NodeRepository<'_, DatabaseConnection> {
        NodeRepository::new(&self.conn)
    }

    /// Read-modify-write inside one transaction.
    pub async fn update_account(
        &self,
        id: i32,
        update: AccountUpdate,
    ) -> Result<Option<Account>, StoreError> {
        let txn = self.conn.begin().await?;
        let account = AccountRepository::new(&txn).update(id, update).await?;
        txn.commit().await?;
        Ok(account)
    }

    pub async fn update_node(&self, id: i32, update: NodeUpdate) -> Result<Option<Node>, StoreError> {
        let txn = self.conn.begin().await?;
        let node = NodeRepository::new(&txn).update(id, update).await?;
        txn.commit().await?;
        Ok(node)
    }
}

/// On-disk path of a `sqlite:` URL, or `None` for other backends and in-memory databases.
fn sqlite_file_path(db_url: &str) -> Option<&str> {
    let rest = db_url.strip_prefix("sqlite:")?;
    let rest = rest.strip_prefix("//").unwrap_or(rest);
    let path = rest.split('?').next().unwrap_or(rest);

    if path.is_empty() || path.starts_with(":memory:") {
        return None;
    }
    Some(path)
}
