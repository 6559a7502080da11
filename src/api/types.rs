use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::limits::DEFAULT_PAGE_SIZE;
use crate::constants::traffic::DEFAULT_LIMIT_GB;
use crate::db::{Account, AccountUpdate, NewAccount, NewNode, Node, NodeUpdate};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub offset: u64,
    #[serde(default = "default_page_size")]
    pub limit: u64,
}

const fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

// ============================================================================
// Accounts
// ============================================================================

/// Account as exposed over the API; never carries the password hash.
#[derive(Debug, Serialize)]
pub struct AccountDto {
    pub id: i32,
    pub username: String,
    pub uuid: String,
    pub traffic_limit: i64,
    pub traffic_used: i64,
    pub due_date: Option<DateTime<Utc>>,
    pub is_admin: bool,
    pub is_active: bool,
}

impl From<Account> for AccountDto {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
            uuid: account.uuid,
            traffic_limit: account.traffic_limit,
            traffic_used: account.traffic_used,
            due_date: account.due_date,
            is_admin: account.is_admin,
            is_active: account.is_active,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AccountCreateRequest {
    pub username: String,
    pub password: String,
    #[serde(default = "default_traffic_limit_gb")]
    pub traffic_limit_gb: f64,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_admin: bool,
}

const fn default_traffic_limit_gb() -> f64 {
    DEFAULT_LIMIT_GB
}

impl From<AccountCreateRequest> for NewAccount {
    fn from(req: AccountCreateRequest) -> Self {
        Self {
            username: req.username,
            password: req.password,
            traffic_limit_gb: req.traffic_limit_gb,
            due_date: req.due_date,
            is_admin: req.is_admin,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AccountUpdateRequest {
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub traffic_limit_gb: Option<f64>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub is_admin: Option<bool>,
}

impl From<AccountUpdateRequest> for AccountUpdate {
    fn from(req: AccountUpdateRequest) -> Self {
        Self {
            password: req.password,
            traffic_limit_gb: req.traffic_limit_gb,
            due_date: req.due_date,
            is_active: req.is_active,
            is_admin: req.is_admin,
        }
    }
}

// ============================================================================
// Nodes
// ============================================================================

#[derive(Debug, Serialize)]
pub struct NodeDto {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub port: i32,
    pub protocol: String,
    pub config_details: Option<String>,
    pub is_active: bool,
}

impl From<Node> for NodeDto {
    fn from(node: Node) -> Self {
        Self {
            id: node.id,
            name: node.name,
            address: node.address,
            port: node.port,
            protocol: node.protocol,
            config_details: node.config_details,
            is_active: node.is_active,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NodeCreateRequest {
    pub name: String,
    pub address: String,
    pub port: i32,
    pub protocol: String,
    #[serde(default)]
    pub config_details: Option<String>,
}

impl From<NodeCreateRequest> for NewNode {
    fn from(req: NodeCreateRequest) -> Self {
        Self {
            name: req.name,
            address: req.address,
            port: req.port,
            protocol: req.protocol,
            config_details: req.config_details,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NodeUpdateRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub port: Option<i32>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub config_details: Option<Option<String>>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl From<NodeUpdateRequest> for NodeUpdate {
    fn from(req: NodeUpdateRequest) -> Self {
        Self {
            name: req.name,
            address: req.address,
            port: req.port,
            protocol: req.protocol,
            config_details: req.config_details,
            is_active: req.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_request_distinguishes_null_from_absent() {
        let absent: AccountUpdateRequest = serde_json::from_str("{}").unwrap();
        assert!(absent.due_date.is_none());

        let cleared: AccountUpdateRequest =
            serde_json::from_str(r#"{"due_date": null}"#).unwrap();
        assert_eq!(cleared.due_date, Some(None));

        let set: AccountUpdateRequest =
            serde_json::from_str(r#"{"due_date": "2030-01-01T00:00:00Z"}"#).unwrap();
        assert!(matches!(set.due_date, Some(Some(_))));
    }

    #[test]
    fn create_request_defaults() {
        let req: AccountCreateRequest =
            serde_json::from_str(r#"{"username": "bob", "password": "hunter22"}"#).unwrap();
        assert!((req.traffic_limit_gb - 100.0).abs() < f64::EPSILON);
        assert!(!req.is_admin);
        assert!(req.due_date.is_none());
    }

    #[test]
    fn account_dto_has_no_password_hash() {
        let dto = AccountDto::from(Account {
            id: 1,
            username: "bob".to_string(),
            password_hash: "$argon2id$hidden".to_string(),
            uuid: "uuid".to_string(),
            traffic_limit: 1,
            traffic_used: 0,
            due_date: None,
            is_admin: false,
            is_active: true,
        });

        let json = serde_json::to_string(&dto).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("hidden"));
    }
}
