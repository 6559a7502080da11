use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use tracing::info;

use crate::db::StoreError;
use crate::entities::{nodes, prelude::*};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub port: i32,
    pub protocol: String,
    pub config_details: Option<String>,
    pub is_active: bool,
}

impl From<nodes::Model> for Node {
    fn from(model: nodes::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            address: model.address,
            port: model.port,
            protocol: model.protocol,
            config_details: model.config_details,
            is_active: model.is_active,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewNode {
    pub name: String,
    pub address: String,
    pub port: i32,
    pub protocol: String,
    pub config_details: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NodeUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub port: Option<i32>,
    pub protocol: Option<String>,
    pub config_details: Option<Option<String>>,
    pub is_active: Option<bool>,
}

pub struct NodeRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> NodeRepository<'a, C> {
    #[must_use]
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Node>, StoreError> {
        let row = Nodes::find_by_id(id).one(self.conn).await?;
        Ok(row.map(Node::from))
    }

    pub async fn list(&self, offset: u64, limit: u64) -> Result<Vec<Node>, StoreError> {
        let rows = Nodes::find()
            .order_by_asc(nodes::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(self.conn)
            .await?;

        Ok(rows.into_iter().map(Node::from).collect())
    }

    pub async fn list_active(&self) -> Result<Vec<Node>, StoreError> {
        let rows = Nodes::find()
            .filter(nodes::Column::IsActive.eq(true))
            .order_by_asc(nodes::Column::Id)
            .all(self.conn)
            .await?;

        Ok(rows.into_iter().map(Node::from).collect())
    }

    pub async fn create(&self, new: NewNode) -> Result<Node, StoreError> {
        let active = nodes::ActiveModel {
            name: Set(new.name),
            address: Set(new.address),
            port: Set(new.port),
            protocol: Set(new.protocol),
            config_details: Set(new.config_details),
            is_active: Set(true),
            ..Default::default()
        };

        let model = active.insert(self.conn).await?;
        info!(node_id = model.id, "Created node {} ({})", model.name, model.protocol);
        Ok(Node::from(model))
    }

    pub async fn update(&self, id: i32, update: NodeUpdate) -> Result<Option<Node>, StoreError> {
        let Some(model) = Nodes::find_by_id(id).one(self.conn).await? else {
            return Ok(None);
        };

        let mut active: nodes::ActiveModel = model.clone().into();

        if let Some(name) = update.name {
            active.name = Set(name);
        }
        if let Some(address) = update.address {
            active.address = Set(address);
        }
        if let Some(port) = update.port {
            active.port = Set(port);
        }
        if let Some(protocol) = update.protocol {
            active.protocol = Set(protocol);
        }
        if let Some(config_details) = update.config_details {
            active.config_details = Set(config_details);
        }
        if let Some(is_active) = update.is_active {
            active.is_active = Set(is_active);
        }

        if !active.is_changed() {
            return Ok(Some(Node::from(model)));
        }

        let model = active.update(self.conn).await?;
        Ok(Some(Node::from(model)))
    }

    pub async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let result = Nodes::delete_by_id(id).exec(self.conn).await?;
        Ok(result.rows_affected > 0)
    }
}
