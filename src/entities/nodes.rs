use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "nodes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(column_type = "String(StringLen::N(100))")]
    pub name: String,

    #[sea_orm(column_type = "String(StringLen::N(100))")]
    pub address: String,

    pub port: i32,

    /// e.g. vless, vmess, trojan
    #[sea_orm(column_type = "String(StringLen::N(50))")]
    pub protocol: String,

    /// Serialized node settings, opaque to the panel
    #[sea_orm(column_type = "Text", nullable)]
    pub config_details: Option<String>,

    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
