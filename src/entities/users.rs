use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique, column_type = "String(StringLen::N(50))")]
    pub username: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// Canonical v4 UUID exposed instead of the sequential id
    #[sea_orm(unique, column_type = "String(StringLen::N(36))")]
    pub uuid: String,

    /// Bytes
    pub traffic_limit: i64,

    /// Bytes
    pub traffic_used: i64,

    pub due_date: Option<DateTimeUtc>,

    pub is_admin: bool,

    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
