use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub event_id: i64,
    pub feed_id: String,
    pub event_title: String,
    pub event_description: String,
    pub event_link: String,
    pub event_guid: String,
    /// Fixed-width RFC 3339 text, see `domain::entities::format_pub_date`
    pub event_pub_date: String,
    pub raw_msg: String,
    pub msg_hash: String,
    pub is_test: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
