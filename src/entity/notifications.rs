//! 站内通知实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub kind: String,
    pub title: String,
    pub content: String,
    pub reference_id: Option<i64>,
    pub deliveries: String,
    pub is_read: bool,
    pub read_at: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_notification(self) -> crate::models::notifications::Notification {
        use crate::models::notifications::{Notification, NotificationKind};

        Notification {
            id: self.id,
            user_id: self.user_id,
            kind: self
                .kind
                .parse::<NotificationKind>()
                .unwrap_or(NotificationKind::System),
            title: self.title,
            content: self.content,
            reference_id: self.reference_id,
            deliveries: super::from_json_list(&self.deliveries),
            is_read: self.is_read,
            read_at: super::to_datetime_opt(self.read_at),
            created_at: super::to_datetime(self.created_at),
        }
    }
}
