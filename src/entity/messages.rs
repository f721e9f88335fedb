//! 消息实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: Option<i64>,
    pub sender_id: i64,
    pub recipient_type: String,
    pub subject: String,
    pub content: String,
    pub category: String,
    pub priority: String,
    pub recipient_count: i32,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::message_recipients::Entity")]
    Recipients,
}

impl Related<super::message_recipients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipients.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_message(self) -> crate::models::messages::Message {
        use crate::models::messages::{Message, MessagePriority, RecipientType};

        Message {
            id: self.id,
            school_id: self.school_id,
            sender_id: self.sender_id,
            recipient_type: self
                .recipient_type
                .parse::<RecipientType>()
                .unwrap_or(RecipientType::Individual),
            subject: self.subject,
            content: self.content,
            category: self.category,
            priority: self
                .priority
                .parse::<MessagePriority>()
                .unwrap_or(MessagePriority::Normal),
            recipient_count: self.recipient_count,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
