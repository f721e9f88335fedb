//! 成绩单审批历史实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bulletin_approvals")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub bulletin_id: i64,
    pub actor_id: i64,
    pub action: String,
    pub previous_status: String,
    pub new_status: String,
    pub comment: Option<String>,
    pub batch_id: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bulletins::Entity",
        from = "Column::BulletinId",
        to = "super::bulletins::Column::Id"
    )]
    Bulletin,
}

impl Related<super::bulletins::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bulletin.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_approval(self) -> crate::models::bulletins::entities::BulletinApproval {
        use crate::models::bulletins::entities::{
            BulletinAction, BulletinApproval, BulletinStatus,
        };

        BulletinApproval {
            id: self.id,
            bulletin_id: self.bulletin_id,
            actor_id: self.actor_id,
            action: self
                .action
                .parse::<BulletinAction>()
                .unwrap_or(BulletinAction::Submit),
            previous_status: self
                .previous_status
                .parse::<BulletinStatus>()
                .unwrap_or(BulletinStatus::Draft),
            new_status: self
                .new_status
                .parse::<BulletinStatus>()
                .unwrap_or(BulletinStatus::Draft),
            comment: self.comment,
            batch_id: self.batch_id,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
