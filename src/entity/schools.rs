//! 学校实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "schools")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub school_type: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub director_id: Option<i64>,
    pub subscription_plan: Option<String>,
    pub subscription_status: String,
    pub subscription_ends_at: Option<i64>,
    pub geolocation_enabled: bool,
    pub is_sandbox: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::users::Entity")]
    Users,
    #[sea_orm(has_many = "super::classes::Entity")]
    Classes,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Classes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_school(self) -> crate::models::schools::entities::School {
        use crate::models::schools::entities::{School, SchoolType};
        use crate::models::users::entities::SubscriptionStatus;

        School {
            id: self.id,
            name: self.name,
            school_type: self
                .school_type
                .parse::<SchoolType>()
                .unwrap_or(SchoolType::Private),
            address: self.address,
            city: self.city,
            phone: self.phone,
            email: self.email,
            director_id: self.director_id,
            subscription_plan: self.subscription_plan,
            subscription_status: self
                .subscription_status
                .parse::<SubscriptionStatus>()
                .unwrap_or(SubscriptionStatus::None)
                .effective(self.subscription_ends_at, chrono::Utc::now().timestamp()),
            subscription_ends_at: super::to_datetime_opt(self.subscription_ends_at),
            geolocation_enabled: self.geolocation_enabled,
            is_sandbox: self.is_sandbox,
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
