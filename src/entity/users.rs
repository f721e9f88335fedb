//! 用户实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub secondary_roles: String,
    pub active_role: String,
    pub status: String,
    pub school_id: Option<i64>,
    pub phone: Option<String>,
    pub whatsapp_number: Option<String>,
    pub preferred_language: String,
    pub notify_sms: bool,
    pub notify_whatsapp: bool,
    pub notify_email: bool,
    pub subscription_plan: Option<String>,
    pub subscription_status: String,
    pub subscription_ends_at: Option<i64>,
    pub is_test_account: bool,
    pub last_login: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::schools::Entity",
        from = "Column::SchoolId",
        to = "super::schools::Column::Id"
    )]
    School,
}

impl Related<super::schools::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::School.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_user(self) -> crate::models::users::entities::User {
        use crate::models::users::entities::{
            NotificationPreferences, Subscription, SubscriptionStatus, User, UserRole, UserStatus,
        };

        let role = self.role.parse::<UserRole>().unwrap_or(UserRole::Student);
        let secondary_roles: Vec<UserRole> = super::from_json_list(&self.secondary_roles);
        // 活动角色失效时回退到主角色
        let active_role = self
            .active_role
            .parse::<UserRole>()
            .ok()
            .filter(|r| *r == role || secondary_roles.contains(r))
            .unwrap_or(role);

        User {
            id: self.id,
            email: self.email,
            password_hash: self.password_hash,
            first_name: self.first_name,
            last_name: self.last_name,
            role,
            secondary_roles,
            active_role,
            status: self
                .status
                .parse::<UserStatus>()
                .unwrap_or(UserStatus::Active),
            school_id: self.school_id,
            phone: self.phone,
            whatsapp_number: self.whatsapp_number,
            preferred_language: self.preferred_language,
            notifications: NotificationPreferences {
                sms: self.notify_sms,
                whatsapp: self.notify_whatsapp,
                email: self.notify_email,
            },
            subscription: Subscription {
                plan_id: self.subscription_plan,
                status: self
                    .subscription_status
                    .parse::<SubscriptionStatus>()
                    .unwrap_or(SubscriptionStatus::None)
                    .effective(self.subscription_ends_at, chrono::Utc::now().timestamp()),
                ends_at: super::to_datetime_opt(self.subscription_ends_at),
            },
            is_test_account: self.is_test_account,
            last_login: super::to_datetime_opt(self.last_login),
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
