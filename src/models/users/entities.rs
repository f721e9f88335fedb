use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;

define_string_enum! {
    /// 用户角色
    #[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
    pub enum UserRole {
        SiteAdmin => "site_admin",
        Admin => "admin",
        Director => "director",
        Teacher => "teacher",
        Parent => "parent",
        Student => "student",
        Freelancer => "freelancer",
        Commercial => "commercial",
    }
}

impl UserRole {
    /// 平台管理员
    pub fn platform_admin_roles() -> &'static [&'static UserRole] {
        &[&Self::SiteAdmin, &Self::Admin]
    }
    /// 学校管理者
    pub fn school_manager_roles() -> &'static [&'static UserRole] {
        &[&Self::Director, &Self::Admin, &Self::SiteAdmin]
    }
    /// 教职员工
    pub fn staff_roles() -> &'static [&'static UserRole] {
        &[&Self::Teacher, &Self::Director, &Self::Admin, &Self::SiteAdmin]
    }
    pub fn teacher_roles() -> &'static [&'static UserRole] {
        &[&Self::Teacher, &Self::Freelancer]
    }
    pub fn commercial_roles() -> &'static [&'static UserRole] {
        &[&Self::Commercial, &Self::Admin, &Self::SiteAdmin]
    }
    pub fn all_roles() -> &'static [&'static UserRole] {
        &[
            &Self::SiteAdmin,
            &Self::Admin,
            &Self::Director,
            &Self::Teacher,
            &Self::Parent,
            &Self::Student,
            &Self::Freelancer,
            &Self::Commercial,
        ]
    }

    /// 允许自助注册的角色
    pub fn is_self_registrable(&self) -> bool {
        matches!(
            self,
            Self::Parent | Self::Student | Self::Freelancer | Self::Teacher
        )
    }

    pub fn is_platform_admin(&self) -> bool {
        matches!(self, Self::SiteAdmin | Self::Admin)
    }

    /// 自助注册时是否保留所填学校；教职工与学生只能由校长在校内创建
    pub fn keeps_school_on_signup(&self) -> bool {
        matches!(self, Self::Parent)
    }
}

define_string_enum! {
    /// 用户状态
    #[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
    pub enum UserStatus {
        Active => "active",
        Inactive => "inactive",
        Suspended => "suspended",
    }
}

define_string_enum! {
    /// 订阅状态
    #[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
    pub enum SubscriptionStatus {
        None => "none",
        Active => "active",
        Failed => "failed",
        Cancelled => "cancelled",
        Expired => "expired",
    }
}

impl SubscriptionStatus {
    /// 到期后的 active 视为 expired，`ends_at` 为空表示不限期
    pub fn effective(self, ends_at: Option<i64>, now: i64) -> Self {
        match (self, ends_at) {
            (Self::Active, Some(end)) if end <= now => Self::Expired,
            (status, _) => status,
        }
    }
}

/// 通知偏好
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct NotificationPreferences {
    pub sms: bool,
    pub whatsapp: bool,
    pub email: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            sms: true,
            whatsapp: false,
            email: true,
        }
    }
}

/// 订阅信息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct Subscription {
    pub plan_id: Option<String>,
    pub status: SubscriptionStatus,
    pub ends_at: Option<chrono::DateTime<chrono::Utc>>,
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    #[ts(skip)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub secondary_roles: Vec<UserRole>,
    pub active_role: UserRole,
    pub status: UserStatus,
    pub school_id: Option<i64>,
    pub phone: Option<String>,
    pub whatsapp_number: Option<String>,
    pub preferred_language: String,
    pub notifications: NotificationPreferences,
    pub subscription: Subscription,
    pub is_test_account: bool,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// 用户拥有的全部角色（主角色在前）
    pub fn roles(&self) -> Vec<UserRole> {
        let mut roles = vec![self.role];
        for role in &self.secondary_roles {
            if !roles.contains(role) {
                roles.push(*role);
            }
        }
        roles
    }

    pub fn has_role(&self, role: UserRole) -> bool {
        self.role == role || self.secondary_roles.contains(&role)
    }

    /// 当前以平台管理员身份操作
    pub fn is_platform_admin(&self) -> bool {
        self.active_role.is_platform_admin()
    }

    /// 是否可以访问指定学校的数据
    pub fn can_access_school(&self, school_id: i64) -> bool {
        self.is_platform_admin() || self.school_id == Some(school_id)
    }

    // 生成 token 对（access + refresh），绑定当前活动角色
    pub fn generate_token_pair(
        &self,
        refresh_token_expiry: Option<chrono::TimeDelta>,
    ) -> Result<crate::utils::jwt::TokenPair, String> {
        crate::utils::jwt::JwtUtils::generate_token_pair(
            self.id,
            self.active_role.as_str(),
            self.school_id,
            refresh_token_expiry,
        )
        .map_err(|e| format!("生成 token 对失败: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 7,
            email: "marie@example.cm".to_string(),
            password_hash: String::new(),
            first_name: "Marie".to_string(),
            last_name: "Nguema".to_string(),
            role: UserRole::Teacher,
            secondary_roles: vec![UserRole::Parent, UserRole::Teacher],
            active_role: UserRole::Teacher,
            status: UserStatus::Active,
            school_id: Some(3),
            phone: None,
            whatsapp_number: None,
            preferred_language: "fr".to_string(),
            notifications: NotificationPreferences::default(),
            subscription: Subscription {
                plan_id: None,
                status: SubscriptionStatus::None,
                ends_at: None,
            },
            is_test_account: false,
            last_login: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_roles_are_deduplicated() {
        let user = sample_user();
        assert_eq!(user.roles(), vec![UserRole::Teacher, UserRole::Parent]);
        assert!(user.has_role(UserRole::Parent));
        assert!(!user.has_role(UserRole::Director));
    }

    #[test]
    fn test_school_access() {
        let mut user = sample_user();
        assert!(user.can_access_school(3));
        assert!(!user.can_access_school(4));

        user.active_role = UserRole::SiteAdmin;
        assert!(user.can_access_school(4));
    }

    #[test]
    fn test_self_registration_roles() {
        assert!(UserRole::Parent.is_self_registrable());
        assert!(!UserRole::Director.is_self_registrable());
        assert!(!UserRole::SiteAdmin.is_self_registrable());
        assert!(UserRole::Parent.keeps_school_on_signup());
        assert!(!UserRole::Teacher.keeps_school_on_signup());
        assert!(!UserRole::Student.keeps_school_on_signup());
    }

    #[test]
    fn test_lapsed_subscription_reads_as_expired() {
        let now = 1_750_000_000;
        assert_eq!(
            SubscriptionStatus::Active.effective(Some(now - 1), now),
            SubscriptionStatus::Expired
        );
        assert_eq!(
            SubscriptionStatus::Active.effective(Some(now + 60), now),
            SubscriptionStatus::Active
        );
        assert_eq!(SubscriptionStatus::Active.effective(None, now), SubscriptionStatus::Active);
        assert_eq!(
            SubscriptionStatus::Cancelled.effective(Some(now - 1), now),
            SubscriptionStatus::Cancelled
        );
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let mut user = sample_user();
        user.password_hash = "secret".to_string();
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains("\"active_role\":\"teacher\""));
    }
}
