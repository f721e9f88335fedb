use super::entities::{SubscriptionStatus, UserRole, UserStatus};
use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

// 用户查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub school_id: Option<i64>,
    pub search: Option<String>,
}

// 用户创建请求（存储层，密码已哈希）
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub secondary_roles: Vec<UserRole>,
    pub school_id: Option<i64>,
    pub phone: Option<String>,
    pub whatsapp_number: Option<String>,
    pub preferred_language: String,
    pub is_test_account: bool,
}

// 管理员更新用户请求
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<UserRole>,
    pub secondary_roles: Option<Vec<UserRole>>,
    pub status: Option<UserStatus>,
    pub school_id: Option<i64>,
    pub phone: Option<String>,
    pub whatsapp_number: Option<String>,
    pub preferred_language: Option<String>,
}

// 订阅更新（支付回调使用）
#[derive(Debug, Clone)]
pub struct SubscriptionUpdate {
    pub plan_id: Option<String>,
    pub status: SubscriptionStatus,
    pub ends_at: Option<i64>,
}

// 用户列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct UserListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub school_id: Option<i64>,
    pub search: Option<String>,
}

impl From<UserListParams> for UserListQuery {
    fn from(params: UserListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            role: params.role,
            status: params.status,
            school_id: params.school_id,
            search: params.search,
        }
    }
}
