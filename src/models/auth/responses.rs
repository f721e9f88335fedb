use serde::Serialize;
use ts_rs::TS;

use crate::models::users::{User, UserRole};

/// 登录、沙盒登录与切换角色共用
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginResponse {
    pub access_token: String,
    /// 秒
    pub expires_in: i64,
    pub active_role: UserRole,
    pub roles: Vec<UserRole>,
    pub user: User,
    pub issued_at: chrono::DateTime<chrono::Utc>,
}

impl LoginResponse {
    pub fn new(access_token: String, expires_in: i64, user: User) -> Self {
        Self {
            access_token,
            expires_in,
            active_role: user.active_role,
            roles: user.roles(),
            user,
            issued_at: chrono::Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}
