use serde::Serialize;
use ts_rs::TS;

use super::entities::{User, UserRole};
use crate::models::common::PaginatedResponse;

/// 单个用户，附带可切换的角色列表
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserResponse {
    pub roles: Vec<UserRole>,
    pub user: User,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            roles: user.roles(),
            user,
        }
    }
}

pub type UserListResponse = PaginatedResponse<User>;
