use serde::Serialize;
use ts_rs::TS;

use crate::models::users::entities::User;

/// 创建成员响应，临时密码只返回一次
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct CreateMemberResponse {
    pub user: User,
    pub temporary_password: String,
}
