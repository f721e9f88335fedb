use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::users::UserRole;

/// 演示账号
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/sandbox.ts")]
pub struct SandboxAccount {
    pub user_id: i64,
    pub role: UserRole,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/sandbox.ts")]
pub struct SandboxStatusResponse {
    pub enabled: bool,
    pub school_id: Option<i64>,
    pub school_name: Option<String>,
    pub accounts: Vec<SandboxAccount>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/sandbox.ts")]
pub struct SandboxLoginRequest {
    pub role: UserRole,
}
