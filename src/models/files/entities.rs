use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/file.ts")]
pub struct File {
    // 下载令牌，作为对外标识
    pub file_token: String,
    pub file_name: String,
    // 字节数
    pub file_size: i64,
    pub file_type: String,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
    pub uploader_id: i64,
    pub school_id: Option<i64>,
}

/// 存储层新增文件记录
#[derive(Debug, Clone)]
pub struct NewFile {
    pub file_token: String,
    pub file_name: String,
    pub file_size: i64,
    pub file_type: String,
    pub uploader_id: i64,
    pub school_id: Option<i64>,
}
