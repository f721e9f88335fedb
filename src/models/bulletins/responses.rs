use serde::Serialize;
use ts_rs::TS;

use super::entities::{Bulletin, BulletinGrade, BulletinStatus, VerificationOutcome};
use crate::models::common::PaginationInfo;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/bulletin.ts")]
pub struct BulletinDetail {
    pub bulletin: Bulletin,
    pub grades: Vec<BulletinGrade>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/bulletin.ts")]
pub struct BulletinListResponse {
    pub items: Vec<Bulletin>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/bulletin.ts")]
pub struct BulkItemResult {
    pub id: i64,
    pub success: bool,
    pub status: Option<BulletinStatus>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/bulletin.ts")]
pub struct BulkOperationResponse {
    pub batch_id: String,
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub results: Vec<BulkItemResult>,
}

/// 对外公开的成绩单摘要（验证时返回）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/bulletin.ts")]
pub struct BulletinPublicView {
    pub tracking_number: Option<String>,
    pub student_name: String,
    pub school_name: String,
    pub term_name: String,
    pub general_average: Option<f64>,
    pub class_rank: Option<i32>,
    pub total_students_in_class: Option<i32>,
    /// 全班成绩单尚未全部发布，排名可能变化
    pub rank_provisional: bool,
    pub published_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/bulletin.ts")]
pub struct VerificationResponse {
    pub success: bool,
    pub outcome: VerificationOutcome,
    pub bulletin: Option<BulletinPublicView>,
}
