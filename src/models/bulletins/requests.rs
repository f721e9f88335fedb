use serde::Deserialize;
use ts_rs::TS;

use super::entities::BulletinStatus;
use crate::define_string_enum;
use crate::models::common::PaginationQuery;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/bulletin.ts")]
pub struct CreateBulletinRequest {
    pub student_id: i64,
    pub term_id: i64,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/bulletin.ts")]
pub struct BulletinGradeInput {
    pub subject_id: i64,
    pub grade: f64,
    /// 缺省时使用科目系数
    pub coefficient: Option<f64>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/bulletin.ts")]
pub struct UpsertBulletinGradesRequest {
    pub grades: Vec<BulletinGradeInput>,
    pub teacher_comment: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/bulletin.ts")]
pub struct SubmitBulletinRequest {
    pub comment: Option<String>,
}

define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/bulletin.ts")]
    pub enum ReviewDecision {
        Approve => "approve",
        Reject => "reject",
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/bulletin.ts")]
pub struct ReviewBulletinRequest {
    pub action: ReviewDecision,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/bulletin.ts")]
pub struct BulkReviewRequest {
    pub ids: Vec<i64>,
    pub action: ReviewDecision,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/bulletin.ts")]
pub struct BulkPublishRequest {
    pub ids: Vec<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/bulletin.ts")]
pub struct BulletinListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub class_id: Option<i64>,
    pub term_id: Option<i64>,
    pub student_id: Option<i64>,
    pub status: Option<BulletinStatus>,
}

/// 存储层查询条件
#[derive(Debug, Clone, Default)]
pub struct BulletinListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub school_id: Option<i64>,
    pub class_id: Option<i64>,
    pub term_id: Option<i64>,
    pub student_ids: Option<Vec<i64>>,
    pub status: Option<BulletinStatus>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/bulletin.ts")]
pub struct VerifyBulletinRequest {
    pub verification_code: Option<String>,
    pub qr_code: Option<String>,
}
