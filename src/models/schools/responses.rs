use serde::Serialize;
use ts_rs::TS;

use super::entities::School;
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct SchoolListResponse {
    pub items: Vec<School>,
    pub pagination: PaginationInfo,
}

/// 商务视角的学校概况
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct SchoolSummary {
    pub school: School,
    pub student_count: i64,
    pub teacher_count: i64,
    pub parent_count: i64,
    pub class_count: i64,
}
