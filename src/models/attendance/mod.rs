use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;

define_string_enum! {
    /// 考勤状态
    #[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
    pub enum AttendanceStatus {
        Present => "present",
        Absent => "absent",
        Late => "late",
        Excused => "excused",
    }
}

impl AttendanceStatus {
    /// 缺勤与迟到需要通知家长
    pub fn requires_parent_notice(&self) -> bool {
        matches!(self, Self::Absent | Self::Late)
    }
}

// 考勤记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct Attendance {
    pub id: i64,
    pub student_id: i64,
    pub class_id: i64,
    pub school_id: i64,
    pub date: chrono::NaiveDate,
    pub status: AttendanceStatus,
    pub reason: Option<String>,
    pub marked_by: i64,
    pub parent_notified: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceRecordInput {
    pub student_id: i64,
    pub status: AttendanceStatus,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct MarkAttendanceRequest {
    pub class_id: i64,
    pub date: chrono::NaiveDate,
    pub records: Vec<AttendanceRecordInput>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceQuery {
    pub class_id: Option<i64>,
    pub student_id: Option<i64>,
    pub date: Option<chrono::NaiveDate>,
    pub from: Option<chrono::NaiveDate>,
    pub to: Option<chrono::NaiveDate>,
}

/// 存储层 upsert 使用的单条记录
#[derive(Debug, Clone)]
pub struct AttendanceUpsert {
    pub student_id: i64,
    pub class_id: i64,
    pub school_id: i64,
    pub date: chrono::NaiveDate,
    pub status: AttendanceStatus,
    pub reason: Option<String>,
    pub marked_by: i64,
}
