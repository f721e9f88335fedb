use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;

// 作业实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/homework.ts")]
pub struct Homework {
    pub id: i64,
    pub school_id: i64,
    pub class_id: i64,
    pub subject_id: i64,
    pub teacher_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: chrono::DateTime<chrono::Utc>,
    pub max_points: Option<f64>,
    pub is_published: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

define_string_enum! {
    /// 提交状态
    #[ts(export, export_to = "../frontend/src/types/generated/homework.ts")]
    pub enum SubmissionStatus {
        Submitted => "submitted",
        Reviewed => "reviewed",
        Graded => "graded",
        Returned => "returned",
    }
}

// 作业提交
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/homework.ts")]
pub struct HomeworkSubmission {
    pub id: i64,
    pub homework_id: i64,
    pub student_id: i64,
    pub content: Option<String>,
    pub attachments: Vec<String>,
    pub status: SubmissionStatus,
    pub is_late: bool,
    pub grade: Option<f64>,
    pub feedback: Option<String>,
    pub graded_by: Option<i64>,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub graded_at: Option<chrono::DateTime<chrono::Utc>>,
}

// 学生视角：作业 + 自己的提交
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/homework.ts")]
pub struct StudentHomework {
    pub homework: Homework,
    pub submission: Option<HomeworkSubmission>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/homework.ts")]
pub struct CreateHomeworkRequest {
    pub class_id: i64,
    pub subject_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: chrono::DateTime<chrono::Utc>,
    pub max_points: Option<f64>,
    #[serde(default)]
    pub publish: bool,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/homework.ts")]
pub struct HomeworkListQuery {
    pub class_id: Option<i64>,
    #[serde(skip)]
    #[ts(skip)]
    pub teacher_id: Option<i64>,
    #[serde(skip)]
    #[ts(skip)]
    pub published_only: bool,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/homework.ts")]
pub struct SubmitHomeworkRequest {
    pub content: Option<String>,
    #[serde(default)]
    pub attachments: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/homework.ts")]
pub struct GradeSubmissionRequest {
    pub grade: f64,
    pub feedback: Option<String>,
}
