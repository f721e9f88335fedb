use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;

define_string_enum! {
    /// 评分类型
    #[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
    pub enum GradeType {
        Exam => "exam",
        Quiz => "quiz",
        Homework => "homework",
        Project => "project",
        Participation => "participation",
    }
}

// 成绩实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct Grade {
    pub id: i64,
    pub student_id: i64,
    pub teacher_id: i64,
    pub subject_id: i64,
    pub class_id: i64,
    pub term_id: i64,
    pub value: f64,
    pub max_value: f64,
    pub grade_type: GradeType,
    pub description: Option<String>,
    pub published_to_parents: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Grade {
    /// 换算到 20 分制
    pub fn on_twenty(&self) -> f64 {
        if self.max_value <= 0.0 {
            0.0
        } else {
            self.value / self.max_value * 20.0
        }
    }
}
