use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;

// 班级实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct Class {
    pub id: i64,
    pub school_id: i64,
    pub name: String,
    pub level: String,
    pub section: Option<String>,
    /// 班主任
    pub teacher_id: Option<i64>,
    pub max_students: i32,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 科目实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct Subject {
    pub id: i64,
    pub school_id: i64,
    pub name_fr: String,
    pub name_en: String,
    pub code: String,
    pub coefficient: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
    pub enum EnrollmentStatus {
        Active => "active",
        Transferred => "transferred",
        Withdrawn => "withdrawn",
    }
}

// 注册（学生-班级）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub class_id: i64,
    pub status: EnrollmentStatus,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
}

define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
    pub enum RelationshipType {
        Father => "father",
        Mother => "mother",
        Guardian => "guardian",
    }
}

// 家长-学生关系
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ParentStudentRelation {
    pub id: i64,
    pub parent_id: i64,
    pub student_id: i64,
    pub relationship: RelationshipType,
    pub is_primary: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 注册结果
#[derive(Debug, Clone)]
pub enum EnrollOutcome {
    Enrolled(Enrollment),
    AlreadyEnrolled,
    ClassFull,
}
