use serde::Deserialize;
use ts_rs::TS;

use super::entities::RelationshipType;
use crate::models::users::entities::UserRole;

fn default_max_students() -> i32 {
    30
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct CreateClassRequest {
    pub name: String,
    pub level: String,
    pub section: Option<String>,
    pub teacher_id: Option<i64>,
    #[serde(default = "default_max_students")]
    pub max_students: i32,
    /// 由服务层根据当前用户填写
    #[serde(skip)]
    #[ts(skip)]
    pub school_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct UpdateClassRequest {
    pub name: Option<String>,
    pub level: Option<String>,
    pub section: Option<String>,
    pub teacher_id: Option<i64>,
    pub max_students: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct CreateSubjectRequest {
    pub name_fr: String,
    pub name_en: String,
    pub code: String,
    pub coefficient: f64,
    #[serde(skip)]
    #[ts(skip)]
    pub school_id: i64,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct EnrollStudentRequest {
    pub student_id: i64,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct LinkParentRequest {
    pub parent_id: i64,
    pub student_id: i64,
    pub relationship: RelationshipType,
    #[serde(default)]
    pub is_primary: bool,
}

// 校长创建学校成员（教师 / 学生 / 家长）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct CreateMemberRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub whatsapp_number: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct StudentListQuery {
    pub class_id: Option<i64>,
}
