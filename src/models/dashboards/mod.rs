use serde::Serialize;
use ts_rs::TS;

use crate::models::attendance::Attendance;
use crate::models::bulletins::Bulletin;
use crate::models::classes::Class;
use crate::models::grades::Grade;
use crate::models::homework::StudentHomework;
use crate::models::timetable::TimetableSlot;
use crate::models::users::User;

/// 平台统计
#[derive(Debug, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct PlatformStats {
    pub total_schools: u64,
    pub total_users: u64,
    pub users_by_role: Vec<RoleCount>,
    pub active_subscriptions: u64,
    pub completed_payments: u64,
    pub revenue_xaf: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct RoleCount {
    pub role: String,
    pub count: u64,
}

/// 校长面板
#[derive(Debug, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct SchoolOverview {
    pub school_id: i64,
    pub student_count: u64,
    pub teacher_count: u64,
    pub parent_count: u64,
    pub class_count: u64,
    pub pending_bulletins: u64,
    pub pending_parent_requests: u64,
    pub absences_today: u64,
    pub attendance_rate_today: Option<f64>,
}

/// 教师面板
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct TeacherDashboard {
    pub classes: Vec<Class>,
    pub today_slots: Vec<TimetableSlot>,
    pub pending_submissions: u64,
    pub draft_bulletins: u64,
}

/// 学生面板
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct StudentDashboard {
    pub class: Option<Class>,
    pub recent_grades: Vec<Grade>,
    pub upcoming_homework: Vec<StudentHomework>,
    pub today_slots: Vec<TimetableSlot>,
}

/// 家长视角的孩子概况
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct ChildSummary {
    pub student: User,
    pub class: Option<Class>,
    pub recent_grades: Vec<Grade>,
    pub recent_attendance: Vec<Attendance>,
    pub published_bulletins: Vec<Bulletin>,
}
