//! 预导入模块，方便使用

pub use super::attendance::Entity as Attendance;
pub use super::bulletin_approvals::Entity as BulletinApprovals;
pub use super::bulletin_grades::Entity as BulletinGrades;
pub use super::bulletin_verifications::Entity as BulletinVerifications;
pub use super::bulletins::Entity as Bulletins;
pub use super::classes::Entity as Classes;
pub use super::enrollments::Entity as Enrollments;
pub use super::files::Entity as Files;
pub use super::grades::Entity as Grades;
pub use super::homework::Entity as Homework;
pub use super::homework_submissions::Entity as HomeworkSubmissions;
pub use super::location_alerts::Entity as LocationAlerts;
pub use super::message_recipients::Entity as MessageRecipients;
pub use super::messages::Entity as Messages;
pub use super::notifications::Entity as Notifications;
pub use super::parent_requests::Entity as ParentRequests;
pub use super::parent_student_relations::Entity as ParentStudentRelations;
pub use super::payments::Entity as Payments;
pub use super::safe_zones::Entity as SafeZones;
pub use super::schools::Entity as Schools;
pub use super::subjects::Entity as Subjects;
pub use super::system_settings::Entity as SystemSettings;
pub use super::system_settings_audit::Entity as SystemSettingsAudit;
pub use super::terms::Entity as Terms;
pub use super::timetable_slots::Entity as TimetableSlots;
pub use super::tracked_devices::Entity as TrackedDevices;
pub use super::users::Entity as Users;
pub use super::zone_status::Entity as ZoneStatus;
