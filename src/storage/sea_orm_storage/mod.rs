//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod academics;
mod attendance;
mod bulletins;
mod files;
mod geolocation;
mod grades;
mod homework;
mod messages;
mod notifications;
mod parent_requests;
mod payments;
mod schools;
mod system_settings;
mod timetable;
mod users;

use crate::config::AppConfig;
use crate::errors::{EducafricError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 按全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(
            &config.database.url,
            config.database.pool_size,
            config.database.timeout,
        )
        .await
    }

    /// 连接数据库并执行迁移
    pub async fn connect(url: &str, pool_size: u32, timeout: u64) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, pool_size, timeout).await?
        } else {
            Self::connect_generic(&db_url, pool_size, timeout).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| EducafricError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = url.contains(":memory:");

        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| EducafricError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true);

        // 内存库只能有一个连接，否则每个连接各自一份空库
        let mut pool = SqlitePoolOptions::new().acquire_timeout(Duration::from_secs(timeout));
        if in_memory {
            pool = pool.max_connections(1).min_connections(1);
        } else {
            opt = opt
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .pragma("cache_size", "-64000")
                .pragma("temp_store", "memory")
                .pragma("mmap_size", "536870912")
                .pragma("wal_autocheckpoint", "1000");
            pool = pool
                .max_connections(pool_size)
                .min_connections(1)
                .test_before_acquire(true)
                .idle_timeout(Duration::from_secs(300));
        }

        let pool = pool
            .connect_with(opt)
            .await
            .map_err(|e| EducafricError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(pool_size)
            .min_connections(5.min(pool_size))
            .connect_timeout(Duration::from_secs(timeout))
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| EducafricError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(EducafricError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    pub(crate) async fn ping_impl(&self) -> Result<()> {
        self.db
            .execute_unprepared("SELECT 1")
            .await
            .map_err(|e| EducafricError::database_connection(format!("数据库不可用: {e}")))?;
        Ok(())
    }
}

/// 规范化分页参数，返回 (page, size)，page 从 1 开始
pub(crate) fn page_params(page: Option<i64>, size: Option<i64>) -> (u64, u64) {
    let query = crate::models::PaginationQuery::clamped(page, size);
    (query.page as u64, query.size as u64)
}

/// `pages` 由 sea-orm 分页器给出时与 `total` 推算的值一致
pub(crate) fn pagination_info(
    page: u64,
    size: u64,
    total: u64,
    pages: u64,
) -> crate::models::PaginationInfo {
    let info = crate::models::PaginationInfo::new(page as i64, size as i64, total as i64);
    debug_assert!(total == 0 || info.total_pages == pages as i64);
    info
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("educafric.db").unwrap(),
            "sqlite://educafric.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url(":memory:").unwrap(),
            "sqlite::memory:"
        );
        assert!(SeaOrmStorage::build_database_url("postgres://u@h/db").is_ok());
        assert!(SeaOrmStorage::build_database_url("oracle://x").is_err());
    }

    #[test]
    fn test_page_params_clamped() {
        assert_eq!(page_params(None, None), (1, 10));
        assert_eq!(page_params(Some(0), Some(500)), (1, 100));
        assert_eq!(page_params(Some(3), Some(0)), (3, 1));
    }
}

// Storage trait 实现
use crate::models::{
    PaginatedResponse, PaginationQuery,
    attendance::{Attendance, AttendanceQuery, AttendanceUpsert},
    bulletins::{
        Bulletin, BulletinApproval, BulletinGrade, BulletinGradeRow, BulletinListQuery,
        BulletinListResponse, BulletinStatus, BulletinTransition, BulletinVerification,
        NewBulletin, NewBulletinVerification,
    },
    classes::{
        Class, CreateClassRequest, CreateSubjectRequest, EnrollOutcome, Enrollment,
        LinkParentRequest, ParentStudentRelation, Subject, UpdateClassRequest,
    },
    dashboards::RoleCount,
    files::{File, NewFile},
    geolocation::{
        CreateSafeZoneRequest, DevicePositionUpdate, LocationAlert, NewLocationAlert,
        RegisterDeviceRequest, SafeZone, TrackedDevice, UpdateSafeZoneRequest, ZoneFilter,
        ZoneStatus,
    },
    grades::{CreateGradeRequest, Grade, GradeListQuery, UpdateGradeRequest},
    homework::{
        CreateHomeworkRequest, GradeSubmissionRequest, Homework, HomeworkListQuery,
        HomeworkSubmission, SubmitHomeworkRequest,
    },
    messages::{InboxItem, Message, MessageListParams, NewMessage},
    notifications::{
        NewNotification, Notification, NotificationListParams, UpdatePreferencesRequest,
    },
    parent_requests::{
        CreateParentRequest, ParentRequest, ParentRequestStatus, RespondParentRequest,
    },
    payments::{NewPayment, Payment},
    schools::{
        CreateSchoolRequest, CreateTermRequest, School, SchoolListQuery, SchoolListResponse, Term,
        UpdateSchoolRequest,
    },
    system::{SettingAuditListResponse, SettingAuditQuery, SystemSetting},
    timetable::{CreateTimetableSlotRequest, TimetableQuery, TimetableSlot},
    users::{
        CreateUserRequest, SubscriptionUpdate, UpdateUserRequest, User, UserListQuery,
        UserListResponse, UserRole,
    },
};

use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    async fn ping(&self) -> Result<()> {
        self.ping_impl().await
    }

    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>> {
        self.get_users_by_ids_impl(ids).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn list_school_users(&self, school_id: i64, role: Option<UserRole>) -> Result<Vec<User>> {
        self.list_school_users_impl(school_id, role).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> Result<bool> {
        self.update_password_impl(id, password_hash).await
    }

    async fn set_active_role(&self, id: i64, role: UserRole) -> Result<bool> {
        self.set_active_role_impl(id, role).await
    }

    async fn update_notification_preferences(
        &self,
        id: i64,
        update: UpdatePreferencesRequest,
    ) -> Result<Option<User>> {
        self.update_notification_preferences_impl(id, update).await
    }

    async fn update_user_subscription(&self, id: i64, update: SubscriptionUpdate) -> Result<bool> {
        self.update_user_subscription_impl(id, update).await
    }

    async fn count_users_by_role(&self, school_id: Option<i64>) -> Result<Vec<RoleCount>> {
        self.count_users_by_role_impl(school_id).await
    }

    async fn create_school(&self, school: CreateSchoolRequest) -> Result<School> {
        self.create_school_impl(school).await
    }

    async fn get_school_by_id(&self, id: i64) -> Result<Option<School>> {
        self.get_school_by_id_impl(id).await
    }

    async fn get_sandbox_school(&self) -> Result<Option<School>> {
        self.get_sandbox_school_impl().await
    }

    async fn list_schools_with_pagination(
        &self,
        query: SchoolListQuery,
    ) -> Result<SchoolListResponse> {
        self.list_schools_with_pagination_impl(query).await
    }

    async fn update_school(&self, id: i64, update: UpdateSchoolRequest) -> Result<Option<School>> {
        self.update_school_impl(id, update).await
    }

    async fn delete_school(&self, id: i64) -> Result<bool> {
        self.delete_school_impl(id).await
    }

    async fn count_schools(&self) -> Result<u64> {
        self.count_schools_impl().await
    }

    async fn count_active_subscriptions(&self) -> Result<u64> {
        self.count_active_subscriptions_impl().await
    }

    async fn create_term(&self, school_id: i64, term: CreateTermRequest) -> Result<Term> {
        self.create_term_impl(school_id, term).await
    }

    async fn get_term_by_id(&self, id: i64) -> Result<Option<Term>> {
        self.get_term_by_id_impl(id).await
    }

    async fn list_terms(&self, school_id: i64) -> Result<Vec<Term>> {
        self.list_terms_impl(school_id).await
    }

    async fn activate_term(&self, school_id: i64, term_id: i64) -> Result<bool> {
        self.activate_term_impl(school_id, term_id).await
    }

    async fn create_class(&self, class: CreateClassRequest) -> Result<Class> {
        self.create_class_impl(class).await
    }

    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
        self.get_class_by_id_impl(class_id).await
    }

    async fn get_class_by_name(&self, school_id: i64, name: &str) -> Result<Option<Class>> {
        self.get_class_by_name_impl(school_id, name).await
    }

    async fn list_classes(&self, school_id: i64) -> Result<Vec<Class>> {
        self.list_classes_impl(school_id).await
    }

    async fn list_teacher_classes(&self, teacher_id: i64) -> Result<Vec<Class>> {
        self.list_teacher_classes_impl(teacher_id).await
    }

    async fn update_class(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        self.update_class_impl(class_id, update).await
    }

    async fn delete_class(&self, class_id: i64) -> Result<bool> {
        self.delete_class_impl(class_id).await
    }

    async fn create_subject(&self, subject: CreateSubjectRequest) -> Result<Subject> {
        self.create_subject_impl(subject).await
    }

    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>> {
        self.get_subject_by_id_impl(id).await
    }

    async fn list_subjects(&self, school_id: i64) -> Result<Vec<Subject>> {
        self.list_subjects_impl(school_id).await
    }

    async fn delete_subject(&self, id: i64) -> Result<bool> {
        self.delete_subject_impl(id).await
    }

    async fn enroll_student(&self, class_id: i64, student_id: i64) -> Result<EnrollOutcome> {
        self.enroll_student_impl(class_id, student_id).await
    }

    async fn get_active_enrollment(&self, student_id: i64) -> Result<Option<Enrollment>> {
        self.get_active_enrollment_impl(student_id).await
    }

    async fn list_class_students(&self, class_id: i64) -> Result<Vec<User>> {
        self.list_class_students_impl(class_id).await
    }

    async fn link_parent(&self, link: LinkParentRequest) -> Result<ParentStudentRelation> {
        self.link_parent_impl(link).await
    }

    async fn get_parent_student_relation(
        &self,
        parent_id: i64,
        student_id: i64,
    ) -> Result<Option<ParentStudentRelation>> {
        self.get_parent_student_relation_impl(parent_id, student_id).await
    }

    async fn list_children(&self, parent_id: i64) -> Result<Vec<User>> {
        self.list_children_impl(parent_id).await
    }

    async fn list_parents_of_student(&self, student_id: i64) -> Result<Vec<User>> {
        self.list_parents_of_student_impl(student_id).await
    }

    async fn create_grade(&self, teacher_id: i64, grade: CreateGradeRequest) -> Result<Grade> {
        self.create_grade_impl(teacher_id, grade).await
    }

    async fn get_grade_by_id(&self, id: i64) -> Result<Option<Grade>> {
        self.get_grade_by_id_impl(id).await
    }

    async fn list_grades(&self, query: GradeListQuery) -> Result<Vec<Grade>> {
        self.list_grades_impl(query).await
    }

    async fn update_grade(&self, id: i64, update: UpdateGradeRequest) -> Result<Option<Grade>> {
        self.update_grade_impl(id, update).await
    }

    async fn delete_grade(&self, id: i64) -> Result<bool> {
        self.delete_grade_impl(id).await
    }

    async fn publish_grades(&self, class_id: i64, term_id: i64) -> Result<u64> {
        self.publish_grades_impl(class_id, term_id).await
    }

    async fn upsert_attendance(&self, records: Vec<AttendanceUpsert>) -> Result<Vec<Attendance>> {
        self.upsert_attendance_impl(records).await
    }

    async fn list_attendance(&self, query: AttendanceQuery) -> Result<Vec<Attendance>> {
        self.list_attendance_impl(query).await
    }

    async fn mark_attendance_notified(&self, ids: &[i64]) -> Result<u64> {
        self.mark_attendance_notified_impl(ids).await
    }

    async fn attendance_rate(
        &self,
        school_id: i64,
        date: chrono::NaiveDate,
    ) -> Result<Option<f64>> {
        self.attendance_rate_impl(school_id, date).await
    }

    async fn create_homework(
        &self,
        school_id: i64,
        teacher_id: i64,
        homework: CreateHomeworkRequest,
    ) -> Result<Homework> {
        self.create_homework_impl(school_id, teacher_id, homework).await
    }

    async fn get_homework_by_id(&self, id: i64) -> Result<Option<Homework>> {
        self.get_homework_by_id_impl(id).await
    }

    async fn publish_homework(&self, id: i64) -> Result<Option<Homework>> {
        self.publish_homework_impl(id).await
    }

    async fn list_homework(&self, query: HomeworkListQuery) -> Result<Vec<Homework>> {
        self.list_homework_impl(query).await
    }

    async fn upsert_submission(
        &self,
        homework_id: i64,
        student_id: i64,
        submission: SubmitHomeworkRequest,
        is_late: bool,
    ) -> Result<HomeworkSubmission> {
        self.upsert_submission_impl(homework_id, student_id, submission, is_late).await
    }

    async fn get_submission_by_id(&self, id: i64) -> Result<Option<HomeworkSubmission>> {
        self.get_submission_by_id_impl(id).await
    }

    async fn get_submission(
        &self,
        homework_id: i64,
        student_id: i64,
    ) -> Result<Option<HomeworkSubmission>> {
        self.get_submission_impl(homework_id, student_id).await
    }

    async fn list_submissions(&self, homework_id: i64) -> Result<Vec<HomeworkSubmission>> {
        self.list_submissions_impl(homework_id).await
    }

    async fn list_student_submissions(&self, student_id: i64) -> Result<Vec<HomeworkSubmission>> {
        self.list_student_submissions_impl(student_id).await
    }

    async fn grade_submission(
        &self,
        id: i64,
        graded_by: i64,
        grade: GradeSubmissionRequest,
    ) -> Result<Option<HomeworkSubmission>> {
        self.grade_submission_impl(id, graded_by, grade).await
    }

    async fn count_pending_submissions(&self, teacher_id: i64) -> Result<u64> {
        self.count_pending_submissions_impl(teacher_id).await
    }

    async fn create_timetable_slot(
        &self,
        school_id: i64,
        slot: CreateTimetableSlotRequest,
    ) -> Result<TimetableSlot> {
        self.create_timetable_slot_impl(school_id, slot).await
    }

    async fn get_timetable_slot(&self, id: i64) -> Result<Option<TimetableSlot>> {
        self.get_timetable_slot_impl(id).await
    }

    async fn list_timetable(
        &self,
        school_id: i64,
        query: TimetableQuery,
    ) -> Result<Vec<TimetableSlot>> {
        self.list_timetable_impl(school_id, query).await
    }

    async fn list_teacher_day_slots(
        &self,
        teacher_id: i64,
        day_of_week: i32,
    ) -> Result<Vec<TimetableSlot>> {
        self.list_teacher_day_slots_impl(teacher_id, day_of_week)
            .await
    }

    async fn delete_timetable_slot(&self, id: i64) -> Result<bool> {
        self.delete_timetable_slot_impl(id).await
    }

    async fn create_bulletin(&self, bulletin: NewBulletin) -> Result<Bulletin> {
        self.create_bulletin_impl(bulletin).await
    }

    async fn get_bulletin_by_id(&self, id: i64) -> Result<Option<Bulletin>> {
        self.get_bulletin_by_id_impl(id).await
    }

    async fn get_bulletin_by_student_term(
        &self,
        student_id: i64,
        term_id: i64,
    ) -> Result<Option<Bulletin>> {
        self.get_bulletin_by_student_term_impl(student_id, term_id).await
    }

    async fn get_bulletin_by_code(&self, code: &str) -> Result<Option<Bulletin>> {
        self.get_bulletin_by_code_impl(code).await
    }

    async fn list_bulletins(&self, query: BulletinListQuery) -> Result<BulletinListResponse> {
        self.list_bulletins_impl(query).await
    }

    async fn list_bulletin_grades(&self, bulletin_id: i64) -> Result<Vec<BulletinGrade>> {
        self.list_bulletin_grades_impl(bulletin_id).await
    }

    async fn upsert_bulletin_grades(
        &self,
        bulletin_id: i64,
        expected_version: i32,
        rows: Vec<BulletinGradeRow>,
        teacher_comment: Option<String>,
    ) -> Result<Option<Bulletin>> {
        self.upsert_bulletin_grades_impl(bulletin_id, expected_version, rows, teacher_comment)
            .await
    }

    async fn apply_bulletin_transition(&self, transition: BulletinTransition) -> Result<bool> {
        self.apply_bulletin_transition_impl(transition).await
    }

    async fn list_class_term_averages(
        &self,
        class_id: i64,
        term_id: i64,
    ) -> Result<Vec<(i64, f64)>> {
        self.list_class_term_averages_impl(class_id, term_id).await
    }

    async fn refresh_bulletin_ranks(&self, class_id: i64, term_id: i64) -> Result<()> {
        self.refresh_bulletin_ranks_impl(class_id, term_id).await
    }

    async fn count_unpublished_class_bulletins(
        &self,
        class_id: i64,
        term_id: i64,
    ) -> Result<u64> {
        self.count_unpublished_class_bulletins_impl(class_id, term_id)
            .await
    }

    async fn list_bulletin_approvals(&self, bulletin_id: i64) -> Result<Vec<BulletinApproval>> {
        self.list_bulletin_approvals_impl(bulletin_id).await
    }

    async fn log_bulletin_verification(
        &self,
        verification: NewBulletinVerification,
    ) -> Result<BulletinVerification> {
        self.log_bulletin_verification_impl(verification).await
    }

    async fn mark_bulletin_parent_verified(&self, id: i64) -> Result<bool> {
        self.mark_bulletin_parent_verified_impl(id).await
    }

    async fn count_bulletins(
        &self,
        school_id: Option<i64>,
        created_by: Option<i64>,
        status: BulletinStatus,
    ) -> Result<u64> {
        self.count_bulletins_impl(school_id, created_by, status).await
    }

    async fn create_message(&self, message: NewMessage) -> Result<Message> {
        self.create_message_impl(message).await
    }

    async fn list_inbox(
        &self,
        user_id: i64,
        params: MessageListParams,
    ) -> Result<PaginatedResponse<InboxItem>> {
        self.list_inbox_impl(user_id, params).await
    }

    async fn list_sent_messages(
        &self,
        sender_id: i64,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<Message>> {
        self.list_sent_messages_impl(sender_id, pagination).await
    }

    async fn mark_message_read(&self, message_id: i64, user_id: i64) -> Result<bool> {
        self.mark_message_read_impl(message_id, user_id).await
    }

    async fn create_notification(&self, notification: NewNotification) -> Result<Notification> {
        self.create_notification_impl(notification).await
    }

    async fn list_notifications(
        &self,
        user_id: i64,
        params: NotificationListParams,
    ) -> Result<PaginatedResponse<Notification>> {
        self.list_notifications_impl(user_id, params).await
    }

    async fn count_unread_notifications(&self, user_id: i64) -> Result<u64> {
        self.count_unread_notifications_impl(user_id).await
    }

    async fn mark_notification_read(&self, id: i64, user_id: i64) -> Result<bool> {
        self.mark_notification_read_impl(id, user_id).await
    }

    async fn mark_all_notifications_read(&self, user_id: i64) -> Result<u64> {
        self.mark_all_notifications_read_impl(user_id).await
    }

    async fn create_parent_request(
        &self,
        parent_id: i64,
        school_id: i64,
        request: CreateParentRequest,
    ) -> Result<ParentRequest> {
        self.create_parent_request_impl(parent_id, school_id, request).await
    }

    async fn get_parent_request_by_id(&self, id: i64) -> Result<Option<ParentRequest>> {
        self.get_parent_request_by_id_impl(id).await
    }

    async fn list_parent_requests(
        &self,
        school_id: Option<i64>,
        parent_id: Option<i64>,
        status: Option<ParentRequestStatus>,
    ) -> Result<Vec<ParentRequest>> {
        self.list_parent_requests_impl(school_id, parent_id, status).await
    }

    async fn respond_parent_request(
        &self,
        id: i64,
        expected: ParentRequestStatus,
        response: RespondParentRequest,
        processed_by: i64,
    ) -> Result<Option<ParentRequest>> {
        self.respond_parent_request_impl(id, expected, response, processed_by).await
    }

    async fn count_parent_requests(
        &self,
        school_id: i64,
        status: ParentRequestStatus,
    ) -> Result<u64> {
        self.count_parent_requests_impl(school_id, status).await
    }

    async fn create_payment(&self, payment: NewPayment) -> Result<Payment> {
        self.create_payment_impl(payment).await
    }

    async fn get_payment_by_provider_id(
        &self,
        provider_payment_id: &str,
    ) -> Result<Option<Payment>> {
        self.get_payment_by_provider_id_impl(provider_payment_id).await
    }

    async fn complete_payment(
        &self,
        provider_payment_id: &str,
        subscription: Option<SubscriptionUpdate>,
    ) -> Result<bool> {
        self.complete_payment_impl(provider_payment_id, subscription)
            .await
    }

    async fn fail_payment(&self, provider_payment_id: &str, reason: &str) -> Result<bool> {
        self.fail_payment_impl(provider_payment_id, reason).await
    }

    async fn list_payments(
        &self,
        user_id: Option<i64>,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<Payment>> {
        self.list_payments_impl(user_id, pagination).await
    }

    async fn payment_totals(&self) -> Result<(u64, i64)> {
        self.payment_totals_impl().await
    }

    async fn create_file(&self, file: NewFile) -> Result<File> {
        self.create_file_impl(file).await
    }

    async fn get_file_by_token(&self, token: &str) -> Result<Option<File>> {
        self.get_file_by_token_impl(token).await
    }

    async fn create_device(
        &self,
        registered_by: i64,
        school_id: Option<i64>,
        device: RegisterDeviceRequest,
    ) -> Result<TrackedDevice> {
        self.create_device_impl(registered_by, school_id, device).await
    }

    async fn get_device_by_id(&self, id: i64) -> Result<Option<TrackedDevice>> {
        self.get_device_by_id_impl(id).await
    }

    async fn list_devices_for_students(&self, student_ids: &[i64]) -> Result<Vec<TrackedDevice>> {
        self.list_devices_for_students_impl(student_ids).await
    }

    async fn list_devices_for_school(&self, school_id: i64) -> Result<Vec<TrackedDevice>> {
        self.list_devices_for_school_impl(school_id).await
    }

    async fn delete_device(&self, id: i64) -> Result<bool> {
        self.delete_device_impl(id).await
    }

    async fn update_device_position(
        &self,
        id: i64,
        update: DevicePositionUpdate,
    ) -> Result<Option<TrackedDevice>> {
        self.update_device_position_impl(id, update).await
    }

    async fn create_zone(&self, created_by: i64, zone: CreateSafeZoneRequest) -> Result<SafeZone> {
        self.create_zone_impl(created_by, zone).await
    }

    async fn get_zone_by_id(&self, id: i64) -> Result<Option<SafeZone>> {
        self.get_zone_by_id_impl(id).await
    }

    async fn list_zones(&self, filter: ZoneFilter) -> Result<Vec<SafeZone>> {
        self.list_zones_impl(filter).await
    }

    async fn update_zone(
        &self,
        id: i64,
        update: UpdateSafeZoneRequest,
    ) -> Result<Option<SafeZone>> {
        self.update_zone_impl(id, update).await
    }

    async fn delete_zone(&self, id: i64) -> Result<bool> {
        self.delete_zone_impl(id).await
    }

    async fn list_zone_statuses(&self, device_id: i64) -> Result<Vec<ZoneStatus>> {
        self.list_zone_statuses_impl(device_id).await
    }

    async fn upsert_zone_status(
        &self,
        device_id: i64,
        zone_id: i64,
        is_inside: bool,
        schedule_alerted: bool,
    ) -> Result<()> {
        self.upsert_zone_status_impl(device_id, zone_id, is_inside, schedule_alerted)
            .await
    }

    async fn create_alert(&self, alert: NewLocationAlert) -> Result<LocationAlert> {
        self.create_alert_impl(alert).await
    }

    async fn get_alert_by_id(&self, id: i64) -> Result<Option<LocationAlert>> {
        self.get_alert_by_id_impl(id).await
    }

    async fn list_alerts(
        &self,
        device_ids: &[i64],
        unresolved_only: bool,
    ) -> Result<Vec<LocationAlert>> {
        self.list_alerts_impl(device_ids, unresolved_only).await
    }

    async fn resolve_alert(&self, id: i64, resolved_by: i64) -> Result<Option<LocationAlert>> {
        self.resolve_alert_impl(id, resolved_by).await
    }

    async fn count_unresolved_alerts(&self, device_id: i64) -> Result<u64> {
        self.count_unresolved_alerts_impl(device_id).await
    }

    async fn list_all_settings(&self) -> Result<Vec<SystemSetting>> {
        self.list_all_settings_impl().await
    }

    async fn get_setting(&self, key: &str) -> Result<Option<SystemSetting>> {
        self.get_setting_impl(key).await
    }

    async fn update_setting(
        &self,
        key: &str,
        value: &str,
        user_id: i64,
        ip_address: Option<String>,
    ) -> Result<SystemSetting> {
        self.update_setting_impl(key, value, user_id, ip_address).await
    }

    async fn list_setting_audits(
        &self,
        query: SettingAuditQuery,
    ) -> Result<SettingAuditListResponse> {
        self.list_setting_audits_impl(query).await
    }
}
