use std::sync::Arc;

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 健康检查
    async fn ping(&self) -> Result<()>;

    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过邮箱获取用户信息（不区分大小写）
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 批量获取用户
    async fn get_users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 列出学校成员，role 为空时返回全部
    async fn list_school_users(&self, school_id: i64, role: Option<UserRole>) -> Result<Vec<User>>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 删除用户
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    async fn update_password(&self, id: i64, password_hash: &str) -> Result<bool>;
    async fn set_active_role(&self, id: i64, role: UserRole) -> Result<bool>;
    async fn update_notification_preferences(
        &self,
        id: i64,
        update: UpdatePreferencesRequest,
    ) -> Result<Option<User>>;
    async fn update_user_subscription(&self, id: i64, update: SubscriptionUpdate) -> Result<bool>;
    // 按主角色统计，school_id 为空时统计全平台
    async fn count_users_by_role(&self, school_id: Option<i64>) -> Result<Vec<RoleCount>>;

    /// 学校与学期
    async fn create_school(&self, school: CreateSchoolRequest) -> Result<School>;
    async fn get_school_by_id(&self, id: i64) -> Result<Option<School>>;
    async fn get_sandbox_school(&self) -> Result<Option<School>>;
    async fn list_schools_with_pagination(
        &self,
        query: SchoolListQuery,
    ) -> Result<SchoolListResponse>;
    async fn update_school(&self, id: i64, update: UpdateSchoolRequest) -> Result<Option<School>>;
    async fn delete_school(&self, id: i64) -> Result<bool>;
    async fn count_schools(&self) -> Result<u64>;
    // 订阅有效的学校数与用户数之和
    async fn count_active_subscriptions(&self) -> Result<u64>;
    async fn create_term(&self, school_id: i64, term: CreateTermRequest) -> Result<Term>;
    async fn get_term_by_id(&self, id: i64) -> Result<Option<Term>>;
    async fn list_terms(&self, school_id: i64) -> Result<Vec<Term>>;
    // 激活学期，同校其他学期同时取消激活
    async fn activate_term(&self, school_id: i64, term_id: i64) -> Result<bool>;

    /// 班级、科目与注册
    async fn create_class(&self, class: CreateClassRequest) -> Result<Class>;
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;
    async fn get_class_by_name(&self, school_id: i64, name: &str) -> Result<Option<Class>>;
    async fn list_classes(&self, school_id: i64) -> Result<Vec<Class>>;
    // 教师任教的班级：班主任或有课表时段
    async fn list_teacher_classes(&self, teacher_id: i64) -> Result<Vec<Class>>;
    async fn update_class(&self, class_id: i64, update: UpdateClassRequest)
    -> Result<Option<Class>>;
    async fn delete_class(&self, class_id: i64) -> Result<bool>;
    async fn create_subject(&self, subject: CreateSubjectRequest) -> Result<Subject>;
    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>>;
    async fn list_subjects(&self, school_id: i64) -> Result<Vec<Subject>>;
    async fn delete_subject(&self, id: i64) -> Result<bool>;
    async fn enroll_student(&self, class_id: i64, student_id: i64) -> Result<EnrollOutcome>;
    async fn get_active_enrollment(&self, student_id: i64) -> Result<Option<Enrollment>>;
    async fn list_class_students(&self, class_id: i64) -> Result<Vec<User>>;
    async fn link_parent(&self, link: LinkParentRequest) -> Result<ParentStudentRelation>;
    async fn get_parent_student_relation(
        &self,
        parent_id: i64,
        student_id: i64,
    ) -> Result<Option<ParentStudentRelation>>;
    async fn list_children(&self, parent_id: i64) -> Result<Vec<User>>;
    async fn list_parents_of_student(&self, student_id: i64) -> Result<Vec<User>>;

    /// 成绩
    async fn create_grade(&self, teacher_id: i64, grade: CreateGradeRequest) -> Result<Grade>;
    async fn get_grade_by_id(&self, id: i64) -> Result<Option<Grade>>;
    async fn list_grades(&self, query: GradeListQuery) -> Result<Vec<Grade>>;
    async fn update_grade(&self, id: i64, update: UpdateGradeRequest) -> Result<Option<Grade>>;
    async fn delete_grade(&self, id: i64) -> Result<bool>;
    // 返回本次新发布的条数
    async fn publish_grades(&self, class_id: i64, term_id: i64) -> Result<u64>;

    /// 考勤
    async fn upsert_attendance(&self, records: Vec<AttendanceUpsert>) -> Result<Vec<Attendance>>;
    async fn list_attendance(&self, query: AttendanceQuery) -> Result<Vec<Attendance>>;
    async fn mark_attendance_notified(&self, ids: &[i64]) -> Result<u64>;
    // 指定日期的出勤率（出席 + 迟到），无记录时为空
    async fn attendance_rate(
        &self,
        school_id: i64,
        date: chrono::NaiveDate,
    ) -> Result<Option<f64>>;

    /// 作业
    async fn create_homework(
        &self,
        school_id: i64,
        teacher_id: i64,
        homework: CreateHomeworkRequest,
    ) -> Result<Homework>;
    async fn get_homework_by_id(&self, id: i64) -> Result<Option<Homework>>;
    async fn publish_homework(&self, id: i64) -> Result<Option<Homework>>;
    async fn list_homework(&self, query: HomeworkListQuery) -> Result<Vec<Homework>>;
    async fn upsert_submission(
        &self,
        homework_id: i64,
        student_id: i64,
        submission: SubmitHomeworkRequest,
        is_late: bool,
    ) -> Result<HomeworkSubmission>;
    async fn get_submission_by_id(&self, id: i64) -> Result<Option<HomeworkSubmission>>;
    async fn get_submission(
        &self,
        homework_id: i64,
        student_id: i64,
    ) -> Result<Option<HomeworkSubmission>>;
    async fn list_submissions(&self, homework_id: i64) -> Result<Vec<HomeworkSubmission>>;
    async fn list_student_submissions(&self, student_id: i64) -> Result<Vec<HomeworkSubmission>>;
    async fn grade_submission(
        &self,
        id: i64,
        graded_by: i64,
        grade: GradeSubmissionRequest,
    ) -> Result<Option<HomeworkSubmission>>;
    // 教师名下待批改的提交数
    async fn count_pending_submissions(&self, teacher_id: i64) -> Result<u64>;

    /// 课表
    async fn create_timetable_slot(
        &self,
        school_id: i64,
        slot: CreateTimetableSlotRequest,
    ) -> Result<TimetableSlot>;
    async fn get_timetable_slot(&self, id: i64) -> Result<Option<TimetableSlot>>;
    async fn list_timetable(&self, school_id: i64, query: TimetableQuery)
    -> Result<Vec<TimetableSlot>>;
    // 跨学校
    async fn list_teacher_day_slots(&self, teacher_id: i64, day_of_week: i32)
    -> Result<Vec<TimetableSlot>>;
    async fn delete_timetable_slot(&self, id: i64) -> Result<bool>;

    /// 成绩单
    async fn create_bulletin(&self, bulletin: NewBulletin) -> Result<Bulletin>;
    async fn get_bulletin_by_id(&self, id: i64) -> Result<Option<Bulletin>>;
    async fn get_bulletin_by_student_term(
        &self,
        student_id: i64,
        term_id: i64,
    ) -> Result<Option<Bulletin>>;
    async fn get_bulletin_by_code(&self, code: &str) -> Result<Option<Bulletin>>;
    async fn list_bulletins(&self, query: BulletinListQuery) -> Result<BulletinListResponse>;
    async fn list_bulletin_grades(&self, bulletin_id: i64) -> Result<Vec<BulletinGrade>>;
    // 仅在可编辑状态下写入，并重算汇总；状态已变化时返回 None
    // 同样按 (可编辑状态, 版本) 比较并交换，None 表示已锁定或已被并发修改
    async fn upsert_bulletin_grades(
        &self,
        bulletin_id: i64,
        expected_version: i32,
        rows: Vec<BulletinGradeRow>,
        teacher_comment: Option<String>,
    ) -> Result<Option<Bulletin>>;
    // 比较并交换，返回 false 表示状态或版本已被并发修改
    async fn apply_bulletin_transition(&self, transition: BulletinTransition) -> Result<bool>;
    // (成绩单ID, 平均分)
    async fn list_class_term_averages(&self, class_id: i64, term_id: i64)
    -> Result<Vec<(i64, f64)>>;
    async fn refresh_bulletin_ranks(&self, class_id: i64, term_id: i64) -> Result<()>;
    async fn count_unpublished_class_bulletins(&self, class_id: i64, term_id: i64)
    -> Result<u64>;
    async fn list_bulletin_approvals(&self, bulletin_id: i64) -> Result<Vec<BulletinApproval>>;
    async fn log_bulletin_verification(
        &self,
        verification: NewBulletinVerification,
    ) -> Result<BulletinVerification>;
    async fn mark_bulletin_parent_verified(&self, id: i64) -> Result<bool>;
    async fn count_bulletins(
        &self,
        school_id: Option<i64>,
        created_by: Option<i64>,
        status: BulletinStatus,
    ) -> Result<u64>;

    /// 消息
    async fn create_message(&self, message: NewMessage) -> Result<Message>;
    async fn list_inbox(
        &self,
        user_id: i64,
        params: MessageListParams,
    ) -> Result<PaginatedResponse<InboxItem>>;
    async fn list_sent_messages(
        &self,
        sender_id: i64,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<Message>>;
    async fn mark_message_read(&self, message_id: i64, user_id: i64) -> Result<bool>;

    /// 通知
    async fn create_notification(&self, notification: NewNotification) -> Result<Notification>;
    async fn list_notifications(
        &self,
        user_id: i64,
        params: NotificationListParams,
    ) -> Result<PaginatedResponse<Notification>>;
    async fn count_unread_notifications(&self, user_id: i64) -> Result<u64>;
    async fn mark_notification_read(&self, id: i64, user_id: i64) -> Result<bool>;
    async fn mark_all_notifications_read(&self, user_id: i64) -> Result<u64>;

    /// 家长申请
    async fn create_parent_request(
        &self,
        parent_id: i64,
        school_id: i64,
        request: CreateParentRequest,
    ) -> Result<ParentRequest>;
    async fn get_parent_request_by_id(&self, id: i64) -> Result<Option<ParentRequest>>;
    async fn list_parent_requests(
        &self,
        school_id: Option<i64>,
        parent_id: Option<i64>,
        status: Option<ParentRequestStatus>,
    ) -> Result<Vec<ParentRequest>>;
    // 仅当当前状态仍为 expected 时更新
    async fn respond_parent_request(
        &self,
        id: i64,
        expected: ParentRequestStatus,
        response: RespondParentRequest,
        processed_by: i64,
    ) -> Result<Option<ParentRequest>>;
    async fn count_parent_requests(
        &self,
        school_id: i64,
        status: ParentRequestStatus,
    ) -> Result<u64>;

    /// 支付
    async fn create_payment(&self, payment: NewPayment) -> Result<Payment>;
    async fn get_payment_by_provider_id(&self, provider_payment_id: &str)
    -> Result<Option<Payment>>;
    // 仅 pending 状态可完成，重复回调返回 false；订阅开通与之同一事务
    async fn complete_payment(
        &self,
        provider_payment_id: &str,
        subscription: Option<SubscriptionUpdate>,
    ) -> Result<bool>;
    async fn fail_payment(&self, provider_payment_id: &str, reason: &str) -> Result<bool>;
    async fn list_payments(
        &self,
        user_id: Option<i64>,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<Payment>>;
    // (已完成笔数, 收入合计)
    async fn payment_totals(&self) -> Result<(u64, i64)>;

    /// 文件管理方法
    async fn create_file(&self, file: NewFile) -> Result<File>;
    // 通过唯一 token 获取文件信息
    async fn get_file_by_token(&self, token: &str) -> Result<Option<File>>;

    /// 地理定位
    async fn create_device(
        &self,
        registered_by: i64,
        school_id: Option<i64>,
        device: RegisterDeviceRequest,
    ) -> Result<TrackedDevice>;
    async fn get_device_by_id(&self, id: i64) -> Result<Option<TrackedDevice>>;
    async fn list_devices_for_students(&self, student_ids: &[i64]) -> Result<Vec<TrackedDevice>>;
    async fn list_devices_for_school(&self, school_id: i64) -> Result<Vec<TrackedDevice>>;
    async fn delete_device(&self, id: i64) -> Result<bool>;
    async fn update_device_position(
        &self,
        id: i64,
        update: DevicePositionUpdate,
    ) -> Result<Option<TrackedDevice>>;
    async fn create_zone(&self, created_by: i64, zone: CreateSafeZoneRequest) -> Result<SafeZone>;
    async fn get_zone_by_id(&self, id: i64) -> Result<Option<SafeZone>>;
    async fn list_zones(&self, filter: ZoneFilter) -> Result<Vec<SafeZone>>;
    async fn update_zone(&self, id: i64, update: UpdateSafeZoneRequest)
    -> Result<Option<SafeZone>>;
    async fn delete_zone(&self, id: i64) -> Result<bool>;
    async fn list_zone_statuses(&self, device_id: i64) -> Result<Vec<ZoneStatus>>;
    async fn upsert_zone_status(
        &self,
        device_id: i64,
        zone_id: i64,
        is_inside: bool,
        schedule_alerted: bool,
    ) -> Result<()>;
    async fn create_alert(&self, alert: NewLocationAlert) -> Result<LocationAlert>;
    async fn get_alert_by_id(&self, id: i64) -> Result<Option<LocationAlert>>;
    async fn list_alerts(&self, device_ids: &[i64], unresolved_only: bool)
    -> Result<Vec<LocationAlert>>;
    async fn resolve_alert(&self, id: i64, resolved_by: i64) -> Result<Option<LocationAlert>>;
    async fn count_unresolved_alerts(&self, device_id: i64) -> Result<u64>;

    /// 系统设置
    async fn list_all_settings(&self) -> Result<Vec<SystemSetting>>;
    async fn get_setting(&self, key: &str) -> Result<Option<SystemSetting>>;
    async fn update_setting(
        &self,
        key: &str,
        value: &str,
        user_id: i64,
        ip_address: Option<String>,
    ) -> Result<SystemSetting>;
    async fn list_setting_audits(&self, query: SettingAuditQuery)
    -> Result<SettingAuditListResponse>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
