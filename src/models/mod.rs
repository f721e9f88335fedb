//! 业务数据模型
//!
//! 每个领域目录按 entities / requests / responses 划分，
//! 与 `entity` 模块中的数据库实体相互独立。

pub mod attendance;
pub mod auth;
pub mod bulletins;
pub mod classes;
pub mod common;
pub mod dashboards;
pub mod files;
pub mod geolocation;
pub mod grades;
pub mod homework;
pub mod messages;
pub mod notifications;
pub mod parent_requests;
pub mod payments;
pub mod sandbox;
pub mod schools;
pub mod system;
pub mod timetable;
pub mod users;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};

/// 进程启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码，`ApiResponse.code` 的取值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1xxx
    BadRequest = 1000,
    ValidationFailed = 1001,
    Unauthorized = 1002,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,
    ExternalServiceError = 1502,

    // 认证与用户 2xxx
    AuthFailed = 2000,
    AccountInactive = 2001,
    RoleNotAssigned = 2002,
    RegistrationFailed = 2003,
    PasswordPolicyViolation = 2004,
    UserNotFound = 2100,
    UserAlreadyExists = 2101,
    CannotDeleteSelf = 2102,

    // 学校与班级 3xxx
    SchoolNotFound = 3000,
    SchoolAccessDenied = 3001,
    NoSchoolAssigned = 3002,
    TermNotFound = 3010,
    ClassNotFound = 3100,
    ClassAlreadyExists = 3101,
    ClassFull = 3102,
    AlreadyEnrolled = 3103,
    SubjectNotFound = 3110,
    TimetableConflict = 3200,
    NotClassTeacher = 3201,

    // 教学 4xxx
    GradeNotFound = 4000,
    GradeOutOfRange = 4001,
    HomeworkNotFound = 4100,
    SubmissionNotFound = 4101,
    SubmissionAlreadyGraded = 4102,

    // 成绩单 5xxx
    BulletinNotFound = 5000,
    BulletinInvalidTransition = 5001,
    BulletinTransitionConflict = 5002,
    BulletinAlreadyExists = 5003,
    BulletinLocked = 5004,
    BulletinVerificationFailed = 5005,

    // 通讯 6xxx
    MessageNotFound = 6000,
    NotificationNotFound = 6100,
    ParentRequestNotFound = 6200,
    ParentRequestInvalidStatus = 6201,
    NotLinkedToStudent = 6300,

    // 地理定位 7xxx
    DeviceNotFound = 7000,
    ZoneNotFound = 7001,
    AlertNotFound = 7002,
    InvalidCoordinates = 7003,

    // 支付 8xxx
    PaymentFailed = 8000,
    PlanNotFound = 8001,
    WebhookSignatureInvalid = 8002,

    // 沙盒与系统 9xxx
    SandboxDisabled = 9000,
    FileNotFound = 9100,
    FileUploadFailed = 9101,
    FileTypeNotAllowed = 9102,
    FileSizeExceeded = 9103,
    MultifileUploadNotAllowed = 9104,
    SettingNotFound = 9200,
    SettingInvalidValue = 9201,
}
