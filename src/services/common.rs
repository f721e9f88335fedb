//! 服务层公共工具
//!
//! - `EducafricError` 到 HTTP 响应的映射（实现 `ResponseError`，服务中可直接使用 `?`）
//! - `ApiError`：携带业务错误码的即时错误响应
//! - 当前用户、学校范围、家长关系等权限辅助函数

use std::fmt;
use std::sync::Arc;

use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, http::StatusCode, web};
use tracing::error;

use crate::cache::ObjectCache;
use crate::errors::EducafricError;
use crate::models::classes::{Class, Subject};
use crate::models::schools::Term;
use crate::models::users::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 带业务错误码的错误响应
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized, message)
    }

    pub fn forbidden(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, code, message)
    }

    pub fn not_found(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, code, message)
    }

    pub fn conflict(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, code, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?}): {}", self.status, self.code, self.message)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status)
            .json(ApiResponse::error_empty(self.code, self.message.clone()))
    }
}

impl EducafricError {
    fn http_status(&self) -> (StatusCode, ErrorCode) {
        match self {
            EducafricError::Validation(_) | EducafricError::DateParse(_) => {
                (StatusCode::BAD_REQUEST, ErrorCode::ValidationFailed)
            }
            EducafricError::Authentication(_) => (StatusCode::UNAUTHORIZED, ErrorCode::AuthFailed),
            EducafricError::Authorization(_) => (StatusCode::FORBIDDEN, ErrorCode::Forbidden),
            EducafricError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NotFound),
            EducafricError::Conflict(_) => (StatusCode::CONFLICT, ErrorCode::Conflict),
            EducafricError::InvalidTransition(_) => (
                StatusCode::BAD_REQUEST,
                ErrorCode::BulletinInvalidTransition,
            ),
            EducafricError::ExternalService(_) => {
                (StatusCode::BAD_GATEWAY, ErrorCode::ExternalServiceError)
            }
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
            ),
        }
    }
}

// 批量操作需要逐项记录错误信息
impl From<EducafricError> for ApiError {
    fn from(err: EducafricError) -> Self {
        let (status, code) = err.http_status();
        if status.is_server_error() {
            error!("{}", err.format_simple());
            return ApiError::new(status, code, "Internal server error");
        }
        ApiError::new(status, code, err.message())
    }
}

impl ResponseError for EducafricError {
    fn status_code(&self) -> StatusCode {
        self.http_status().0
    }

    fn error_response(&self) -> HttpResponse {
        let (status, code) = self.http_status();
        if status.is_server_error() {
            // 内部错误细节只写日志
            #[cfg(debug_assertions)]
            error!("{}", self.format_colored());
            #[cfg(not(debug_assertions))]
            error!("{}", self.format_simple());
            return HttpResponse::build(status)
                .json(ApiResponse::error_empty(code, "Internal server error"));
        }
        HttpResponse::build(status).json(ApiResponse::error_empty(code, self.message()))
    }
}

/// 从 app_data 读取存储实例
pub(crate) fn storage_from_request(
    request: &HttpRequest,
) -> actix_web::Result<Arc<dyn Storage>> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|s| s.get_ref().clone())
        .ok_or_else(|| {
            EducafricError::database_config("Storage not found in app data").into()
        })
}

/// 缓存为可选组件
pub(crate) fn cache_from_request(request: &HttpRequest) -> Option<Arc<dyn ObjectCache>> {
    request
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|c| c.get_ref().clone())
}

/// 当前登录用户（由 RequireJWT 写入）
pub(crate) fn current_user(request: &HttpRequest) -> Result<User, ApiError> {
    request
        .extensions()
        .get::<User>()
        .cloned()
        .ok_or_else(|| ApiError::unauthorized("Unauthorized: missing user"))
}

/// 当前用户所属学校
pub(crate) fn require_school(user: &User) -> Result<i64, ApiError> {
    user.school_id.ok_or_else(|| {
        ApiError::forbidden(
            ErrorCode::NoSchoolAssigned,
            "No school is assigned to this account",
        )
    })
}

pub(crate) fn ensure_school_access(user: &User, school_id: i64) -> Result<(), ApiError> {
    if user.can_access_school(school_id) {
        Ok(())
    } else {
        Err(ApiError::forbidden(
            ErrorCode::SchoolAccessDenied,
            "You do not have access to this school",
        ))
    }
}

pub(crate) fn client_ip(request: &HttpRequest) -> Option<String> {
    request
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string())
}

pub(crate) fn user_agent(request: &HttpRequest) -> Option<String> {
    request
        .headers()
        .get(actix_web::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

/// 按 ID 获取班级并检查学校范围
pub(crate) async fn load_class(
    storage: &Arc<dyn Storage>,
    user: &User,
    class_id: i64,
) -> actix_web::Result<Class> {
    let class = storage
        .get_class_by_id(class_id)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::ClassNotFound, "Class not found"))?;
    ensure_school_access(user, class.school_id)?;
    Ok(class)
}

/// 教师须为班主任或在该班有课；学校管理者可访问本校所有班级
pub(crate) async fn ensure_teaches_class(
    storage: &Arc<dyn Storage>,
    user: &User,
    class: &Class,
) -> actix_web::Result<()> {
    ensure_school_access(user, class.school_id)?;
    if user.is_platform_admin() || user.active_role == UserRole::Director {
        return Ok(());
    }
    if class.teacher_id == Some(user.id) {
        return Ok(());
    }
    let taught = storage.list_teacher_classes(user.id).await?;
    if taught.iter().any(|c| c.id == class.id) {
        Ok(())
    } else {
        Err(ApiError::forbidden(
            ErrorCode::NotClassTeacher,
            "You do not teach this class",
        )
        .into())
    }
}

/// 家长与学生须存在关联
pub(crate) async fn ensure_parent_of(
    storage: &Arc<dyn Storage>,
    parent_id: i64,
    student_id: i64,
) -> actix_web::Result<()> {
    match storage
        .get_parent_student_relation(parent_id, student_id)
        .await?
    {
        Some(_) => Ok(()),
        None => Err(ApiError::forbidden(
            ErrorCode::NotLinkedToStudent,
            "You are not linked to this student",
        )
        .into()),
    }
}

/// 学期须属于指定学校
pub(crate) async fn load_term(
    storage: &Arc<dyn Storage>,
    school_id: i64,
    term_id: i64,
) -> actix_web::Result<Term> {
    let term = storage
        .get_term_by_id(term_id)
        .await?
        .filter(|t| t.school_id == school_id)
        .ok_or_else(|| ApiError::not_found(ErrorCode::TermNotFound, "Term not found"))?;
    Ok(term)
}

/// 科目须属于指定学校
pub(crate) async fn load_subject(
    storage: &Arc<dyn Storage>,
    school_id: i64,
    subject_id: i64,
) -> actix_web::Result<Subject> {
    let subject = storage
        .get_subject_by_id(subject_id)
        .await?
        .filter(|s| s.school_id == school_id)
        .ok_or_else(|| ApiError::not_found(ErrorCode::SubjectNotFound, "Subject not found"))?;
    Ok(subject)
}

/// 学校成员必须属于指定角色且在同一学校
pub(crate) async fn load_school_member(
    storage: &Arc<dyn Storage>,
    school_id: i64,
    user_id: i64,
    role: UserRole,
) -> actix_web::Result<User> {
    let member = storage
        .get_user_by_id(user_id)
        .await?
        .filter(|u| u.school_id == Some(school_id) && u.has_role(role))
        .ok_or_else(|| {
            ApiError::not_found(
                ErrorCode::UserNotFound,
                format!("No {role} with id {user_id} in this school"),
            )
        })?;
    Ok(member)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::MessageBody;

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            EducafricError::validation("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            EducafricError::conflict("x").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            EducafricError::external_service("x").status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            EducafricError::database_operation("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_error_hides_details() {
        let resp = EducafricError::database_operation("secret table name").error_response();
        let body = resp.into_body().try_into_bytes().unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(!text.contains("secret table name"));
        assert!(text.contains("\"code\":1500"));
    }

    #[test]
    fn test_api_error_carries_code() {
        let err = ApiError::conflict(ErrorCode::ClassFull, "Class is full");
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body = resp.into_body().try_into_bytes().unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("\"code\":3102"));
        assert!(text.contains("Class is full"));
    }
}
