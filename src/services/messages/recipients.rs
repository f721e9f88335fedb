//! 收件人解析
//!
//! 收件人限定在发送者所在学校；家长和学生只能给本校教职员工单独发消息。

use std::sync::Arc;

use crate::models::ErrorCode;
use crate::models::messages::{RecipientType, SendMessageRequest};
use crate::models::users::{User, UserRole, UserStatus};
use crate::services::common::{ApiError, ensure_school_access, require_school};
use crate::storage::Storage;

fn is_staff(role: UserRole) -> bool {
    UserRole::staff_roles().contains(&&role)
}

/// 家长、学生只能选择单独发送
pub(crate) fn check_sender_scope(
    sender_role: UserRole,
    recipient_type: RecipientType,
) -> Result<(), ApiError> {
    if is_staff(sender_role) || recipient_type == RecipientType::Individual {
        Ok(())
    } else {
        Err(ApiError::forbidden(
            ErrorCode::Forbidden,
            "Only staff members can send group messages",
        ))
    }
}

pub(crate) async fn resolve_recipients(
    storage: &Arc<dyn Storage>,
    sender: &User,
    message: &SendMessageRequest,
) -> Result<Vec<User>, ApiError> {
    check_sender_scope(sender.active_role, message.recipient_type)?;

    let mut recipients = match message.recipient_type {
        RecipientType::Individual => {
            if message.recipient_ids.is_empty() {
                return Err(ApiError::bad_request(
                    ErrorCode::ValidationFailed,
                    "recipient_ids is required for individual messages",
                ));
            }
            let mut ids = message.recipient_ids.clone();
            ids.sort_unstable();
            ids.dedup();
            let users = storage.get_users_by_ids(&ids).await?;
            if users.len() != ids.len() {
                return Err(ApiError::not_found(
                    ErrorCode::UserNotFound,
                    "One or more recipients do not exist",
                ));
            }
            for user in &users {
                if !sender.is_platform_admin() && user.school_id != sender.school_id {
                    return Err(ApiError::forbidden(
                        ErrorCode::SchoolAccessDenied,
                        "Recipients must belong to your school",
                    ));
                }
                if !is_staff(sender.active_role) && !is_staff(user.role) {
                    return Err(ApiError::forbidden(
                        ErrorCode::Forbidden,
                        "You can only message school staff",
                    ));
                }
            }
            users
        }
        RecipientType::Class => {
            let class_id = message.class_id.ok_or_else(|| {
                ApiError::bad_request(
                    ErrorCode::ValidationFailed,
                    "class_id is required for class messages",
                )
            })?;
            let class = storage
                .get_class_by_id(class_id)
                .await?
                .ok_or_else(|| ApiError::not_found(ErrorCode::ClassNotFound, "Class not found"))?;
            ensure_school_access(sender, class.school_id)?;

            // 班级学生及其家长
            let students = storage.list_class_students(class.id).await?;
            let mut users = Vec::with_capacity(students.len() * 2);
            for student in &students {
                users.extend(storage.list_parents_of_student(student.id).await?);
            }
            users.extend(students);
            users
        }
        RecipientType::AllTeachers => {
            let school_id = require_school(sender)?;
            storage
                .list_school_users(school_id, Some(UserRole::Teacher))
                .await?
        }
        RecipientType::AllParents => {
            let school_id = require_school(sender)?;
            storage
                .list_school_users(school_id, Some(UserRole::Parent))
                .await?
        }
        RecipientType::AllStudents => {
            let school_id = require_school(sender)?;
            storage
                .list_school_users(school_id, Some(UserRole::Student))
                .await?
        }
        RecipientType::All => {
            let school_id = require_school(sender)?;
            storage.list_school_users(school_id, None).await?
        }
    };

    recipients.retain(|u| u.id != sender.id && u.status == UserStatus::Active);
    recipients.sort_by_key(|u| u.id);
    recipients.dedup_by_key(|u| u.id);
    Ok(recipients)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_senders_limited_to_individual() {
        assert!(check_sender_scope(UserRole::Parent, RecipientType::Individual).is_ok());
        assert!(check_sender_scope(UserRole::Student, RecipientType::Individual).is_ok());
        assert!(check_sender_scope(UserRole::Parent, RecipientType::AllParents).is_err());
        assert!(check_sender_scope(UserRole::Student, RecipientType::Class).is_err());
    }

    #[test]
    fn test_staff_may_broadcast() {
        assert!(check_sender_scope(UserRole::Teacher, RecipientType::Class).is_ok());
        assert!(check_sender_scope(UserRole::Director, RecipientType::All).is_ok());
        assert!(check_sender_scope(UserRole::Commercial, RecipientType::All).is_err());
    }
}
