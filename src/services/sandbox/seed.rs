//! 沙盒演示数据
//!
//! 启动时写入演示学校、学期、班级、科目与各角色演示账号。
//! 可重复执行：已存在的数据按名称或邮箱复用。

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::errors::{EducafricError, Result};
use crate::models::classes::{
    CreateClassRequest, CreateSubjectRequest, LinkParentRequest, RelationshipType,
};
use crate::models::schools::{CreateSchoolRequest, CreateTermRequest, School, SchoolType, UpdateSchoolRequest};
use crate::models::users::{CreateUserRequest, User, UserRole};
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::random_code::generate_random_code;

/// 提供演示账号的角色；平台管理员不开放
pub const SANDBOX_ROLES: &[UserRole] = &[
    UserRole::Director,
    UserRole::Teacher,
    UserRole::Parent,
    UserRole::Student,
    UserRole::Freelancer,
    UserRole::Commercial,
];

pub fn demo_email(role: UserRole, domain: &str) -> String {
    format!("{}.demo@{}", role.as_str().replace('_', "-"), domain)
}

fn demo_names(role: UserRole) -> (&'static str, &'static str) {
    match role {
        UserRole::Director => ("Jean-Pierre", "Essomba"),
        UserRole::Teacher => ("Marie", "Nguema"),
        UserRole::Parent => ("Paul", "Mbida"),
        UserRole::Student => ("Junior", "Mbida"),
        UserRole::Freelancer => ("Sophie", "Atangana"),
        UserRole::Commercial => ("Eric", "Tchoua"),
        _ => ("Demo", "User"),
    }
}

/// 学年从 9 月开始
fn academic_year(today: NaiveDate) -> (i32, String) {
    let start_year = if today.month() >= 9 {
        today.year()
    } else {
        today.year() - 1
    };
    (start_year, format!("{}-{}", start_year, start_year + 1))
}

async fn ensure_school(storage: &Arc<dyn Storage>, name: &str) -> Result<School> {
    if let Some(school) = storage.get_sandbox_school().await? {
        return Ok(school);
    }
    let school = storage
        .create_school(CreateSchoolRequest {
            name: name.to_string(),
            school_type: SchoolType::Private,
            address: Some("Bastos".to_string()),
            city: Some("Yaoundé".to_string()),
            phone: None,
            email: None,
            director_id: None,
            geolocation_enabled: true,
            is_sandbox: true,
        })
        .await?;
    info!("Sandbox school {} created", school.id);
    Ok(school)
}

async fn ensure_account(
    storage: &Arc<dyn Storage>,
    school_id: i64,
    role: UserRole,
    domain: &str,
) -> Result<User> {
    let email = demo_email(role, domain);
    if let Some(user) = storage.get_user_by_email(&email).await? {
        if !user.is_test_account {
            return Err(EducafricError::conflict(format!(
                "{email} belongs to a regular account"
            )));
        }
        return Ok(user);
    }

    // 演示账号只能通过沙盒登录，密码随机且不公开
    let password_hash = hash_password(&generate_random_code(32))?;
    let (first_name, last_name) = demo_names(role);
    let user = storage
        .create_user(CreateUserRequest {
            email,
            password_hash,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            role,
            secondary_roles: vec![],
            school_id: Some(school_id),
            phone: Some("+237600000000".to_string()),
            whatsapp_number: None,
            preferred_language: "fr".to_string(),
            is_test_account: true,
        })
        .await?;
    debug!("Sandbox {} account created ({})", role, user.email);
    Ok(user)
}

pub async fn seed_sandbox(storage: &Arc<dyn Storage>) -> Result<()> {
    let config = &AppConfig::get().sandbox;
    let school = ensure_school(storage, &config.school_name).await?;

    let mut accounts = Vec::with_capacity(SANDBOX_ROLES.len());
    for role in SANDBOX_ROLES {
        accounts.push(ensure_account(storage, school.id, *role, &config.email_domain).await?);
    }
    let account = |role: UserRole| {
        accounts
            .iter()
            .find(|u| u.role == role)
            .ok_or_else(|| EducafricError::not_found(format!("missing sandbox {role}")))
    };
    let director = account(UserRole::Director)?;
    let teacher = account(UserRole::Teacher)?;
    let parent = account(UserRole::Parent)?;
    let student = account(UserRole::Student)?;

    if school.director_id != Some(director.id) {
        storage
            .update_school(
                school.id,
                UpdateSchoolRequest {
                    director_id: Some(director.id),
                    ..Default::default()
                },
            )
            .await?;
    }

    if storage.list_terms(school.id).await?.is_empty() {
        let (start_year, year_label) = academic_year(chrono::Local::now().date_naive());
        let start_date = NaiveDate::from_ymd_opt(start_year, 9, 1)
            .ok_or_else(|| EducafricError::validation("invalid term start"))?;
        let end_date = NaiveDate::from_ymd_opt(start_year, 12, 20)
            .ok_or_else(|| EducafricError::validation("invalid term end"))?;
        let term = storage
            .create_term(
                school.id,
                CreateTermRequest {
                    name: "Premier trimestre".to_string(),
                    academic_year: year_label,
                    start_date,
                    end_date,
                },
            )
            .await?;
        storage.activate_term(school.id, term.id).await?;
    }

    let class = match storage.get_class_by_name(school.id, "6ème A").await? {
        Some(class) => class,
        None => {
            storage
                .create_class(CreateClassRequest {
                    name: "6ème A".to_string(),
                    level: "6ème".to_string(),
                    section: Some("A".to_string()),
                    teacher_id: Some(teacher.id),
                    max_students: 40,
                    school_id: school.id,
                })
                .await?
        }
    };

    if storage.list_subjects(school.id).await?.is_empty() {
        storage
            .create_subject(CreateSubjectRequest {
                name_fr: "Mathématiques".to_string(),
                name_en: "Mathematics".to_string(),
                code: "MATH".to_string(),
                coefficient: 4.0,
                school_id: school.id,
            })
            .await?;
    }

    // 重复报名返回 AlreadyEnrolled，这里无需区分
    storage.enroll_student(class.id, student.id).await?;

    if storage
        .get_parent_student_relation(parent.id, student.id)
        .await?
        .is_none()
    {
        storage
            .link_parent(LinkParentRequest {
                parent_id: parent.id,
                student_id: student.id,
                relationship: RelationshipType::Father,
                is_primary: true,
            })
            .await?;
    }

    info!(
        "Sandbox ready: school {} with {} demo accounts",
        school.id,
        accounts.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_email() {
        assert_eq!(
            demo_email(UserRole::Director, "test.educafric.com"),
            "director.demo@test.educafric.com"
        );
    }

    #[test]
    fn test_academic_year_starts_in_september() {
        let october = NaiveDate::from_ymd_opt(2025, 10, 3).unwrap();
        assert_eq!(academic_year(october), (2025, "2025-2026".to_string()));
        let march = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        assert_eq!(academic_year(march), (2025, "2025-2026".to_string()));
    }

    #[test]
    fn test_no_platform_admin_demo() {
        assert!(!SANDBOX_ROLES.iter().any(|r| r.is_platform_admin()));
    }
}
