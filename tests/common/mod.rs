//! 集成测试公共工具：内存 SQLite 存储与基础数据
#![allow(dead_code)]

use std::sync::Arc;

use educafric::models::classes::{Class, CreateClassRequest, CreateSubjectRequest, Subject};
use educafric::models::schools::{CreateSchoolRequest, School, SchoolType};
use educafric::models::users::{CreateUserRequest, User, UserRole};
use educafric::storage::Storage;
use educafric::storage::sea_orm_storage::SeaOrmStorage;

/// 每次调用都是一份独立的空库，迁移已执行
pub async fn memory_storage() -> Arc<dyn Storage> {
    let storage = SeaOrmStorage::connect("sqlite::memory:", 1, 5)
        .await
        .expect("in-memory storage");
    Arc::new(storage)
}

pub async fn school(storage: &Arc<dyn Storage>, name: &str) -> School {
    storage
        .create_school(CreateSchoolRequest {
            name: name.to_string(),
            school_type: SchoolType::Public,
            address: None,
            city: Some("Douala".to_string()),
            phone: None,
            email: None,
            director_id: None,
            geolocation_enabled: false,
            is_sandbox: false,
        })
        .await
        .expect("create school")
}

pub async fn user(
    storage: &Arc<dyn Storage>,
    email: &str,
    role: UserRole,
    school_id: Option<i64>,
) -> User {
    storage
        .create_user(CreateUserRequest {
            email: email.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            first_name: "Test".to_string(),
            last_name: role.as_str().to_string(),
            role,
            secondary_roles: vec![],
            school_id,
            phone: Some("+237 670 00 00 00".to_string()),
            whatsapp_number: None,
            preferred_language: "fr".to_string(),
            is_test_account: false,
        })
        .await
        .expect("create user")
}

pub async fn class(storage: &Arc<dyn Storage>, school_id: i64, name: &str, max: i32) -> Class {
    storage
        .create_class(CreateClassRequest {
            name: name.to_string(),
            level: "6ème".to_string(),
            section: None,
            teacher_id: None,
            max_students: max,
            school_id,
        })
        .await
        .expect("create class")
}

pub async fn subject(storage: &Arc<dyn Storage>, school_id: i64, code: &str) -> Subject {
    storage
        .create_subject(CreateSubjectRequest {
            name_fr: format!("Matière {code}"),
            name_en: format!("Subject {code}"),
            code: code.to_string(),
            coefficient: 2.0,
            school_id,
        })
        .await
        .expect("create subject")
}
