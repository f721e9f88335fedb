//! 经由完整路由的多步骤流程：认证、角色与学校范围、定位告警、考勤通知、
//! 成绩单发布核验与支付回调
mod common;

use std::sync::{Arc, Once};

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use chrono::Datelike;
use sea_orm::{ConnectionTrait, Database};
use serde_json::{Value, json};

use educafric::models::bulletins::{BulletinAction, BulletinGradeRow, BulletinStatus, BulletinTransition, NewBulletin};
use educafric::models::classes::{LinkParentRequest, RelationshipType, UpdateClassRequest};
use educafric::models::geolocation::{CreateSafeZoneRequest, DeviceType, RegisterDeviceRequest, ZoneType};
use educafric::models::parent_requests::{
    CreateParentRequest, ParentRequestStatus, RequestPriority, RespondParentRequest,
};
use educafric::models::payments::{NewPayment, PaymentStatus};
use educafric::models::schools::CreateTermRequest;
use educafric::models::users::{SubscriptionStatus, User, UserRole};
use educafric::routes::configure_routes;
use educafric::services::payments::stripe::compute_signature;
use educafric::storage::Storage;
use educafric::storage::sea_orm_storage::SeaOrmStorage;
use educafric::utils::jwt::JwtUtils;

const WEBHOOK_SECRET: &str = "whsec_http_flows";

/// 本文件的测试共用一个进程，配置只读取一次
fn configure() {
    static ENV: Once = Once::new();
    ENV.call_once(|| {
        // 首次读取配置之前设置，之后不再改动环境变量
        unsafe { std::env::set_var("STRIPE_WEBHOOK_SECRET", WEBHOOK_SECRET) };
    });
}

async fn storage() -> Arc<dyn Storage> {
    configure();
    common::memory_storage().await
}

macro_rules! app {
    ($storage:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($storage.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

fn bearer(user: &User) -> (&'static str, String) {
    configure();
    let token = JwtUtils::generate_access_token(user.id, user.role.as_str(), user.school_id)
        .expect("access token");
    ("Authorization", format!("Bearer {token}"))
}

fn alert_types(body: &Value) -> Vec<String> {
    body["data"]["alerts"]
        .as_array()
        .map(|alerts| {
            alerts
                .iter()
                .filter_map(|a| a["alert_type"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

const HOME: (f64, f64) = (4.0511, 9.7679);
/// 约 1.1 公里外
const AWAY: f64 = 4.0611;

fn home_zone(device_id: i64, allowed_days: Vec<u32>) -> CreateSafeZoneRequest {
    CreateSafeZoneRequest {
        device_id: Some(device_id),
        school_id: None,
        name: "Maison".to_string(),
        latitude: HOME.0,
        longitude: HOME.1,
        radius_m: 200.0,
        zone_type: ZoneType::Home,
        notify_on_entry: true,
        notify_on_exit: true,
        allowed_time_start: None,
        allowed_time_end: None,
        allowed_days,
    }
}

#[actix_web::test]
async fn staff_signup_does_not_attach_a_school() {
    let storage = storage().await;
    let school = common::school(&storage, "Lycée de New Bell").await;
    let app = app!(storage);

    let register = |email: &str, role: &str| {
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({
                "email": email,
                "password": "Yaounde2025",
                "first_name": "Paul",
                "last_name": "Mbarga",
                "role": role,
                "school_id": school.id,
            }))
            .to_request()
    };

    let resp = test::call_service(&app, register("prof@newbell.cm", "teacher")).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["data"]["school_id"].is_null());

    let resp = test::call_service(&app, register("maman@newbell.cm", "parent")).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["school_id"], json!(school.id));
}

#[actix_web::test]
async fn director_routes_enforce_role_and_school() {
    let storage = storage().await;
    let school_a = common::school(&storage, "Collège A").await;
    let school_b = common::school(&storage, "Collège B").await;
    let director_a = common::user(&storage, "dir@a.cm", UserRole::Director, Some(school_a.id)).await;
    let director_b = common::user(&storage, "dir@b.cm", UserRole::Director, Some(school_b.id)).await;
    let student = common::user(&storage, "eleve@b.cm", UserRole::Student, Some(school_b.id)).await;
    let parent = common::user(&storage, "parent@b.cm", UserRole::Parent, Some(school_b.id)).await;
    let pending = storage
        .create_parent_request(
            parent.id,
            school_b.id,
            CreateParentRequest {
                student_id: student.id,
                request_type: "absence".to_string(),
                category: "attendance".to_string(),
                subject: "Absence du 6 octobre".to_string(),
                description: "Rendez-vous médical".to_string(),
                priority: RequestPriority::Medium,
                requested_date: None,
            },
        )
        .await
        .unwrap();
    let app = app!(storage);

    let anonymous = test::TestRequest::get().uri("/api/director/dashboard").to_request();
    assert_eq!(test::call_service(&app, anonymous).await.status(), StatusCode::UNAUTHORIZED);

    let as_student = test::TestRequest::get()
        .uri("/api/director/dashboard")
        .insert_header(bearer(&student))
        .to_request();
    assert_eq!(test::call_service(&app, as_student).await.status(), StatusCode::FORBIDDEN);

    let respond = |director: &User| {
        test::TestRequest::put()
            .uri(&format!("/api/director/parent-requests/{}", pending.id))
            .insert_header(bearer(director))
            .set_json(json!({ "status": "in_progress", "response": "Pris en compte" }))
            .to_request()
    };
    assert_eq!(
        test::call_service(&app, respond(&director_a)).await.status(),
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        test::call_service(&app, respond(&director_b)).await.status(),
        StatusCode::OK
    );

    // 基于已过期状态的处理不生效
    let stale = storage
        .respond_parent_request(
            pending.id,
            ParentRequestStatus::Pending,
            RespondParentRequest {
                status: ParentRequestStatus::Approved,
                response: None,
            },
            director_b.id,
        )
        .await
        .unwrap();
    assert!(stale.is_none());
    let current = storage.get_parent_request_by_id(pending.id).await.unwrap().unwrap();
    assert_eq!(current.status, ParentRequestStatus::InProgress);
    assert_eq!(current.processed_by, Some(director_b.id));
}

#[actix_web::test]
async fn location_reports_alert_on_zone_transitions_only() {
    let storage = storage().await;
    let school = common::school(&storage, "École du Plateau").await;
    let student = common::user(&storage, "awa@plateau.cm", UserRole::Student, Some(school.id)).await;
    let device = storage
        .create_device(
            student.id,
            Some(school.id),
            RegisterDeviceRequest {
                student_id: student.id,
                device_type: DeviceType::Phone,
                device_name: "Téléphone d'Awa".to_string(),
                imei: None,
            },
        )
        .await
        .unwrap();
    let zone = storage.create_zone(student.id, home_zone(device.id, vec![])).await.unwrap();
    let app = app!(storage);
    let auth = bearer(&student);

    let steps: [(f64, Vec<&str>); 4] = [
        // 首次上报没有历史状态，不算进入
        (HOME.0, vec![]),
        (AWAY, vec!["exit"]),
        (AWAY, vec![]),
        (HOME.0, vec!["entry"]),
    ];
    for (latitude, expected) in steps {
        let req = test::TestRequest::post()
            .uri("/api/geolocation/locations")
            .insert_header(auth.clone())
            .set_json(json!({
                "device_id": device.id,
                "latitude": latitude,
                "longitude": HOME.1,
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(alert_types(&body), expected, "report at latitude {latitude}");
    }

    let statuses = storage.list_zone_statuses(device.id).await.unwrap();
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].zone_id, zone.id);
    assert!(statuses[0].is_inside);
    assert_eq!(storage.count_unresolved_alerts(device.id).await.unwrap(), 2);
}

#[actix_web::test]
async fn staying_out_of_schedule_alerts_once_per_stay() {
    let storage = storage().await;
    let student = common::user(&storage, "ivo@example.cm", UserRole::Student, None).await;
    let device = storage
        .create_device(
            student.id,
            None,
            RegisterDeviceRequest {
                student_id: student.id,
                device_type: DeviceType::Smartwatch,
                device_name: "Montre d'Ivo".to_string(),
                imei: None,
            },
        )
        .await
        .unwrap();
    // 只允许在明天出现在该区域
    let tomorrow = chrono::Local::now().weekday().number_from_monday() % 7 + 1;
    storage
        .create_zone(student.id, home_zone(device.id, vec![tomorrow]))
        .await
        .unwrap();
    let app = app!(storage);
    let auth = bearer(&student);

    let steps: [(f64, Vec<&str>); 4] = [
        (HOME.0, vec!["unauthorized_time"]),
        (HOME.0, vec![]),
        (AWAY, vec!["exit"]),
        (HOME.0, vec!["entry", "unauthorized_time"]),
    ];
    for (latitude, expected) in steps {
        let req = test::TestRequest::post()
            .uri("/api/geolocation/locations")
            .insert_header(auth.clone())
            .set_json(json!({
                "device_id": device.id,
                "latitude": latitude,
                "longitude": HOME.1,
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(alert_types(&body), expected, "report at latitude {latitude}");
    }

    let statuses = storage.list_zone_statuses(device.id).await.unwrap();
    assert!(statuses[0].schedule_alerted);
}

#[actix_web::test]
async fn absence_notifies_parents_once() {
    let storage = storage().await;
    let school = common::school(&storage, "Lycée Leclerc").await;
    let teacher = common::user(&storage, "prof@leclerc.cm", UserRole::Teacher, Some(school.id)).await;
    let parent = common::user(&storage, "papa@leclerc.cm", UserRole::Parent, Some(school.id)).await;
    let student = common::user(&storage, "fils@leclerc.cm", UserRole::Student, Some(school.id)).await;
    let other_teacher =
        common::user(&storage, "autre@leclerc.cm", UserRole::Teacher, Some(school.id)).await;
    let class = common::class(&storage, school.id, "5ème C", 40).await;
    storage
        .update_class(
            class.id,
            UpdateClassRequest {
                teacher_id: Some(teacher.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    storage.enroll_student(class.id, student.id).await.unwrap();
    storage
        .link_parent(LinkParentRequest {
            parent_id: parent.id,
            student_id: student.id,
            relationship: RelationshipType::Father,
            is_primary: true,
        })
        .await
        .unwrap();
    let app = app!(storage);

    let mark = |user: &User| {
        test::TestRequest::post()
            .uri("/api/teacher/attendance")
            .insert_header(bearer(user))
            .set_json(json!({
                "class_id": class.id,
                "date": "2025-10-06",
                "records": [{ "student_id": student.id, "status": "absent" }],
            }))
            .to_request()
    };

    // 不教该班的老师不能点名
    assert_eq!(
        test::call_service(&app, mark(&other_teacher)).await.status(),
        StatusCode::FORBIDDEN
    );

    for _ in 0..2 {
        let resp = test::call_service(&app, mark(&teacher)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"][0]["parent_notified"], json!(true));
    }
    assert_eq!(storage.count_unread_notifications(parent.id).await.unwrap(), 1);
}

fn webhook_request(body: &str, secret: &str) -> test::TestRequest {
    let timestamp = chrono::Utc::now().timestamp();
    let signature = compute_signature(secret, timestamp, body.as_bytes());
    test::TestRequest::post()
        .uri("/api/payments/webhook")
        .insert_header(("Stripe-Signature", format!("t={timestamp},v1={signature}")))
        .insert_header(("Content-Type", "application/json"))
        .set_payload(body.to_string())
}

#[actix_web::test]
async fn signed_webhook_activates_subscription_once() {
    let storage = storage().await;
    let parent = common::user(&storage, "abonne@example.cm", UserRole::Parent, None).await;
    storage
        .create_payment(NewPayment {
            user_id: parent.id,
            school_id: None,
            plan_id: "parent_public_monthly".to_string(),
            amount: 1000,
            currency: "XAF".to_string(),
            provider: "stripe".to_string(),
            provider_payment_id: "pi_flow_1".to_string(),
        })
        .await
        .unwrap();
    let app = app!(storage);
    let event = json!({
        "type": "payment_intent.succeeded",
        "data": { "object": { "id": "pi_flow_1" } },
    })
    .to_string();

    let forged = test::call_service(&app, webhook_request(&event, "whsec_someone_else").to_request()).await;
    assert_eq!(forged.status(), StatusCode::BAD_REQUEST);
    let payment = storage.get_payment_by_provider_id("pi_flow_1").await.unwrap().unwrap();
    assert_eq!(payment.status, PaymentStatus::Pending);

    let resp = test::call_service(&app, webhook_request(&event, WEBHOOK_SECRET).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["handled"], json!(true));

    let payment = storage.get_payment_by_provider_id("pi_flow_1").await.unwrap().unwrap();
    assert_eq!(payment.status, PaymentStatus::Completed);
    let subscriber = storage.get_user_by_id(parent.id).await.unwrap().unwrap();
    assert_eq!(subscriber.subscription.status, SubscriptionStatus::Active);
    assert_eq!(subscriber.subscription.plan_id.as_deref(), Some("parent_public_monthly"));
    assert!(subscriber.subscription.ends_at.is_some());

    // 重复投递只确认不处理
    let resp = test::call_service(&app, webhook_request(&event, WEBHOOK_SECRET).to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["handled"], json!(false));
}

fn transition(
    bulletin_id: i64,
    from: BulletinStatus,
    version: i32,
    to: BulletinStatus,
    action: BulletinAction,
    actor_id: i64,
) -> BulletinTransition {
    BulletinTransition {
        bulletin_id,
        expected_status: from,
        expected_version: version,
        new_status: to,
        action,
        actor_id,
        comment: None,
        batch_id: None,
        publish: None,
    }
}

#[actix_web::test]
async fn published_bulletin_verifies_until_grades_are_altered() {
    configure();
    // 需要第二个连接改写数据，使用文件库
    let path = std::env::temp_dir().join(format!("educafric-{}.db", uuid::Uuid::new_v4()));
    let path = path.to_string_lossy().to_string();
    let storage: Arc<dyn Storage> = Arc::new(
        SeaOrmStorage::connect(&path, 1, 5)
            .await
            .expect("file storage"),
    );

    let school = common::school(&storage, "Lycée Bilingue de Buea").await;
    let teacher = common::user(&storage, "prof@buea.cm", UserRole::Teacher, Some(school.id)).await;
    let director = common::user(&storage, "dir@buea.cm", UserRole::Director, Some(school.id)).await;
    let student = common::user(&storage, "eleve@buea.cm", UserRole::Student, Some(school.id)).await;
    let class = common::class(&storage, school.id, "Form 5", 40).await;
    let maths = common::subject(&storage, school.id, "MATH").await;
    let term = storage
        .create_term(
            school.id,
            CreateTermRequest {
                name: "First term".to_string(),
                academic_year: "2025-2026".to_string(),
                start_date: chrono::NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
                end_date: chrono::NaiveDate::from_ymd_opt(2025, 12, 20).unwrap(),
            },
        )
        .await
        .unwrap();
    let bulletin = storage
        .create_bulletin(NewBulletin {
            school_id: school.id,
            student_id: student.id,
            class_id: class.id,
            term_id: term.id,
            created_by: teacher.id,
        })
        .await
        .unwrap();
    storage
        .upsert_bulletin_grades(
            bulletin.id,
            1,
            vec![BulletinGradeRow {
                subject_id: maths.id,
                grade: 13.5,
                coefficient: 4.0,
                comment: None,
            }],
            None,
        )
        .await
        .unwrap()
        .expect("grades saved");
    for step in [
        transition(bulletin.id, BulletinStatus::Draft, 2, BulletinStatus::Submitted, BulletinAction::Submit, teacher.id),
        transition(bulletin.id, BulletinStatus::Submitted, 3, BulletinStatus::Approved, BulletinAction::Approve, director.id),
    ] {
        assert!(storage.apply_bulletin_transition(step).await.unwrap());
    }
    let app = app!(storage);

    let publish = test::TestRequest::post()
        .uri(&format!("/api/bulletins/{}/publish", bulletin.id))
        .insert_header(bearer(&director))
        .to_request();
    let resp = test::call_service(&app, publish).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let code = body["data"]["verification_code"]
        .as_str()
        .expect("verification code")
        .to_string();

    let verify = || {
        test::TestRequest::post()
            .uri("/api/bulletins/verify")
            .set_json(json!({ "verification_code": code }))
            .to_request()
    };
    let body: Value = test::read_body_json(test::call_service(&app, verify()).await).await;
    assert_eq!(body["data"]["outcome"], json!("valid"));
    assert_eq!(body["data"]["bulletin"]["class_rank"], json!(1));
    assert_eq!(body["data"]["bulletin"]["rank_provisional"], json!(false));

    let tamper = Database::connect(format!("sqlite://{path}?mode=rwc"))
        .await
        .expect("second connection");
    tamper
        .execute_unprepared("UPDATE bulletin_grades SET grade = 19.5")
        .await
        .expect("alter grade");

    let body: Value = test::read_body_json(test::call_service(&app, verify()).await).await;
    assert_eq!(body["data"]["outcome"], json!("tampered"));
    assert!(body["data"]["bulletin"].is_null());

    let _ = std::fs::remove_file(&path);
}
