use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::DirectorService;
use crate::models::ApiResponse;
use crate::models::attendance::{AttendanceQuery, AttendanceStatus};
use crate::models::bulletins::BulletinStatus;
use crate::models::dashboards::SchoolOverview;
use crate::models::parent_requests::ParentRequestStatus;
use crate::models::users::UserRole;
use crate::services::common::{current_user, require_school};

pub async fn dashboard(
    service: &DirectorService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let school_id = require_school(&user)?;
    let storage = service.get_storage(request)?;

    let role_counts = storage.count_users_by_role(Some(school_id)).await?;
    let count_of = |role: UserRole| {
        role_counts
            .iter()
            .find(|r| r.role == role.as_str())
            .map(|r| r.count)
            .unwrap_or(0)
    };

    let today = chrono::Utc::now().date_naive();
    let classes = storage.list_classes(school_id).await?;
    let mut absences_today = 0u64;
    for class in &classes {
        let records = storage
            .list_attendance(AttendanceQuery {
                class_id: Some(class.id),
                date: Some(today),
                ..Default::default()
            })
            .await?;
        absences_today += records
            .iter()
            .filter(|r| r.status == AttendanceStatus::Absent)
            .count() as u64;
    }

    let overview = SchoolOverview {
        school_id,
        student_count: count_of(UserRole::Student),
        teacher_count: count_of(UserRole::Teacher),
        parent_count: count_of(UserRole::Parent),
        class_count: classes.len() as u64,
        pending_bulletins: storage
            .count_bulletins(Some(school_id), None, BulletinStatus::Submitted)
            .await?,
        pending_parent_requests: storage
            .count_parent_requests(school_id, ParentRequestStatus::Pending)
            .await?,
        absences_today,
        attendance_rate_today: storage.attendance_rate(school_id, today).await?,
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(overview, "Dashboard retrieved")))
}
