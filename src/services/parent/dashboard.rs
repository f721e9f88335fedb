use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ParentService;
use super::children::published_bulletins;
use crate::models::ApiResponse;
use crate::models::attendance::AttendanceQuery;
use crate::models::dashboards::ChildSummary;
use crate::models::grades::GradeListQuery;
use crate::services::common::current_user;

const RECENT_ITEMS: usize = 5;

pub async fn dashboard(
    service: &ParentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let mut summaries = Vec::new();
    for student in storage.list_children(user.id).await? {
        let class = match storage.get_active_enrollment(student.id).await? {
            Some(enrollment) => storage.get_class_by_id(enrollment.class_id).await?,
            None => None,
        };

        let mut recent_grades = storage
            .list_grades(GradeListQuery {
                student_id: Some(student.id),
                published_only: true,
                ..Default::default()
            })
            .await?;
        recent_grades.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent_grades.truncate(RECENT_ITEMS);

        let mut recent_attendance = storage
            .list_attendance(AttendanceQuery {
                student_id: Some(student.id),
                ..Default::default()
            })
            .await?;
        recent_attendance.sort_by(|a, b| b.date.cmp(&a.date));
        recent_attendance.truncate(RECENT_ITEMS);

        let published_bulletins = published_bulletins(&storage, student.id).await?;
        summaries.push(ChildSummary {
            student,
            class,
            recent_grades,
            recent_attendance,
            published_bulletins,
        });
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(summaries, "Dashboard retrieved")))
}
