use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Datelike;

use super::StudentService;
use super::homework::homework_for_student;
use crate::models::ApiResponse;
use crate::models::dashboards::StudentDashboard;
use crate::models::grades::GradeListQuery;
use crate::models::timetable::TimetableQuery;
use crate::services::common::current_user;

const RECENT_GRADES: usize = 5;

pub async fn dashboard(
    service: &StudentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let class = match storage.get_active_enrollment(user.id).await? {
        Some(enrollment) => storage.get_class_by_id(enrollment.class_id).await?,
        None => None,
    };

    let mut recent_grades = storage
        .list_grades(GradeListQuery {
            student_id: Some(user.id),
            published_only: true,
            ..Default::default()
        })
        .await?;
    recent_grades.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent_grades.truncate(RECENT_GRADES);

    // 未截止且尚未提交的作业
    let now = chrono::Utc::now();
    let upcoming_homework = homework_for_student(&storage, user.id)
        .await?
        .into_iter()
        .filter(|item| item.homework.due_date > now && item.submission.is_none())
        .collect();

    let today_slots = match &class {
        Some(class) => {
            storage
                .list_timetable(
                    class.school_id,
                    TimetableQuery {
                        class_id: Some(class.id),
                        day_of_week: Some(now.weekday().number_from_monday() as i32),
                        ..Default::default()
                    },
                )
                .await?
        }
        None => Vec::new(),
    };

    let dashboard = StudentDashboard {
        class,
        recent_grades,
        upcoming_homework,
        today_slots,
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(dashboard, "Dashboard retrieved")))
}
