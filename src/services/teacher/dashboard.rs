use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Datelike;

use super::TeacherService;
use crate::models::ApiResponse;
use crate::models::bulletins::BulletinStatus;
use crate::models::dashboards::TeacherDashboard;
use crate::models::timetable::TimetableQuery;
use crate::services::common::current_user;

pub async fn dashboard(
    service: &TeacherService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let today = chrono::Utc::now().weekday().number_from_monday() as i32;
    let today_slots = match user.school_id {
        Some(school_id) => {
            storage
                .list_timetable(
                    school_id,
                    TimetableQuery {
                        teacher_id: Some(user.id),
                        day_of_week: Some(today),
                        ..Default::default()
                    },
                )
                .await?
        }
        None => Vec::new(),
    };

    let dashboard = TeacherDashboard {
        classes: storage.list_teacher_classes(user.id).await?,
        today_slots,
        pending_submissions: storage.count_pending_submissions(user.id).await?,
        draft_bulletins: storage
            .count_bulletins(None, Some(user.id), BulletinStatus::Draft)
            .await?,
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(dashboard, "Dashboard retrieved")))
}
