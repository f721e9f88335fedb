use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CommercialService;
use crate::models::dashboards::RoleCount;
use crate::models::schools::{SchoolListParams, SchoolSummary};
use crate::models::users::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::ApiError;

pub async fn list_schools(
    service: &CommercialService,
    request: &HttpRequest,
    params: SchoolListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let schools = storage.list_schools_with_pagination(params.into()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(schools, "Schools retrieved")))
}

fn count_for(counts: &[RoleCount], role: UserRole) -> i64 {
    counts
        .iter()
        .find(|c| c.role == role.as_str())
        .map(|c| c.count as i64)
        .unwrap_or(0)
}

pub async fn school_summary(
    service: &CommercialService,
    request: &HttpRequest,
    school_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let school = storage
        .get_school_by_id(school_id)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::SchoolNotFound, "School not found"))?;

    let counts = storage.count_users_by_role(Some(school_id)).await?;
    let classes = storage.list_classes(school_id).await?;

    let summary = SchoolSummary {
        school,
        student_count: count_for(&counts, UserRole::Student),
        teacher_count: count_for(&counts, UserRole::Teacher),
        parent_count: count_for(&counts, UserRole::Parent),
        class_count: classes.len() as i64,
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(summary, "School summary")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_for_missing_role_is_zero() {
        let counts = vec![
            RoleCount {
                role: "student".to_string(),
                count: 120,
            },
            RoleCount {
                role: "teacher".to_string(),
                count: 9,
            },
        ];
        assert_eq!(count_for(&counts, UserRole::Student), 120);
        assert_eq!(count_for(&counts, UserRole::Teacher), 9);
        assert_eq!(count_for(&counts, UserRole::Parent), 0);
    }
}
