use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AdminService;
use crate::models::ApiResponse;
use crate::models::dashboards::PlatformStats;

pub async fn platform_stats(
    service: &AdminService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let users_by_role = storage.count_users_by_role(None).await?;
    let total_users = users_by_role.iter().map(|r| r.count).sum();
    let (completed_payments, revenue_xaf) = storage.payment_totals().await?;

    let stats = PlatformStats {
        total_schools: storage.count_schools().await?,
        total_users,
        users_by_role,
        active_subscriptions: storage.count_active_subscriptions().await?,
        completed_payments,
        revenue_xaf,
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(stats, "Platform statistics retrieved")))
}
