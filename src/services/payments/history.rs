use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PaymentService;
use crate::models::ApiResponse;
use crate::models::payments::PaymentHistoryParams;
use crate::services::common::current_user;

/// 平台管理员可查看全部或按用户筛选，其余用户只能看到自己的记录
pub async fn history(
    service: &PaymentService,
    request: &HttpRequest,
    params: PaymentHistoryParams,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let user_filter = if user.is_platform_admin() {
        params.user_id
    } else {
        Some(user.id)
    };

    let storage = service.get_storage(request)?;
    let payments = storage
        .list_payments(user_filter, params.pagination)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(payments, "Payment history")))
}
