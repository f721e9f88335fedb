use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::NotificationService;
use crate::cache::user_cache_key;
use crate::models::notifications::UpdatePreferencesRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{ApiError, cache_from_request, current_user};
use crate::utils::validate::validate_phone;

const SUPPORTED_LANGUAGES: [&str; 2] = ["fr", "en"];

pub async fn get_preferences(
    _service: &NotificationService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        user.notifications,
        "Preferences retrieved",
    )))
}

pub async fn update_preferences(
    service: &NotificationService,
    request: &HttpRequest,
    update: UpdatePreferencesRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;

    if let Some(number) = &update.whatsapp_number
        && validate_phone(number).is_err()
    {
        return Err(ApiError::bad_request(
            ErrorCode::ValidationFailed,
            "Invalid WhatsApp number",
        )
        .into());
    }
    if let Some(language) = &update.preferred_language
        && !SUPPORTED_LANGUAGES.contains(&language.as_str())
    {
        return Err(ApiError::bad_request(
            ErrorCode::ValidationFailed,
            "Preferred language must be 'fr' or 'en'",
        )
        .into());
    }

    let storage = service.get_storage(request)?;
    let updated = storage
        .update_notification_preferences(user.id, update)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::UserNotFound, "User not found"))?;

    evict_cached_user(request).await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        updated.notifications,
        "Preferences updated",
    )))
}

// 资料变更后移除当前 token 对应的用户缓存
pub(crate) async fn evict_cached_user(request: &HttpRequest) {
    let Some(cache) = cache_from_request(request) else {
        return;
    };
    if let Some(token) = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
    {
        cache.remove(&user_cache_key(token)).await;
    }
}
