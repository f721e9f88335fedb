use actix_web::{HttpResponse, Result as ActixResult};

use super::{DynamicConfig, SystemService};
use crate::models::ApiResponse;
use crate::models::system::{PublicSettingsResponse, UploadLimits};

/// 界面支持的语言
const LANGUAGES: [&str; 2] = ["fr", "en"];

/// 公开系统设置（只读）
pub async fn get_settings(service: &SystemService) -> ActixResult<HttpResponse> {
    let config = service.get_config();

    let response = PublicSettingsResponse {
        system_name: DynamicConfig::system_name().await,
        environment: config.app.environment.clone(),
        languages: LANGUAGES.iter().map(|l| l.to_string()).collect(),
        currency: config.stripe.currency.to_uppercase(),
        sandbox_enabled: config.sandbox.enabled,
        upload: UploadLimits {
            max_size: DynamicConfig::upload_max_size().await as u64,
            allowed_types: DynamicConfig::upload_allowed_types().await,
        },
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Settings retrieved successfully",
    )))
}
