use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SandboxService;
use crate::config::AppConfig;
use crate::models::ApiResponse;
use crate::models::sandbox::{SandboxAccount, SandboxStatusResponse};

pub async fn status(service: &SandboxService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    if !AppConfig::get().sandbox.enabled {
        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            SandboxStatusResponse {
                enabled: false,
                school_id: None,
                school_name: None,
                accounts: vec![],
            },
            "Sandbox is disabled",
        )));
    }

    let storage = service.get_storage(request)?;
    let school = storage.get_sandbox_school().await?;
    let accounts = match &school {
        Some(school) => storage
            .list_school_users(school.id, None)
            .await?
            .into_iter()
            .filter(|u| u.is_test_account)
            .map(|u| SandboxAccount {
                user_id: u.id,
                role: u.role,
                name: u.full_name(),
                email: u.email,
            })
            .collect(),
        None => vec![],
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SandboxStatusResponse {
            enabled: true,
            school_id: school.as_ref().map(|s| s.id),
            school_name: school.map(|s| s.name),
            accounts,
        },
        "Sandbox is enabled",
    )))
}
