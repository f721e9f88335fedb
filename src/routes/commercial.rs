use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RequireJWT, RequireRole};
use crate::models::schools::SchoolListParams;
use crate::models::users::UserRole;
use crate::services::CommercialService;
use crate::utils::SafeIDI64;

static COMMERCIAL_SERVICE: Lazy<CommercialService> = Lazy::new(CommercialService::new_lazy);

pub async fn list_schools(
    req: HttpRequest,
    query: web::Query<SchoolListParams>,
) -> ActixResult<HttpResponse> {
    COMMERCIAL_SERVICE.list_schools(&req, query.into_inner()).await
}

pub async fn school_summary(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    COMMERCIAL_SERVICE.school_summary(&req, path.0).await
}

pub fn configure_commercial_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/commercial")
            .wrap(RequireRole::new_any(UserRole::commercial_roles()))
            .wrap(RequireJWT)
            .route("/schools", web::get().to(list_schools))
            .route("/schools/{id}", web::get().to(school_summary)),
    );
}
