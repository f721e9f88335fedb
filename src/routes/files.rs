use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RateLimit, RequireJWT};
use crate::services::FileService;
use crate::utils::SafeFileToken;

// 懒加载的全局 FileService 实例
static FILE_SERVICE: Lazy<FileService> = Lazy::new(FileService::new_lazy);

pub async fn upload(
    request: HttpRequest,
    payload: actix_multipart::Multipart,
) -> ActixResult<HttpResponse> {
    FILE_SERVICE.upload(&request, payload).await
}

pub async fn download(request: HttpRequest, path: SafeFileToken) -> ActixResult<HttpResponse> {
    FILE_SERVICE.download(&request, path.0).await
}

// 配置路由
pub fn configure_file_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/files")
            .wrap(RequireJWT)
            .service(
                web::resource("/upload")
                    .wrap(RateLimit::file_upload())
                    .route(web::post().to(upload)),
            )
            .route("/{token}", web::get().to(download)),
    );
}
