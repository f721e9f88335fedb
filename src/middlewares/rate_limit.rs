//! 固定窗口限流
//!
//! 计数键为 `端点前缀:身份:窗口序号`，身份优先取已认证用户，否则取客户端 IP。
//! 窗口序号随时间推进，过期窗口的计数由缓存 TTL 回收。
//!
//! ```rust,ignore
//! web::resource("/api/auth/login")
//!     .wrap(RateLimit::login())
//!     .route(web::post().to(login))
//! ```

use std::rc::Rc;
use std::time::Duration;

use actix_service::{Service, Transform};
use actix_web::body::EitherBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::{HeaderName, HeaderValue, RETRY_AFTER};
use actix_web::{Error, HttpMessage, HttpResponse};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use tracing::warn;

use crate::models::users::User;
use crate::models::{ApiResponse, ErrorCode};

/// 预设窗口的最大长度，计数缓存按此过期
const MAX_WINDOW_SECS: u64 = 300;

static COUNTERS: Lazy<Cache<String, u32>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(MAX_WINDOW_SECS))
        .max_capacity(200_000)
        .build()
});

const LIMIT_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-limit");
const REMAINING_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-remaining");

#[derive(Debug, Clone)]
pub struct RateLimit {
    max_requests: u32,
    window_secs: u64,
    scope: &'static str,
}

impl RateLimit {
    pub fn new(scope: &'static str, max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs: window_secs.clamp(1, MAX_WINDOW_SECS),
            scope,
        }
    }

    pub fn login() -> Self {
        Self::new("login", 5, 60)
    }

    pub fn register() -> Self {
        Self::new("register", 3, 60)
    }

    pub fn refresh_token() -> Self {
        Self::new("refresh", 10, 60)
    }

    pub fn sandbox_login() -> Self {
        Self::new("sandbox_login", 10, 60)
    }

    /// 公开核验接口，限制验证码枚举
    pub fn bulletin_verify() -> Self {
        Self::new("bulletin_verify", 20, 60)
    }

    pub fn webhook() -> Self {
        Self::new("webhook", 120, 60)
    }

    pub fn file_upload() -> Self {
        Self::new("upload", 10, 60)
    }

    fn counter_key(&self, identity: &str, now_secs: u64) -> String {
        format!("{}:{}:{}", self.scope, identity, now_secs / self.window_secs)
    }

    /// 距当前窗口结束的秒数
    fn retry_after(&self, now_secs: u64) -> u64 {
        self.window_secs - now_secs % self.window_secs
    }
}

fn identity(req: &ServiceRequest) -> String {
    if let Some(user_id) = req.extensions().get::<User>().map(|u| u.id) {
        return format!("user:{user_id}");
    }
    let ip = req
        .connection_info()
        .realip_remote_addr()
        .and_then(|addr| {
            addr.parse::<std::net::IpAddr>()
                .ok()
                .or_else(|| addr.parse::<std::net::SocketAddr>().ok().map(|s| s.ip()))
        })
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    format!("ip:{ip}")
}

fn too_many_requests(limit: u32, retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((RETRY_AFTER, retry_after.to_string()))
        .insert_header((LIMIT_HEADER, limit.to_string()))
        .insert_header((REMAINING_HEADER, "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many requests, please try again later",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limit: Rc::new(self.clone()),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: Rc<RateLimit>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let limit = self.limit.clone();

        Box::pin(async move {
            let now = chrono::Utc::now().timestamp().max(0) as u64;
            let key = limit.counter_key(&identity(&req), now);

            let count = COUNTERS
                .entry(key.clone())
                .and_upsert_with(|current| {
                    let next = current.map_or(1, |entry| entry.into_value().saturating_add(1));
                    std::future::ready(next)
                })
                .await
                .into_value();

            if count > limit.max_requests {
                warn!("Rate limit exceeded for {} ({} requests)", key, count);
                let response = too_many_requests(limit.max_requests, limit.retry_after(now));
                return Ok(req.into_response(response.map_into_right_body()));
            }

            let mut res = srv.call(req).await?;
            let remaining = limit.max_requests - count;
            let headers = res.headers_mut();
            headers.insert(LIMIT_HEADER, HeaderValue::from(limit.max_requests));
            headers.insert(REMAINING_HEADER, HeaderValue::from(remaining));
            Ok(res.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};

    #[::core::prelude::v1::test]
    fn test_windows_roll_over() {
        let limit = RateLimit::new("login", 5, 60);
        assert_eq!(
            limit.counter_key("ip:1.2.3.4", 119),
            limit.counter_key("ip:1.2.3.4", 60)
        );
        assert_ne!(
            limit.counter_key("ip:1.2.3.4", 120),
            limit.counter_key("ip:1.2.3.4", 119)
        );
        assert_eq!(limit.retry_after(125), 55);
    }

    #[::core::prelude::v1::test]
    fn test_window_is_bounded() {
        assert_eq!(RateLimit::new("x", 1, 0).window_secs, 1);
        assert_eq!(RateLimit::new("x", 1, 3600).window_secs, MAX_WINDOW_SECS);
    }

    #[actix_web::test]
    async fn test_rejects_after_limit() {
        let app = test::init_service(
            App::new().service(
                web::resource("/limited")
                    .wrap(RateLimit::new("test_rejects_after_limit", 2, 300))
                    .route(web::get().to(|| async { HttpResponse::Ok().finish() })),
            ),
        )
        .await;

        let call = || {
            test::TestRequest::get()
                .uri("/limited")
                .peer_addr("10.0.0.7:4000".parse().unwrap())
                .to_request()
        };
        let first = test::call_service(&app, call()).await;
        assert_eq!(first.headers().get("x-ratelimit-remaining").unwrap(), "1");
        test::call_service(&app, call()).await;
        let third = test::call_service(&app, call()).await;
        assert_eq!(third.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(third.headers().contains_key(RETRY_AFTER));
    }
}
