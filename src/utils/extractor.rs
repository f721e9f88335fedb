//! 路径参数提取器
//!
//! 非法参数直接返回统一的 JSON 错误体，避免落到 actix 默认的纯文本 404/400。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use once_cell::sync::Lazy;
use regex::Regex;
use std::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

pub(crate) fn bad_path_param(param: &str) -> actix_web::Error {
    let body = ApiResponse::error_empty(
        ErrorCode::BadRequest,
        format!("Invalid path parameter: {param}"),
    );
    InternalError::from_response(
        format!("invalid path parameter {param}"),
        HttpResponse::BadRequest().json(body),
    )
    .into()
}

/// 定义正整数路径参数提取器
#[macro_export]
macro_rules! define_safe_i64_extractor {
    ($name:ident, $param:expr) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl ::actix_web::FromRequest for $name {
            type Error = ::actix_web::Error;
            type Future = ::std::future::Ready<Result<Self, Self::Error>>;

            fn from_request(
                req: &::actix_web::HttpRequest,
                _: &mut ::actix_web::dev::Payload,
            ) -> Self::Future {
                let result = req
                    .match_info()
                    .get($param)
                    .and_then(|v| v.parse::<i64>().ok())
                    .filter(|v| *v > 0)
                    .map($name)
                    .ok_or_else(|| $crate::utils::extractor::bad_path_param($param));
                ::std::future::ready(result)
            }
        }
    };
}

define_safe_i64_extractor!(SafeIDI64, "id");
define_safe_i64_extractor!(SafeClassId, "class_id");
define_safe_i64_extractor!(SafeStudentId, "student_id");
define_safe_i64_extractor!(SafeBulletinId, "bulletin_id");
define_safe_i64_extractor!(SafeHomeworkId, "homework_id");
define_safe_i64_extractor!(SafeDeviceId, "device_id");
define_safe_i64_extractor!(SafeZoneId, "zone_id");
define_safe_i64_extractor!(SafeAlertId, "alert_id");

static FILE_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9-]{8,64}$").expect("Invalid file token regex"));

static SETTING_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9_]+(\.[a-z0-9_]+)+$").expect("Invalid setting key regex"));

fn extract_matching(req: &HttpRequest, param: &str, re: &Regex) -> Result<String, actix_web::Error> {
    req.match_info()
        .get(param)
        .filter(|v| re.is_match(v))
        .map(|v| v.to_string())
        .ok_or_else(|| bad_path_param(param))
}

/// 文件下载 token
#[derive(Debug, Clone)]
pub struct SafeFileToken(pub String);

impl FromRequest for SafeFileToken {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(extract_matching(req, "token", &FILE_TOKEN_RE).map(SafeFileToken))
    }
}

/// 系统设置键，形如 `section.name`
#[derive(Debug, Clone)]
pub struct SafeSettingKey(pub String);

impl FromRequest for SafeSettingKey {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(extract_matching(req, "key", &SETTING_KEY_RE).map(SafeSettingKey))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_i64_extractor_rejects_non_positive() {
        let req = TestRequest::default()
            .param("id", "42")
            .to_http_request();
        let id = SafeIDI64::extract(&req).await.unwrap();
        assert_eq!(id.0, 42);

        let req = TestRequest::default().param("id", "-3").to_http_request();
        assert!(SafeIDI64::extract(&req).await.is_err());

        let req = TestRequest::default().param("id", "abc").to_http_request();
        assert!(SafeIDI64::extract(&req).await.is_err());
    }

    #[actix_web::test]
    async fn test_setting_key_format() {
        let req = TestRequest::default()
            .param("key", "geolocation.speed_limit_kmh")
            .to_http_request();
        assert!(SafeSettingKey::extract(&req).await.is_ok());

        let req = TestRequest::default()
            .param("key", "../etc/passwd")
            .to_http_request();
        assert!(SafeSettingKey::extract(&req).await.is_err());
    }
}
