//! 所有接口共用的响应信封 `{ code, message, data?, timestamp }`

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::ErrorCode;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ApiResponse<T: TS> {
    /// `0` 表示成功，其余取自 [`ErrorCode`]
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    fn envelope(code: ErrorCode, data: Option<T>, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self::envelope(ErrorCode::Success, Some(data), message)
    }

    /// 失败但仍需附带数据，例如公开核验接口返回的核验结果
    pub fn error(code: ErrorCode, data: T, message: impl Into<String>) -> Self {
        Self::envelope(code, Some(data), message)
    }

    pub fn is_success(&self) -> bool {
        self.code == ErrorCode::Success as i32
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self::envelope(ErrorCode::Success, None, message)
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::envelope(code, None, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_envelope_omits_data() {
        let body = serde_json::to_value(ApiResponse::success_empty("done")).unwrap();
        assert_eq!(body["code"], 0);
        assert!(body.get("data").is_none());
        assert!(body.get("timestamp").is_some());
    }

    #[test]
    fn test_error_code_is_carried() {
        let response = ApiResponse::error_empty(ErrorCode::NotFound, "missing");
        assert!(!response.is_success());
        assert_eq!(response.code, ErrorCode::NotFound as i32);
        assert!(ApiResponse::success(1_i64, "ok").is_success());
    }
}
