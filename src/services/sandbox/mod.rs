//! 沙盒模式：演示数据与免密登录
//!
//! 仅对 `is_test_account` 账号生效，真实账号的认证流程不受影响。

pub mod login;
pub mod seed;
pub mod status;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::sandbox::SandboxLoginRequest;
use crate::storage::Storage;

pub use seed::seed_sandbox;

pub struct SandboxService {
    storage: Option<Arc<dyn Storage>>,
}

impl SandboxService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::common::storage_from_request(request),
        }
    }

    pub async fn status(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        status::status(self, request).await
    }

    pub async fn login(
        &self,
        request: &HttpRequest,
        login_request: SandboxLoginRequest,
    ) -> ActixResult<HttpResponse> {
        login::login(self, request, login_request).await
    }
}
