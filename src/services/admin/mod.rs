//! 平台管理：用户、学校、系统设置与平台统计

pub mod schools;
pub mod settings;
pub mod stats;
pub mod users;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::schools::{CreateSchoolRequest, SchoolListParams, UpdateSchoolRequest};
use crate::models::system::{SettingAuditQuery, UpdateSettingRequest};
use crate::models::users::{UpdateUserRequest, UserListParams};
use crate::storage::Storage;

pub struct AdminService {
    storage: Option<Arc<dyn Storage>>,
}

impl AdminService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::common::storage_from_request(request),
        }
    }

    pub async fn list_users(
        &self,
        request: &HttpRequest,
        params: UserListParams,
    ) -> ActixResult<HttpResponse> {
        users::list_users(self, request, params).await
    }

    pub async fn get_user(&self, request: &HttpRequest, user_id: i64) -> ActixResult<HttpResponse> {
        users::get_user(self, request, user_id).await
    }

    pub async fn update_user(
        &self,
        request: &HttpRequest,
        user_id: i64,
        update: UpdateUserRequest,
    ) -> ActixResult<HttpResponse> {
        users::update_user(self, request, user_id, update).await
    }

    pub async fn delete_user(
        &self,
        request: &HttpRequest,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        users::delete_user(self, request, user_id).await
    }

    pub async fn create_school(
        &self,
        request: &HttpRequest,
        school: CreateSchoolRequest,
    ) -> ActixResult<HttpResponse> {
        schools::create_school(self, request, school).await
    }

    pub async fn list_schools(
        &self,
        request: &HttpRequest,
        params: SchoolListParams,
    ) -> ActixResult<HttpResponse> {
        schools::list_schools(self, request, params).await
    }

    pub async fn get_school(
        &self,
        request: &HttpRequest,
        school_id: i64,
    ) -> ActixResult<HttpResponse> {
        schools::get_school(self, request, school_id).await
    }

    pub async fn update_school(
        &self,
        request: &HttpRequest,
        school_id: i64,
        update: UpdateSchoolRequest,
    ) -> ActixResult<HttpResponse> {
        schools::update_school(self, request, school_id, update).await
    }

    pub async fn delete_school(
        &self,
        request: &HttpRequest,
        school_id: i64,
    ) -> ActixResult<HttpResponse> {
        schools::delete_school(self, request, school_id).await
    }

    pub async fn get_settings(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        settings::get_admin_settings(self, request).await
    }

    pub async fn update_setting(
        &self,
        request: &HttpRequest,
        key: String,
        update: UpdateSettingRequest,
    ) -> ActixResult<HttpResponse> {
        settings::update_setting(self, request, key, update).await
    }

    pub async fn setting_audits(
        &self,
        request: &HttpRequest,
        query: SettingAuditQuery,
    ) -> ActixResult<HttpResponse> {
        settings::get_setting_audits(self, request, query).await
    }

    pub async fn platform_stats(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        stats::platform_stats(self, request).await
    }
}
