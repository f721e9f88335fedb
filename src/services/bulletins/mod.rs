//! 成绩单：录入、审批、发布与防伪验证

pub mod manage;
pub mod transitions;
pub mod verify;
pub mod workflow;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::bulletins::{
    BulkPublishRequest, BulkReviewRequest, BulletinListParams, CreateBulletinRequest,
    ReviewBulletinRequest, SubmitBulletinRequest, UpsertBulletinGradesRequest,
    VerifyBulletinRequest,
};
use crate::storage::Storage;

pub struct BulletinService {
    storage: Option<Arc<dyn Storage>>,
}

impl BulletinService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::common::storage_from_request(request),
        }
    }

    pub async fn create(
        &self,
        request: &HttpRequest,
        bulletin: CreateBulletinRequest,
    ) -> ActixResult<HttpResponse> {
        manage::create_bulletin(self, request, bulletin).await
    }

    pub async fn upsert_grades(
        &self,
        request: &HttpRequest,
        bulletin_id: i64,
        grades: UpsertBulletinGradesRequest,
    ) -> ActixResult<HttpResponse> {
        manage::upsert_grades(self, request, bulletin_id, grades).await
    }

    pub async fn list(
        &self,
        request: &HttpRequest,
        params: BulletinListParams,
    ) -> ActixResult<HttpResponse> {
        manage::list_bulletins(self, request, params).await
    }

    pub async fn get(&self, request: &HttpRequest, bulletin_id: i64) -> ActixResult<HttpResponse> {
        manage::get_bulletin(self, request, bulletin_id).await
    }

    pub async fn history(
        &self,
        request: &HttpRequest,
        bulletin_id: i64,
    ) -> ActixResult<HttpResponse> {
        manage::bulletin_history(self, request, bulletin_id).await
    }

    pub async fn submit(
        &self,
        request: &HttpRequest,
        bulletin_id: i64,
        submit: SubmitBulletinRequest,
    ) -> ActixResult<HttpResponse> {
        transitions::submit(self, request, bulletin_id, submit).await
    }

    pub async fn review(
        &self,
        request: &HttpRequest,
        bulletin_id: i64,
        review: ReviewBulletinRequest,
    ) -> ActixResult<HttpResponse> {
        transitions::review(self, request, bulletin_id, review).await
    }

    pub async fn publish(
        &self,
        request: &HttpRequest,
        bulletin_id: i64,
    ) -> ActixResult<HttpResponse> {
        transitions::publish(self, request, bulletin_id).await
    }

    pub async fn bulk_review(
        &self,
        request: &HttpRequest,
        review: BulkReviewRequest,
    ) -> ActixResult<HttpResponse> {
        transitions::bulk_review(self, request, review).await
    }

    pub async fn bulk_publish(
        &self,
        request: &HttpRequest,
        publish: BulkPublishRequest,
    ) -> ActixResult<HttpResponse> {
        transitions::bulk_publish(self, request, publish).await
    }

    pub async fn verify(
        &self,
        request: &HttpRequest,
        verify: VerifyBulletinRequest,
    ) -> ActixResult<HttpResponse> {
        verify::verify_bulletin(self, request, verify).await
    }
}
