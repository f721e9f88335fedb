//! 家长端：孩子信息、申请与概况

pub mod children;
pub mod dashboard;
pub mod requests;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::grades::GradeListQuery;
use crate::models::parent_requests::CreateParentRequest;
use crate::storage::Storage;

pub struct ParentService {
    storage: Option<Arc<dyn Storage>>,
}

impl ParentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::common::storage_from_request(request),
        }
    }

    pub async fn children(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        children::list_children(self, request).await
    }

    pub async fn child_grades(
        &self,
        request: &HttpRequest,
        student_id: i64,
        query: GradeListQuery,
    ) -> ActixResult<HttpResponse> {
        children::child_grades(self, request, student_id, query).await
    }

    pub async fn child_attendance(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        children::child_attendance(self, request, student_id).await
    }

    pub async fn child_bulletins(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        children::child_bulletins(self, request, student_id).await
    }

    pub async fn create_request(
        &self,
        request: &HttpRequest,
        parent_request: CreateParentRequest,
    ) -> ActixResult<HttpResponse> {
        requests::create_request(self, request, parent_request).await
    }

    pub async fn list_requests(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        requests::list_requests(self, request).await
    }

    pub async fn dashboard(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        dashboard::dashboard(self, request).await
    }
}
