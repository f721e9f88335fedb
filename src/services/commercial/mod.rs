//! 商务视角：学校订阅情况

pub mod schools;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::schools::SchoolListParams;
use crate::storage::Storage;

pub struct CommercialService {
    storage: Option<Arc<dyn Storage>>,
}

impl CommercialService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::common::storage_from_request(request),
        }
    }

    pub async fn list_schools(
        &self,
        request: &HttpRequest,
        params: SchoolListParams,
    ) -> ActixResult<HttpResponse> {
        schools::list_schools(self, request, params).await
    }

    pub async fn school_summary(
        &self,
        request: &HttpRequest,
        school_id: i64,
    ) -> ActixResult<HttpResponse> {
        schools::school_summary(self, request, school_id).await
    }
}
