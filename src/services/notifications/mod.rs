pub mod dispatcher;
pub mod list;
pub mod preferences;
pub mod providers;

pub use dispatcher::{DeliveryPolicy, Notice, NotificationDispatcher};

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::notifications::{NotificationListParams, UpdatePreferencesRequest};
use crate::storage::Storage;

pub struct NotificationService {
    storage: Option<Arc<dyn Storage>>,
}

impl NotificationService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::common::storage_from_request(request),
        }
    }

    pub async fn list_notifications(
        &self,
        request: &HttpRequest,
        params: NotificationListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_notifications(self, request, params).await
    }

    pub async fn unread_count(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::unread_count(self, request).await
    }

    pub async fn mark_read(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        list::mark_read(self, request, id).await
    }

    pub async fn mark_all_read(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::mark_all_read(self, request).await
    }

    pub async fn get_preferences(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        preferences::get_preferences(self, request).await
    }

    pub async fn update_preferences(
        &self,
        request: &HttpRequest,
        update: UpdatePreferencesRequest,
    ) -> ActixResult<HttpResponse> {
        preferences::update_preferences(self, request, update).await
    }
}
