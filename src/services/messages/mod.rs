//! 校内消息：按范围解析收件人、发送与收件箱

pub mod inbox;
pub mod recipients;
pub mod send;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::PaginationQuery;
use crate::models::messages::{MessageListParams, SendMessageRequest};
use crate::storage::Storage;

pub struct MessageService {
    storage: Option<Arc<dyn Storage>>,
}

impl MessageService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::common::storage_from_request(request),
        }
    }

    pub async fn send(
        &self,
        request: &HttpRequest,
        message: SendMessageRequest,
    ) -> ActixResult<HttpResponse> {
        send::send_message(self, request, message).await
    }

    pub async fn inbox(
        &self,
        request: &HttpRequest,
        params: MessageListParams,
    ) -> ActixResult<HttpResponse> {
        inbox::list_inbox(self, request, params).await
    }

    pub async fn sent(
        &self,
        request: &HttpRequest,
        pagination: PaginationQuery,
    ) -> ActixResult<HttpResponse> {
        inbox::list_sent(self, request, pagination).await
    }

    pub async fn mark_read(
        &self,
        request: &HttpRequest,
        message_id: i64,
    ) -> ActixResult<HttpResponse> {
        inbox::mark_read(self, request, message_id).await
    }
}
