//! 订阅套餐、Stripe 支付与回调

pub mod history;
pub mod intent;
pub mod plans;
pub mod stripe;
pub mod webhook;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::payments::{CreatePaymentIntentRequest, PaymentHistoryParams};
use crate::storage::Storage;
use stripe::StripeClient;

pub struct PaymentService {
    storage: Option<Arc<dyn Storage>>,
    stripe: Option<Arc<StripeClient>>,
}

impl PaymentService {
    pub fn new_lazy() -> Self {
        Self {
            storage: None,
            stripe: None,
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::common::storage_from_request(request),
        }
    }

    pub(crate) fn stripe(&self) -> Arc<StripeClient> {
        match &self.stripe {
            Some(client) => client.clone(),
            None => Arc::new(StripeClient::new(AppConfig::get().stripe.clone())),
        }
    }

    pub async fn plans(&self) -> ActixResult<HttpResponse> {
        plans::list_plans().await
    }

    pub async fn create_payment_intent(
        &self,
        request: &HttpRequest,
        intent_request: CreatePaymentIntentRequest,
    ) -> ActixResult<HttpResponse> {
        intent::create_payment_intent(self, request, intent_request).await
    }

    pub async fn history(
        &self,
        request: &HttpRequest,
        params: PaymentHistoryParams,
    ) -> ActixResult<HttpResponse> {
        history::history(self, request, params).await
    }

    pub async fn webhook(
        &self,
        request: &HttpRequest,
        body: web::Bytes,
    ) -> ActixResult<HttpResponse> {
        webhook::handle_webhook(self, request, body).await
    }
}
