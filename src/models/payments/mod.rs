use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;

define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
    pub enum PlanAudience {
        Parent => "parent",
        School => "school",
        Freelancer => "freelancer",
    }
}

define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
    pub enum BillingInterval {
        Monthly => "monthly",
        Semester => "semester",
        Annual => "annual",
    }
}

impl BillingInterval {
    pub fn months(&self) -> u32 {
        match self {
            Self::Monthly => 1,
            Self::Semester => 6,
            Self::Annual => 12,
        }
    }
}

define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
    pub enum PaymentStatus {
        Pending => "pending",
        Completed => "completed",
        Failed => "failed",
        Cancelled => "cancelled",
    }
}

/// 订阅套餐，金额单位为 XAF（无小数位）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct SubscriptionPlan {
    pub id: String,
    pub name: String,
    pub audience: PlanAudience,
    pub interval: BillingInterval,
    pub amount: i64,
    pub currency: String,
    pub features: Vec<String>,
}

// 支付记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct Payment {
    pub id: i64,
    pub user_id: i64,
    pub school_id: Option<i64>,
    pub plan_id: String,
    pub amount: i64,
    pub currency: String,
    pub provider: String,
    pub provider_payment_id: String,
    pub status: PaymentStatus,
    pub failure_reason: Option<String>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 存储层新增支付
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub user_id: i64,
    pub school_id: Option<i64>,
    pub plan_id: String,
    pub amount: i64,
    pub currency: String,
    pub provider: String,
    pub provider_payment_id: String,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct CreatePaymentIntentRequest {
    pub plan_id: String,
    /// 学校套餐由学校管理者代付
    pub school_id: Option<i64>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct PaymentIntentResponse {
    pub payment_id: i64,
    pub client_secret: String,
    pub provider_payment_id: String,
    pub amount: i64,
    pub currency: String,
    pub plan: SubscriptionPlan,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct PlanListResponse {
    pub plans: Vec<SubscriptionPlan>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct WebhookAck {
    pub received: bool,
    pub handled: bool,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct PaymentHistoryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: crate::models::PaginationQuery,
    /// 仅平台管理员可按用户筛选
    pub user_id: Option<i64>,
}
