use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;
use crate::models::users::entities::SubscriptionStatus;

define_string_enum! {
    /// 学校类型（决定订阅价格档位）
    #[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
    pub enum SchoolType {
        Public => "public",
        Private => "private",
    }
}

// 学校实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct School {
    pub id: i64,
    pub name: String,
    pub school_type: SchoolType,
    pub address: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub director_id: Option<i64>,
    pub subscription_plan: Option<String>,
    pub subscription_status: SubscriptionStatus,
    pub subscription_ends_at: Option<chrono::DateTime<chrono::Utc>>,
    pub geolocation_enabled: bool,
    pub is_sandbox: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 学期实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct Term {
    pub id: i64,
    pub school_id: i64,
    pub name: String,
    pub academic_year: String,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
