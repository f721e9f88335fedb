use serde::Deserialize;
use ts_rs::TS;

use super::entities::SchoolType;
use crate::models::common::PaginationQuery;
use crate::models::users::entities::SubscriptionStatus;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct CreateSchoolRequest {
    pub name: String,
    pub school_type: SchoolType,
    pub address: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub director_id: Option<i64>,
    #[serde(default)]
    pub geolocation_enabled: bool,
    #[serde(skip)]
    pub is_sandbox: bool,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct UpdateSchoolRequest {
    pub name: Option<String>,
    pub school_type: Option<SchoolType>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub director_id: Option<i64>,
    pub subscription_plan: Option<String>,
    pub subscription_status: Option<SubscriptionStatus>,
    pub geolocation_enabled: Option<bool>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct SchoolListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    pub subscription_status: Option<SubscriptionStatus>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct CreateTermRequest {
    pub name: String,
    pub academic_year: String,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
}

/// 存储层学校查询条件
#[derive(Debug, Clone, Default)]
pub struct SchoolListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub search: Option<String>,
    pub subscription_status: Option<SubscriptionStatus>,
}

impl From<SchoolListParams> for SchoolListQuery {
    fn from(params: SchoolListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            search: params.search,
            subscription_status: params.subscription_status,
        }
    }
}
