//! 订阅套餐目录（金额单位 XAF）

use actix_web::{HttpResponse, Result as ActixResult};
use chrono::{DateTime, Months, Utc};
use once_cell::sync::Lazy;

use crate::models::ApiResponse;
use crate::models::payments::{BillingInterval, PlanAudience, PlanListResponse, SubscriptionPlan};

fn plan(
    id: &str,
    name: &str,
    audience: PlanAudience,
    interval: BillingInterval,
    amount: i64,
    features: &[&str],
) -> SubscriptionPlan {
    SubscriptionPlan {
        id: id.to_string(),
        name: name.to_string(),
        audience,
        interval,
        amount,
        currency: "XAF".to_string(),
        features: features.iter().map(|f| f.to_string()).collect(),
    }
}

static PLANS: Lazy<Vec<SubscriptionPlan>> = Lazy::new(|| {
    use BillingInterval::*;
    use PlanAudience::*;

    let parent_public = ["Grades and attendance", "Report cards", "Messaging with teachers"];
    let parent_private = [
        "Grades and attendance",
        "Report cards",
        "Messaging with teachers",
        "SMS and WhatsApp alerts",
    ];
    let parent_geo = ["Device tracking", "Safe zones", "Panic button alerts"];
    let school = [
        "Unlimited students and teachers",
        "Digital report cards with QR verification",
        "Attendance and homework",
        "Parent communication",
    ];

    vec![
        plan("parent_public_monthly", "Parent - Public School (Monthly)", Parent, Monthly, 1000, &parent_public),
        plan("parent_public_annual", "Parent - Public School (Annual)", Parent, Annual, 12000, &parent_public),
        plan("parent_private_monthly", "Parent - Private School (Monthly)", Parent, Monthly, 1500, &parent_private),
        plan("parent_private_annual", "Parent - Private School (Annual)", Parent, Annual, 18000, &parent_private),
        plan("parent_geolocation_monthly", "Parent - Geolocation (Monthly)", Parent, Monthly, 1000, &parent_geo),
        plan("parent_geolocation_annual", "Parent - Geolocation (Annual)", Parent, Annual, 12000, &parent_geo),
        plan("school_public", "Public School", School, Annual, 50000, &school),
        plan("school_private", "Private School", School, Annual, 75000, &school),
        plan("school_geolocation", "School Geolocation", School, Annual, 25000, &["Student devices", "School safe zones", "Alert dashboard"]),
        plan("freelancer_annual", "Freelancer (Annual)", Freelancer, Annual, 25000, &["Student management", "Session scheduling", "Parent messaging"]),
        plan("freelancer_semester", "Freelancer (Semester)", Freelancer, Semester, 12500, &["Student management", "Session scheduling", "Parent messaging"]),
        plan("freelancer_geolocation", "Freelancer Geolocation", Freelancer, Annual, 12000, &["Student devices", "Safe zones"]),
    ]
});

pub fn all_plans() -> &'static [SubscriptionPlan] {
    &PLANS
}

pub fn find_plan(plan_id: &str) -> Option<&'static SubscriptionPlan> {
    PLANS.iter().find(|p| p.id == plan_id)
}

/// 订阅到期时间：从 `from` 起按计费周期顺延
pub fn subscription_end(from: DateTime<Utc>, interval: BillingInterval) -> DateTime<Utc> {
    from.checked_add_months(Months::new(interval.months()))
        .unwrap_or(from)
}

pub async fn list_plans() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        PlanListResponse {
            plans: all_plans().to_vec(),
        },
        "Subscription plans",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_catalogue_ids_are_unique() {
        let mut ids: Vec<&str> = all_plans().iter().map(|p| p.id.as_str()).collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn test_find_plan() {
        let plan = find_plan("school_private").unwrap();
        assert_eq!(plan.amount, 75000);
        assert_eq!(plan.audience, PlanAudience::School);
        assert!(find_plan("gold").is_none());
    }

    #[test]
    fn test_subscription_end_by_interval() {
        let start = Utc.with_ymd_and_hms(2025, 1, 31, 12, 0, 0).unwrap();
        // 月末顺延到下月最后一天
        assert_eq!(
            subscription_end(start, BillingInterval::Monthly),
            Utc.with_ymd_and_hms(2025, 2, 28, 12, 0, 0).unwrap()
        );
        assert_eq!(
            subscription_end(start, BillingInterval::Semester),
            Utc.with_ymd_and_hms(2025, 7, 31, 12, 0, 0).unwrap()
        );
        assert_eq!(
            subscription_end(start, BillingInterval::Annual),
            Utc.with_ymd_and_hms(2026, 1, 31, 12, 0, 0).unwrap()
        );
    }
}
