use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::PaymentService;
use super::plans::find_plan;
use crate::models::payments::{
    CreatePaymentIntentRequest, NewPayment, PaymentIntentResponse, PlanAudience,
};
use crate::models::users::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{ApiError, current_user, ensure_school_access};

/// 套餐受众与当前角色匹配，学校套餐返回付费的学校
fn resolve_payer_school(
    user: &User,
    audience: PlanAudience,
    school_id: Option<i64>,
) -> Result<Option<i64>, ApiError> {
    let denied = || {
        ApiError::forbidden(
            ErrorCode::Forbidden,
            "This plan is not available for your role",
        )
    };
    match audience {
        PlanAudience::Parent if user.active_role == UserRole::Parent => Ok(None),
        PlanAudience::Freelancer if user.active_role == UserRole::Freelancer => Ok(None),
        PlanAudience::School
            if user.active_role == UserRole::Director || user.is_platform_admin() =>
        {
            let school_id = school_id.or(user.school_id).ok_or_else(|| {
                ApiError::bad_request(
                    ErrorCode::ValidationFailed,
                    "school_id is required for school plans",
                )
            })?;
            ensure_school_access(user, school_id)?;
            Ok(Some(school_id))
        }
        _ => Err(denied()),
    }
}

pub async fn create_payment_intent(
    service: &PaymentService,
    request: &HttpRequest,
    intent_request: CreatePaymentIntentRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let plan = find_plan(&intent_request.plan_id)
        .ok_or_else(|| ApiError::not_found(ErrorCode::PlanNotFound, "Plan not found"))?;
    let school_id = resolve_payer_school(&user, plan.audience, intent_request.school_id)?;

    let storage = service.get_storage(request)?;
    if let Some(school_id) = school_id {
        storage.get_school_by_id(school_id).await?.ok_or_else(|| {
            ApiError::not_found(ErrorCode::SchoolNotFound, "School not found")
        })?;
    }

    let client = service.stripe();
    let intent = client
        .create_payment_intent(plan.amount, user.id, &plan.id)
        .await?;

    let payment = storage
        .create_payment(NewPayment {
            user_id: user.id,
            school_id,
            plan_id: plan.id.clone(),
            amount: plan.amount,
            currency: client.currency().to_uppercase(),
            provider: "stripe".to_string(),
            provider_payment_id: intent.id.clone(),
        })
        .await?;

    info!(
        "Payment intent {} created for user {} (plan {})",
        intent.id, user.id, plan.id
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(
        PaymentIntentResponse {
            payment_id: payment.id,
            client_secret: intent.client_secret,
            provider_payment_id: intent.id,
            amount: payment.amount,
            currency: payment.currency,
            plan: plan.clone(),
        },
        "Payment intent created",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::{
        NotificationPreferences, Subscription, SubscriptionStatus, UserStatus,
    };

    fn user(role: UserRole, school_id: Option<i64>) -> User {
        User {
            id: 3,
            email: "payer@example.cm".to_string(),
            password_hash: String::new(),
            first_name: "Awa".to_string(),
            last_name: "Fouda".to_string(),
            role,
            secondary_roles: vec![],
            active_role: role,
            status: UserStatus::Active,
            school_id,
            phone: None,
            whatsapp_number: None,
            preferred_language: "fr".to_string(),
            notifications: NotificationPreferences {
                sms: false,
                whatsapp: false,
                email: false,
            },
            subscription: Subscription {
                plan_id: None,
                status: SubscriptionStatus::None,
                ends_at: None,
            },
            is_test_account: false,
            last_login: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_parent_buys_parent_plan() {
        let parent = user(UserRole::Parent, Some(1));
        assert_eq!(
            resolve_payer_school(&parent, PlanAudience::Parent, None).unwrap(),
            None
        );
        assert!(resolve_payer_school(&parent, PlanAudience::School, Some(1)).is_err());
    }

    #[test]
    fn test_director_pays_for_own_school_only() {
        let director = user(UserRole::Director, Some(4));
        assert_eq!(
            resolve_payer_school(&director, PlanAudience::School, None).unwrap(),
            Some(4)
        );
        let err = resolve_payer_school(&director, PlanAudience::School, Some(9)).unwrap_err();
        assert_eq!(err.code, ErrorCode::SchoolAccessDenied);
    }

    #[test]
    fn test_school_plan_needs_school() {
        let admin = user(UserRole::Admin, None);
        let err = resolve_payer_school(&admin, PlanAudience::School, None).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(
            resolve_payer_school(&admin, PlanAudience::School, Some(2)).unwrap(),
            Some(2)
        );
    }
}
