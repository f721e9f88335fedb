use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::BulletinService;
use super::workflow;
use crate::config::AppConfig;
use crate::models::bulletins::{
    BulletinPublicView, BulletinStatus, NewBulletinVerification, VerificationOutcome,
    VerificationResponse, VerificationType, VerifyBulletinRequest,
};
use crate::models::users::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{ApiError, client_ip, current_user, user_agent};

/// 按验证码或二维码验证已发布的成绩单，每次尝试都记录日志
pub async fn verify_bulletin(
    service: &BulletinService,
    request: &HttpRequest,
    verify: VerifyBulletinRequest,
) -> ActixResult<HttpResponse> {
    let verification_type = if verify.qr_code.is_some() {
        VerificationType::QrScan
    } else {
        VerificationType::CodeEntry
    };
    let raw = verify
        .qr_code
        .or(verify.verification_code)
        .unwrap_or_default();
    let code = workflow::extract_code(&raw).ok_or_else(|| {
        ApiError::bad_request(
            ErrorCode::ValidationFailed,
            "A valid verification code or QR code is required",
        )
    })?;

    // 公开端点无登录用户
    let viewer = current_user(request).ok();
    let storage = service.get_storage(request)?;

    let bulletin = storage
        .get_bulletin_by_code(&code)
        .await?
        .filter(|b| b.status == BulletinStatus::Published);

    let outcome = match &bulletin {
        None => VerificationOutcome::NotFound,
        Some(b) => {
            let grades = storage.list_bulletin_grades(b.id).await?;
            if workflow::is_authentic(&AppConfig::get().bulletin.signing_secret, b, &grades) {
                VerificationOutcome::Valid
            } else {
                VerificationOutcome::Tampered
            }
        }
    };

    storage
        .log_bulletin_verification(NewBulletinVerification {
            bulletin_id: bulletin.as_ref().map(|b| b.id),
            verification_type,
            code: code.clone(),
            outcome,
            verified_by: viewer.as_ref().map(|u| u.id),
            ip_address: client_ip(request),
            user_agent: user_agent(request),
        })
        .await?;

    let Some(bulletin) = bulletin else {
        info!("Bulletin verification failed: unknown code {}", code);
        return Ok(HttpResponse::NotFound().json(ApiResponse::error(
            ErrorCode::BulletinNotFound,
            VerificationResponse {
                success: false,
                outcome,
                bulletin: None,
            },
            "Bulletin not found",
        )));
    };

    if outcome == VerificationOutcome::Tampered {
        warn!(
            "Bulletin {} failed integrity check (code {})",
            bulletin.id, code
        );
        return Ok(HttpResponse::Ok().json(ApiResponse::error(
            ErrorCode::BulletinVerificationFailed,
            VerificationResponse {
                success: false,
                outcome,
                bulletin: None,
            },
            "Bulletin integrity check failed",
        )));
    }

    // 关联家长验证后标记
    if let Some(viewer) = &viewer
        && viewer.active_role == UserRole::Parent
        && !bulletin.parent_verified
        && storage
            .get_parent_student_relation(viewer.id, bulletin.student_id)
            .await?
            .is_some()
    {
        storage.mark_bulletin_parent_verified(bulletin.id).await?;
    }

    let student_name = storage
        .get_user_by_id(bulletin.student_id)
        .await?
        .map(|s| s.full_name())
        .unwrap_or_default();
    let school_name = storage
        .get_school_by_id(bulletin.school_id)
        .await?
        .map(|s| s.name)
        .unwrap_or_default();
    let term_name = storage
        .get_term_by_id(bulletin.term_id)
        .await?
        .map(|t| format!("{} {}", t.name, t.academic_year))
        .unwrap_or_default();

    let rank_provisional = storage
        .count_unpublished_class_bulletins(bulletin.class_id, bulletin.term_id)
        .await?
        > 0;

    let view = BulletinPublicView {
        tracking_number: bulletin.tracking_number,
        student_name,
        school_name,
        term_name,
        general_average: bulletin.general_average,
        class_rank: bulletin.class_rank,
        total_students_in_class: bulletin.total_students_in_class,
        rank_provisional,
        published_at: bulletin.published_at,
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        VerificationResponse {
            success: true,
            outcome,
            bulletin: Some(view),
        },
        "Bulletin is authentic",
    )))
}
