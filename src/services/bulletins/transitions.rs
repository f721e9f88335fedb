use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Datelike;
use futures_util::future::join_all;
use tracing::{info, warn};

use super::BulletinService;
use super::manage::load_bulletin;
use super::workflow;
use crate::config::AppConfig;
use crate::models::bulletins::{
    BulkItemResult, BulkOperationResponse, BulkPublishRequest, BulkReviewRequest, Bulletin,
    BulletinAction, BulletinTransition, PublishArtifacts, ReviewBulletinRequest, ReviewDecision,
    SubmitBulletinRequest, competition_ranks,
};
use crate::models::notifications::NotificationKind;
use crate::models::users::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{ApiError, current_user, ensure_teaches_class, load_class};
use crate::services::notifications::{DeliveryPolicy, Notice, NotificationDispatcher};
use crate::services::system::DynamicConfig;
use crate::storage::Storage;

fn new_batch_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// 以 (状态, 版本) 为条件执行流转；条件不满足即为并发冲突，不产生任何副作用
async fn apply_transition(
    storage: &Arc<dyn Storage>,
    bulletin: &Bulletin,
    action: BulletinAction,
    actor: &User,
    comment: Option<String>,
    batch_id: Option<String>,
    publish: Option<PublishArtifacts>,
) -> Result<Bulletin, ApiError> {
    let new_status = workflow::next_status(bulletin.status, action)?;

    let applied = storage
        .apply_bulletin_transition(BulletinTransition {
            bulletin_id: bulletin.id,
            expected_status: bulletin.status,
            expected_version: bulletin.version,
            new_status,
            action,
            actor_id: actor.id,
            comment,
            batch_id,
            publish,
        })
        .await?;
    if !applied {
        return Err(ApiError::conflict(
            ErrorCode::BulletinTransitionConflict,
            "Bulletin was modified concurrently, reload and retry",
        ));
    }

    storage
        .get_bulletin_by_id(bulletin.id)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::BulletinNotFound, "Bulletin not found"))
}

fn normalize_comment(comment: Option<String>) -> Option<String> {
    comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

pub async fn submit(
    service: &BulletinService,
    request: &HttpRequest,
    bulletin_id: i64,
    submit: SubmitBulletinRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let bulletin = load_bulletin(&storage, &user, bulletin_id).await?;
    let class = load_class(&storage, &user, bulletin.class_id).await?;
    ensure_teaches_class(&storage, &user, &class).await?;

    if storage.list_bulletin_grades(bulletin.id).await?.is_empty() {
        return Err(ApiError::bad_request(
            ErrorCode::ValidationFailed,
            "Bulletin has no grades",
        )
        .into());
    }

    let submitted = apply_transition(
        &storage,
        &bulletin,
        BulletinAction::Submit,
        &user,
        normalize_comment(submit.comment),
        None,
        None,
    )
    .await?;

    info!("Bulletin {} submitted by {}", submitted.id, user.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(submitted, "Bulletin submitted")))
}

async fn review_one(
    storage: &Arc<dyn Storage>,
    user: &User,
    bulletin_id: i64,
    decision: ReviewDecision,
    comment: Option<String>,
    batch_id: Option<String>,
) -> Result<Bulletin, ApiError> {
    let bulletin = load_bulletin(storage, user, bulletin_id).await?;
    let action = match decision {
        ReviewDecision::Approve => BulletinAction::Approve,
        ReviewDecision::Reject => BulletinAction::Reject,
    };
    apply_transition(storage, &bulletin, action, user, comment, batch_id, None).await
}

fn review_comment(decision: ReviewDecision, comment: Option<String>) -> Result<Option<String>, ApiError> {
    let comment = normalize_comment(comment);
    if decision == ReviewDecision::Reject && comment.is_none() {
        return Err(ApiError::bad_request(
            ErrorCode::ValidationFailed,
            "A comment is required when rejecting a bulletin",
        ));
    }
    Ok(comment)
}

pub async fn review(
    service: &BulletinService,
    request: &HttpRequest,
    bulletin_id: i64,
    review: ReviewBulletinRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let comment = review_comment(review.action, review.comment)?;
    let storage = service.get_storage(request)?;

    let reviewed = review_one(&storage, &user, bulletin_id, review.action, comment, None).await?;
    info!(
        "Bulletin {} reviewed ({}) by {}",
        reviewed.id, review.action, user.id
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(reviewed, "Bulletin reviewed")))
}

/// 发布：计算排名、生成防伪信息并签名，随后刷新全班排名并通知家长
async fn publish_one(
    storage: &Arc<dyn Storage>,
    user: &User,
    bulletin_id: i64,
    batch_id: String,
) -> Result<Bulletin, ApiError> {
    let bulletin = load_bulletin(storage, user, bulletin_id).await?;
    workflow::next_status(bulletin.status, BulletinAction::Publish)?;

    let grades = storage.list_bulletin_grades(bulletin.id).await?;
    let averages = storage
        .list_class_term_averages(bulletin.class_id, bulletin.term_id)
        .await?;
    let class_rank = competition_ranks(&averages)
        .into_iter()
        .find(|(id, _)| *id == bulletin.id)
        .map(|(_, rank)| rank);

    let config = &AppConfig::get().bulletin;
    let tracking_number = workflow::tracking_number(
        chrono::Utc::now().year(),
        bulletin.school_id,
        bulletin.id,
    );
    let verification_code = workflow::verification_code();
    let security_hash =
        workflow::security_hash(&bulletin, &grades, &tracking_number, &verification_code);
    let signature = workflow::sign(&config.signing_secret, &security_hash)?;
    let qr_payload = workflow::qr_payload(
        &config.verification_base_url,
        &verification_code,
        &security_hash,
    );

    let published = apply_transition(
        storage,
        &bulletin,
        BulletinAction::Publish,
        user,
        None,
        Some(batch_id),
        Some(PublishArtifacts {
            tracking_number,
            verification_code,
            qr_payload,
            security_hash,
            signature,
            class_rank,
            total_students_in_class: averages.len() as i32,
        }),
    )
    .await?;

    if let Err(e) = storage
        .refresh_bulletin_ranks(published.class_id, published.term_id)
        .await
    {
        warn!(
            "Failed to refresh ranks for class {} term {}: {}",
            published.class_id, published.term_id, e
        );
    }

    let notice = Notice::new(
        NotificationKind::Bulletin,
        "Report card published",
        format!(
            "A new report card is available. Verification code: {}",
            published.verification_code.as_deref().unwrap_or_default()
        ),
    )
    .with_reference(published.id);
    NotificationDispatcher::from_config(storage.clone())
        .notify_parents_of(published.student_id, &notice, &DeliveryPolicy::Preferences)
        .await;

    Ok(published)
}

pub async fn publish(
    service: &BulletinService,
    request: &HttpRequest,
    bulletin_id: i64,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let published = publish_one(&storage, &user, bulletin_id, new_batch_id()).await?;
    info!(
        "Bulletin {} published by {} ({})",
        published.id,
        user.id,
        published.tracking_number.as_deref().unwrap_or_default()
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(published, "Bulletin published")))
}

fn item_result(id: i64, outcome: Result<Bulletin, ApiError>) -> BulkItemResult {
    match outcome {
        Ok(bulletin) => BulkItemResult {
            id,
            success: true,
            status: Some(bulletin.status),
            error: None,
        },
        Err(e) => BulkItemResult {
            id,
            success: false,
            status: None,
            error: Some(e.message),
        },
    }
}

fn bulk_response(batch_id: String, results: Vec<BulkItemResult>) -> BulkOperationResponse {
    let succeeded = results.iter().filter(|r| r.success).count();
    BulkOperationResponse {
        batch_id,
        processed: results.len(),
        succeeded,
        failed: results.len() - succeeded,
        results,
    }
}

fn dedup_ids(ids: Vec<i64>) -> Result<Vec<i64>, ApiError> {
    let mut unique = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    if unique.is_empty() {
        return Err(ApiError::bad_request(ErrorCode::ValidationFailed, "No bulletin ids provided"));
    }
    Ok(unique)
}

/// 分批处理，每项独立成功或失败
pub async fn bulk_review(
    service: &BulletinService,
    request: &HttpRequest,
    review: BulkReviewRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let ids = dedup_ids(review.ids)?;
    let comment = review_comment(review.action, review.comment)?;
    let storage = service.get_storage(request)?;

    let batch_id = new_batch_id();
    let batch_size = DynamicConfig::bulletin_batch_size().await;
    let mut results = Vec::with_capacity(ids.len());
    for chunk in ids.chunks(batch_size) {
        let outcomes = join_all(chunk.iter().map(|id| {
            review_one(
                &storage,
                &user,
                *id,
                review.action,
                comment.clone(),
                Some(batch_id.clone()),
            )
        }))
        .await;
        results.extend(
            chunk
                .iter()
                .zip(outcomes)
                .map(|(id, outcome)| item_result(*id, outcome)),
        );
    }

    let response = bulk_response(batch_id, results);
    info!(
        "Bulk review {} by {}: {}/{} succeeded",
        response.batch_id, user.id, response.succeeded, response.processed
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Bulk review processed")))
}

pub async fn bulk_publish(
    service: &BulletinService,
    request: &HttpRequest,
    publish: BulkPublishRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let ids = dedup_ids(publish.ids)?;
    let storage = service.get_storage(request)?;

    let batch_id = new_batch_id();
    let batch_size = DynamicConfig::bulletin_batch_size().await;
    let mut results = Vec::with_capacity(ids.len());
    // 同班发布会刷新排名，批内顺序执行
    for chunk in ids.chunks(batch_size) {
        for id in chunk {
            let outcome = publish_one(&storage, &user, *id, batch_id.clone()).await;
            results.push(item_result(*id, outcome));
        }
    }

    let response = bulk_response(batch_id, results);
    info!(
        "Bulk publish {} by {}: {}/{} succeeded",
        response.batch_id, user.id, response.succeeded, response.processed
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Bulk publish processed")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reject_requires_comment() {
        assert!(review_comment(ReviewDecision::Reject, None).is_err());
        assert!(review_comment(ReviewDecision::Reject, Some("   ".to_string())).is_err());
        assert_eq!(
            review_comment(ReviewDecision::Reject, Some(" Notes manquantes ".to_string()))
                .unwrap()
                .as_deref(),
            Some("Notes manquantes")
        );
        assert_eq!(review_comment(ReviewDecision::Approve, None).unwrap(), None);
    }

    #[test]
    fn test_bulk_ids_are_deduplicated() {
        assert_eq!(dedup_ids(vec![3, 1, 3, 2, 1]).unwrap(), vec![3, 1, 2]);
        assert!(dedup_ids(Vec::new()).is_err());
    }

    #[test]
    fn test_bulk_response_counts() {
        let ok = BulkItemResult {
            id: 1,
            success: true,
            status: None,
            error: None,
        };
        let failed = BulkItemResult {
            id: 2,
            success: false,
            status: None,
            error: Some("Bulletin not found".to_string()),
        };
        let response = bulk_response("batch".to_string(), vec![ok, failed]);
        assert_eq!(response.processed, 2);
        assert_eq!(response.succeeded, 1);
        assert_eq!(response.failed, 1);
    }
}
