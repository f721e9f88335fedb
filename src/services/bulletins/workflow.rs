//! 成绩单状态机与防伪信息
//!
//! 状态流转：
//! `draft|rejected --submit--> submitted --approve--> approved --publish--> published`，
//! `submitted --reject--> rejected`。
//!
//! 发布时生成追踪号、8 位验证码、二维码内容、内容哈希（SHA-256）与签名（HMAC-SHA256）。
//! 内容哈希只覆盖发布后不再变化的字段，班级排名会随其他成绩单发布而刷新，不参与哈希。

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::errors::{EducafricError, Result};
use crate::models::bulletins::{Bulletin, BulletinAction, BulletinGrade, BulletinStatus};
use crate::utils::random_code::generate_random_code;

type HmacSha256 = Hmac<Sha256>;

pub const VERIFICATION_CODE_LEN: usize = 8;

/// 计算动作后的目标状态
pub fn next_status(current: BulletinStatus, action: BulletinAction) -> Result<BulletinStatus> {
    use BulletinAction as A;
    use BulletinStatus as S;

    match (current, action) {
        (S::Draft | S::Rejected, A::Submit) => Ok(S::Submitted),
        (S::Submitted, A::Approve) => Ok(S::Approved),
        (S::Submitted, A::Reject) => Ok(S::Rejected),
        (S::Approved, A::Publish) => Ok(S::Published),
        _ => Err(EducafricError::invalid_transition(format!(
            "Cannot {action} a bulletin in status {current}"
        ))),
    }
}

pub fn tracking_number(year: i32, school_id: i64, bulletin_id: i64) -> String {
    format!("BUL-{year}-{school_id:04}-{bulletin_id:06}")
}

pub fn verification_code() -> String {
    generate_random_code(VERIFICATION_CODE_LEN)
}

/// 二维码内容：验证地址 + 验证码 + 哈希前 16 位
pub fn qr_payload(base_url: &str, code: &str, security_hash: &str) -> String {
    let short = security_hash.get(..16).unwrap_or(security_hash);
    format!("{base_url}?code={code}&h={short}")
}

/// 从二维码内容或裸验证码中取出验证码
pub fn extract_code(input: &str) -> Option<String> {
    let input = input.trim();
    let code = match input.split_once("code=") {
        Some((_, rest)) => rest.split('&').next().unwrap_or_default(),
        None => input,
    };
    let code = code.trim().to_ascii_uppercase();
    (code.len() == VERIFICATION_CODE_LEN && code.bytes().all(|b| b.is_ascii_alphanumeric()))
        .then_some(code)
}

/// 内容哈希，科目按 ID 排序保证稳定
pub fn security_hash(
    bulletin: &Bulletin,
    grades: &[BulletinGrade],
    tracking_number: &str,
    verification_code: &str,
) -> String {
    let mut rows: Vec<&BulletinGrade> = grades.iter().collect();
    rows.sort_by_key(|g| g.subject_id);

    let mut hasher = Sha256::new();
    hasher.update(format!(
        "{}|{}|{}|{}|{}|",
        bulletin.id, bulletin.school_id, bulletin.student_id, bulletin.class_id, bulletin.term_id
    ));
    hasher.update(format!(
        "{:.2}|{:.2}|{}|",
        bulletin.total_points,
        bulletin.total_coefficients,
        bulletin
            .general_average
            .map(|a| format!("{a:.2}"))
            .unwrap_or_default()
    ));
    for row in rows {
        hasher.update(format!(
            "{}:{:.2}:{:.2};",
            row.subject_id, row.grade, row.coefficient
        ));
    }
    hasher.update(format!("{tracking_number}|{verification_code}"));
    hex::encode(hasher.finalize())
}

pub fn sign(secret: &str, security_hash: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| EducafricError::validation(format!("Invalid signing secret: {e}")))?;
    mac.update(security_hash.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// 重新计算哈希与签名并比对
pub fn is_authentic(secret: &str, bulletin: &Bulletin, grades: &[BulletinGrade]) -> bool {
    let (Some(tracking), Some(code), Some(stored_hash), Some(stored_signature)) = (
        bulletin.tracking_number.as_deref(),
        bulletin.verification_code.as_deref(),
        bulletin.security_hash.as_deref(),
        bulletin.signature.as_deref(),
    ) else {
        return false;
    };

    let hash = security_hash(bulletin, grades, tracking, code);
    if hash != stored_hash {
        return false;
    }

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(hash.as_bytes());
    match hex::decode(stored_signature) {
        Ok(signature) => mac.verify_slice(&signature).is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bulletin() -> Bulletin {
        let now = chrono::Utc::now();
        Bulletin {
            id: 42,
            school_id: 3,
            student_id: 7,
            class_id: 2,
            term_id: 1,
            status: BulletinStatus::Approved,
            version: 3,
            total_points: 92.5,
            total_coefficients: 7.0,
            general_average: Some(13.21),
            class_rank: None,
            total_students_in_class: None,
            teacher_comment: None,
            director_comment: None,
            created_by: 5,
            submitted_by: None,
            submitted_at: None,
            approved_by: None,
            approved_at: None,
            rejected_by: None,
            rejected_at: None,
            published_by: None,
            published_at: None,
            tracking_number: None,
            verification_code: None,
            qr_payload: None,
            security_hash: None,
            signature: None,
            signature_batch_id: None,
            parent_verified: false,
            parent_verified_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn grade(subject_id: i64, grade: f64, coefficient: f64) -> BulletinGrade {
        BulletinGrade {
            id: subject_id,
            bulletin_id: 42,
            subject_id,
            grade,
            coefficient,
            points: grade * coefficient,
            comment: None,
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_workflow_transitions() {
        use BulletinAction as A;
        use BulletinStatus as S;

        assert_eq!(next_status(S::Draft, A::Submit).unwrap(), S::Submitted);
        assert_eq!(next_status(S::Rejected, A::Submit).unwrap(), S::Submitted);
        assert_eq!(next_status(S::Submitted, A::Approve).unwrap(), S::Approved);
        assert_eq!(next_status(S::Submitted, A::Reject).unwrap(), S::Rejected);
        assert_eq!(next_status(S::Approved, A::Publish).unwrap(), S::Published);

        assert!(next_status(S::Draft, A::Publish).is_err());
        assert!(next_status(S::Draft, A::Approve).is_err());
        assert!(next_status(S::Published, A::Submit).is_err());
        assert!(next_status(S::Approved, A::Reject).is_err());
    }

    #[test]
    fn test_tracking_number_format() {
        assert_eq!(tracking_number(2025, 3, 42), "BUL-2025-0003-000042");
    }

    #[test]
    fn test_extract_code_from_qr() {
        let payload = qr_payload("https://educafric.com/verify", "ABCD2345", "f00dfeed00112233aabb");
        assert_eq!(payload, "https://educafric.com/verify?code=ABCD2345&h=f00dfeed00112233");
        assert_eq!(extract_code(&payload).as_deref(), Some("ABCD2345"));
        assert_eq!(extract_code(" abcd2345 ").as_deref(), Some("ABCD2345"));
        assert_eq!(extract_code("short"), None);
    }

    #[test]
    fn test_hash_is_order_independent() {
        let b = bulletin();
        let a = security_hash(&b, &[grade(1, 15.0, 4.0), grade(2, 12.0, 2.0)], "T", "C");
        let c = security_hash(&b, &[grade(2, 12.0, 2.0), grade(1, 15.0, 4.0)], "T", "C");
        assert_eq!(a, c);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_authenticity_detects_tampering() {
        let secret = "test-secret";
        let grades = vec![grade(1, 15.0, 4.0), grade(2, 12.0, 2.0)];
        let mut b = bulletin();
        let hash = security_hash(&b, &grades, "BUL-2025-0003-000042", "ABCD2345");
        b.tracking_number = Some("BUL-2025-0003-000042".to_string());
        b.verification_code = Some("ABCD2345".to_string());
        b.signature = Some(sign(secret, &hash).unwrap());
        b.security_hash = Some(hash);

        assert!(is_authentic(secret, &b, &grades));
        assert!(!is_authentic("other-secret", &b, &grades));

        let altered = vec![grade(1, 18.0, 4.0), grade(2, 12.0, 2.0)];
        assert!(!is_authentic(secret, &b, &altered));

        b.general_average = Some(17.0);
        assert!(!is_authentic(secret, &b, &grades));
    }
}
