use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;

define_string_enum! {
    /// 成绩单状态
    #[ts(export, export_to = "../frontend/src/types/generated/bulletin.ts")]
    pub enum BulletinStatus {
        Draft => "draft",
        Submitted => "submitted",
        Approved => "approved",
        Rejected => "rejected",
        Published => "published",
    }
}

impl BulletinStatus {
    /// 教师可编辑成绩的状态
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft | Self::Rejected)
    }

    /// 参与班级排名的状态，草稿与待审的平均分尚未定稿
    pub fn is_ranked(&self) -> bool {
        matches!(self, Self::Approved | Self::Published)
    }
}

define_string_enum! {
    /// 成绩单流转动作
    #[ts(export, export_to = "../frontend/src/types/generated/bulletin.ts")]
    pub enum BulletinAction {
        Submit => "submit",
        Approve => "approve",
        Reject => "reject",
        Publish => "publish",
    }
}

// 成绩单实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/bulletin.ts")]
pub struct Bulletin {
    pub id: i64,
    pub school_id: i64,
    pub student_id: i64,
    pub class_id: i64,
    pub term_id: i64,
    pub status: BulletinStatus,
    /// 乐观并发版本号，每次状态流转 +1
    pub version: i32,
    pub total_points: f64,
    pub total_coefficients: f64,
    pub general_average: Option<f64>,
    pub class_rank: Option<i32>,
    pub total_students_in_class: Option<i32>,
    pub teacher_comment: Option<String>,
    pub director_comment: Option<String>,
    pub created_by: i64,
    pub submitted_by: Option<i64>,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub approved_by: Option<i64>,
    pub approved_at: Option<chrono::DateTime<chrono::Utc>>,
    pub rejected_by: Option<i64>,
    pub rejected_at: Option<chrono::DateTime<chrono::Utc>>,
    pub published_by: Option<i64>,
    pub published_at: Option<chrono::DateTime<chrono::Utc>>,
    pub tracking_number: Option<String>,
    pub verification_code: Option<String>,
    pub qr_payload: Option<String>,
    #[ts(skip)]
    #[serde(skip_serializing, default)]
    pub security_hash: Option<String>,
    #[ts(skip)]
    #[serde(skip_serializing, default)]
    pub signature: Option<String>,
    pub signature_batch_id: Option<String>,
    pub parent_verified: bool,
    pub parent_verified_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 成绩单科目成绩
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/bulletin.ts")]
pub struct BulletinGrade {
    pub id: i64,
    pub bulletin_id: i64,
    pub subject_id: i64,
    /// 0 - 20
    pub grade: f64,
    /// 0.1 - 10
    pub coefficient: f64,
    pub points: f64,
    pub comment: Option<String>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 审批历史
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/bulletin.ts")]
pub struct BulletinApproval {
    pub id: i64,
    pub bulletin_id: i64,
    pub actor_id: i64,
    pub action: BulletinAction,
    pub previous_status: BulletinStatus,
    pub new_status: BulletinStatus,
    pub comment: Option<String>,
    pub batch_id: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/bulletin.ts")]
    pub enum VerificationType {
        QrScan => "qr_scan",
        CodeEntry => "code_entry",
    }
}

define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/bulletin.ts")]
    pub enum VerificationOutcome {
        Valid => "valid",
        Tampered => "tampered",
        NotFound => "not_found",
    }
}

// 验证日志
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/bulletin.ts")]
pub struct BulletinVerification {
    pub id: i64,
    pub bulletin_id: Option<i64>,
    pub verification_type: VerificationType,
    pub code: String,
    pub outcome: VerificationOutcome,
    pub verified_by: Option<i64>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 发布时生成的防伪信息
#[derive(Debug, Clone)]
pub struct PublishArtifacts {
    pub tracking_number: String,
    pub verification_code: String,
    pub qr_payload: String,
    pub security_hash: String,
    pub signature: String,
    pub class_rank: Option<i32>,
    pub total_students_in_class: i32,
}

/// 存储层状态流转指令（比较并交换）
#[derive(Debug, Clone)]
pub struct BulletinTransition {
    pub bulletin_id: i64,
    pub expected_status: BulletinStatus,
    pub expected_version: i32,
    pub new_status: BulletinStatus,
    pub action: BulletinAction,
    pub actor_id: i64,
    pub comment: Option<String>,
    pub batch_id: Option<String>,
    pub publish: Option<PublishArtifacts>,
}

/// 新增验证日志
#[derive(Debug, Clone)]
pub struct NewBulletinVerification {
    pub bulletin_id: Option<i64>,
    pub verification_type: VerificationType,
    pub code: String,
    pub outcome: VerificationOutcome,
    pub verified_by: Option<i64>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// 存储层新建成绩单
#[derive(Debug, Clone)]
pub struct NewBulletin {
    pub school_id: i64,
    pub student_id: i64,
    pub class_id: i64,
    pub term_id: i64,
    pub created_by: i64,
}

/// 单科成绩写入（系数已解析）
#[derive(Debug, Clone)]
pub struct BulletinGradeRow {
    pub subject_id: i64,
    pub grade: f64,
    pub coefficient: f64,
    pub comment: Option<String>,
}

impl BulletinGradeRow {
    pub fn validate(&self) -> Result<(), String> {
        if !self.grade.is_finite() || !(0.0..=20.0).contains(&self.grade) {
            return Err(format!(
                "Grade for subject {} must be between 0 and 20",
                self.subject_id
            ));
        }
        if !self.coefficient.is_finite() || !(0.1..=10.0).contains(&self.coefficient) {
            return Err(format!(
                "Coefficient for subject {} must be between 0.1 and 10",
                self.subject_id
            ));
        }
        Ok(())
    }
}

/// 成绩单汇总
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulletinTotals {
    pub total_points: f64,
    pub total_coefficients: f64,
    pub general_average: Option<f64>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 由 (成绩, 系数) 计算总分、总系数与加权平均
pub fn compute_totals<I>(grades: I) -> BulletinTotals
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let (points, coefficients) = grades
        .into_iter()
        .fold((0.0, 0.0), |(p, c), (grade, coef)| (p + grade * coef, c + coef));

    BulletinTotals {
        total_points: round2(points),
        total_coefficients: round2(coefficients),
        general_average: (coefficients > 0.0).then(|| round2(points / coefficients)),
    }
}

/// 竞赛排名（1224）：平均分相同者名次相同，后续名次跳过
pub fn competition_ranks(averages: &[(i64, f64)]) -> Vec<(i64, i32)> {
    let mut sorted: Vec<(i64, f64)> = averages.to_vec();
    sorted.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut ranks = Vec::with_capacity(sorted.len());
    let mut previous: Option<f64> = None;
    let mut current_rank = 0;
    for (position, (id, average)) in sorted.iter().enumerate() {
        if previous != Some(*average) {
            current_rank = position as i32 + 1;
            previous = Some(*average);
        }
        ranks.push((*id, current_rank));
    }
    ranks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_totals_weighted_average() {
        let totals = compute_totals([(15.0, 4.0), (12.0, 2.0), (8.5, 1.0)]);
        assert_eq!(totals.total_points, 92.5);
        assert_eq!(totals.total_coefficients, 7.0);
        assert_eq!(totals.general_average, Some(13.21));
    }

    #[test]
    fn test_compute_totals_empty() {
        let totals = compute_totals(Vec::new());
        assert_eq!(totals.total_points, 0.0);
        assert_eq!(totals.general_average, None);
    }

    #[test]
    fn test_competition_ranking_ties() {
        let ranks = competition_ranks(&[(1, 12.0), (2, 15.5), (3, 12.0), (4, 9.0)]);
        assert_eq!(ranks, vec![(2, 1), (1, 2), (3, 2), (4, 4)]);
    }

    #[test]
    fn test_grade_row_bounds() {
        let row = BulletinGradeRow {
            subject_id: 3,
            grade: 21.0,
            coefficient: 2.0,
            comment: None,
        };
        assert!(row.validate().is_err());
        let row = BulletinGradeRow {
            grade: 14.0,
            coefficient: 0.05,
            ..row
        };
        assert!(row.validate().is_err());
    }
}
