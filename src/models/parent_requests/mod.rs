use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;

define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/parent_request.ts")]
    pub enum ParentRequestStatus {
        Pending => "pending",
        InProgress => "in_progress",
        Approved => "approved",
        Rejected => "rejected",
        Resolved => "resolved",
    }
}

impl ParentRequestStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected | Self::Resolved)
    }

    /// pending → in_progress → 终态；pending 可直接进入终态
    pub fn can_transition_to(&self, next: ParentRequestStatus) -> bool {
        match self {
            Self::Pending => next != Self::Pending,
            Self::InProgress => next.is_terminal(),
            _ => false,
        }
    }
}

define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/parent_request.ts")]
    pub enum RequestPriority {
        Low => "low",
        Medium => "medium",
        High => "high",
        Urgent => "urgent",
    }
}

// 家长申请
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/parent_request.ts")]
pub struct ParentRequest {
    pub id: i64,
    pub parent_id: i64,
    pub student_id: i64,
    pub school_id: i64,
    pub request_type: String,
    pub category: String,
    pub subject: String,
    pub description: String,
    pub priority: RequestPriority,
    pub status: ParentRequestStatus,
    pub requested_date: Option<chrono::NaiveDate>,
    pub admin_response: Option<String>,
    pub processed_by: Option<i64>,
    pub processed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

fn default_priority() -> RequestPriority {
    RequestPriority::Medium
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/parent_request.ts")]
pub struct CreateParentRequest {
    pub student_id: i64,
    pub request_type: String,
    pub category: String,
    pub subject: String,
    pub description: String,
    #[serde(default = "default_priority")]
    pub priority: RequestPriority,
    pub requested_date: Option<chrono::NaiveDate>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/parent_request.ts")]
pub struct RespondParentRequest {
    pub status: ParentRequestStatus,
    pub response: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/parent_request.ts")]
pub struct ParentRequestListQuery {
    pub status: Option<ParentRequestStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        use ParentRequestStatus::*;
        assert!(Pending.can_transition_to(InProgress));
        assert!(Pending.can_transition_to(Approved));
        assert!(!Pending.can_transition_to(Pending));
        assert!(InProgress.can_transition_to(Resolved));
        assert!(!InProgress.can_transition_to(Pending));
        assert!(!InProgress.can_transition_to(InProgress));
        assert!(!Approved.can_transition_to(Rejected));
        assert!(!Resolved.can_transition_to(InProgress));
    }
}
