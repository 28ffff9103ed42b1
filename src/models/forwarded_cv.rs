// ForwardedCV database model and its independent review status
// A pure join-plus-status record between an application and a sub-employer

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::schema::forwarded_cvs;

/// Status of a forwarded CV, tracked separately from the application's own
/// status: pending -> viewed -> accepted | rejected
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ForwardingStatus {
    Pending,
    Viewed,
    Accepted,
    Rejected,
}

impl ForwardingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForwardingStatus::Pending => "pending",
            ForwardingStatus::Viewed => "viewed",
            ForwardingStatus::Accepted => "accepted",
            ForwardingStatus::Rejected => "rejected",
        }
    }

    /// Accepted and rejected are terminal
    pub fn is_terminal(&self) -> bool {
        matches!(self, ForwardingStatus::Accepted | ForwardingStatus::Rejected)
    }

    /// Whether the sub-employer may still take an accept/reject action
    pub fn is_actionable(&self) -> bool {
        !self.is_terminal()
    }
}

impl FromStr for ForwardingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ForwardingStatus::Pending),
            "viewed" => Ok(ForwardingStatus::Viewed),
            "accepted" => Ok(ForwardingStatus::Accepted),
            "rejected" => Ok(ForwardingStatus::Rejected),
            _ => Err(format!("Invalid forwarding status: {}", s)),
        }
    }
}

#[derive(
    Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable, AsChangeset,
)]
#[diesel(table_name = forwarded_cvs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ForwardedCv {
    pub id: Uuid,
    pub application_id: Uuid,
    pub from_employer_id: Uuid,
    pub to_sub_employer_id: Uuid,
    pub status: String,
    pub notes: Option<String>,
    pub forwarded_at: DateTime<Utc>,
    pub viewed_at: Option<DateTime<Utc>>,
    pub action_taken_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = forwarded_cvs)]
pub struct NewForwardedCv {
    pub id: Uuid,
    pub application_id: Uuid,
    pub from_employer_id: Uuid,
    pub to_sub_employer_id: Uuid,
    pub status: String,
    pub notes: Option<String>,
    pub forwarded_at: DateTime<Utc>,
}

impl ForwardedCv {
    pub fn forwarding_status(&self) -> Result<ForwardingStatus, String> {
        self.status.parse()
    }

    pub async fn find_by_id(
        conn: &mut AsyncPgConnection,
        forwarding_id: Uuid,
    ) -> Result<Self, diesel::result::Error> {
        use crate::schema::forwarded_cvs::dsl;

        dsl::forwarded_cvs
            .filter(dsl::id.eq(forwarding_id))
            .first(conn)
            .await
    }

}

/// Request to forward an application to one or more sub-employers
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ForwardApplicationRequest {
    pub sub_employer_ids: Vec<Uuid>,
    pub notes: Option<String>,
}

/// Request to accept or reject a forwarded CV
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ForwardingActionRequest {
    pub status: ForwardingStatus,
}

/// API representation of a forwarded CV
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ForwardedCvResponse {
    pub id: Uuid,
    pub application_id: Uuid,
    pub from_employer_id: Uuid,
    pub to_sub_employer_id: Uuid,
    pub status: String,
    pub notes: Option<String>,
    pub forwarded_at: DateTime<Utc>,
    pub viewed_at: Option<DateTime<Utc>>,
    pub action_taken_at: Option<DateTime<Utc>>,
}

impl From<ForwardedCv> for ForwardedCvResponse {
    fn from(cv: ForwardedCv) -> Self {
        Self {
            id: cv.id,
            application_id: cv.application_id,
            from_employer_id: cv.from_employer_id,
            to_sub_employer_id: cv.to_sub_employer_id,
            status: cv.status,
            notes: cv.notes,
            forwarded_at: cv.forwarded_at,
            viewed_at: cv.viewed_at,
            action_taken_at: cv.action_taken_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            ForwardingStatus::Pending,
            ForwardingStatus::Viewed,
            ForwardingStatus::Accepted,
            ForwardingStatus::Rejected,
        ] {
            assert_eq!(status.as_str().parse::<ForwardingStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_accepted_and_rejected_are_terminal() {
        assert!(!ForwardingStatus::Pending.is_terminal());
        assert!(!ForwardingStatus::Viewed.is_terminal());
        assert!(ForwardingStatus::Accepted.is_terminal());
        assert!(ForwardingStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_terminal_states_not_actionable() {
        assert!(ForwardingStatus::Pending.is_actionable());
        assert!(ForwardingStatus::Viewed.is_actionable());
        assert!(!ForwardingStatus::Accepted.is_actionable());
    }
}
