// Application database model and status state machine
// One application per (job, candidate); the acting reviewer is stamped on
// every transition and exactly one attribution field is ever set.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::schema::applications;

/// Review status of an application.
///
/// `Hired` exists in the schema but no transition sets it; kept so stored
/// rows containing it still parse.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Shortlisted,
    Rejected,
    Hired,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Hired => "hired",
        }
    }

    /// Only shortlisted/rejected are valid transition targets; re-transition
    /// between the two is allowed
    pub fn is_transition_target(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Shortlisted | ApplicationStatus::Rejected
        )
    }

    /// Attribution stamping for a transition: returns the new
    /// (shortlisted_by, rejected_by) pair. Setting one always clears the
    /// other.
    pub fn attribution(&self, acting_user_id: Uuid) -> (Option<Uuid>, Option<Uuid>) {
        match self {
            ApplicationStatus::Shortlisted => (Some(acting_user_id), None),
            ApplicationStatus::Rejected => (None, Some(acting_user_id)),
            ApplicationStatus::Pending | ApplicationStatus::Hired => (None, None),
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApplicationStatus::Pending),
            "shortlisted" => Ok(ApplicationStatus::Shortlisted),
            "rejected" => Ok(ApplicationStatus::Rejected),
            "hired" => Ok(ApplicationStatus::Hired),
            _ => Err(format!("Invalid application status: {}", s)),
        }
    }
}

/// Interview meeting embedded on an application (at most one, replaced
/// wholesale whenever a reviewer schedules)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Meeting {
    pub date: String,
    pub time: String,
    pub duration_minutes: u32,
    pub contact_name: String,
    pub contact_email: String,
    pub meeting_link: String,
    pub created_by: Uuid,
    pub interview_confirmation: bool,
}

impl Meeting {
    pub fn to_json(&self) -> Result<JsonValue, serde_json::Error> {
        serde_json::to_value(self)
    }

    pub fn from_json(value: &JsonValue) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value.clone())
    }
}

#[derive(
    Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable, AsChangeset,
)]
#[diesel(table_name = applications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub employer_id: Uuid,
    pub status: String,
    pub shortlisted_by: Option<Uuid>,
    pub rejected_by: Option<Uuid>,
    pub meeting: Option<JsonValue>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = applications)]
pub struct NewApplication {
    pub id: Uuid,
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub employer_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    pub fn application_status(&self) -> Result<ApplicationStatus, String> {
        self.status.parse()
    }

    pub async fn find_by_id(
        conn: &mut AsyncPgConnection,
        application_id: Uuid,
    ) -> Result<Self, diesel::result::Error> {
        use crate::schema::applications::dsl;

        dsl::applications
            .filter(dsl::id.eq(application_id))
            .first(conn)
            .await
    }

    pub async fn find_by_job_and_candidate(
        conn: &mut AsyncPgConnection,
        job_id: Uuid,
        candidate_id: Uuid,
    ) -> Result<Option<Self>, diesel::result::Error> {
        use crate::schema::applications::dsl;

        dsl::applications
            .filter(dsl::job_id.eq(job_id))
            .filter(dsl::candidate_id.eq(candidate_id))
            .first::<Self>(conn)
            .await
            .optional()
    }
}

/// Request to transition an application's review status
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TransitionRequest {
    pub status: ApplicationStatus,
}

/// Request to schedule (or replace) the interview meeting
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ScheduleMeetingRequest {
    #[validate(length(min = 1, max = 20))]
    pub date: String,

    #[validate(length(min = 1, max = 20))]
    pub time: String,

    #[validate(range(min = 5, max = 480))]
    pub duration_minutes: u32,

    #[validate(length(min = 1, max = 200))]
    pub contact_name: String,

    #[validate(email)]
    pub contact_email: String,

    #[validate(url)]
    pub meeting_link: String,
}

/// API representation of an application
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApplicationResponse {
    pub id: Uuid,
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub employer_id: Uuid,
    pub status: String,
    pub shortlisted_by: Option<Uuid>,
    pub rejected_by: Option<Uuid>,
    pub meeting: Option<Meeting>,
    pub created_at: DateTime<Utc>,
}

impl From<Application> for ApplicationResponse {
    fn from(app: Application) -> Self {
        let meeting = app
            .meeting
            .as_ref()
            .and_then(|value| Meeting::from_json(value).ok());
        Self {
            id: app.id,
            job_id: app.job_id,
            candidate_id: app.candidate_id,
            employer_id: app.employer_id,
            status: app.status,
            shortlisted_by: app.shortlisted_by,
            rejected_by: app.rejected_by,
            meeting,
            created_at: app.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            ApplicationStatus::Pending,
            ApplicationStatus::Shortlisted,
            ApplicationStatus::Rejected,
            ApplicationStatus::Hired,
        ] {
            assert_eq!(
                status.as_str().parse::<ApplicationStatus>().unwrap(),
                status
            );
        }
        assert!("interviewing".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn test_only_shortlisted_and_rejected_are_targets() {
        assert!(ApplicationStatus::Shortlisted.is_transition_target());
        assert!(ApplicationStatus::Rejected.is_transition_target());
        assert!(!ApplicationStatus::Pending.is_transition_target());
        // hired is defined in the schema but nothing transitions into it
        assert!(!ApplicationStatus::Hired.is_transition_target());
    }

    #[test]
    fn test_attribution_sets_exactly_one_field() {
        let actor = Uuid::new_v4();

        let (shortlisted_by, rejected_by) = ApplicationStatus::Shortlisted.attribution(actor);
        assert_eq!(shortlisted_by, Some(actor));
        assert_eq!(rejected_by, None);

        let (shortlisted_by, rejected_by) = ApplicationStatus::Rejected.attribution(actor);
        assert_eq!(shortlisted_by, None);
        assert_eq!(rejected_by, Some(actor));
    }

    #[test]
    fn test_re_transition_clears_opposite_actor() {
        let employer = Uuid::new_v4();
        let sub_employer = Uuid::new_v4();

        // shortlisted by the employer, then rejected by a delegate
        let (s1, r1) = ApplicationStatus::Shortlisted.attribution(employer);
        let (s2, r2) = ApplicationStatus::Rejected.attribution(sub_employer);
        assert_eq!((s1, r1), (Some(employer), None));
        assert_eq!((s2, r2), (None, Some(sub_employer)));
    }

    #[test]
    fn test_meeting_json_roundtrip() {
        let meeting = Meeting {
            date: "2026-09-01".to_string(),
            time: "14:00".to_string(),
            duration_minutes: 45,
            contact_name: "Dana Reyes".to_string(),
            contact_email: "dana@example.com".to_string(),
            meeting_link: "https://meet.example.com/abc".to_string(),
            created_by: Uuid::new_v4(),
            interview_confirmation: false,
        };
        let value = meeting.to_json().unwrap();
        assert_eq!(Meeting::from_json(&value).unwrap(), meeting);
    }
}
