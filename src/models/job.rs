// Job database model
// A job always records which subscription instance was debited at creation

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::schema::jobs;

#[derive(
    Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable, AsChangeset,
)]
#[diesel(table_name = jobs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Job {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub subscription_id: Uuid,
    pub title: String,
    pub description: String,
    pub deadline: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = jobs)]
pub struct NewJob {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub subscription_id: Uuid,
    pub title: String,
    pub description: String,
    pub deadline: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a new job posting
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "title": "Senior Backend Engineer",
    "description": "Own the application lifecycle services.",
    "deadline": "2026-12-31T23:59:59Z"
}))]
pub struct CreateJobRequest {
    #[validate(length(min = 3, max = 200, message = "Title must be 3-200 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 20000, message = "Description is required"))]
    pub description: String,

    pub deadline: Option<DateTime<Utc>>,
}

impl CreateJobRequest {
    pub fn sanitize(&mut self) {
        self.title = self.title.trim().to_string();
        self.description = self.description.trim().to_string();
    }

    pub fn validate_custom(&self) -> Result<(), String> {
        if let Some(deadline) = self.deadline {
            if deadline <= Utc::now() {
                return Err("Deadline must be in the future".to_string());
            }
        }
        Ok(())
    }
}

/// API representation of a job posting
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JobResponse {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub title: String,
    pub description: String,
    pub deadline: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Job> for JobResponse {
    fn from(job: Job) -> Self {
        Self {
            id: job.id,
            employer_id: job.employer_id,
            title: job.title,
            description: job.description,
            deadline: job.deadline,
            is_active: job.is_active,
            created_at: job.created_at,
        }
    }
}

impl Job {
    pub async fn find_by_id(
        conn: &mut AsyncPgConnection,
        job_id: Uuid,
    ) -> Result<Self, diesel::result::Error> {
        use crate::schema::jobs::dsl;

        dsl::jobs.filter(dsl::id.eq(job_id)).first(conn).await
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_sanitize_trims_fields() {
        let mut request = CreateJobRequest {
            title: "  Backend Engineer  ".to_string(),
            description: " Ship things. ".to_string(),
            deadline: None,
        };
        request.sanitize();
        assert_eq!(request.title, "Backend Engineer");
        assert_eq!(request.description, "Ship things.");
    }

    #[test]
    fn test_past_deadline_rejected() {
        let request = CreateJobRequest {
            title: "Backend Engineer".to_string(),
            description: "Ship things.".to_string(),
            deadline: Some(Utc::now() - Duration::days(1)),
        };
        assert!(request.validate_custom().is_err());
    }
}
