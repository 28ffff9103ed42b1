// Application lifecycle service
// Transitions persist first; candidate notification is fired afterwards on a
// detached task and is never allowed to fail the request.

use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{DieselPool, DieselPooledConn},
    models::{
        application::{
            Application, ApplicationResponse, ApplicationStatus, Meeting, NewApplication,
            ScheduleMeetingRequest,
        },
        job::Job,
        sub_employer::DashboardPermission,
        user::{User, UserRole},
    },
    services::delegation::Actor,
    services::email::EmailService,
    utils::{
        audit_logger::{AuditAction, AuditLogger},
        service_error::{is_unique_violation, ServiceError},
    },
};

pub struct ApplicationService {
    diesel_pool: DieselPool,
    email_service: EmailService,
}

impl ApplicationService {
    pub fn new(diesel_pool: DieselPool, email_service: EmailService) -> Self {
        Self {
            diesel_pool,
            email_service,
        }
    }

    async fn conn(&self) -> Result<DieselPooledConn<'_>, ServiceError> {
        self.diesel_pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))
    }

    /// Candidate applies to a job. One application per (job, candidate); the
    /// unique index is the arbiter under concurrency, the pre-check just
    /// gives the common case a clean error without a failed insert.
    #[instrument(skip(self))]
    pub async fn apply(
        &self,
        candidate_id: Uuid,
        job_id: Uuid,
    ) -> Result<ApplicationResponse, ServiceError> {
        let mut conn = self.conn().await?;

        let candidate = User::find_by_id(&mut conn, candidate_id).await?;
        if candidate.user_role() != Ok(UserRole::Candidate) {
            return Err(ServiceError::Unauthorized);
        }

        let job = Job::find_by_id(&mut conn, job_id).await?;
        if !job.is_active {
            return Err(ServiceError::ValidationError(
                "Job is not accepting applications".to_string(),
            ));
        }

        if Application::find_by_job_and_candidate(&mut conn, job_id, candidate_id)
            .await?
            .is_some()
        {
            return Err(ServiceError::AlreadyApplied);
        }

        let now = Utc::now();
        let new_application = NewApplication {
            id: Uuid::new_v4(),
            job_id,
            candidate_id,
            // denormalized from the job so reviewer scoping never needs a join
            employer_id: job.employer_id,
            status: ApplicationStatus::Pending.as_str().to_string(),
            created_at: now,
            updated_at: now,
        };

        let application = diesel::insert_into(crate::schema::applications::table)
            .values(&new_application)
            .get_result::<Application>(&mut conn)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    ServiceError::AlreadyApplied
                } else {
                    e.into()
                }
            })?;

        AuditLogger::log_action(
            AuditAction::ApplicationCreated,
            candidate_id,
            "application",
            Some(application.id.to_string()),
            Some(format!("Applied to job {}", job_id)),
        )
        .await;

        info!(
            "Candidate {} applied to job {} as application {}",
            candidate_id, job_id, application.id
        );
        Ok(application.into())
    }

    /// Transition an application to shortlisted or rejected.
    ///
    /// Re-transition between the two targets is allowed and re-stamps the
    /// acting reviewer; exactly one of shortlisted_by/rejected_by is set
    /// afterwards. The candidate notification is best effort.
    #[instrument(skip(self), fields(actor_id = %actor.user_id))]
    pub async fn transition(
        &self,
        actor: &Actor,
        application_id: Uuid,
        new_status: ApplicationStatus,
    ) -> Result<ApplicationResponse, ServiceError> {
        let required = match new_status {
            ApplicationStatus::Shortlisted => DashboardPermission::Accept,
            ApplicationStatus::Rejected => DashboardPermission::Reject,
            _ => {
                return Err(ServiceError::ValidationError(format!(
                    "Cannot transition an application to '{}'",
                    new_status.as_str()
                )))
            },
        };
        actor.assert_permission(required)?;

        let mut conn = self.conn().await?;

        let application = Application::find_by_id(&mut conn, application_id).await?;
        actor.assert_scope(application.employer_id)?;

        let (shortlisted_by, rejected_by) = new_status.attribution(actor.user_id);
        let now = Utc::now();

        let application = {
            use crate::schema::applications::dsl;

            diesel::update(dsl::applications.filter(dsl::id.eq(application_id)))
                .set((
                    dsl::status.eq(new_status.as_str()),
                    dsl::shortlisted_by.eq(shortlisted_by),
                    dsl::rejected_by.eq(rejected_by),
                    dsl::updated_at.eq(now),
                ))
                .get_result::<Application>(&mut conn)
                .await?
        };

        AuditLogger::log_action(
            AuditAction::ApplicationTransitioned,
            actor.user_id,
            "application",
            Some(application.id.to_string()),
            Some(format!("Status set to {}", new_status.as_str())),
        )
        .await;

        self.notify_candidate(&mut conn, &application, new_status, actor)
            .await;

        info!(
            "Application {} transitioned to {} by {}",
            application.id,
            new_status.as_str(),
            actor.user_id
        );
        Ok(application.into())
    }

    /// Schedule (or replace) the interview meeting on an application
    #[instrument(skip(self, request), fields(actor_id = %actor.user_id))]
    pub async fn schedule_meeting(
        &self,
        actor: &Actor,
        application_id: Uuid,
        request: ScheduleMeetingRequest,
    ) -> Result<ApplicationResponse, ServiceError> {
        request.validate()?;
        actor.assert_permission(DashboardPermission::Meeting)?;

        let mut conn = self.conn().await?;

        let application = Application::find_by_id(&mut conn, application_id).await?;
        actor.assert_scope(application.employer_id)?;

        let meeting = Meeting {
            date: request.date,
            time: request.time,
            duration_minutes: request.duration_minutes,
            contact_name: request.contact_name,
            contact_email: request.contact_email,
            meeting_link: request.meeting_link,
            created_by: actor.user_id,
            interview_confirmation: false,
        };
        let meeting_json = meeting
            .to_json()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let application = {
            use crate::schema::applications::dsl;

            diesel::update(dsl::applications.filter(dsl::id.eq(application_id)))
                .set((
                    dsl::meeting.eq(Some(meeting_json)),
                    dsl::updated_at.eq(Utc::now()),
                ))
                .get_result::<Application>(&mut conn)
                .await?
        };

        AuditLogger::log_action(
            AuditAction::MeetingScheduled,
            actor.user_id,
            "application",
            Some(application.id.to_string()),
            None,
        )
        .await;

        Ok(application.into())
    }

    /// Fire the candidate-facing status email on a detached task. Lookup or
    /// delivery failures are logged and swallowed.
    async fn notify_candidate(
        &self,
        conn: &mut diesel_async::AsyncPgConnection,
        application: &Application,
        new_status: ApplicationStatus,
        actor: &Actor,
    ) {
        let candidate = match User::find_by_id(conn, application.candidate_id).await {
            Ok(user) => user,
            Err(e) => {
                warn!(
                    "Skipping status notification for application {}: {}",
                    application.id, e
                );
                return;
            },
        };
        let job = match Job::find_by_id(conn, application.job_id).await {
            Ok(job) => job,
            Err(e) => {
                warn!(
                    "Skipping status notification for application {}: {}",
                    application.id, e
                );
                return;
            },
        };

        let email_service = self.email_service.clone();
        let status_label = new_status.as_str().to_string();
        let actor_display = actor.display();
        let application_id = application.id;

        tokio::spawn(async move {
            if let Err(e) = email_service
                .send_application_status_email(
                    &candidate.email,
                    &candidate.full_name,
                    &job.title,
                    &status_label,
                    &actor_display,
                )
                .await
            {
                warn!(
                    "Failed to send status email for application {}: {}",
                    application_id, e
                );
            }
        });
    }
}
