// Job posting service
// Creating a job and debiting the subscription quota happen in one
// transaction; if the insert fails the reserved slot is rolled back with it.

use chrono::Utc;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::RunQueryDsl;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{DieselPool, DieselPooledConn},
    models::job::{CreateJobRequest, Job, JobResponse, NewJob},
    services::delegation::{Actor, ActorKind},
    services::subscription::SubscriptionService,
    utils::{
        audit_logger::{AuditAction, AuditLogger},
        service_error::ServiceError,
    },
};

pub struct JobService {
    diesel_pool: DieselPool,
}

impl JobService {
    pub fn new(diesel_pool: DieselPool) -> Self {
        Self { diesel_pool }
    }

    async fn conn(&self) -> Result<DieselPooledConn<'_>, ServiceError> {
        self.diesel_pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))
    }

    /// Create a job posting against the actor's employer subscription
    #[instrument(skip(self, request), fields(employer_id = %actor.employer_id))]
    pub async fn create_job(
        &self,
        actor: &Actor,
        mut request: CreateJobRequest,
    ) -> Result<JobResponse, ServiceError> {
        // Only the employer itself posts jobs; delegated logins review them
        if actor.kind != ActorKind::Employer {
            return Err(ServiceError::Unauthorized);
        }

        request.sanitize();
        request.validate()?;
        request
            .validate_custom()
            .map_err(ServiceError::ValidationError)?;

        let employer_id = actor.employer_id;
        let mut conn = self.conn().await?;

        let job = conn
            .build_transaction()
            .run::<Job, ServiceError, _>(|conn| {
                async move {
                    use crate::schema::jobs;

                    let subscription =
                        SubscriptionService::reserve_job_slot(conn, employer_id).await?;
                    let now = Utc::now();

                    let new_job = NewJob {
                        id: Uuid::new_v4(),
                        employer_id,
                        subscription_id: subscription.id,
                        title: request.title,
                        description: request.description,
                        deadline: request.deadline,
                        is_active: true,
                        created_at: now,
                        updated_at: now,
                    };

                    let job = diesel::insert_into(jobs::table)
                        .values(&new_job)
                        .get_result::<Job>(conn)
                        .await?;

                    Ok(job)
                }
                .scope_boxed()
            })
            .await?;

        AuditLogger::log_action(
            AuditAction::JobCreated,
            actor.user_id,
            "job",
            Some(job.id.to_string()),
            Some(format!("Created job '{}'", job.title)),
        )
        .await;

        info!("Job {} created for employer {}", job.id, employer_id);
        Ok(job.into())
    }
}
