// Cascade deletion coordinator
// Every removal runs in a single transaction so referential cleanup is all
// or nothing. Consumed job post quota is never refunded by any cascade.

use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    db::{DieselPool, DieselPooledConn},
    models::{
        application::Application,
        job::Job,
        sub_employer::DashboardPermission,
        user::{User, UserRole},
    },
    services::delegation::{Actor, ActorKind},
    services::email::EmailService,
    utils::{
        audit_logger::{AuditAction, AuditLogger},
        service_error::ServiceError,
    },
};

pub struct CascadeService {
    diesel_pool: DieselPool,
    email_service: EmailService,
}

impl CascadeService {
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

    /// Delete a job with all of its applications, their forwarded CVs and
    /// any saved-job bookmarks. The subscription counter is left as is.
    #[instrument(skip(self), fields(actor_id = %actor.user_id))]
    pub async fn delete_job(&self, actor: &Actor, job_id: Uuid) -> Result<(), ServiceError> {
        if actor.kind != ActorKind::Employer {
            return Err(ServiceError::Unauthorized);
        }

        let mut conn = self.conn().await?;

        let job = Job::find_by_id(&mut conn, job_id).await?;
        actor.assert_scope(job.employer_id)?;

        conn.build_transaction()
            .run::<(), ServiceError, _>(|conn| {
                async move {
                    use crate::schema::{applications, forwarded_cvs, jobs, saved_jobs};

                    let application_ids: Vec<Uuid> = applications::table
                        .filter(applications::job_id.eq(job_id))
                        .select(applications::id)
                        .load(conn)
                        .await?;

                    diesel::delete(
                        forwarded_cvs::table
                            .filter(forwarded_cvs::application_id.eq_any(&application_ids)),
                    )
                    .execute(conn)
                    .await?;

                    diesel::delete(
                        applications::table.filter(applications::job_id.eq(job_id)),
                    )
                    .execute(conn)
                    .await?;

                    diesel::delete(saved_jobs::table.filter(saved_jobs::job_id.eq(job_id)))
                        .execute(conn)
                        .await?;

                    diesel::delete(jobs::table.filter(jobs::id.eq(job_id)))
                        .execute(conn)
                        .await?;

                    Ok(())
                }
                .scope_boxed()
            })
            .await?;

        AuditLogger::log_action(
            AuditAction::JobDeleted,
            actor.user_id,
            "job",
            Some(job_id.to_string()),
            Some(format!("Deleted job '{}'", job.title)),
        )
        .await;

        info!("Job {} deleted by {}", job_id, actor.user_id);
        Ok(())
    }

    /// Candidate withdraws their own application. The employer is notified
    /// after the deletion commits.
    #[instrument(skip(self))]
    pub async fn withdraw_application(
        &self,
        candidate_id: Uuid,
        application_id: Uuid,
    ) -> Result<(), ServiceError> {
        let mut conn = self.conn().await?;

        let application = Application::find_by_id(&mut conn, application_id).await?;
        if application.candidate_id != candidate_id {
            return Err(ServiceError::Unauthorized);
        }

        Self::delete_application_rows(&mut conn, application_id).await?;

        AuditLogger::log_action(
            AuditAction::ApplicationWithdrawn,
            candidate_id,
            "application",
            Some(application_id.to_string()),
            None,
        )
        .await;

        self.notify_removed(
            &mut conn,
            application.employer_id,
            application.job_id,
            "The candidate withdrew their application",
        )
        .await;

        info!(
            "Application {} withdrawn by candidate {}",
            application_id, candidate_id
        );
        Ok(())
    }

    /// Reviewer-side application deletion. Candidate and employer are both
    /// notified after the deletion commits.
    #[instrument(skip(self), fields(actor_id = %actor.user_id))]
    pub async fn delete_application(
        &self,
        actor: &Actor,
        application_id: Uuid,
    ) -> Result<(), ServiceError> {
        actor.assert_permission(DashboardPermission::Delete)?;
        let mut conn = self.conn().await?;

        let application = Application::find_by_id(&mut conn, application_id).await?;
        actor.assert_scope(application.employer_id)?;

        Self::delete_application_rows(&mut conn, application_id).await?;

        AuditLogger::log_action(
            AuditAction::ApplicationDeleted,
            actor.user_id,
            "application",
            Some(application_id.to_string()),
            None,
        )
        .await;

        self.notify_removed(
            &mut conn,
            application.candidate_id,
            application.job_id,
            "Your application was removed by the employer",
        )
        .await;
        self.notify_removed(
            &mut conn,
            application.employer_id,
            application.job_id,
            "An application was removed from one of your job postings",
        )
        .await;

        info!("Application {} deleted by {}", application_id, actor.user_id);
        Ok(())
    }

    /// Remove a user and everything hanging off it, dispatched on role.
    ///
    /// Deleting an employer removes its jobs, applications, forwarded CVs
    /// and subscription but leaves sub-employer records orphaned.
    #[instrument(skip(self))]
    pub async fn delete_user(&self, user_id: Uuid) -> Result<(), ServiceError> {
        let mut conn = self.conn().await?;

        let user = User::find_by_id(&mut conn, user_id).await?;
        let role = user.user_role().map_err(ServiceError::DatabaseError)?;

        conn.build_transaction()
            .run::<(), ServiceError, _>(|conn| {
                async move {
                    match role {
                        UserRole::Candidate => Self::cascade_candidate(conn, user_id).await,
                        UserRole::Employer => Self::cascade_employer(conn, user_id).await,
                        UserRole::SubEmployer => Self::cascade_sub_employer(conn, user_id).await,
                        UserRole::Admin => Self::delete_user_row(conn, user_id).await,
                    }
                }
                .scope_boxed()
            })
            .await?;

        AuditLogger::log_action(
            AuditAction::UserCascadeDeleted,
            user_id,
            "user",
            Some(user_id.to_string()),
            Some(format!("Cascade deleted {} account", role.as_str())),
        )
        .await;

        info!("User {} ({}) cascade deleted", user_id, role.as_str());
        Ok(())
    }

    async fn cascade_candidate(
        conn: &mut AsyncPgConnection,
        candidate_id: Uuid,
    ) -> Result<(), ServiceError> {
        use crate::schema::{applications, forwarded_cvs, saved_jobs};

        let application_ids: Vec<Uuid> = applications::table
            .filter(applications::candidate_id.eq(candidate_id))
            .select(applications::id)
            .load(conn)
            .await?;

        diesel::delete(
            forwarded_cvs::table.filter(forwarded_cvs::application_id.eq_any(&application_ids)),
        )
        .execute(conn)
        .await?;

        diesel::delete(
            applications::table.filter(applications::candidate_id.eq(candidate_id)),
        )
        .execute(conn)
        .await?;

        diesel::delete(saved_jobs::table.filter(saved_jobs::candidate_id.eq(candidate_id)))
            .execute(conn)
            .await?;

        Self::delete_user_row(conn, candidate_id).await
    }

    async fn cascade_employer(
        conn: &mut AsyncPgConnection,
        employer_id: Uuid,
    ) -> Result<(), ServiceError> {
        use crate::schema::{applications, forwarded_cvs, jobs, saved_jobs, subscriptions};

        let job_ids: Vec<Uuid> = jobs::table
            .filter(jobs::employer_id.eq(employer_id))
            .select(jobs::id)
            .load(conn)
            .await?;

        diesel::delete(
            forwarded_cvs::table.filter(forwarded_cvs::from_employer_id.eq(employer_id)),
        )
        .execute(conn)
        .await?;

        diesel::delete(applications::table.filter(applications::employer_id.eq(employer_id)))
            .execute(conn)
            .await?;

        diesel::delete(saved_jobs::table.filter(saved_jobs::job_id.eq_any(&job_ids)))
            .execute(conn)
            .await?;

        diesel::delete(jobs::table.filter(jobs::employer_id.eq(employer_id)))
            .execute(conn)
            .await?;

        diesel::delete(
            subscriptions::table.filter(subscriptions::employer_id.eq(employer_id)),
        )
        .execute(conn)
        .await?;

        // sub-employer records are intentionally left behind, pointing at a
        // parent that no longer exists
        Self::delete_user_row(conn, employer_id).await
    }

    async fn cascade_sub_employer(
        conn: &mut AsyncPgConnection,
        user_id: Uuid,
    ) -> Result<(), ServiceError> {
        use crate::schema::{forwarded_cvs, sub_employers};

        let sub_ids: Vec<Uuid> = sub_employers::table
            .filter(sub_employers::user_id.eq(user_id))
            .select(sub_employers::id)
            .load(conn)
            .await?;

        diesel::delete(
            forwarded_cvs::table.filter(forwarded_cvs::to_sub_employer_id.eq_any(&sub_ids)),
        )
        .execute(conn)
        .await?;

        diesel::delete(sub_employers::table.filter(sub_employers::user_id.eq(user_id)))
            .execute(conn)
            .await?;

        Self::delete_user_row(conn, user_id).await
    }

    async fn delete_user_row(
        conn: &mut AsyncPgConnection,
        user_id: Uuid,
    ) -> Result<(), ServiceError> {
        use crate::schema::users;

        diesel::delete(users::table.filter(users::id.eq(user_id)))
            .execute(conn)
            .await?;

        Ok(())
    }

    /// Delete an application together with its forwarded CVs
    async fn delete_application_rows(
        conn: &mut DieselPooledConn<'_>,
        application_id: Uuid,
    ) -> Result<(), ServiceError> {
        conn.build_transaction()
            .run::<(), ServiceError, _>(|conn| {
                async move {
                    use crate::schema::{applications, forwarded_cvs};

                    diesel::delete(
                        forwarded_cvs::table
                            .filter(forwarded_cvs::application_id.eq(application_id)),
                    )
                    .execute(conn)
                    .await?;

                    diesel::delete(applications::table.filter(applications::id.eq(application_id)))
                        .execute(conn)
                        .await?;

                    Ok(())
                }
                .scope_boxed()
            })
            .await
    }

    /// Best-effort removal notification: resolve the recipient and job title
    /// then fire the email on a detached task
    async fn notify_removed(
        &self,
        conn: &mut AsyncPgConnection,
        recipient_id: Uuid,
        job_id: Uuid,
        reason: &str,
    ) {
        let recipient = match User::find_by_id(conn, recipient_id).await {
            Ok(user) => user,
            Err(e) => {
                warn!("Skipping removal notification for {}: {}", recipient_id, e);
                return;
            },
        };
        let job_title = match Job::find_by_id(conn, job_id).await {
            Ok(job) => job.title,
            // the job may have been removed in the same cascade
            Err(_) => "a job posting".to_string(),
        };

        let email_service = self.email_service.clone();
        let reason = reason.to_string();

        tokio::spawn(async move {
            if let Err(e) = email_service
                .send_application_removed_email(
                    &recipient.email,
                    &recipient.full_name,
                    &job_title,
                    &reason,
                )
                .await
            {
                warn!("Failed to send removal email to {}: {}", recipient.email, e);
            }
        });
    }
}
