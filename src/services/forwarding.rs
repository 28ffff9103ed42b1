// CV forwarding workflow service
// Forwarding fans an application out to sub-employers; each forwarded copy
// carries its own pending -> viewed -> accepted | rejected status and never
// touches the application's status.

use chrono::Utc;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::RunQueryDsl;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    db::{DieselPool, DieselPooledConn},
    models::{
        application::Application,
        forwarded_cv::{ForwardedCv, ForwardedCvResponse, ForwardingStatus, NewForwardedCv},
        sub_employer::{DashboardPermission, SubEmployer},
    },
    services::delegation::{Actor, ActorKind},
    utils::{
        audit_logger::{AuditAction, AuditLogger},
        service_error::ServiceError,
        validation::trim_optional_field,
    },
};

pub struct ForwardingService {
    diesel_pool: DieselPool,
}

impl ForwardingService {
    pub fn new(diesel_pool: DieselPool) -> Self {
        Self { diesel_pool }
    }

    async fn conn(&self) -> Result<DieselPooledConn<'_>, ServiceError> {
        self.diesel_pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))
    }

    /// Forward an application to a set of the employer's own sub-employers.
    ///
    /// All targets are validated and inserted in one transaction. A target
    /// that already holds this application is skipped silently; the response
    /// contains only the rows created by this call.
    #[instrument(skip(self, notes), fields(actor_id = %actor.user_id))]
    pub async fn forward(
        &self,
        actor: &Actor,
        application_id: Uuid,
        sub_employer_ids: Vec<Uuid>,
        notes: Option<String>,
    ) -> Result<Vec<ForwardedCvResponse>, ServiceError> {
        if actor.kind != ActorKind::Employer {
            return Err(ServiceError::Unauthorized);
        }
        if sub_employer_ids.is_empty() {
            return Err(ServiceError::ValidationError(
                "At least one sub-employer is required".to_string(),
            ));
        }

        let notes = trim_optional_field(notes.as_ref());
        let employer_id = actor.employer_id;
        let mut conn = self.conn().await?;

        let created = conn
            .build_transaction()
            .run::<Vec<ForwardedCv>, ServiceError, _>(|conn| {
                async move {
                    use crate::schema::forwarded_cvs;

                    let application = Application::find_by_id(conn, application_id).await?;
                    if application.employer_id != employer_id {
                        return Err(ServiceError::Unauthorized);
                    }

                    let mut created = Vec::with_capacity(sub_employer_ids.len());
                    for sub_employer_id in sub_employer_ids {
                        let sub = SubEmployer::find_by_id(conn, sub_employer_id).await?;
                        if sub.parent_employer_id != employer_id {
                            return Err(ServiceError::Unauthorized);
                        }

                        let new_forwarding = NewForwardedCv {
                            id: Uuid::new_v4(),
                            application_id,
                            from_employer_id: employer_id,
                            to_sub_employer_id: sub.id,
                            status: ForwardingStatus::Pending.as_str().to_string(),
                            notes: notes.clone(),
                            forwarded_at: Utc::now(),
                        };

                        // duplicate forward to the same target is a no-op
                        let inserted = diesel::insert_into(forwarded_cvs::table)
                            .values(&new_forwarding)
                            .on_conflict((
                                forwarded_cvs::application_id,
                                forwarded_cvs::to_sub_employer_id,
                            ))
                            .do_nothing()
                            .get_result::<ForwardedCv>(conn)
                            .await
                            .optional()?;

                        if let Some(forwarding) = inserted {
                            created.push(forwarding);
                        }
                    }

                    Ok(created)
                }
                .scope_boxed()
            })
            .await?;

        for forwarding in &created {
            AuditLogger::log_action(
                AuditAction::CvForwarded,
                actor.user_id,
                "forwarded_cv",
                Some(forwarding.id.to_string()),
                Some(format!(
                    "Forwarded application {} to sub-employer {}",
                    application_id, forwarding.to_sub_employer_id
                )),
            )
            .await;
        }

        info!(
            "Forwarded application {} to {} sub-employer(s)",
            application_id,
            created.len()
        );
        Ok(created.into_iter().map(Into::into).collect())
    }

    /// Fetch a forwarded CV for its target sub-employer, stamping viewed_at
    /// on first read. The conditional update only fires while the row is
    /// still pending, so the timestamp is set at most once.
    #[instrument(skip(self), fields(actor_id = %actor.user_id))]
    pub async fn view(
        &self,
        actor: &Actor,
        forwarding_id: Uuid,
    ) -> Result<ForwardedCvResponse, ServiceError> {
        actor.assert_permission(DashboardPermission::View)?;
        let mut conn = self.conn().await?;

        let forwarding = ForwardedCv::find_by_id(&mut conn, forwarding_id).await?;
        self.assert_target(actor, &forwarding)?;

        let forwarding = {
            use crate::schema::forwarded_cvs::dsl;

            let now = Utc::now();
            diesel::update(
                dsl::forwarded_cvs
                    .filter(dsl::id.eq(forwarding_id))
                    .filter(dsl::status.eq(ForwardingStatus::Pending.as_str())),
            )
            .set((
                dsl::status.eq(ForwardingStatus::Viewed.as_str()),
                dsl::viewed_at.eq(Some(now)),
            ))
            .get_result::<ForwardedCv>(&mut conn)
            .await
            .optional()?
            .unwrap_or(forwarding)
        };

        Ok(forwarding.into())
    }

    /// Sub-employer accepts or rejects a forwarded CV. Terminal rows cannot
    /// be re-actioned.
    #[instrument(skip(self), fields(actor_id = %actor.user_id))]
    pub async fn act(
        &self,
        actor: &Actor,
        forwarding_id: Uuid,
        action: ForwardingStatus,
    ) -> Result<ForwardedCvResponse, ServiceError> {
        let required = match action {
            ForwardingStatus::Accepted => DashboardPermission::Accept,
            ForwardingStatus::Rejected => DashboardPermission::Reject,
            _ => {
                return Err(ServiceError::ValidationError(format!(
                    "'{}' is not a valid forwarding action",
                    action.as_str()
                )))
            },
        };
        actor.assert_permission(required)?;

        let mut conn = self.conn().await?;

        let forwarding = ForwardedCv::find_by_id(&mut conn, forwarding_id).await?;
        self.assert_target(actor, &forwarding)?;

        let current = forwarding
            .forwarding_status()
            .map_err(ServiceError::DatabaseError)?;
        if !current.is_actionable() {
            return Err(ServiceError::ValidationError(format!(
                "Forwarded CV already {}",
                current.as_str()
            )));
        }

        let forwarding = {
            use crate::schema::forwarded_cvs::dsl;

            let now = Utc::now();
            diesel::update(dsl::forwarded_cvs.filter(dsl::id.eq(forwarding_id)))
                .set((
                    dsl::status.eq(action.as_str()),
                    dsl::action_taken_at.eq(Some(now)),
                ))
                .get_result::<ForwardedCv>(&mut conn)
                .await?
        };

        AuditLogger::log_action(
            AuditAction::ForwardedCvActioned,
            actor.user_id,
            "forwarded_cv",
            Some(forwarding.id.to_string()),
            Some(format!("Marked {}", action.as_str())),
        )
        .await;

        info!(
            "Forwarded CV {} {} by {}",
            forwarding.id,
            action.as_str(),
            actor.user_id
        );
        Ok(forwarding.into())
    }

    /// Reads and actions on a forwarded CV are reserved to its target
    fn assert_target(&self, actor: &Actor, forwarding: &ForwardedCv) -> Result<(), ServiceError> {
        match actor.sub_employer_id {
            Some(sub_id) if sub_id == forwarding.to_sub_employer_id => Ok(()),
            _ => Err(ServiceError::Unauthorized),
        }
    }
}
