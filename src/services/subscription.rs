// Subscription ledger service
// The quota counter is the single source of truth for how many job posts an
// employer may still create. Reservation is a conditional UPDATE so that
// concurrent job creations can never push the counter past the limit.

use chrono::Utc;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    db::{DieselPool, DieselPooledConn},
    models::{
        plan::Plan,
        subscription::{NewSubscription, Subscription, SubscriptionResponse},
    },
    utils::{
        audit_logger::{AuditAction, AuditLogger},
        service_error::ServiceError,
    },
};

pub struct SubscriptionService {
    diesel_pool: DieselPool,
}

impl SubscriptionService {
    pub fn new(diesel_pool: DieselPool) -> Self {
        Self { diesel_pool }
    }

    async fn conn(&self) -> Result<DieselPooledConn<'_>, ServiceError> {
        self.diesel_pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))
    }

    /// The employer's current subscription, regardless of quota state
    #[instrument(skip(self))]
    pub async fn get_active_subscription(
        &self,
        employer_id: Uuid,
    ) -> Result<SubscriptionResponse, ServiceError> {
        let mut conn = self.conn().await?;

        let subscription = Subscription::find_by_employer(&mut conn, employer_id)
            .await?
            .ok_or(ServiceError::SubscriptionMissing)?;

        Ok(subscription.into())
    }

    /// Atomically consume one job post slot.
    ///
    /// A single conditional UPDATE performs the check and the increment, so
    /// two racing job creations with one remaining slot resolve to exactly
    /// one success. When no row matches, a follow-up read classifies the
    /// refusal as missing, expired/inactive, or quota-exhausted.
    pub async fn reserve_job_slot(
        conn: &mut AsyncPgConnection,
        employer_id: Uuid,
    ) -> Result<Subscription, ServiceError> {
        use crate::schema::subscriptions::dsl;

        let now = Utc::now();

        let updated = diesel::update(
            dsl::subscriptions
                .filter(dsl::employer_id.eq(employer_id))
                .filter(dsl::is_active.eq(true))
                .filter(dsl::expires_at.gt(now))
                .filter(dsl::job_posts_used.lt(dsl::job_post_limit)),
        )
        .set((
            dsl::job_posts_used.eq(dsl::job_posts_used + 1),
            dsl::updated_at.eq(now),
        ))
        .get_result::<Subscription>(conn)
        .await
        .optional()?;

        if let Some(subscription) = updated {
            return Ok(subscription);
        }

        // Nothing matched; work out why for the caller
        match Subscription::find_by_employer(conn, employer_id).await? {
            None => Err(ServiceError::SubscriptionMissing),
            Some(sub) if !sub.is_active || sub.is_expired(now) => {
                Err(ServiceError::SubscriptionExpired)
            },
            Some(_) => Err(ServiceError::QuotaExceeded),
        }
    }

    /// Assign the zero-price plan to a newly registered employer
    pub async fn assign_free_plan(
        conn: &mut AsyncPgConnection,
        employer_id: Uuid,
    ) -> Result<Subscription, ServiceError> {
        use crate::schema::subscriptions;

        let plan = Plan::find_free_plan(conn).await?;
        let period = plan
            .billing_period()
            .map_err(ServiceError::DatabaseError)?;
        let now = Utc::now();

        let new_subscription = NewSubscription {
            id: Uuid::new_v4(),
            employer_id,
            plan_id: plan.id,
            job_post_limit: plan.job_post_limit,
            job_posts_used: 0,
            expires_at: period.expiry_from(now),
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let subscription = diesel::insert_into(subscriptions::table)
            .values(&new_subscription)
            .get_result::<Subscription>(conn)
            .await?;

        Ok(subscription)
    }

    /// Renew onto a plan. Renewal is additive: the plan's limit is added to
    /// the current limit, so unused quota is never forfeited. Jobs that were
    /// deactivated while the subscription lapsed come back with it.
    #[instrument(skip(self))]
    pub async fn renew(
        &self,
        employer_id: Uuid,
        plan_id: Uuid,
    ) -> Result<SubscriptionResponse, ServiceError> {
        use diesel_async::scoped_futures::ScopedFutureExt;

        let mut conn = self.conn().await?;

        let subscription = conn
            .build_transaction()
            .run::<Subscription, ServiceError, _>(|conn| {
                async move {
                    use crate::schema::{jobs, subscriptions::dsl};

                    let plan = Plan::find_by_id(conn, plan_id).await?;
                    let period = plan
                        .billing_period()
                        .map_err(ServiceError::DatabaseError)?;
                    let now = Utc::now();

                    let subscription = diesel::update(
                        dsl::subscriptions.filter(dsl::employer_id.eq(employer_id)),
                    )
                    .set((
                        dsl::plan_id.eq(plan.id),
                        dsl::job_post_limit.eq(dsl::job_post_limit + plan.job_post_limit),
                        dsl::expires_at.eq(period.expiry_from(now)),
                        dsl::is_active.eq(true),
                        dsl::updated_at.eq(now),
                    ))
                    .get_result::<Subscription>(conn)
                    .await
                    .optional()?
                    .ok_or(ServiceError::SubscriptionMissing)?;

                    diesel::update(
                        jobs::table
                            .filter(jobs::employer_id.eq(employer_id))
                            .filter(jobs::is_active.eq(false)),
                    )
                    .set((jobs::is_active.eq(true), jobs::updated_at.eq(now)))
                    .execute(conn)
                    .await?;

                    Ok(subscription)
                }
                .scope_boxed()
            })
            .await?;

        AuditLogger::log_action(
            AuditAction::SubscriptionRenewed,
            employer_id,
            "subscription",
            Some(subscription.id.to_string()),
            Some(format!(
                "Renewed onto plan {}, limit now {}",
                plan_id, subscription.job_post_limit
            )),
        )
        .await;

        info!(
            "Subscription {} renewed, limit {} used {}",
            subscription.id, subscription.job_post_limit, subscription.job_posts_used
        );
        Ok(subscription.into())
    }

    /// Deactivate the employer's subscription. The counter and expiry are
    /// left untouched so a later renewal picks up where it left off.
    #[instrument(skip(self))]
    pub async fn cancel(&self, employer_id: Uuid) -> Result<SubscriptionResponse, ServiceError> {
        use crate::schema::subscriptions::dsl;

        let mut conn = self.conn().await?;
        let now = Utc::now();

        let subscription = diesel::update(
            dsl::subscriptions.filter(dsl::employer_id.eq(employer_id)),
        )
        .set((dsl::is_active.eq(false), dsl::updated_at.eq(now)))
        .get_result::<Subscription>(&mut conn)
        .await
        .optional()?
        .ok_or(ServiceError::SubscriptionMissing)?;

        AuditLogger::log_action(
            AuditAction::SubscriptionCancelled,
            employer_id,
            "subscription",
            Some(subscription.id.to_string()),
            None,
        )
        .await;

        Ok(subscription.into())
    }
}
