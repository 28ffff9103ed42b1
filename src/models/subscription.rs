// Subscription database model
// One active subscription per employer; job_posts_used only ever moves up

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::schema::subscriptions;

#[derive(
    Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable, AsChangeset,
)]
#[diesel(table_name = subscriptions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Subscription {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub plan_id: Uuid,
    pub job_post_limit: i32,
    pub job_posts_used: i32,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = subscriptions)]
pub struct NewSubscription {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub plan_id: Uuid,
    pub job_post_limit: i32,
    pub job_posts_used: i32,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    pub fn remaining_quota(&self) -> i32 {
        self.job_post_limit - self.job_posts_used
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Whether a job slot could currently be reserved. The authoritative
    /// check is the conditional UPDATE in the subscription service; this is
    /// only used to classify why a reservation was refused.
    pub fn can_reserve(&self, now: DateTime<Utc>) -> bool {
        self.is_active && !self.is_expired(now) && self.remaining_quota() > 0
    }

    pub async fn find_by_employer(
        conn: &mut AsyncPgConnection,
        employer_id: Uuid,
    ) -> Result<Option<Self>, diesel::result::Error> {
        use crate::schema::subscriptions::dsl;

        dsl::subscriptions
            .filter(dsl::employer_id.eq(employer_id))
            .first::<Self>(conn)
            .await
            .optional()
    }
}

/// Request to renew onto a plan (same plan or an upgrade)
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RenewSubscriptionRequest {
    pub plan_id: Uuid,
}

/// Employer-facing view of the subscription ledger
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionResponse {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub job_post_limit: i32,
    pub job_posts_used: i32,
    pub remaining_quota: i32,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(sub: Subscription) -> Self {
        Self {
            id: sub.id,
            plan_id: sub.plan_id,
            job_post_limit: sub.job_post_limit,
            job_posts_used: sub.job_posts_used,
            remaining_quota: sub.remaining_quota(),
            expires_at: sub.expires_at,
            is_active: sub.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn subscription(limit: i32, used: i32, active: bool, expired: bool) -> Subscription {
        let now = Utc::now();
        Subscription {
            id: Uuid::new_v4(),
            employer_id: Uuid::new_v4(),
            plan_id: Uuid::new_v4(),
            job_post_limit: limit,
            job_posts_used: used,
            expires_at: if expired {
                now - Duration::days(1)
            } else {
                now + Duration::days(30)
            },
            is_active: active,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_exhausted_quota_blocks_reservation() {
        let now = Utc::now();
        assert!(subscription(1, 0, true, false).can_reserve(now));
        assert!(!subscription(1, 1, true, false).can_reserve(now));
    }

    #[test]
    fn test_inactive_or_expired_blocks_reservation() {
        let now = Utc::now();
        assert!(!subscription(5, 0, false, false).can_reserve(now));
        assert!(!subscription(5, 0, true, true).can_reserve(now));
    }
}
