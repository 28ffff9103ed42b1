// Plan database model
// Plans are immutable once referenced by a live subscription, except for
// administrative deactivation.

use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::schema::plans;

/// Billing period for a plan
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BillingPeriod {
    Monthly,
    Quarterly,
    Yearly,
    Free,
}

impl BillingPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingPeriod::Monthly => "monthly",
            BillingPeriod::Quarterly => "quarterly",
            BillingPeriod::Yearly => "yearly",
            BillingPeriod::Free => "free",
        }
    }

    /// How far a renewal pushes out the subscription expiry.
    /// The free plan gets a far-future expiry instead of a billing cycle.
    pub fn duration(&self) -> Duration {
        match self {
            BillingPeriod::Monthly => Duration::days(30),
            BillingPeriod::Quarterly => Duration::days(90),
            BillingPeriod::Yearly => Duration::days(365),
            BillingPeriod::Free => Duration::days(36500),
        }
    }

    pub fn expiry_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + self.duration()
    }
}

impl FromStr for BillingPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(BillingPeriod::Monthly),
            "quarterly" => Ok(BillingPeriod::Quarterly),
            "yearly" => Ok(BillingPeriod::Yearly),
            "free" => Ok(BillingPeriod::Free),
            _ => Err(format!("Invalid billing period: {}", s)),
        }
    }
}

#[derive(
    Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable, AsChangeset,
)]
#[diesel(table_name = plans)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Plan {
    pub id: Uuid,
    pub name: String,
    pub job_post_limit: i32,
    pub billing_period: String,
    pub price_cents: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Plan {
    pub fn billing_period(&self) -> Result<BillingPeriod, String> {
        self.billing_period.parse()
    }

    pub async fn find_by_id(
        conn: &mut AsyncPgConnection,
        plan_id: Uuid,
    ) -> Result<Self, diesel::result::Error> {
        use crate::schema::plans::dsl;

        dsl::plans
            .filter(dsl::id.eq(plan_id))
            .filter(dsl::is_active.eq(true))
            .first(conn)
            .await
    }

    /// The zero-price plan auto-assigned at employer registration
    pub async fn find_free_plan(
        conn: &mut AsyncPgConnection,
    ) -> Result<Self, diesel::result::Error> {
        use crate::schema::plans::dsl;

        dsl::plans
            .filter(dsl::billing_period.eq(BillingPeriod::Free.as_str()))
            .filter(dsl::is_active.eq(true))
            .first(conn)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_billing_period_roundtrip() {
        for period in [
            BillingPeriod::Monthly,
            BillingPeriod::Quarterly,
            BillingPeriod::Yearly,
            BillingPeriod::Free,
        ] {
            assert_eq!(period.as_str().parse::<BillingPeriod>().unwrap(), period);
        }
    }

    #[test]
    fn test_renewal_expiry_extends_forward() {
        let now = Utc::now();
        assert_eq!(
            BillingPeriod::Monthly.expiry_from(now),
            now + Duration::days(30)
        );
        assert!(BillingPeriod::Free.expiry_from(now) > BillingPeriod::Yearly.expiry_from(now));
    }
}
