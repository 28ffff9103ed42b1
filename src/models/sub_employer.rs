// SubEmployer database model and dashboard capability set
// A sub-employer never owns jobs or subscriptions; everything it does is
// scoped to its parent employer.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::schema::sub_employers;

/// Capabilities a parent employer can grant on its dashboard
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DashboardPermission {
    View,
    Create,
    Update,
    Delete,
    Reject,
    Accept,
    Download,
    Meeting,
}

impl DashboardPermission {
    pub fn as_str(&self) -> &'static str {
        match self {
            DashboardPermission::View => "view",
            DashboardPermission::Create => "create",
            DashboardPermission::Update => "update",
            DashboardPermission::Delete => "delete",
            DashboardPermission::Reject => "reject",
            DashboardPermission::Accept => "accept",
            DashboardPermission::Download => "download",
            DashboardPermission::Meeting => "meeting",
        }
    }
}

impl FromStr for DashboardPermission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "view" => Ok(DashboardPermission::View),
            "create" => Ok(DashboardPermission::Create),
            "update" => Ok(DashboardPermission::Update),
            "delete" => Ok(DashboardPermission::Delete),
            "reject" => Ok(DashboardPermission::Reject),
            "accept" => Ok(DashboardPermission::Accept),
            "download" => Ok(DashboardPermission::Download),
            "meeting" => Ok(DashboardPermission::Meeting),
            _ => Err(format!("Invalid dashboard permission: {}", s)),
        }
    }
}

#[derive(
    Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable, AsChangeset,
)]
#[diesel(table_name = sub_employers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SubEmployer {
    pub id: Uuid,
    pub parent_employer_id: Uuid,
    pub user_id: Uuid,
    pub department: Option<String>,
    pub permissions: Vec<Option<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = sub_employers)]
pub struct NewSubEmployer {
    pub id: Uuid,
    pub parent_employer_id: Uuid,
    pub user_id: Uuid,
    pub department: Option<String>,
    pub permissions: Vec<Option<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SubEmployer {
    /// Parsed capability set; unknown strings in storage are ignored
    pub fn permission_set(&self) -> Vec<DashboardPermission> {
        self.permissions
            .iter()
            .flatten()
            .filter_map(|p| p.parse().ok())
            .collect()
    }

    pub fn has_permission(&self, permission: DashboardPermission) -> bool {
        self.permission_set().contains(&permission)
    }

    pub async fn find_by_id(
        conn: &mut AsyncPgConnection,
        sub_employer_id: Uuid,
    ) -> Result<Self, diesel::result::Error> {
        use crate::schema::sub_employers::dsl;

        dsl::sub_employers
            .filter(dsl::id.eq(sub_employer_id))
            .first(conn)
            .await
    }

    pub async fn find_by_user_id(
        conn: &mut AsyncPgConnection,
        user_id: Uuid,
    ) -> Result<Option<Self>, diesel::result::Error> {
        use crate::schema::sub_employers::dsl;

        dsl::sub_employers
            .filter(dsl::user_id.eq(user_id))
            .first::<Self>(conn)
            .await
            .optional()
    }
}

/// Request to create a sub-employer under the calling employer
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateSubEmployerRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 255))]
    pub full_name: String,

    #[validate(length(max = 100))]
    pub department: Option<String>,

    #[serde(default)]
    pub permissions: Vec<DashboardPermission>,
}

/// API representation of a sub-employer
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubEmployerResponse {
    pub id: Uuid,
    pub parent_employer_id: Uuid,
    pub user_id: Uuid,
    pub department: Option<String>,
    pub permissions: Vec<DashboardPermission>,
    pub created_at: DateTime<Utc>,
}

impl From<SubEmployer> for SubEmployerResponse {
    fn from(sub: SubEmployer) -> Self {
        let permissions = sub.permission_set();
        Self {
            id: sub.id,
            parent_employer_id: sub.parent_employer_id,
            user_id: sub.user_id,
            department: sub.department,
            permissions,
            created_at: sub.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub_employer(permissions: Vec<Option<String>>) -> SubEmployer {
        let now = Utc::now();
        SubEmployer {
            id: Uuid::new_v4(),
            parent_employer_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            department: Some("Engineering".to_string()),
            permissions,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_permission_parsing_ignores_unknown_entries() {
        let sub = sub_employer(vec![
            Some("view".to_string()),
            Some("reject".to_string()),
            Some("superuser".to_string()),
            None,
        ]);
        let set = sub.permission_set();
        assert_eq!(
            set,
            vec![DashboardPermission::View, DashboardPermission::Reject]
        );
    }

    #[test]
    fn test_has_permission() {
        let sub = sub_employer(vec![Some("accept".to_string()), Some("meeting".to_string())]);
        assert!(sub.has_permission(DashboardPermission::Accept));
        assert!(sub.has_permission(DashboardPermission::Meeting));
        assert!(!sub.has_permission(DashboardPermission::Delete));
    }
}
