// Delegation and authorization service
// A sub-employer's identity always resolves to its parent employer for data
// scoping; the resolved Actor carries the attribution identity and the
// display fields used in notifications.

use chrono::Utc;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    db::{DieselPool, DieselPooledConn},
    models::{
        sub_employer::{
            CreateSubEmployerRequest, DashboardPermission, NewSubEmployer, SubEmployer,
            SubEmployerResponse,
        },
        user::{NewUser, User, UserRole},
    },
    utils::{
        audit_logger::{AuditAction, AuditLogger},
        password::hash_password,
        service_error::ServiceError,
        validation::{trim_and_validate_field, trim_optional_field},
    },
};

/// Which kind of principal caused an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorKind {
    Employer,
    SubEmployer,
}

/// A reviewer resolved through the delegation hierarchy.
///
/// `employer_id` is the data scope: the actor's own id for an employer, the
/// parent employer's id for a sub-employer. `user_id` is the attribution
/// identity stamped on transitions.
#[derive(Debug, Clone)]
pub struct Actor {
    pub kind: ActorKind,
    pub user_id: Uuid,
    pub employer_id: Uuid,
    pub sub_employer_id: Option<Uuid>,
    pub display_name: String,
    pub display_role: String,
    /// Granted dashboard capabilities; empty and unused for employers
    pub permissions: Vec<DashboardPermission>,
}

impl Actor {
    /// "shortlisted by <name> (<department|Employer>)"
    pub fn display(&self) -> String {
        format!("{} ({})", self.display_name, self.display_role)
    }

    /// Every sub-employer mutation must target a record owned by its parent
    pub fn assert_scope(&self, employer_id: Uuid) -> Result<(), ServiceError> {
        if self.employer_id == employer_id {
            Ok(())
        } else {
            Err(ServiceError::Unauthorized)
        }
    }

    /// A sub-employer may only perform actions its parent granted on the
    /// dashboard. The parent employer itself is never capability-restricted.
    pub fn assert_permission(&self, permission: DashboardPermission) -> Result<(), ServiceError> {
        match self.kind {
            ActorKind::Employer => Ok(()),
            ActorKind::SubEmployer if self.permissions.contains(&permission) => Ok(()),
            ActorKind::SubEmployer => Err(ServiceError::Unauthorized),
        }
    }
}

pub struct DelegationService {
    diesel_pool: DieselPool,
}

impl DelegationService {
    pub fn new(diesel_pool: DieselPool) -> Self {
        Self { diesel_pool }
    }

    async fn conn(&self) -> Result<DieselPooledConn<'_>, ServiceError> {
        self.diesel_pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))
    }

    /// Resolve an authenticated user id to an Actor
    #[instrument(skip(self))]
    pub async fn resolve_actor(&self, user_id: Uuid) -> Result<Actor, ServiceError> {
        let mut conn = self.conn().await?;
        Self::resolve_actor_with_conn(&mut conn, user_id).await
    }

    /// Connection-scoped resolution, usable inside transactions
    pub async fn resolve_actor_with_conn(
        conn: &mut AsyncPgConnection,
        user_id: Uuid,
    ) -> Result<Actor, ServiceError> {
        let user = User::find_by_id(conn, user_id).await?;
        let role = user
            .user_role()
            .map_err(ServiceError::DatabaseError)?;

        match role {
            UserRole::Employer => Ok(Actor {
                kind: ActorKind::Employer,
                user_id: user.id,
                employer_id: user.id,
                sub_employer_id: None,
                display_name: user.full_name,
                display_role: "Employer".to_string(),
                permissions: Vec::new(),
            }),
            UserRole::SubEmployer => {
                let sub = SubEmployer::find_by_user_id(conn, user.id)
                    .await?
                    .ok_or(ServiceError::NotFound)?;

                let display_role = sub
                    .department
                    .clone()
                    .unwrap_or_else(|| "Team".to_string());

                Ok(Actor {
                    kind: ActorKind::SubEmployer,
                    user_id: user.id,
                    employer_id: sub.parent_employer_id,
                    sub_employer_id: Some(sub.id),
                    display_name: user.full_name,
                    display_role,
                    permissions: sub.permission_set(),
                })
            },
            // Candidates and admins are not reviewers
            UserRole::Candidate | UserRole::Admin => Err(ServiceError::Unauthorized),
        }
    }

    /// Create a sub-employer under the calling employer.
    /// The identity row and the SubEmployer record are created atomically.
    #[instrument(skip(self, request))]
    pub async fn create_sub_employer(
        &self,
        parent_user_id: Uuid,
        request: CreateSubEmployerRequest,
    ) -> Result<SubEmployerResponse, ServiceError> {
        let full_name = trim_and_validate_field(&request.full_name, true)
            .map_err(ServiceError::ValidationError)?;
        let department = trim_optional_field(request.department.as_ref());

        let mut conn = self.conn().await?;

        // The caller must already own an employer record
        let parent = match User::find_by_id(&mut conn, parent_user_id).await {
            Ok(user) => user,
            Err(diesel::result::Error::NotFound) => {
                return Err(ServiceError::ParentEmployerNotFound)
            },
            Err(e) => return Err(e.into()),
        };
        if parent.user_role() != Ok(UserRole::Employer) {
            return Err(ServiceError::ParentEmployerNotFound);
        }

        if User::find_by_email(&mut conn, &request.email).await?.is_some() {
            return Err(ServiceError::EmailInUse);
        }

        let password_hash = hash_password(&request.password)?;
        let now = Utc::now();

        let new_user = NewUser {
            id: Uuid::new_v4(),
            email: request.email.clone(),
            password_hash,
            full_name,
            role: UserRole::SubEmployer.as_str().to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let new_sub = NewSubEmployer {
            id: Uuid::new_v4(),
            parent_employer_id: parent.id,
            user_id: new_user.id,
            department,
            permissions: request
                .permissions
                .iter()
                .map(|p| Some(p.as_str().to_string()))
                .collect(),
            created_at: now,
            updated_at: now,
        };

        let sub = conn
            .build_transaction()
            .run::<SubEmployer, ServiceError, _>(|conn| {
                async move {
                    use crate::schema::{sub_employers, users};

                    diesel::insert_into(users::table)
                        .values(&new_user)
                        .execute(conn)
                        .await
                        .map_err(|e| {
                            if crate::utils::service_error::is_unique_violation(&e) {
                                ServiceError::EmailInUse
                            } else {
                                e.into()
                            }
                        })?;

                    let sub = diesel::insert_into(sub_employers::table)
                        .values(&new_sub)
                        .get_result::<SubEmployer>(conn)
                        .await?;

                    Ok(sub)
                }
                .scope_boxed()
            })
            .await?;

        AuditLogger::log_action(
            AuditAction::SubEmployerCreated,
            parent.id,
            "sub_employer",
            Some(sub.id.to_string()),
            Some(format!("Created sub-employer for {}", request.email)),
        )
        .await;

        info!("Created sub-employer {} under {}", sub.id, parent.id);
        Ok(sub.into())
    }
}
