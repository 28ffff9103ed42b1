// User account service
// Registration creates the identity row and the free-plan subscription in
// one transaction so every employer always has a ledger row.

use chrono::Utc;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::RunQueryDsl;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{DieselPool, DieselPooledConn},
    models::user::{NewUser, RegisterEmployerRequest, User, UserResponse, UserRole},
    services::subscription::SubscriptionService,
    utils::{
        password::hash_password,
        service_error::{is_unique_violation, ServiceError},
    },
};

pub struct UserService {
    diesel_pool: DieselPool,
}

impl UserService {
    pub fn new(diesel_pool: DieselPool) -> Self {
        Self { diesel_pool }
    }

    async fn conn(&self) -> Result<DieselPooledConn<'_>, ServiceError> {
        self.diesel_pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))
    }

    /// Register an employer and assign the free plan
    #[instrument(skip(self, request))]
    pub async fn register_employer(
        &self,
        request: RegisterEmployerRequest,
    ) -> Result<UserResponse, ServiceError> {
        request.validate()?;

        let mut conn = self.conn().await?;

        if User::find_by_email(&mut conn, &request.email).await?.is_some() {
            return Err(ServiceError::EmailInUse);
        }

        let password_hash = hash_password(&request.password)?;
        let now = Utc::now();

        let new_user = NewUser {
            id: Uuid::new_v4(),
            email: request.email,
            password_hash,
            full_name: request.full_name,
            role: UserRole::Employer.as_str().to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let user = conn
            .build_transaction()
            .run::<User, ServiceError, _>(|conn| {
                async move {
                    use crate::schema::users;

                    let user = diesel::insert_into(users::table)
                        .values(&new_user)
                        .get_result::<User>(conn)
                        .await
                        .map_err(|e| {
                            if is_unique_violation(&e) {
                                ServiceError::EmailInUse
                            } else {
                                e.into()
                            }
                        })?;

                    SubscriptionService::assign_free_plan(conn, user.id).await?;

                    Ok(user)
                }
                .scope_boxed()
            })
            .await?;

        info!("Registered employer {}", user.id);
        Ok(user.into())
    }
}
