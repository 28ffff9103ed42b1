// User account handlers

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    app::AppState,
    middleware::auth::AuthenticatedUser,
    models::user::{RegisterEmployerRequest, UserResponse, UserRole},
    services::{CascadeService, UserService},
    utils::service_error::ServiceError,
};

/// Register an employer account with the free plan attached
/// POST /api/v1/users/employers
#[utoipa::path(
    post,
    path = "/v1/users/employers",
    tag = "Users",
    operation_id = "registerEmployer",
    request_body = RegisterEmployerRequest,
    responses(
        (status = 201, description = "Employer registered", body = UserResponse),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn register_employer(
    State(state): State<AppState>,
    Json(request): Json<RegisterEmployerRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let user: UserResponse = UserService::new(state.diesel_pool.clone())
        .register_employer(request)
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Cascade-delete a user account. Callers may delete themselves; admins may
/// delete anyone.
/// DELETE /api/v1/users/:id
#[utoipa::path(
    delete,
    path = "/v1/users/{id}",
    tag = "Users",
    operation_id = "deleteUser",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    security(("bearerAuth" = []))
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let is_admin = auth_user.role == UserRole::Admin.as_str();
    if auth_user.user_id != user_id && !is_admin {
        return Err(ServiceError::Unauthorized);
    }

    CascadeService::new(state.diesel_pool.clone(), state.email_service.as_ref().clone())
        .delete_user(user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
