// Job posting handlers

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
    models::job::{CreateJobRequest, JobResponse},
    services::{CascadeService, DelegationService, JobService},
    utils::service_error::ServiceError,
};

/// Create a new job posting, consuming one subscription slot
/// POST /api/v1/jobs
#[utoipa::path(
    post,
    path = "/v1/jobs",
    tag = "Jobs",
    operation_id = "createJob",
    request_body = CreateJobRequest,
    responses(
        (status = 201, description = "Job created", body = JobResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthorized"),
        (status = 402, description = "No usable subscription or quota exhausted")
    ),
    security(("bearerAuth" = []))
)]
pub async fn create_job(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateJobRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let actor = DelegationService::new(state.diesel_pool.clone())
        .resolve_actor(auth_user.user_id)
        .await?;

    let job: JobResponse = JobService::new(state.diesel_pool.clone())
        .create_job(&actor, request)
        .await?;

    Ok((StatusCode::CREATED, Json(job)))
}

/// Delete a job and cascade to its applications and forwarded CVs
/// DELETE /api/v1/jobs/:id
#[utoipa::path(
    delete,
    path = "/v1/jobs/{id}",
    tag = "Jobs",
    operation_id = "deleteJob",
    params(("id" = Uuid, Path, description = "Job id")),
    responses(
        (status = 204, description = "Job deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Job not found")
    ),
    security(("bearerAuth" = []))
)]
pub async fn delete_job(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let actor = DelegationService::new(state.diesel_pool.clone())
        .resolve_actor(auth_user.user_id)
        .await?;

    CascadeService::new(state.diesel_pool.clone(), state.email_service.as_ref().clone())
        .delete_job(&actor, job_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
