// Application lifecycle handlers

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
    models::{
        application::{ApplicationResponse, ScheduleMeetingRequest, TransitionRequest},
        forwarded_cv::{ForwardApplicationRequest, ForwardedCvResponse},
    },
    services::{ApplicationService, CascadeService, DelegationService, ForwardingService},
    utils::service_error::ServiceError,
};

/// Candidate applies to a job
/// POST /api/v1/jobs/:id/applications
#[utoipa::path(
    post,
    path = "/v1/jobs/{id}/applications",
    tag = "Applications",
    operation_id = "applyToJob",
    params(("id" = Uuid, Path, description = "Job id")),
    responses(
        (status = 201, description = "Application created", body = ApplicationResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Job not found"),
        (status = 409, description = "Already applied to this job")
    ),
    security(("bearerAuth" = []))
)]
pub async fn apply(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let application: ApplicationResponse = ApplicationService::new(
        state.diesel_pool.clone(),
        state.email_service.as_ref().clone(),
    )
    .apply(auth_user.user_id, job_id)
    .await?;

    Ok((StatusCode::CREATED, Json(application)))
}

/// Shortlist or reject an application
/// PUT /api/v1/applications/:id/status
#[utoipa::path(
    put,
    path = "/v1/applications/{id}/status",
    tag = "Applications",
    operation_id = "transitionApplication",
    params(("id" = Uuid, Path, description = "Application id")),
    request_body = TransitionRequest,
    responses(
        (status = 200, description = "Application transitioned", body = ApplicationResponse),
        (status = 400, description = "Invalid target status"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Application not found")
    ),
    security(("bearerAuth" = []))
)]
pub async fn transition(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(application_id): Path<Uuid>,
    Json(request): Json<TransitionRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let actor = DelegationService::new(state.diesel_pool.clone())
        .resolve_actor(auth_user.user_id)
        .await?;

    let application: ApplicationResponse = ApplicationService::new(
        state.diesel_pool.clone(),
        state.email_service.as_ref().clone(),
    )
    .transition(&actor, application_id, request.status)
    .await?;

    Ok(Json(application))
}

/// Schedule or replace the interview meeting on an application
/// PUT /api/v1/applications/:id/meeting
#[utoipa::path(
    put,
    path = "/v1/applications/{id}/meeting",
    tag = "Applications",
    operation_id = "scheduleMeeting",
    params(("id" = Uuid, Path, description = "Application id")),
    request_body = ScheduleMeetingRequest,
    responses(
        (status = 200, description = "Meeting scheduled", body = ApplicationResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Application not found")
    ),
    security(("bearerAuth" = []))
)]
pub async fn schedule_meeting(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(application_id): Path<Uuid>,
    Json(request): Json<ScheduleMeetingRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let actor = DelegationService::new(state.diesel_pool.clone())
        .resolve_actor(auth_user.user_id)
        .await?;

    let application: ApplicationResponse = ApplicationService::new(
        state.diesel_pool.clone(),
        state.email_service.as_ref().clone(),
    )
    .schedule_meeting(&actor, application_id, request)
    .await?;

    Ok(Json(application))
}

/// Forward an application to sub-employers for review
/// POST /api/v1/applications/:id/forward
#[utoipa::path(
    post,
    path = "/v1/applications/{id}/forward",
    tag = "Applications",
    operation_id = "forwardApplication",
    params(("id" = Uuid, Path, description = "Application id")),
    request_body = ForwardApplicationRequest,
    responses(
        (status = 201, description = "Forwarded", body = [ForwardedCvResponse]),
        (status = 400, description = "No targets given"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Application not found")
    ),
    security(("bearerAuth" = []))
)]
pub async fn forward(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(application_id): Path<Uuid>,
    Json(request): Json<ForwardApplicationRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let actor = DelegationService::new(state.diesel_pool.clone())
        .resolve_actor(auth_user.user_id)
        .await?;

    let forwarded: Vec<ForwardedCvResponse> = ForwardingService::new(state.diesel_pool.clone())
        .forward(&actor, application_id, request.sub_employer_ids, request.notes)
        .await?;

    Ok((StatusCode::CREATED, Json(forwarded)))
}

/// Candidate withdraws their own application
/// POST /api/v1/applications/:id/withdraw
#[utoipa::path(
    post,
    path = "/v1/applications/{id}/withdraw",
    tag = "Applications",
    operation_id = "withdrawApplication",
    params(("id" = Uuid, Path, description = "Application id")),
    responses(
        (status = 204, description = "Application withdrawn"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Application not found")
    ),
    security(("bearerAuth" = []))
)]
pub async fn withdraw(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(application_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    CascadeService::new(state.diesel_pool.clone(), state.email_service.as_ref().clone())
        .withdraw_application(auth_user.user_id, application_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Reviewer-side application deletion
/// DELETE /api/v1/applications/:id
#[utoipa::path(
    delete,
    path = "/v1/applications/{id}",
    tag = "Applications",
    operation_id = "deleteApplication",
    params(("id" = Uuid, Path, description = "Application id")),
    responses(
        (status = 204, description = "Application deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Application not found")
    ),
    security(("bearerAuth" = []))
)]
pub async fn delete_application(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(application_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let actor = DelegationService::new(state.diesel_pool.clone())
        .resolve_actor(auth_user.user_id)
        .await?;

    CascadeService::new(state.diesel_pool.clone(), state.email_service.as_ref().clone())
        .delete_application(&actor, application_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
