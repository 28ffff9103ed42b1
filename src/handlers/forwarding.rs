// Forwarded CV handlers for sub-employer review

use axum::{
    extract::{Extension, Path, State},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    app::AppState,
    middleware::auth::AuthenticatedUser,
    models::forwarded_cv::{ForwardedCvResponse, ForwardingActionRequest},
    services::{DelegationService, ForwardingService},
    utils::service_error::ServiceError,
};

/// Fetch a forwarded CV, stamping viewed_at on first read
/// GET /api/v1/forwarded-cvs/:id
#[utoipa::path(
    get,
    path = "/v1/forwarded-cvs/{id}",
    tag = "Forwarding",
    operation_id = "viewForwardedCv",
    params(("id" = Uuid, Path, description = "Forwarded CV id")),
    responses(
        (status = 200, description = "Forwarded CV", body = ForwardedCvResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Forwarded CV not found")
    ),
    security(("bearerAuth" = []))
)]
pub async fn view(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(forwarding_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let actor = DelegationService::new(state.diesel_pool.clone())
        .resolve_actor(auth_user.user_id)
        .await?;

    let forwarding: ForwardedCvResponse = ForwardingService::new(state.diesel_pool.clone())
        .view(&actor, forwarding_id)
        .await?;

    Ok(Json(forwarding))
}

/// Accept or reject a forwarded CV
/// PUT /api/v1/forwarded-cvs/:id
#[utoipa::path(
    put,
    path = "/v1/forwarded-cvs/{id}",
    tag = "Forwarding",
    operation_id = "actOnForwardedCv",
    params(("id" = Uuid, Path, description = "Forwarded CV id")),
    request_body = ForwardingActionRequest,
    responses(
        (status = 200, description = "Action recorded", body = ForwardedCvResponse),
        (status = 400, description = "Invalid action or already terminal"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Forwarded CV not found")
    ),
    security(("bearerAuth" = []))
)]
pub async fn act(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(forwarding_id): Path<Uuid>,
    Json(request): Json<ForwardingActionRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let actor = DelegationService::new(state.diesel_pool.clone())
        .resolve_actor(auth_user.user_id)
        .await?;

    let forwarding = ForwardingService::new(state.diesel_pool.clone())
        .act(&actor, forwarding_id, request.status)
        .await?;

    Ok(Json(forwarding))
}
