// Sub-employer management handlers

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    app::AppState,
    middleware::auth::AuthenticatedUser,
    models::sub_employer::{CreateSubEmployerRequest, SubEmployerResponse},
    services::DelegationService,
    utils::service_error::ServiceError,
};

/// Create a sub-employer account under the calling employer
/// POST /api/v1/sub-employers
#[utoipa::path(
    post,
    path = "/v1/sub-employers",
    tag = "SubEmployers",
    operation_id = "createSubEmployer",
    request_body = CreateSubEmployerRequest,
    responses(
        (status = 201, description = "Sub-employer created", body = SubEmployerResponse),
        (status = 400, description = "Validation failed or caller is not an employer"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Email already in use")
    ),
    security(("bearerAuth" = []))
)]
pub async fn create_sub_employer(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateSubEmployerRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    request.validate()?;

    let sub_employer: SubEmployerResponse = DelegationService::new(state.diesel_pool.clone())
        .create_sub_employer(auth_user.user_id, request)
        .await?;

    Ok((StatusCode::CREATED, Json(sub_employer)))
}
