// Subscription ledger handlers
// All three operate on the calling employer's own subscription; sub-employer
// logins are resolved to their parent first.

use axum::{
    extract::{Extension, State},
    response::IntoResponse,
    Json,
};

use crate::{
    app::AppState,
    middleware::auth::AuthenticatedUser,
    models::subscription::{RenewSubscriptionRequest, SubscriptionResponse},
    services::{DelegationService, SubscriptionService},
    utils::service_error::ServiceError,
};

/// Current subscription state for the calling employer
/// GET /api/v1/subscriptions/me
#[utoipa::path(
    get,
    path = "/v1/subscriptions/me",
    tag = "Subscriptions",
    operation_id = "getActiveSubscription",
    responses(
        (status = 200, description = "Subscription state", body = SubscriptionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 402, description = "No subscription on record")
    ),
    security(("bearerAuth" = []))
)]
pub async fn get_active_subscription(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, ServiceError> {
    let actor = DelegationService::new(state.diesel_pool.clone())
        .resolve_actor(auth_user.user_id)
        .await?;

    let subscription: SubscriptionResponse = SubscriptionService::new(state.diesel_pool.clone())
        .get_active_subscription(actor.employer_id)
        .await?;

    Ok(Json(subscription))
}

/// Renew the subscription onto a plan, adding its quota
/// POST /api/v1/subscriptions/renew
#[utoipa::path(
    post,
    path = "/v1/subscriptions/renew",
    tag = "Subscriptions",
    operation_id = "renewSubscription",
    request_body = RenewSubscriptionRequest,
    responses(
        (status = 200, description = "Subscription renewed", body = SubscriptionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 402, description = "No subscription on record"),
        (status = 404, description = "Plan not found")
    ),
    security(("bearerAuth" = []))
)]
pub async fn renew_subscription(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Json(request): Json<RenewSubscriptionRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let actor = DelegationService::new(state.diesel_pool.clone())
        .resolve_actor(auth_user.user_id)
        .await?;

    let subscription = SubscriptionService::new(state.diesel_pool.clone())
        .renew(actor.employer_id, request.plan_id)
        .await?;

    Ok(Json(subscription))
}

/// Deactivate the subscription
/// POST /api/v1/subscriptions/cancel
#[utoipa::path(
    post,
    path = "/v1/subscriptions/cancel",
    tag = "Subscriptions",
    operation_id = "cancelSubscription",
    responses(
        (status = 200, description = "Subscription cancelled", body = SubscriptionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 402, description = "No subscription on record")
    ),
    security(("bearerAuth" = []))
)]
pub async fn cancel_subscription(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, ServiceError> {
    let actor = DelegationService::new(state.diesel_pool.clone())
        .resolve_actor(auth_user.user_id)
        .await?;

    let subscription = SubscriptionService::new(state.diesel_pool.clone())
        .cancel(actor.employer_id)
        .await?;

    Ok(Json(subscription))
}
