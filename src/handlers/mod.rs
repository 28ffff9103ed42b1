// HTTP handlers for the marketplace core

pub mod applications;
pub mod docs;
pub mod forwarding;
pub mod jobs;
pub mod sub_employers;
pub mod subscriptions;
pub mod users;

use crate::app::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};

// Public routes (no authentication)
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/users/employers", post(users::register_employer))
}

// User account routes
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/users/{id}", delete(users::delete_user))
}

// Job posting routes
pub fn job_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", post(jobs::create_job))
        .route("/jobs/{id}", delete(jobs::delete_job))
        .route("/jobs/{id}/applications", post(applications::apply))
}

// Application lifecycle routes
pub fn application_routes() -> Router<AppState> {
    Router::new()
        .route("/applications/{id}/status", put(applications::transition))
        .route("/applications/{id}/meeting", put(applications::schedule_meeting))
        .route("/applications/{id}/forward", post(applications::forward))
        .route("/applications/{id}/withdraw", post(applications::withdraw))
        .route("/applications/{id}", delete(applications::delete_application))
}

// Forwarded CV routes for sub-employers
pub fn forwarding_routes() -> Router<AppState> {
    Router::new().route(
        "/forwarded-cvs/{id}",
        get(forwarding::view).put(forwarding::act),
    )
}

// Sub-employer management routes
pub fn sub_employer_routes() -> Router<AppState> {
    Router::new().route("/sub-employers", post(sub_employers::create_sub_employer))
}

// Subscription ledger routes
pub fn subscription_routes() -> Router<AppState> {
    Router::new()
        .route("/subscriptions/me", get(subscriptions::get_active_subscription))
        .route("/subscriptions/renew", post(subscriptions::renew_subscription))
        .route("/subscriptions/cancel", post(subscriptions::cancel_subscription))
}

// API documentation routes
pub fn docs_routes() -> Router<AppState> {
    Router::new()
        .route("/docs", get(docs::serve_swagger_ui))
        .route("/docs/openapi.json", get(docs::serve_openapi_spec))
}
