// Library exports for HirePath Backend Core
// This file exposes modules and functions for library consumers

pub mod app;
pub mod app_config;
pub mod db;
pub mod handlers;
pub mod middleware;
pub mod migrations;
pub mod models;
pub mod schema;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use app::AppState;
pub use app_config::{AppConfig, CONFIG};
pub use db::DieselPool;
pub use middleware::{auth_middleware, AuthenticatedUser};
pub use services::{
    Actor, ActorKind, ApplicationService, CascadeService, DelegationService, EmailService,
    ForwardingService, JobService, JwtService, SubscriptionService, UserService,
};
pub use utils::ServiceError;

// Re-export handler route builders
pub use handlers::{
    application_routes, docs_routes, forwarding_routes, job_routes, public_routes,
    sub_employer_routes, subscription_routes, user_routes,
};

// Library initialization function for external consumers
pub async fn initialize_app_state() -> Result<AppState, Box<dyn std::error::Error>> {
    use std::sync::Arc;
    use tracing::info;

    // Load environment
    dotenv::dotenv().ok();

    // Initialize config
    let config = app_config::config();

    // Initialize database pool
    info!("Initializing database pool...");
    let db_config = db::DieselDatabaseConfig::default();
    let max_connections = db_config.max_connections;
    let diesel_pool = db::create_diesel_pool(db_config).await?;

    // Run migrations if enabled
    if migrations::should_run_migrations() {
        info!("Running embedded migrations...");
        let migration_config = migrations::MigrationConfig::default();
        migrations::run_all_migrations(&diesel_pool, migration_config)
            .await
            .map_err(|e| format!("Migration failed: {}", e))?;
    }

    // Initialize services
    let jwt_service = Arc::new(JwtService::from_env()?);
    let email_service = Arc::new(EmailService::new(config.email.clone())?);

    Ok(AppState {
        config: Arc::new(config.clone()),
        diesel_pool,
        jwt_service,
        email_service,
        max_connections,
    })
}

/// Assemble the full API router with auth applied to protected routes
pub fn build_router(state: AppState) -> axum::Router {
    use axum::middleware::from_fn_with_state;
    use axum::routing::get;
    use tower_http::trace::TraceLayer;

    let protected = axum::Router::new()
        .merge(user_routes())
        .merge(job_routes())
        .merge(application_routes())
        .merge(forwarding_routes())
        .merge(sub_employer_routes())
        .merge(subscription_routes())
        .layer(from_fn_with_state(state.clone(), auth_middleware));

    let mut api = axum::Router::new().merge(public_routes()).merge(protected);

    if state.config.enable_swagger_ui {
        api = api.merge(docs_routes());
    }

    axum::Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api)
        .layer(middleware::cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Health check handler
pub async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    use axum::http::StatusCode;
    use axum::Json;

    let timestamp = chrono::Utc::now().to_rfc3339();

    // Check PostgreSQL
    let (overall_healthy, postgres_health) = match db::check_diesel_health(&state.diesel_pool)
        .await
    {
        Ok(_) => (
            true,
            serde_json::json!({
                "status": "healthy",
                "max_connections": state.max_connections,
                "error": null
            }),
        ),
        Err(e) => (
            false,
            serde_json::json!({
                "status": "unhealthy",
                "error": format!("Database connection failed: {}", e)
            }),
        ),
    };

    let response = serde_json::json!({
        "status": if overall_healthy { "healthy" } else { "degraded" },
        "service": "hirepath-backend",
        "timestamp": timestamp,
        "components": {
            "postgresql": postgres_health
        }
    });

    if overall_healthy {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}
