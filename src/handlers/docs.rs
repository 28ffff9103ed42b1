// API documentation endpoints
// The OpenAPI spec is derived from the handler annotations; the UI page is
// served as embedded HTML pointing at the JSON spec.

use axum::{
    http::header,
    response::{Html, IntoResponse},
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::{handlers, models};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HirePath Core API",
        description = "Job marketplace backend core: subscriptions, applications, delegation, forwarding and cascade deletion",
        version = "1.0.0"
    ),
    paths(
        handlers::users::register_employer,
        handlers::users::delete_user,
        handlers::jobs::create_job,
        handlers::jobs::delete_job,
        handlers::applications::apply,
        handlers::applications::transition,
        handlers::applications::schedule_meeting,
        handlers::applications::forward,
        handlers::applications::withdraw,
        handlers::applications::delete_application,
        handlers::forwarding::view,
        handlers::forwarding::act,
        handlers::sub_employers::create_sub_employer,
        handlers::subscriptions::get_active_subscription,
        handlers::subscriptions::renew_subscription,
        handlers::subscriptions::cancel_subscription,
    ),
    components(schemas(
        models::user::RegisterEmployerRequest,
        models::user::UserResponse,
        models::job::CreateJobRequest,
        models::job::JobResponse,
        models::application::ApplicationStatus,
        models::application::TransitionRequest,
        models::application::ScheduleMeetingRequest,
        models::application::Meeting,
        models::application::ApplicationResponse,
        models::forwarded_cv::ForwardingStatus,
        models::forwarded_cv::ForwardApplicationRequest,
        models::forwarded_cv::ForwardingActionRequest,
        models::forwarded_cv::ForwardedCvResponse,
        models::sub_employer::DashboardPermission,
        models::sub_employer::CreateSubEmployerRequest,
        models::sub_employer::SubEmployerResponse,
        models::subscription::RenewSubscriptionRequest,
        models::subscription::SubscriptionResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "Users", description = "Account registration and removal"),
        (name = "Jobs", description = "Job posting lifecycle"),
        (name = "Applications", description = "Application lifecycle and review"),
        (name = "Forwarding", description = "CV forwarding to sub-employers"),
        (name = "SubEmployers", description = "Delegated reviewer accounts"),
        (name = "Subscriptions", description = "Subscription ledger")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Serve OpenAPI JSON specification at /v1/docs/openapi.json
pub async fn serve_openapi_spec() -> impl IntoResponse {
    let spec = ApiDoc::openapi()
        .to_json()
        .unwrap_or_else(|_| "{}".to_string());

    ([(header::CONTENT_TYPE, "application/json")], spec)
}

/// Serve Swagger UI HTML at /v1/docs
pub async fn serve_swagger_ui() -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}

// Embedded Swagger UI HTML
const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>HirePath API Documentation</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5.9.0/swagger-ui.css" />
    <style>
        body {
            margin: 0;
            padding: 0;
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
        }
        #swagger-ui {
            max-width: 1460px;
            margin: 0 auto;
            padding: 20px;
        }
        .topbar {
            display: none;
        }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5.9.0/swagger-ui-bundle.js"></script>
    <script>
        window.onload = () => {
            SwaggerUIBundle({
                url: 'openapi.json',
                dom_id: '#swagger-ui',
                presets: [SwaggerUIBundle.presets.apis],
                layout: 'BaseLayout',
                deepLinking: true,
                tryItOutEnabled: true
            });
        };
    </script>
</body>
</html>"#;
