// HirePath Backend Core entrypoint

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hirepath_backend_core::{app_config, build_router, initialize_app_state};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(&app_config::config().rust_log)
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = initialize_app_state().await?;
    let bind_address = state.config.bind_address.clone();
    let environment = state.config.environment.clone();

    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!(
        "HirePath backend listening on {} ({})",
        bind_address, environment
    );

    axum::serve(listener, router).await?;

    Ok(())
}
