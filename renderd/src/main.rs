use std::sync::Arc;

use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use renderd::{api, config::Config, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "renderd=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    info!(port = config.port, "renderd starting");
    info!(command = %config.engine_command.join(" "), "generation engine configured");
    info!(command = %config.validator_command.join(" "), "validation engine configured");

    // Produced images are served from here; the engine writes them, this
    // service only hands out their URL.
    tokio::fs::create_dir_all(&config.outputs_dir).await?;
    let outputs_dir = config.outputs_dir.clone();

    let state = Arc::new(AppState { config });

    let app = api::router()
        .nest_service("/outputs", ServeDir::new(outputs_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::clone(&state));

    let addr = format!("0.0.0.0:{}", state.config.port);
    info!("listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
