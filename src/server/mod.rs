pub mod handlers;
pub mod types;

pub use handlers::AppState;

use crate::{
    Result,
    analysis::AnalysisRelay,
    config::Config,
    llm::{LlmClient, OpenAiClient},
    upload,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::{net::SocketAddr, path::Path, sync::Arc};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

/// Builds the application router.
///
/// `/api/*` is handled here; every other path is served from `static_dir`,
/// with unknown paths answered by its `index.html`.
pub fn router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    let static_dir = static_dir.as_ref();
    let assets =
        ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    let api = Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/analyze",
            post(handlers::analyze).layer(DefaultBodyLimit::max(upload::request_body_limit())),
        )
        .fallback(handlers::api_not_found)
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .fallback_service(assets)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(handlers::handle_panic)),
        )
}

pub async fn run(config: Config) -> Result<()> {
    let client = OpenAiClient::from_config(&config.llm)
        .map(|client| Arc::new(client) as Arc<dyn LlmClient>);
    let relay = AnalysisRelay::new(client);

    if !relay.is_configured() {
        warn!("OPENAI_API_KEY is not set; /api/analyze will answer 500 until it is configured");
    }

    let app_state = AppState {
        relay,
        environment: config.server.environment,
    };

    let app = router(app_state, &config.server.static_dir);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!(
        "Starting server on {} ({:?} mode, static assets from {})",
        addr,
        config.server.environment,
        config.server.static_dir.display()
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
