use mimalloc::MiMalloc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wayfinder::{config, routes, state};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wayfinder=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from_env();
    let state = state::AppState::new(config.clone());

    // Idle trips expire in the store; the sweep reclaims their memory.
    let eviction_state = state.clone();
    let eviction_interval = config.eviction_interval;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(eviction_interval);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            eviction_state.evict_expired();
        }
    });

    let app = Router::new()
        .merge(routes::health::router())
        .merge(routes::trips::router())
        .merge(routes::arrival::router())
        .merge(routes::location::router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(axum::extract::DefaultBodyLimit::max(config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Wayfinder listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("Plan trip: POST http://{}/api/transit/trips", addr);
    tracing::info!("Progress: POST http://{}/api/transit/trips/:trip_id/progress", addr);

    axum::serve(listener, app).await
}
