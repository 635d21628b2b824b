mod handlers;
mod state;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::Settings;
use crate::roster::Roster;

pub use state::AppState;

pub fn build_router(state: Arc<AppState>, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/salespersons", get(handlers::salespersons))
        .route("/salespersons/nearby", get(handlers::nearby))
        .route("/salespersons/nearest-available", get(handlers::nearest_available))
        .route("/salesperson/location", post(handlers::update_location))
        .route("/salesperson/status", post(handlers::update_status))
        .route("/assign", post(handlers::assign))
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring unparsable CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

pub async fn start(settings: &Settings, roster: Roster) -> std::io::Result<()> {
    let salespeople = roster.len();
    let app = build_router(Arc::new(AppState::new(roster)), &settings.cors_origins);
    let addr = settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(%addr, salespeople, "Lead Radar listening");

    axum::serve(listener, app).await
}
