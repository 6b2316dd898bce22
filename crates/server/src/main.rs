use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use server_api::{list_centers, list_microscopes, ApiContext};
use shared::{
    error::ApiError,
    protocol::{CenterQuery, LookupResponse, MICROSCOPE_LOOKUP_ROUTE},
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;

use app_state::AppState;
use config::{load_catalog, load_settings};

const CENTER_LOOKUP_ROUTE: &str = "/_get_centers/";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let catalog = load_catalog(&settings).map_err(|error| {
        error!(%error, "failed to load facility catalog");
        error
    })?;
    let api = ApiContext {
        catalog: Arc::new(catalog),
        default_center: settings.default_center,
    };
    let app = build_router(Arc::new(AppState { api }));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "lookup server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(MICROSCOPE_LOOKUP_ROUTE, get(http_get_microscopes))
        .route(CENTER_LOOKUP_ROUTE, get(http_get_centers))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_get_microscopes(
    State(state): State<Arc<AppState>>,
    Query(q): Query<CenterQuery>,
) -> Result<Json<LookupResponse>, (StatusCode, Json<ApiError>)> {
    let response = list_microscopes(&state.api, q.center.as_deref()).map_err(|e| {
        (
            StatusCode::from_u16(e.code.http_status()).unwrap_or(StatusCode::BAD_REQUEST),
            Json(e),
        )
    })?;
    Ok(Json(response))
}

async fn http_get_centers(State(state): State<Arc<AppState>>) -> Json<LookupResponse> {
    Json(list_centers(&state.api))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
