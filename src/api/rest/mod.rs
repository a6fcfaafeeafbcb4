pub mod deliveries;
pub mod invoices;
pub mod packages;
pub mod trips;
pub mod users;
pub mod ws;

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::routing::get;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

/// Whole-request ceiling; individual images are checked against the
/// configured per-file limit when they are stored.
const MAX_REQUEST_BODY_BYTES: usize = 32 * 1024 * 1024;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(users::router())
        .merge(packages::router())
        .merge(deliveries::router())
        .merge(trips::router())
        .merge(invoices::router())
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/media/:id", get(serve_media))
        .route("/ws", get(ws::ws_handler))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Applies the transition metric for an entity and passes the guard
/// result through unchanged.
pub(crate) fn guard_transition(
    state: &AppState,
    entity: &'static str,
    check: Result<(), AppError>,
) -> Result<(), AppError> {
    let outcome = if check.is_ok() { "applied" } else { "rejected" };
    state
        .metrics
        .transitions_total
        .with_label_values(&[entity, outcome])
        .inc();
    check
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    users: usize,
    packages: usize,
    deliveries: usize,
    trips: usize,
    invoices: usize,
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        users: state.users.len(),
        packages: state.packages.len(),
        deliveries: state.deliveries.len(),
        trips: state.trips.len(),
        invoices: state.invoices.len(),
    })
}

async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err).into_response(),
    }
}

async fn serve_media(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let image = state
        .media
        .get(&id)
        .ok_or_else(|| AppError::Resolution {
            entity: "image",
            id: id.to_string(),
        })?;

    let content_type = image
        .content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());

    Ok(([(CONTENT_TYPE, content_type)], image.bytes))
}
