use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("{entity} {id} not found")]
    Resolution { entity: &'static str, id: String },

    #[error("trip {trip_id} is at capacity: {bound} of {max} deliveries bound")]
    Capacity {
        trip_id: Uuid,
        bound: u32,
        max: u32,
    },

    #[error("illegal {entity} transition: {current} -> {requested}")]
    Transition {
        entity: &'static str,
        current: String,
        requested: String,
    },

    #[error("upload failed: {0}")]
    Upload(String),

    #[error("collaborator unavailable: {0}")]
    Service(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();

        let (status, body) = match &self {
            AppError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": message, "kind": "validation" }),
            ),
            AppError::Resolution { entity, id } => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": message,
                    "kind": "resolution",
                    "entity": entity,
                    "id": id,
                }),
            ),
            AppError::Capacity {
                trip_id,
                bound,
                max,
            } => (
                StatusCode::CONFLICT,
                json!({
                    "error": message,
                    "kind": "capacity",
                    "trip_id": trip_id,
                    "bound": bound,
                    "max": max,
                }),
            ),
            AppError::Transition {
                entity,
                current,
                requested,
            } => (
                StatusCode::CONFLICT,
                json!({
                    "error": message,
                    "kind": "transition",
                    "entity": entity,
                    "current": current,
                    "requested": requested,
                }),
            ),
            AppError::Upload(_) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                json!({ "error": message, "kind": "upload" }),
            ),
            AppError::Service(_) => (
                StatusCode::BAD_GATEWAY,
                json!({ "error": message, "kind": "service" }),
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": message, "kind": "internal" }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
