use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Multipart, Path, Query, State};
use axum::routing::{get, patch, post};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::api::rest::guard_transition;
use crate::engine::estimator::estimate_price;
use crate::error::AppError;
use crate::lifecycle;
use crate::media::{AttachOutcome, RejectedImage};
use crate::models::package::{Package, PackageCategory, PackageStatus, SizeCategory};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/packages/estimate", post(estimate_package))
        .route("/packages/:id", get(get_package))
        .route("/packages/:id/status", patch(update_package_status))
        .route("/packages/:id/images", post(attach_images))
}

#[derive(Deserialize)]
pub struct EstimatePackageRequest {
    pub actor_id: Uuid,
    pub description: String,
    pub weight_kg: f64,
    pub size: SizeCategory,
    pub category: PackageCategory,
    #[serde(default)]
    pub fragile: bool,
    pub special_instructions: Option<String>,
}

/// Estimates a price and persists a fresh package record. Two calls
/// with the same attributes create two records.
async fn estimate_package(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<EstimatePackageRequest>,
) -> Result<Json<Package>, AppError> {
    state.resolve_user(payload.actor_id)?;

    let estimated_price = match estimate_price(
        payload.weight_kg,
        payload.size,
        payload.category,
        payload.fragile,
    ) {
        Ok(price) => {
            state
                .metrics
                .estimates_total
                .with_label_values(&["success"])
                .inc();
            price
        }
        Err(err) => {
            state
                .metrics
                .estimates_total
                .with_label_values(&["error"])
                .inc();
            return Err(err);
        }
    };

    let package = Package {
        id: Uuid::new_v4(),
        delivery_id: None,
        description: payload.description,
        weight_kg: payload.weight_kg,
        size: payload.size,
        category: payload.category,
        fragile: payload.fragile,
        images: Vec::new(),
        special_instructions: payload.special_instructions,
        estimated_price,
        status: PackageStatus::Pending,
        created_at: Utc::now(),
    };

    state.packages.insert(package.id, package.clone());

    info!(
        package_id = %package.id,
        actor_id = %payload.actor_id,
        price = %package.estimated_price,
        "package estimated"
    );

    Ok(Json(package))
}

async fn get_package(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Package>, AppError> {
    let package = state
        .packages
        .get(&id)
        .ok_or_else(|| AppError::Resolution {
            entity: "package",
            id: id.to_string(),
        })?;

    Ok(Json(package.value().clone()))
}

#[derive(Deserialize)]
pub struct UpdatePackageStatusRequest {
    pub actor_id: Uuid,
    pub status: PackageStatus,
}

async fn update_package_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePackageStatusRequest>,
) -> Result<Json<Package>, AppError> {
    state.resolve_user(payload.actor_id)?;

    let mut package = state
        .packages
        .get_mut(&id)
        .ok_or_else(|| AppError::Resolution {
            entity: "package",
            id: id.to_string(),
        })?;

    guard_transition(
        &state,
        "package",
        lifecycle::package::ensure(package.status, payload.status),
    )?;

    package.status = payload.status;
    Ok(Json(package.clone()))
}

#[derive(Deserialize)]
pub struct AttachImagesQuery {
    pub actor_id: Uuid,
}

/// Attaches uploaded images to a package, one multipart part per
/// image. Oversized parts are rejected individually; the rest of the
/// batch still goes through.
async fn attach_images(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(query): Query<AttachImagesQuery>,
    mut multipart: Multipart,
) -> Result<Json<AttachOutcome>, AppError> {
    state.resolve_user(query.actor_id)?;

    if !state.packages.contains_key(&id) {
        return Err(AppError::Resolution {
            entity: "package",
            id: id.to_string(),
        });
    }

    let mut outcome = AttachOutcome {
        attached: Vec::new(),
        rejected: Vec::new(),
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::Upload(format!("malformed multipart body: {err}")))?
    {
        let title = field
            .file_name()
            .or(field.name())
            .unwrap_or("untitled")
            .to_string();
        let content_type = field.content_type().map(str::to_string);

        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(err) => {
                state
                    .metrics
                    .images_total
                    .with_label_values(&["rejected"])
                    .inc();
                outcome.rejected.push(RejectedImage {
                    title,
                    error: err.to_string(),
                });
                continue;
            }
        };

        match state.media.store(&title, content_type, bytes.to_vec()) {
            Ok(image_ref) => {
                if let Some(mut package) = state.packages.get_mut(&id) {
                    package.images.push(image_ref.clone());
                }
                state
                    .metrics
                    .images_total
                    .with_label_values(&["attached"])
                    .inc();
                outcome.attached.push(image_ref);
            }
            Err(err) => {
                state
                    .metrics
                    .images_total
                    .with_label_values(&["rejected"])
                    .inc();
                outcome.rejected.push(RejectedImage {
                    title,
                    error: err.to_string(),
                });
            }
        }
    }

    info!(
        package_id = %id,
        attached = outcome.attached.len(),
        rejected = outcome.rejected.len(),
        "image attachment finished"
    );

    Ok(Json(outcome))
}
