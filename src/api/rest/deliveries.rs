use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::routing::{get, patch, post};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::api::rest::guard_transition;
use crate::engine::assembler::{AssembleDelivery, assemble_delivery, bound_delivery_count};
use crate::error::AppError;
use crate::lifecycle;
use crate::models::delivery::{Address, Delivery, DeliveryEvent, DeliveryStatus};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/deliveries", post(create_delivery).get(list_deliveries))
        .route("/deliveries/:id", get(get_delivery))
        .route(
            "/deliveries/tracking/:tracking_number",
            get(get_delivery_by_tracking),
        )
        .route("/deliveries/:id/status", patch(update_delivery_status))
}

#[derive(Deserialize)]
pub struct CreateDeliveryRequest {
    pub actor_id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub pickup_address: Address,
    pub delivery_address: Address,
    pub pickup_instructions: Option<String>,
    pub delivery_instructions: Option<String>,
    pub trip_id: Option<Uuid>,
    pub package_ids: Vec<Uuid>,
    #[serde(default)]
    pub price_adjustment_pct: i32,
    pub estimated_price: Option<Decimal>,
}

async fn create_delivery(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateDeliveryRequest>,
) -> Result<Json<Delivery>, AppError> {
    let delivery = assemble_delivery(
        &state,
        AssembleDelivery {
            actor_id: payload.actor_id,
            sender_id: payload.sender_id,
            receiver_id: payload.receiver_id,
            pickup_address: payload.pickup_address,
            delivery_address: payload.delivery_address,
            pickup_instructions: payload.pickup_instructions,
            delivery_instructions: payload.delivery_instructions,
            trip_id: payload.trip_id,
            package_ids: payload.package_ids,
            price_adjustment_pct: payload.price_adjustment_pct,
            estimated_price: payload.estimated_price,
        },
    )?;

    Ok(Json(delivery))
}

async fn list_deliveries(State(state): State<Arc<AppState>>) -> Json<Vec<Delivery>> {
    let deliveries = state
        .deliveries
        .iter()
        .map(|entry| entry.value().clone())
        .collect();

    Json(deliveries)
}

async fn get_delivery(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Delivery>, AppError> {
    let delivery = state
        .deliveries
        .get(&id)
        .ok_or_else(|| AppError::Resolution {
            entity: "delivery",
            id: id.to_string(),
        })?;

    Ok(Json(delivery.value().clone()))
}

async fn get_delivery_by_tracking(
    State(state): State<Arc<AppState>>,
    Path(tracking_number): Path<String>,
) -> Result<Json<Delivery>, AppError> {
    let delivery = state
        .deliveries
        .iter()
        .find(|entry| entry.value().tracking_number == tracking_number)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| AppError::Resolution {
            entity: "delivery",
            id: tracking_number.clone(),
        })?;

    Ok(Json(delivery))
}

#[derive(Deserialize)]
pub struct UpdateDeliveryStatusRequest {
    pub actor_id: Uuid,
    pub status: DeliveryStatus,
}

fn is_terminal(status: DeliveryStatus) -> bool {
    matches!(
        status,
        DeliveryStatus::Delivered | DeliveryStatus::Canceled | DeliveryStatus::Failed
    )
}

async fn update_delivery_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDeliveryStatusRequest>,
) -> Result<Json<Delivery>, AppError> {
    state.resolve_user(payload.actor_id)?;

    let updated = {
        let mut delivery = state
            .deliveries
            .get_mut(&id)
            .ok_or_else(|| AppError::Resolution {
                entity: "delivery",
                id: id.to_string(),
            })?;

        guard_transition(
            &state,
            "delivery",
            lifecycle::delivery::ensure(delivery.status, payload.status),
        )?;

        delivery.status = payload.status;
        delivery.updated_at = Utc::now();
        delivery.clone()
    };

    if is_terminal(updated.status) {
        state.metrics.active_deliveries.dec();
    }

    // A canceled delivery frees a slot on its trip.
    if updated.status == DeliveryStatus::Canceled {
        if let Some(trip_id) = updated.trip_id {
            if let Some(trip) = state.trips.get(&trip_id) {
                let utilization =
                    bound_delivery_count(&state, trip_id) as f64 / trip.max_packages as f64;
                state
                    .metrics
                    .trip_utilization
                    .with_label_values(&[&trip_id.to_string()])
                    .set(utilization);
            }
        }
    }

    let _ = state.delivery_events_tx.send(DeliveryEvent {
        delivery_id: updated.id,
        tracking_number: updated.tracking_number.clone(),
        status: updated.status,
        occurred_at: updated.updated_at,
    });

    info!(
        delivery_id = %updated.id,
        status = ?updated.status,
        actor_id = %payload.actor_id,
        "delivery status updated"
    );

    Ok(Json(updated))
}
