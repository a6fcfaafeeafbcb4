use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::routing::{get, patch, post};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::api::rest::guard_transition;
use crate::error::AppError;
use crate::lifecycle;
use crate::models::delivery::DeliveryStatus;
use crate::models::trip::{Trip, TripStatus, VehicleType};
use crate::models::user::UserRole;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/trips", post(create_trip).get(list_trips))
        .route("/trips/:id", get(get_trip))
        .route("/trips/:id/status", patch(update_trip_status))
}

#[derive(Deserialize)]
pub struct CreateTripRequest {
    pub actor_id: Uuid,
    pub traveler_id: Uuid,
    pub origin_city: String,
    pub origin_country: String,
    pub destination_city: String,
    pub destination_country: String,
    pub departs_at: DateTime<Utc>,
    pub arrives_at: DateTime<Utc>,
    pub vehicle: VehicleType,
    pub max_packages: u32,
    pub available_volume_m3: f64,
    pub max_weight_kg: f64,
}

async fn create_trip(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateTripRequest>,
) -> Result<Json<Trip>, AppError> {
    state.resolve_user(payload.actor_id)?;

    let traveler = state.resolve_user(payload.traveler_id)?;
    if traveler.role != UserRole::Traveler {
        return Err(AppError::Validation(format!(
            "user {} is not a traveler",
            payload.traveler_id
        )));
    }

    if payload.max_packages == 0 {
        return Err(AppError::Validation(
            "max_packages must be > 0".to_string(),
        ));
    }

    if payload.arrives_at <= payload.departs_at {
        return Err(AppError::Validation(
            "trip must arrive after it departs".to_string(),
        ));
    }

    if payload.available_volume_m3 <= 0.0 || payload.max_weight_kg <= 0.0 {
        return Err(AppError::Validation(
            "volume and weight capacity must be positive".to_string(),
        ));
    }

    let trip = Trip {
        id: Uuid::new_v4(),
        traveler_id: payload.traveler_id,
        origin_city: payload.origin_city,
        origin_country: payload.origin_country,
        destination_city: payload.destination_city,
        destination_country: payload.destination_country,
        departs_at: payload.departs_at,
        arrives_at: payload.arrives_at,
        vehicle: payload.vehicle,
        max_packages: payload.max_packages,
        available_volume_m3: payload.available_volume_m3,
        max_weight_kg: payload.max_weight_kg,
        status: TripStatus::Scheduled,
        created_at: Utc::now(),
    };

    state.trips.insert(trip.id, trip.clone());
    Ok(Json(trip))
}

async fn list_trips(State(state): State<Arc<AppState>>) -> Json<Vec<Trip>> {
    let trips = state.trips.iter().map(|entry| entry.value().clone()).collect();
    Json(trips)
}

async fn get_trip(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Trip>, AppError> {
    let trip = state
        .trips
        .get(&id)
        .ok_or_else(|| AppError::Resolution {
            entity: "trip",
            id: id.to_string(),
        })?;

    Ok(Json(trip.value().clone()))
}

#[derive(Deserialize)]
pub struct UpdateTripStatusRequest {
    pub actor_id: Uuid,
    pub status: TripStatus,
}

#[derive(Serialize)]
pub struct TripStatusResponse {
    pub trip: Trip,
    /// Count of non-terminal deliveries still bound to the trip when
    /// it was completed or canceled; the caller owns the fallout.
    pub active_deliveries: Option<u32>,
}

async fn update_trip_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTripStatusRequest>,
) -> Result<Json<TripStatusResponse>, AppError> {
    state.resolve_user(payload.actor_id)?;

    let mut trip = state
        .trips
        .get_mut(&id)
        .ok_or_else(|| AppError::Resolution {
            entity: "trip",
            id: id.to_string(),
        })?;

    guard_transition(
        &state,
        "trip",
        lifecycle::trip::ensure(trip.status, payload.status),
    )?;

    trip.status = payload.status;

    let active_deliveries = if matches!(
        payload.status,
        TripStatus::Completed | TripStatus::Canceled
    ) {
        let count = state
            .deliveries
            .iter()
            .filter(|entry| {
                entry.value().trip_id == Some(id)
                    && !matches!(
                        entry.value().status,
                        DeliveryStatus::Delivered
                            | DeliveryStatus::Canceled
                            | DeliveryStatus::Failed
                    )
            })
            .count() as u32;

        if count > 0 {
            warn!(
                trip_id = %id,
                status = ?payload.status,
                active_deliveries = count,
                "trip closed with deliveries still bound"
            );
            Some(count)
        } else {
            None
        }
    } else {
        None
    };

    Ok(Json(TripStatusResponse {
        trip: trip.clone(),
        active_deliveries,
    }))
}
