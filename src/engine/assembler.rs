use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::engine::adjustment::apply_adjustment;
use crate::error::AppError;
use crate::models::delivery::{Address, Delivery, DeliveryEvent, DeliveryStatus};
use crate::models::package::PackageStatus;
use crate::models::trip::TripStatus;
use crate::state::AppState;

pub struct AssembleDelivery {
    pub actor_id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub pickup_address: Address,
    pub delivery_address: Address,
    pub pickup_instructions: Option<String>,
    pub delivery_instructions: Option<String>,
    pub trip_id: Option<Uuid>,
    pub package_ids: Vec<Uuid>,
    pub price_adjustment_pct: i32,
    /// Caller's view of the final price; cross-checked against the
    /// server-side computation when present.
    pub estimated_price: Option<Decimal>,
}

pub fn generate_tracking_number() -> String {
    format!("TRK-{}", Uuid::new_v4().simple()).to_uppercase()
}

/// Deliveries bound to a trip, canceled ones excluded.
pub fn bound_delivery_count(state: &AppState, trip_id: Uuid) -> u32 {
    state
        .deliveries
        .iter()
        .filter(|entry| {
            entry.value().trip_id == Some(trip_id)
                && entry.value().status != DeliveryStatus::Canceled
        })
        .count() as u32
}

pub fn assemble_delivery(
    state: &AppState,
    request: AssembleDelivery,
) -> Result<Delivery, AppError> {
    let start = Instant::now();
    let result = try_assemble(state, request);
    let elapsed = start.elapsed().as_secs_f64();

    match &result {
        Ok(delivery) => {
            state
                .metrics
                .delivery_creation_seconds
                .with_label_values(&["success"])
                .observe(elapsed);
            info!(
                delivery_id = %delivery.id,
                tracking_number = %delivery.tracking_number,
                packages = delivery.package_ids.len(),
                "delivery created"
            );
        }
        Err(err) => {
            state
                .metrics
                .delivery_creation_seconds
                .with_label_values(&["error"])
                .observe(elapsed);
            warn!(error = %err, "delivery assembly rejected");
        }
    }

    result
}

fn try_assemble(state: &AppState, request: AssembleDelivery) -> Result<Delivery, AppError> {
    if request.package_ids.is_empty() {
        return Err(AppError::Validation(
            "a delivery needs at least one package".to_string(),
        ));
    }

    if request.pickup_address.street.trim().is_empty() {
        return Err(AppError::Validation(
            "pickup address must have a street line".to_string(),
        ));
    }

    if request.delivery_address.street.trim().is_empty() {
        return Err(AppError::Validation(
            "delivery address must have a street line".to_string(),
        ));
    }

    state.resolve_user(request.actor_id)?;
    state.resolve_user(request.sender_id)?;
    state.resolve_user(request.receiver_id)?;

    let mut suggested = Decimal::ZERO;
    for package_id in &request.package_ids {
        let package = state
            .packages
            .get(package_id)
            .ok_or_else(|| AppError::Resolution {
                entity: "package",
                id: package_id.to_string(),
            })?;

        if package.delivery_id.is_some() {
            return Err(AppError::Validation(format!(
                "package {package_id} is already bound to a delivery"
            )));
        }
        if package.status == PackageStatus::Canceled {
            return Err(AppError::Validation(format!(
                "package {package_id} is canceled"
            )));
        }

        suggested += package.estimated_price;
    }

    // Holding the trip entry mutably serializes concurrent assemblies
    // against the same trip, so the capacity check stays accurate
    // through the insert below.
    let trip_guard = match request.trip_id {
        Some(trip_id) => {
            let trip = state
                .trips
                .get_mut(&trip_id)
                .ok_or_else(|| AppError::Resolution {
                    entity: "trip",
                    id: trip_id.to_string(),
                })?;

            if matches!(trip.status, TripStatus::Completed | TripStatus::Canceled) {
                return Err(AppError::Validation(format!(
                    "trip {trip_id} is {:?} and cannot take new deliveries",
                    trip.status
                )));
            }

            let bound = bound_delivery_count(state, trip_id);
            if bound + 1 > trip.max_packages {
                return Err(AppError::Capacity {
                    trip_id,
                    bound,
                    max: trip.max_packages,
                });
            }

            Some(trip)
        }
        None => None,
    };

    let estimated_price = apply_adjustment(suggested, request.price_adjustment_pct)?;
    if let Some(expected) = request.estimated_price {
        if expected != estimated_price {
            return Err(AppError::Validation(format!(
                "estimated price mismatch: caller sent {expected}, computed {estimated_price}"
            )));
        }
    }

    let now = Utc::now();
    let delivery = Delivery {
        id: Uuid::new_v4(),
        tracking_number: generate_tracking_number(),
        sender_id: request.sender_id,
        receiver_id: request.receiver_id,
        trip_id: request.trip_id,
        pickup_address: request.pickup_address,
        delivery_address: request.delivery_address,
        pickup_instructions: request.pickup_instructions,
        delivery_instructions: request.delivery_instructions,
        package_ids: request.package_ids.clone(),
        invoice_id: None,
        estimated_price,
        actual_price: None,
        status: if request.trip_id.is_some() {
            DeliveryStatus::Reserved
        } else {
            DeliveryStatus::Unassigned
        },
        created_at: now,
        updated_at: now,
    };

    state.deliveries.insert(delivery.id, delivery.clone());

    for package_id in &request.package_ids {
        if let Some(mut package) = state.packages.get_mut(package_id) {
            package.delivery_id = Some(delivery.id);
        }
    }

    if let Some(trip) = trip_guard {
        let utilization = bound_delivery_count(state, trip.id) as f64 / trip.max_packages as f64;
        state
            .metrics
            .trip_utilization
            .with_label_values(&[&trip.id.to_string()])
            .set(utilization);
    }

    state.metrics.active_deliveries.inc();

    let _ = state.delivery_events_tx.send(DeliveryEvent {
        delivery_id: delivery.id,
        tracking_number: delivery.tracking_number.clone(),
        status: delivery.status,
        occurred_at: now,
    });

    Ok(delivery)
}
