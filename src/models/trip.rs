use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleType {
    Car,
    Van,
    Truck,
    Motorbike,
    Train,
    Airplane,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TripStatus {
    Scheduled,
    InProgress,
    Completed,
    Canceled,
}

/// A transport leg offered by a traveler, with finite capacity for
/// delivery bindings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    pub id: Uuid,
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
    pub status: TripStatus,
    pub created_at: DateTime<Utc>,
}
