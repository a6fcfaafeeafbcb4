use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub number: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub complement: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryStatus {
    Unassigned,
    Reserved,
    Pending,
    Accepted,
    PaymentPending,
    PaymentSuccess,
    PaymentFailed,
    PickedUp,
    InTransit,
    Delivered,
    Canceled,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delivery {
    pub id: Uuid,
    /// Assigned once at creation, never regenerated.
    pub tracking_number: String,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub trip_id: Option<Uuid>,
    pub pickup_address: Address,
    pub delivery_address: Address,
    pub pickup_instructions: Option<String>,
    pub delivery_instructions: Option<String>,
    pub package_ids: Vec<Uuid>,
    pub invoice_id: Option<Uuid>,
    pub estimated_price: Decimal,
    pub actual_price: Option<Decimal>,
    pub status: DeliveryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Pushed to websocket subscribers when a delivery is created and on
/// every applied status change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryEvent {
    pub delivery_id: Uuid,
    pub tracking_number: String,
    pub status: DeliveryStatus,
    pub occurred_at: DateTime<Utc>,
}
