use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    Draft,
    Pending,
    Partial,
    Paid,
    Failed,
    Overdue,
    Canceled,
    Refunded,
}

/// Billing record for a delivery fee or a manually issued client
/// invoice. `total_amount` is fixed at creation and only changes
/// through an explicit update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub delivery_id: Option<Uuid>,
    pub client_id: Uuid,
    pub amount: Decimal,
    pub platform_fee: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub due_date: DateTime<Utc>,
    pub payment_date: Option<DateTime<Utc>>,
    pub status: InvoiceStatus,
    pub created_at: DateTime<Utc>,
}
