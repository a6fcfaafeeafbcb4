use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ordered size classes, each with a closed weight range in kilograms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SizeCategory {
    Letter,
    ExtraSmall,
    Small,
    Medium,
    Large,
    ExtraLarge,
    Jumbo,
}

impl SizeCategory {
    pub fn weight_range(&self) -> (f64, f64) {
        match self {
            SizeCategory::Letter => (0.0, 1.0),
            SizeCategory::ExtraSmall => (1.0, 5.0),
            SizeCategory::Small => (5.0, 15.0),
            SizeCategory::Medium => (15.0, 50.0),
            SizeCategory::Large => (50.0, 100.0),
            SizeCategory::ExtraLarge => (100.0, 200.0),
            SizeCategory::Jumbo => (200.0, 500.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PackageCategory {
    Clothing,
    Electronics,
    Documents,
    Perishable,
    Hazardous,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PackageStatus {
    Pending,
    Accepted,
    Registered,
    PickedUp,
    Canceled,
}

/// Stored media reference attached to a package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
    pub title: String,
    pub size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    pub id: Uuid,
    /// Set once the package is bound to a delivery; `None` while orphaned.
    pub delivery_id: Option<Uuid>,
    pub description: String,
    pub weight_kg: f64,
    pub size: SizeCategory,
    pub category: PackageCategory,
    pub fragile: bool,
    pub images: Vec<ImageRef>,
    pub special_instructions: Option<String>,
    /// Computed at estimation time, immutable afterwards.
    pub estimated_price: Decimal,
    pub status: PackageStatus,
    pub created_at: DateTime<Utc>,
}
