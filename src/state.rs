use dashmap::DashMap;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::error::AppError;
use crate::media::MediaStore;
use crate::models::delivery::{Delivery, DeliveryEvent};
use crate::models::invoice::Invoice;
use crate::models::package::Package;
use crate::models::trip::Trip;
use crate::models::user::User;
use crate::observability::metrics::Metrics;

pub struct AppState {
    pub users: DashMap<Uuid, User>,
    pub packages: DashMap<Uuid, Package>,
    pub deliveries: DashMap<Uuid, Delivery>,
    pub trips: DashMap<Uuid, Trip>,
    pub invoices: DashMap<Uuid, Invoice>,
    pub media: MediaStore,
    pub delivery_events_tx: broadcast::Sender<DeliveryEvent>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(event_buffer_size: usize, max_image_bytes: usize) -> Self {
        let (delivery_events_tx, _unused_rx) = broadcast::channel(event_buffer_size);

        Self {
            users: DashMap::new(),
            packages: DashMap::new(),
            deliveries: DashMap::new(),
            trips: DashMap::new(),
            invoices: DashMap::new(),
            media: MediaStore::new(max_image_bytes),
            delivery_events_tx,
            metrics: Metrics::new(),
        }
    }

    pub fn resolve_user(&self, id: Uuid) -> Result<User, AppError> {
        self.users
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::Resolution {
                entity: "user",
                id: id.to_string(),
            })
    }
}
