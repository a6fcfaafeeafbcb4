use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::routing::{get, patch, post};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::api::rest::guard_transition;
use crate::error::AppError;
use crate::lifecycle;
use crate::models::invoice::{Invoice, InvoiceStatus};
use crate::models::user::UserRole;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/invoices", post(create_invoice))
        .route("/invoices/:id", get(get_invoice))
        .route("/invoices/:id/status", patch(update_invoice_status))
        .route("/invoices/:id/admin-status", post(admin_invoice_status))
}

#[derive(Deserialize)]
pub struct CreateInvoiceRequest {
    pub actor_id: Uuid,
    pub client_id: Uuid,
    pub delivery_id: Option<Uuid>,
    pub amount: Decimal,
    pub platform_fee: Decimal,
    pub tax_amount: Decimal,
    pub due_date: DateTime<Utc>,
    /// Issue immediately instead of leaving the invoice in draft.
    #[serde(default)]
    pub issue: bool,
}

async fn create_invoice(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateInvoiceRequest>,
) -> Result<Json<Invoice>, AppError> {
    state.resolve_user(payload.actor_id)?;
    state.resolve_user(payload.client_id)?;

    if payload.amount < Decimal::ZERO
        || payload.platform_fee < Decimal::ZERO
        || payload.tax_amount < Decimal::ZERO
    {
        return Err(AppError::Validation(
            "invoice amounts cannot be negative".to_string(),
        ));
    }

    if let Some(delivery_id) = payload.delivery_id {
        let delivery = state
            .deliveries
            .get(&delivery_id)
            .ok_or_else(|| AppError::Resolution {
                entity: "delivery",
                id: delivery_id.to_string(),
            })?;

        if delivery.invoice_id.is_some() {
            return Err(AppError::Validation(format!(
                "delivery {delivery_id} already has an invoice"
            )));
        }
    }

    let invoice = Invoice {
        id: Uuid::new_v4(),
        delivery_id: payload.delivery_id,
        client_id: payload.client_id,
        amount: payload.amount,
        platform_fee: payload.platform_fee,
        tax_amount: payload.tax_amount,
        total_amount: payload.amount + payload.platform_fee + payload.tax_amount,
        due_date: payload.due_date,
        payment_date: None,
        status: if payload.issue {
            InvoiceStatus::Pending
        } else {
            InvoiceStatus::Draft
        },
        created_at: Utc::now(),
    };

    state.invoices.insert(invoice.id, invoice.clone());

    if let Some(delivery_id) = payload.delivery_id {
        if let Some(mut delivery) = state.deliveries.get_mut(&delivery_id) {
            delivery.invoice_id = Some(invoice.id);
        }
    }

    info!(
        invoice_id = %invoice.id,
        total = %invoice.total_amount,
        status = ?invoice.status,
        "invoice created"
    );

    Ok(Json(invoice))
}

async fn get_invoice(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Invoice>, AppError> {
    let invoice = state
        .invoices
        .get(&id)
        .ok_or_else(|| AppError::Resolution {
            entity: "invoice",
            id: id.to_string(),
        })?;

    Ok(Json(invoice.value().clone()))
}

#[derive(Deserialize)]
pub struct UpdateInvoiceStatusRequest {
    pub actor_id: Uuid,
    pub status: InvoiceStatus,
}

async fn update_invoice_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateInvoiceStatusRequest>,
) -> Result<Json<Invoice>, AppError> {
    state.resolve_user(payload.actor_id)?;

    let mut invoice = state
        .invoices
        .get_mut(&id)
        .ok_or_else(|| AppError::Resolution {
            entity: "invoice",
            id: id.to_string(),
        })?;

    guard_transition(
        &state,
        "invoice",
        lifecycle::invoice::ensure(invoice.status, payload.status),
    )?;

    if payload.status == InvoiceStatus::Paid {
        invoice.payment_date = Some(Utc::now());
    } else if invoice.status == InvoiceStatus::Paid {
        invoice.payment_date = None;
    }

    invoice.status = payload.status;
    Ok(Json(invoice.clone()))
}

/// Administrative status marks sit outside the peer transition table
/// and require an admin actor.
async fn admin_invoice_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateInvoiceStatusRequest>,
) -> Result<Json<Invoice>, AppError> {
    let actor = state.resolve_user(payload.actor_id)?;
    if actor.role != UserRole::Admin {
        return Err(AppError::Validation(format!(
            "user {} is not an administrator",
            payload.actor_id
        )));
    }

    lifecycle::invoice::ensure_administrative(payload.status)?;

    let mut invoice = state
        .invoices
        .get_mut(&id)
        .ok_or_else(|| AppError::Resolution {
            entity: "invoice",
            id: id.to_string(),
        })?;

    state
        .metrics
        .transitions_total
        .with_label_values(&["invoice", "applied"])
        .inc();

    invoice.status = payload.status;

    info!(
        invoice_id = %id,
        status = ?payload.status,
        actor_id = %payload.actor_id,
        "invoice administratively re-marked"
    );

    Ok(Json(invoice.clone()))
}
