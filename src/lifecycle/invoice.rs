use crate::error::AppError;
use crate::models::invoice::InvoiceStatus;

/// Peer transitions are fully connected among the settlement states
/// {Pending, Partial, Paid, Failed}; none of them is terminal. A draft
/// is issued by moving it to Pending. Overdue, Canceled and Refunded
/// are administrative marks, reachable only through
/// [`ensure_administrative`], never as peer edges.
pub fn successors(current: InvoiceStatus) -> &'static [InvoiceStatus] {
    use InvoiceStatus::*;

    match current {
        Draft => &[Pending],
        Pending => &[Partial, Paid, Failed],
        Partial => &[Pending, Paid, Failed],
        Paid => &[Pending, Partial, Failed],
        Failed => &[Pending, Partial, Paid],
        Overdue | Canceled | Refunded => &[],
    }
}

pub fn ensure(current: InvoiceStatus, requested: InvoiceStatus) -> Result<(), AppError> {
    if successors(current).contains(&requested) {
        Ok(())
    } else {
        Err(AppError::Transition {
            entity: "invoice",
            current: format!("{current:?}"),
            requested: format!("{requested:?}"),
        })
    }
}

/// Targets an administrator may set directly, outside the peer table.
pub const ADMINISTRATIVE_TARGETS: &[InvoiceStatus] = &[
    InvoiceStatus::Draft,
    InvoiceStatus::Overdue,
    InvoiceStatus::Canceled,
    InvoiceStatus::Refunded,
];

pub fn ensure_administrative(requested: InvoiceStatus) -> Result<(), AppError> {
    if ADMINISTRATIVE_TARGETS.contains(&requested) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "{requested:?} is not an administrative invoice status"
        )))
    }
}
