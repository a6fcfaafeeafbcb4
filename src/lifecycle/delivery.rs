use crate::error::AppError;
use crate::models::delivery::DeliveryStatus;

/// Legal successors of a delivery status. `Canceled` and `Failed` are
/// reachable from every non-terminal state; `PaymentFailed` may retry
/// back into `PaymentPending`.
pub fn successors(current: DeliveryStatus) -> &'static [DeliveryStatus] {
    use DeliveryStatus::*;

    match current {
        Unassigned => &[Reserved, Canceled, Failed],
        Reserved => &[Pending, Canceled, Failed],
        Pending => &[Accepted, Canceled, Failed],
        Accepted => &[PaymentPending, Canceled, Failed],
        PaymentPending => &[PaymentSuccess, PaymentFailed, Canceled, Failed],
        PaymentSuccess => &[PickedUp, Canceled, Failed],
        PaymentFailed => &[PaymentPending, Canceled, Failed],
        PickedUp => &[InTransit, Canceled, Failed],
        InTransit => &[Delivered, Canceled, Failed],
        Delivered | Canceled | Failed => &[],
    }
}

pub fn ensure(current: DeliveryStatus, requested: DeliveryStatus) -> Result<(), AppError> {
    if successors(current).contains(&requested) {
        Ok(())
    } else {
        Err(AppError::Transition {
            entity: "delivery",
            current: format!("{current:?}"),
            requested: format!("{requested:?}"),
        })
    }
}
