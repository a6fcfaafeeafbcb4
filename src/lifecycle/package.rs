use crate::error::AppError;
use crate::models::package::PackageStatus;

pub fn successors(current: PackageStatus) -> &'static [PackageStatus] {
    use PackageStatus::*;

    match current {
        Pending => &[Accepted, Canceled],
        Accepted => &[Registered, Canceled],
        Registered => &[PickedUp, Canceled],
        PickedUp | Canceled => &[],
    }
}

pub fn ensure(current: PackageStatus, requested: PackageStatus) -> Result<(), AppError> {
    if successors(current).contains(&requested) {
        Ok(())
    } else {
        Err(AppError::Transition {
            entity: "package",
            current: format!("{current:?}"),
            requested: format!("{requested:?}"),
        })
    }
}
