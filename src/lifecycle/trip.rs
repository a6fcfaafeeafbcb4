use crate::error::AppError;
use crate::models::trip::TripStatus;

/// A scheduled trip may start, complete outright, or be canceled; an
/// in-progress trip may only complete or be canceled.
pub fn successors(current: TripStatus) -> &'static [TripStatus] {
    use TripStatus::*;

    match current {
        Scheduled => &[InProgress, Completed, Canceled],
        InProgress => &[Completed, Canceled],
        Completed | Canceled => &[],
    }
}

pub fn ensure(current: TripStatus, requested: TripStatus) -> Result<(), AppError> {
    if successors(current).contains(&requested) {
        Ok(())
    } else {
        Err(AppError::Transition {
            entity: "trip",
            current: format!("{current:?}"),
            requested: format!("{requested:?}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::ensure;
    use crate::models::trip::TripStatus::*;

    #[test]
    fn scheduled_can_start_complete_or_cancel() {
        assert!(ensure(Scheduled, InProgress).is_ok());
        assert!(ensure(Scheduled, Completed).is_ok());
        assert!(ensure(Scheduled, Canceled).is_ok());
    }

    #[test]
    fn in_progress_cannot_go_back() {
        assert!(ensure(InProgress, Completed).is_ok());
        assert!(ensure(InProgress, Canceled).is_ok());
        assert!(ensure(InProgress, Scheduled).is_err());
    }

    #[test]
    fn completed_is_terminal() {
        assert!(ensure(Completed, InProgress).is_err());
        assert!(ensure(Completed, Scheduled).is_err());
        assert!(ensure(Completed, Canceled).is_err());
    }

    #[test]
    fn canceled_is_terminal() {
        assert!(ensure(Canceled, Scheduled).is_err());
        assert!(ensure(Canceled, InProgress).is_err());
    }
}
