use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::state::AppState;

/// Long-lived sweep deleting packages that were estimated but never
/// bound to a delivery within the retention window. An abandoned
/// creation flow simply stops calling, so these records accumulate
/// until reaped.
pub async fn run_orphan_reaper(state: Arc<AppState>, ttl: Duration, sweep_interval: Duration) {
    info!(
        ttl_secs = ttl.as_secs(),
        sweep_interval_secs = sweep_interval.as_secs(),
        "orphan reaper started"
    );

    let mut ticker = tokio::time::interval(sweep_interval);
    ticker.tick().await;

    loop {
        ticker.tick().await;

        let reaped = sweep(&state, ttl);
        if reaped > 0 {
            warn!(count = reaped, "reaped orphaned packages");
        }
    }
}

/// One pass over the package registry; returns how many orphans were
/// deleted.
pub fn sweep(state: &AppState, ttl: Duration) -> usize {
    let now = Utc::now();

    let orphans: Vec<Uuid> = state
        .packages
        .iter()
        .filter(|entry| {
            let package = entry.value();
            package.delivery_id.is_none()
                && now
                    .signed_duration_since(package.created_at)
                    .to_std()
                    .map(|age| age >= ttl)
                    .unwrap_or(false)
        })
        .map(|entry| *entry.key())
        .collect();

    for id in &orphans {
        state.packages.remove(id);
    }

    state.metrics.orphans_reaped_total.inc_by(orphans.len() as u64);
    orphans.len()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use super::sweep;
    use crate::models::package::{Package, PackageCategory, PackageStatus, SizeCategory};
    use crate::state::AppState;

    fn package(age_hours: i64, bound: bool) -> Package {
        Package {
            id: Uuid::new_v4(),
            delivery_id: bound.then(Uuid::new_v4),
            description: "sweater".to_string(),
            weight_kg: 2.0,
            size: SizeCategory::ExtraSmall,
            category: PackageCategory::Clothing,
            fragile: false,
            images: Vec::new(),
            special_instructions: None,
            estimated_price: dec!(6.00),
            status: PackageStatus::Pending,
            created_at: Utc::now() - chrono::Duration::hours(age_hours),
        }
    }

    #[test]
    fn reaps_only_expired_unbound_packages() {
        let state = AppState::new(16, 1024);

        let stale_orphan = package(48, false);
        let fresh_orphan = package(1, false);
        let stale_bound = package(48, true);

        let stale_orphan_id = stale_orphan.id;
        let fresh_orphan_id = fresh_orphan.id;
        let stale_bound_id = stale_bound.id;

        state.packages.insert(stale_orphan_id, stale_orphan);
        state.packages.insert(fresh_orphan_id, fresh_orphan);
        state.packages.insert(stale_bound_id, stale_bound);

        let reaped = sweep(&state, Duration::from_secs(24 * 3600));

        assert_eq!(reaped, 1);
        assert!(!state.packages.contains_key(&stale_orphan_id));
        assert!(state.packages.contains_key(&fresh_orphan_id));
        assert!(state.packages.contains_key(&stale_bound_id));
    }

    #[test]
    fn empty_registry_reaps_nothing() {
        let state = AppState::new(16, 1024);
        assert_eq!(sweep(&state, Duration::from_secs(60)), 0);
    }
}
