use std::sync::Arc;
use std::time::Duration;
use seatlock_store::ReservationStore;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

/// Periodically returns expired seat locks to available, so a stale lock
/// is cleared even when no requests arrive. Runs until the task is dropped.
pub async fn start_expiry_sweeper(store: Arc<ReservationStore>, period: Duration) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!("Expiry sweeper started, checking every {:?}", period);

    loop {
        ticker.tick().await;

        let released = store.reconcile_expired();
        if !released.is_empty() {
            debug!(count = released.len(), seats = ?released, "Released expired seat locks");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use seatlock_core::{ManualClock, SeatStatus};

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_releases_expired_locks_without_requests() {
        let clock = Arc::new(ManualClock::default());
        let store = Arc::new(ReservationStore::new(10, ChronoDuration::seconds(60), clock.clone()));

        store.lock(5, "carl").unwrap();
        store.lock(6, "dana").unwrap();
        store.confirm(6, "dana").unwrap();
        clock.advance(ChronoDuration::seconds(61));

        let sweeper = tokio::spawn(start_expiry_sweeper(store.clone(), Duration::from_secs(5)));
        // First tick fires immediately, the next after one interval
        tokio::time::sleep(Duration::from_secs(6)).await;
        sweeper.abort();

        // Already swept: nothing left for a request to reconcile
        assert!(store.reconcile_expired().is_empty());

        let seats = store.list_seats();
        assert_eq!(seats[4].status(), SeatStatus::Available);
        assert_eq!(seats[5].status(), SeatStatus::Booked);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_keeps_live_locks() {
        let clock = Arc::new(ManualClock::default());
        let store = Arc::new(ReservationStore::new(3, ChronoDuration::seconds(60), clock.clone()));

        store.lock(1, "alice").unwrap();
        clock.advance(ChronoDuration::seconds(59));

        let sweeper = tokio::spawn(start_expiry_sweeper(store.clone(), Duration::from_secs(5)));
        tokio::time::sleep(Duration::from_secs(11)).await;
        sweeper.abort();

        assert_eq!(store.list_seats()[0].locked_by(), Some("alice"));
    }
}
