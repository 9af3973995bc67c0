use chrono::{DateTime, Duration, Utc};
use seatlock_core::{Clock, ReservationError, ReservationResult, Seat};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::info;

use crate::app_config::ReservationConfig;

/// Owns the fixed seat collection and applies every transition.
///
/// One mutex guards the whole collection. Each operation takes it once, so
/// expiry reconciliation and the transition that follows it are applied
/// together, and the background sweeper cannot interleave with either.
pub struct ReservationStore {
    seats: Mutex<Vec<Seat>>,
    clock: Arc<dyn Clock>,
    lock_duration: Duration,
}

impl ReservationStore {
    /// Create seats `1..=total_seats`, all available
    pub fn new(total_seats: u32, lock_duration: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            seats: Mutex::new((1..=total_seats).map(Seat::new).collect()),
            clock,
            lock_duration,
        }
    }

    pub fn from_config(config: &ReservationConfig, clock: Arc<dyn Clock>) -> Self {
        Self::new(config.total_seats, config.lock_duration(), clock)
    }

    pub fn lock_duration(&self) -> Duration {
        self.lock_duration
    }

    /// Return every lock whose expiry has passed to available.
    /// Returns the ids of the seats that were released.
    pub fn reconcile_expired(&self) -> Vec<u32> {
        let now = self.clock.now();
        expire_locks(&mut self.seats(), now)
    }

    /// Snapshot of all seats in ascending id order
    pub fn list_seats(&self) -> Vec<Seat> {
        let now = self.clock.now();
        let mut seats = self.seats();
        expire_locks(&mut seats, now);
        seats.clone()
    }

    pub fn lock(&self, seat_id: u32, claimant: &str) -> ReservationResult<Seat> {
        let now = self.clock.now();
        let mut seats = self.seats();
        expire_locks(&mut seats, now);

        require_claimant(claimant)?;
        let seat = find_seat(&mut seats, seat_id)?;
        // Durations past the representable range saturate to a lock that never expires
        let expires_at = now
            .checked_add_signed(self.lock_duration)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        seat.lock(claimant, expires_at)?;

        info!(seat_id, claimant, "Seat locked");
        Ok(seat.clone())
    }

    pub fn confirm(&self, seat_id: u32, claimant: &str) -> ReservationResult<Seat> {
        let now = self.clock.now();
        let mut seats = self.seats();
        expire_locks(&mut seats, now);

        require_claimant(claimant)?;
        let seat = find_seat(&mut seats, seat_id)?;
        seat.confirm(claimant)?;

        info!(seat_id, claimant, "Seat booked");
        Ok(seat.clone())
    }

    /// Release a lock held by `claimant`.
    ///
    /// Unlike `lock` and `confirm` this does not reconcile expired locks
    /// first: the holder of a lock that has expired but not yet been swept
    /// can still release it, and anyone else gets a conflict.
    pub fn release(&self, seat_id: u32, claimant: &str) -> ReservationResult<Seat> {
        let mut seats = self.seats();
        let seat = find_seat(&mut seats, seat_id)?;
        seat.release(claimant)?;

        info!(seat_id, claimant, "Seat lock released");
        Ok(seat.clone())
    }

    fn seats(&self) -> MutexGuard<'_, Vec<Seat>> {
        // Every mutation replaces a seat's state in one assignment, so the
        // data behind a poisoned lock is still consistent.
        self.seats.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn expire_locks(seats: &mut [Seat], now: DateTime<Utc>) -> Vec<u32> {
    let mut released = Vec::new();
    for seat in seats.iter_mut() {
        if seat.expire_if_due(now) {
            info!(seat_id = seat.id(), "Seat {} lock expired.", seat.id());
            released.push(seat.id());
        }
    }
    released
}

fn require_claimant(claimant: &str) -> ReservationResult<()> {
    if claimant.is_empty() {
        return Err(ReservationError::InvalidInput);
    }
    Ok(())
}

fn find_seat(seats: &mut [Seat], seat_id: u32) -> ReservationResult<&mut Seat> {
    seats
        .iter_mut()
        .find(|seat| seat.id() == seat_id)
        .ok_or(ReservationError::NotFound)
}
