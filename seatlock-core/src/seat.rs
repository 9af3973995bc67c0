use crate::{ConflictReason, ReservationError, ReservationResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Seat status in the reservation lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    Available,
    Locked,
    Booked,
}

/// Status together with the claim data that is only valid in that status.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SeatState {
    Available,
    Locked {
        by: String,
        expires_at: DateTime<Utc>,
    },
    Booked {
        by: String,
    },
}

/// A reservable seat and its transitions.
///
/// Transitions:
/// - `Available` → `Locked` via [`Seat::lock`]
/// - `Locked` → `Booked` via [`Seat::confirm`] (same claimant)
/// - `Locked` → `Available` via [`Seat::release`] (same claimant) or [`Seat::expire_if_due`]
///
/// `Booked` is terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "SeatRecord")]
pub struct Seat {
    id: u32,
    state: SeatState,
}

impl Seat {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            state: SeatState::Available,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn status(&self) -> SeatStatus {
        match self.state {
            SeatState::Available => SeatStatus::Available,
            SeatState::Locked { .. } => SeatStatus::Locked,
            SeatState::Booked { .. } => SeatStatus::Booked,
        }
    }

    /// Current lock holder, or the booker once booked
    pub fn locked_by(&self) -> Option<&str> {
        match &self.state {
            SeatState::Available => None,
            SeatState::Locked { by, .. } | SeatState::Booked { by } => Some(by.as_str()),
        }
    }

    pub fn lock_expire_time(&self) -> Option<DateTime<Utc>> {
        match self.state {
            SeatState::Locked { expires_at, .. } => Some(expires_at),
            _ => None,
        }
    }

    /// Transition: Available → Locked.
    /// A seat that is already locked is refused, even for its own holder.
    pub fn lock(&mut self, claimant: &str, expires_at: DateTime<Utc>) -> ReservationResult<()> {
        match self.state {
            SeatState::Booked { .. } => Err(ReservationError::Conflict(ConflictReason::AlreadyBooked)),
            SeatState::Locked { .. } => Err(ReservationError::Conflict(ConflictReason::AlreadyLocked)),
            SeatState::Available => {
                self.state = SeatState::Locked {
                    by: claimant.to_string(),
                    expires_at,
                };
                Ok(())
            }
        }
    }

    /// Transition: Locked → Booked, only for the claimant holding the lock
    pub fn confirm(&mut self, claimant: &str) -> ReservationResult<()> {
        match &self.state {
            SeatState::Booked { .. } => Err(ReservationError::Conflict(ConflictReason::AlreadyBooked)),
            SeatState::Locked { by, .. } if by == claimant => {
                self.state = SeatState::Booked {
                    by: claimant.to_string(),
                };
                Ok(())
            }
            _ => Err(ReservationError::Conflict(ConflictReason::NotLockedByClaimant)),
        }
    }

    /// Transition: Locked → Available, only for the claimant holding the lock.
    /// Does not look at the expiry instant.
    pub fn release(&mut self, claimant: &str) -> ReservationResult<()> {
        match &self.state {
            SeatState::Locked { by, .. } if by == claimant => {
                self.state = SeatState::Available;
                Ok(())
            }
            _ => Err(ReservationError::Conflict(ConflictReason::ReleaseNotPermitted)),
        }
    }

    /// Transition: Locked → Available once `now` has reached the lock's expiry.
    /// Returns whether the seat was released.
    pub fn expire_if_due(&mut self, now: DateTime<Utc>) -> bool {
        match self.state {
            SeatState::Locked { expires_at, .. } if expires_at <= now => {
                self.state = SeatState::Available;
                true
            }
            _ => false,
        }
    }
}

/// Wire form of a seat: `{id, status, lockedBy, lockExpireTime}`, expiry in epoch milliseconds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SeatRecord {
    pub id: u32,
    pub status: SeatStatus,
    pub locked_by: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub lock_expire_time: Option<DateTime<Utc>>,
}

impl From<Seat> for SeatRecord {
    fn from(seat: Seat) -> Self {
        Self {
            id: seat.id,
            status: seat.status(),
            locked_by: seat.locked_by().map(str::to_string),
            lock_expire_time: seat.lock_expire_time(),
        }
    }
}
