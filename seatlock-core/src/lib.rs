pub mod clock;
pub mod seat;

pub use clock::{Clock, ManualClock, SystemClock};
pub use seat::{Seat, SeatRecord, SeatStatus};

/// Why a transition was refused for the seat's current state or claimant
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConflictReason {
    #[error("Seat already booked")]
    AlreadyBooked,
    #[error("Seat already locked by another user")]
    AlreadyLocked,
    #[error("Seat not locked by you or lock expired")]
    NotLockedByClaimant,
    #[error("Cannot release: Seat not locked by you")]
    ReleaseNotPermitted,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReservationError {
    #[error("User name required")]
    InvalidInput,
    #[error("Seat not found")]
    NotFound,
    #[error("{0}")]
    Conflict(ConflictReason),
}

pub type ReservationResult<T> = Result<T, ReservationError>;
