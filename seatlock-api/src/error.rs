use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use seatlock_core::ReservationError;

use crate::seats::SeatResponse;

#[derive(Debug)]
pub enum AppError {
    Reservation(ReservationError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Reservation(err) => {
                let status = match err {
                    ReservationError::InvalidInput => StatusCode::BAD_REQUEST,
                    ReservationError::NotFound => StatusCode::NOT_FOUND,
                    ReservationError::Conflict(_) => StatusCode::BAD_REQUEST,
                };
                (status, err.to_string())
            }
        };

        (status, Json(SeatResponse::failure(message))).into_response()
    }
}

impl From<ReservationError> for AppError {
    fn from(err: ReservationError) -> Self {
        Self::Reservation(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seatlock_core::ConflictReason;

    #[test]
    fn test_status_mapping() {
        let status = |err: AppError| err.into_response().status();

        assert_eq!(status(ReservationError::InvalidInput.into()), StatusCode::BAD_REQUEST);
        assert_eq!(status(ReservationError::NotFound.into()), StatusCode::NOT_FOUND);
        assert_eq!(
            status(ReservationError::Conflict(ConflictReason::AlreadyBooked).into()),
            StatusCode::BAD_REQUEST
        );
    }
}
