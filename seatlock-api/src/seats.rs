use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use seatlock_core::Seat;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct ClaimRequest {
    pub user: Option<String>,
}

/// Envelope shared by every route: `{success, message?, seat?, seats?}`
#[derive(Debug, Serialize)]
pub struct SeatResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seat: Option<Seat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seats: Option<Vec<Seat>>,
}

impl SeatResponse {
    fn ok(message: String, seat: Option<Seat>) -> Self {
        Self {
            success: true,
            message: Some(message),
            seat,
            seats: None,
        }
    }

    pub fn failure(message: String) -> Self {
        Self {
            success: false,
            message: Some(message),
            seat: None,
            seats: None,
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/seats", get(list_seats))
        .route("/lock/{id}", post(lock_seat))
        .route("/confirm/{id}", post(confirm_seat))
        .route("/release/{id}", post(release_seat))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /seats
pub async fn list_seats(State(state): State<AppState>) -> Json<SeatResponse> {
    Json(SeatResponse {
        success: true,
        message: None,
        seat: None,
        seats: Some(state.store.list_seats()),
    })
}

/// POST /lock/:id
/// Hold a seat for the configured lock duration
pub async fn lock_seat(
    State(state): State<AppState>,
    Path(seat_id): Path<String>,
    body: Result<Json<ClaimRequest>, JsonRejection>,
) -> Result<Json<SeatResponse>, AppError> {
    let user = claimant(body);
    let seat_id = parse_seat_id(&seat_id);

    let seat = state.store.lock(seat_id, &user)?;
    let message = format!(
        "Seat {} locked successfully by {} for {}.",
        seat_id,
        user,
        describe_duration(state.store.lock_duration())
    );

    Ok(Json(SeatResponse::ok(message, Some(seat))))
}

/// POST /confirm/:id
/// Book a seat the caller currently holds
pub async fn confirm_seat(
    State(state): State<AppState>,
    Path(seat_id): Path<String>,
    body: Result<Json<ClaimRequest>, JsonRejection>,
) -> Result<Json<SeatResponse>, AppError> {
    let user = claimant(body);
    let seat_id = parse_seat_id(&seat_id);

    let seat = state.store.confirm(seat_id, &user)?;
    let message = format!("Seat {} booked successfully by {}.", seat_id, user);

    Ok(Json(SeatResponse::ok(message, Some(seat))))
}

/// POST /release/:id
pub async fn release_seat(
    State(state): State<AppState>,
    Path(seat_id): Path<String>,
    body: Result<Json<ClaimRequest>, JsonRejection>,
) -> Result<Json<SeatResponse>, AppError> {
    let user = claimant(body);
    let seat_id = parse_seat_id(&seat_id);

    state.store.release(seat_id, &user)?;
    let message = format!("Seat {} lock released by {}", seat_id, user);

    Ok(Json(SeatResponse::ok(message, None)))
}

// ============================================================================
// Helpers
// ============================================================================

/// A missing or unreadable body counts as a missing user
fn claimant(body: Result<Json<ClaimRequest>, JsonRejection>) -> String {
    match body {
        Ok(Json(req)) => req.user.unwrap_or_default(),
        Err(rejection) => {
            tracing::debug!("Ignoring request body: {}", rejection);
            String::new()
        }
    }
}

/// Ids that are not seat numbers map to 0, which no seat has, so the store
/// still reports a missing user before an unknown seat
fn parse_seat_id(raw: &str) -> u32 {
    raw.parse::<u32>().unwrap_or(0)
}

fn describe_duration(duration: chrono::Duration) -> String {
    let seconds = duration.num_seconds();
    match seconds {
        60 => "1 minute".to_string(),
        s if s % 60 == 0 => format!("{} minutes", s / 60),
        1 => "1 second".to_string(),
        s => format!("{} seconds", s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_duration() {
        assert_eq!(describe_duration(chrono::Duration::seconds(60)), "1 minute");
        assert_eq!(describe_duration(chrono::Duration::seconds(300)), "5 minutes");
        assert_eq!(describe_duration(chrono::Duration::seconds(90)), "90 seconds");
        assert_eq!(describe_duration(chrono::Duration::seconds(1)), "1 second");
    }

    #[test]
    fn test_parse_seat_id() {
        assert_eq!(parse_seat_id("3"), 3);
        assert_eq!(parse_seat_id("abc"), 0);
        assert_eq!(parse_seat_id("-1"), 0);
        assert_eq!(parse_seat_id("3abc"), 0);
    }

    #[test]
    fn test_failure_envelope_omits_payload() {
        let body = serde_json::to_value(SeatResponse::failure("Seat not found".to_string())).unwrap();
        assert_eq!(body, serde_json::json!({ "success": false, "message": "Seat not found" }));
    }
}
