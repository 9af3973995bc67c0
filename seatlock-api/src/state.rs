use std::sync::Arc;
use seatlock_store::ReservationStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ReservationStore>,
}
