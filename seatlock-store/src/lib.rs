pub mod app_config;
pub mod reservation_store;

pub use app_config::Config;
pub use reservation_store::ReservationStore;
