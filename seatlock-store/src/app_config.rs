use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};
use serde::Deserialize;
use std::env;

/// Longest lock or sweep interval accepted, one day in seconds
pub const MAX_PERIOD_SECONDS: u64 = 86_400;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub reservation: ReservationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReservationConfig {
    pub total_seats: u32,
    pub lock_seconds: u64,
    pub sweep_interval_seconds: u64,
}

impl ReservationConfig {
    pub fn lock_duration(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.lock_seconds as i64)
    }

    pub fn sweep_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.sweep_interval_seconds)
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Self::defaults()?
            // Every file is optional; the built-in defaults describe a complete service
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `SEATLOCK__SERVER__PORT=8080`
            .add_source(config::Environment::with_prefix("SEATLOCK").separator("__"));

        Self::from_builder(builder)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("server.port", 3000_i64)?
            .set_default("reservation.total_seats", 10_i64)?
            .set_default("reservation.lock_seconds", 60_i64)?
            .set_default("reservation.sweep_interval_seconds", 5_i64)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let rules = &self.reservation;
        if rules.total_seats == 0 {
            return Err(ConfigError::Message("reservation.total_seats must be at least 1".into()));
        }
        if !(1..=MAX_PERIOD_SECONDS).contains(&rules.lock_seconds) {
            return Err(ConfigError::Message(format!(
                "reservation.lock_seconds must be between 1 and {}",
                MAX_PERIOD_SECONDS
            )));
        }
        if !(1..=MAX_PERIOD_SECONDS).contains(&rules.sweep_interval_seconds) {
            return Err(ConfigError::Message(format!(
                "reservation.sweep_interval_seconds must be between 1 and {}",
                MAX_PERIOD_SECONDS
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn load_toml(toml: &str) -> Result<Config, ConfigError> {
        let builder = Config::defaults()?.add_source(config::File::from_str(toml, FileFormat::Toml));
        Config::from_builder(builder)
    }

    #[test]
    fn test_defaults() {
        let config = load_toml("").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.reservation.total_seats, 10);
        assert_eq!(config.reservation.lock_duration(), chrono::Duration::seconds(60));
        assert_eq!(config.reservation.sweep_interval(), std::time::Duration::from_secs(5));
    }

    #[test]
    fn test_file_overrides() {
        let config = load_toml(
            r#"
            [server]
            port = 8080

            [reservation]
            total_seats = 40
            lock_seconds = 120
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.reservation.total_seats, 40);
        assert_eq!(config.reservation.lock_seconds, 120);
        assert_eq!(config.reservation.sweep_interval_seconds, 5);
    }

    #[test]
    fn test_rejects_zero_values() {
        assert!(load_toml("[reservation]\ntotal_seats = 0").is_err());
        assert!(load_toml("[reservation]\nlock_seconds = 0").is_err());
        assert!(load_toml("[reservation]\nsweep_interval_seconds = 0").is_err());
    }

    #[test]
    fn test_rejects_oversized_periods() {
        assert!(load_toml("[reservation]\nlock_seconds = 100000000000000").is_err());
        assert!(load_toml("[reservation]\nlock_seconds = 86401").is_err());
        assert!(load_toml("[reservation]\nsweep_interval_seconds = 86401").is_err());

        let config = load_toml("[reservation]\nlock_seconds = 86400").unwrap();
        assert_eq!(config.reservation.lock_duration(), chrono::Duration::days(1));
    }
}
