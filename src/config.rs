use dotenv::dotenv;
use std::env;

use chrono_tz::Tz;
use thiserror::Error;

const DEFAULT_FALLBACK_PHONE: &str = "(908) 290-5611";
const DEFAULT_BOOKING_WINDOW_DAYS: i64 = 14;

/// Errors raised while assembling the runtime configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    MissingVar(&'static str),
    #[error("{var} is invalid: {reason}")]
    InvalidVar { var: &'static str, reason: String },
}

/// Runtime configuration for the widget service.
///
/// The two scheduling-service endpoints must be provided; the display
/// time zone, fallback phone number, and booking window length have
/// defaults matching the widget's original deployment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// GET endpoint returning open slots for a calendar and window.
    pub availability_url: String,
    /// POST endpoint that confirms a booking.
    pub booking_url: String,
    /// Time zone all dates and slot labels are rendered in.
    pub display_time_zone: Tz,
    /// Phone number offered when the widget cannot help the caller.
    pub fallback_phone: String,
    /// Length of the availability window shown per selected date.
    pub booking_window_days: i64,
}

impl AppConfig {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let availability_url = require_var("AVAILABILITY_SERVICE_URL")?;
        let booking_url = require_var("BOOKING_SERVICE_URL")?;

        let display_time_zone = match env::var("DISPLAY_TIME_ZONE") {
            Ok(name) => name.parse::<Tz>().map_err(|err| ConfigError::InvalidVar {
                var: "DISPLAY_TIME_ZONE",
                reason: err.to_string(),
            })?,
            Err(_) => chrono_tz::America::New_York,
        };

        let fallback_phone =
            env::var("FALLBACK_PHONE").unwrap_or_else(|_| DEFAULT_FALLBACK_PHONE.to_string());

        let booking_window_days = match env::var("BOOKING_WINDOW_DAYS") {
            Ok(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|days| *days > 0)
                .ok_or_else(|| ConfigError::InvalidVar {
                    var: "BOOKING_WINDOW_DAYS",
                    reason: format!("expected a positive number of days, got {:?}", raw),
                })?,
            Err(_) => DEFAULT_BOOKING_WINDOW_DAYS,
        };

        Ok(Self {
            availability_url,
            booking_url,
            display_time_zone,
            fallback_phone,
            booking_window_days,
        })
    }
}

fn require_var(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(name)),
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;

    // Environment access is process-global, so the from_env cases run
    // inside a single test to avoid interleaving with each other.
    #[test]
    fn test_from_env() {
        env::remove_var("AVAILABILITY_SERVICE_URL");
        env::remove_var("BOOKING_SERVICE_URL");
        env::remove_var("DISPLAY_TIME_ZONE");
        env::remove_var("FALLBACK_PHONE");
        env::remove_var("BOOKING_WINDOW_DAYS");

        // Missing required endpoint
        let result = AppConfig::from_env();
        assert!(matches!(result, Err(ConfigError::MissingVar(_))));

        env::set_var("AVAILABILITY_SERVICE_URL", "http://localhost:9000/availability");
        env::set_var("BOOKING_SERVICE_URL", "http://localhost:9000/book");

        // Defaults applied
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.display_time_zone, chrono_tz::America::New_York);
        assert_eq!(config.fallback_phone, "(908) 290-5611");
        assert_eq!(config.booking_window_days, 14);

        // Overrides respected
        env::set_var("DISPLAY_TIME_ZONE", "Europe/Berlin");
        env::set_var("BOOKING_WINDOW_DAYS", "7");
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.display_time_zone, chrono_tz::Europe::Berlin);
        assert_eq!(config.booking_window_days, 7);

        // Bad values rejected
        env::set_var("BOOKING_WINDOW_DAYS", "zero");
        assert!(matches!(
            AppConfig::from_env(),
            Err(ConfigError::InvalidVar { var: "BOOKING_WINDOW_DAYS", .. })
        ));
        env::set_var("BOOKING_WINDOW_DAYS", "-3");
        assert!(AppConfig::from_env().is_err());

        env::remove_var("DISPLAY_TIME_ZONE");
        env::remove_var("BOOKING_WINDOW_DAYS");
        env::remove_var("AVAILABILITY_SERVICE_URL");
        env::remove_var("BOOKING_SERVICE_URL");
    }
}
