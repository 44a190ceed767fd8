use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Fine charged per overdue day when no override is configured.
pub const FINE_PER_DAY: f64 = 1.0;
/// Days a reservation stays active before it can be swept as expired.
pub const RESERVATION_HOLD_DAYS: i64 = 7;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub circulation: CirculationPolicy,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let circulation = CirculationPolicy::from_env()?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            circulation,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Log filter applied when `RUST_LOG` is not set.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Lending rules that are policy rather than membership-tier dependent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CirculationPolicy {
    pub fine_per_day: f64,
    pub reservation_hold_days: i64,
}

impl Default for CirculationPolicy {
    fn default() -> Self {
        Self {
            fine_per_day: FINE_PER_DAY,
            reservation_hold_days: RESERVATION_HOLD_DAYS,
        }
    }
}

impl CirculationPolicy {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let fine_per_day = match env::var("APP_FINE_PER_DAY") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|fine| fine.is_finite() && *fine >= 0.0)
                .ok_or(ConfigError::InvalidFinePerDay(raw))?,
            Err(_) => defaults.fine_per_day,
        };

        let reservation_hold_days = match env::var("APP_RESERVATION_HOLD_DAYS") {
            Ok(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|days| *days > 0)
                .ok_or(ConfigError::InvalidHoldDays(raw))?,
            Err(_) => defaults.reservation_hold_days,
        };

        Ok(Self {
            fine_per_day,
            reservation_hold_days,
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidFinePerDay(String),
    InvalidHoldDays(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidFinePerDay(raw) => write!(
                f,
                "APP_FINE_PER_DAY must be a non-negative number (got '{raw}')"
            ),
            ConfigError::InvalidHoldDays(raw) => write!(
                f,
                "APP_RESERVATION_HOLD_DAYS must be a positive whole number (got '{raw}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidFinePerDay(_)
            | ConfigError::InvalidHoldDays(_) => None,
        }
    }
}
