//! Settings read from `.env` and then `APP_*` variables.

use std::env;
use std::net::{AddrParseError, IpAddr, Ipv4Addr, SocketAddr};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub calendar: CalendarConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port = match non_blank_var("APP_PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => ServerConfig::DEFAULT_PORT,
        };
        let outbox_capacity = match non_blank_var("APP_CALENDAR_OUTBOX_CAPACITY") {
            Some(raw) => raw
                .parse()
                .ok()
                .filter(|capacity: &usize| *capacity > 0)
                .ok_or(ConfigError::InvalidOutboxCapacity(raw))?,
            None => CalendarConfig::DEFAULT_OUTBOX_CAPACITY,
        };

        Ok(Self {
            server: ServerConfig {
                host: non_blank_var("APP_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
                port,
            },
            telemetry: TelemetryConfig {
                log_level: non_blank_var("APP_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            },
            calendar: CalendarConfig {
                organizer: non_blank_var("APP_CALENDAR_ORGANIZER")
                    .unwrap_or_else(|| CalendarConfig::DEFAULT_ORGANIZER.to_string()),
                default_venue: non_blank_var("APP_CALENDAR_DEFAULT_VENUE")
                    .unwrap_or_else(|| CalendarConfig::DEFAULT_VENUE.to_string()),
                outbox_capacity,
            },
        })
    }
}

fn non_blank_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub const DEFAULT_PORT: u16 = 3000;

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        } else {
            self.host
                .parse()
                .map_err(|source| ConfigError::InvalidHost {
                    host: self.host.clone(),
                    source,
                })?
        };
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Defaults stamped onto generated calendar events, plus the sync outbox bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarConfig {
    pub organizer: String,
    pub default_venue: String,
    /// Oldest sync failures are dropped once this many are held.
    pub outbox_capacity: usize,
}

impl CalendarConfig {
    pub const DEFAULT_ORGANIZER: &'static str = "Placement Cell";
    pub const DEFAULT_VENUE: &'static str = "TBD";
    pub const DEFAULT_OUTBOX_CAPACITY: usize = 500;
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            organizer: Self::DEFAULT_ORGANIZER.to_string(),
            default_venue: Self::DEFAULT_VENUE.to_string(),
            outbox_capacity: Self::DEFAULT_OUTBOX_CAPACITY,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("APP_PORT must be a port number, got '{0}'")]
    InvalidPort(String),
    #[error("APP_HOST '{host}' is neither localhost nor an IP address")]
    InvalidHost {
        host: String,
        #[source]
        source: AddrParseError,
    },
    #[error("APP_CALENDAR_OUTBOX_CAPACITY must be a positive integer, got '{0}'")]
    InvalidOutboxCapacity(String),
}
