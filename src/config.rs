use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::datalayer::DbConfig;
use crate::logging::TelemetryConfig;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

/// Where bottles are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(StorageBackend::Postgres),
            "memory" | "in-memory" | "inmemory" => Ok(StorageBackend::Memory),
            other => Err(ConfigError::InvalidValue {
                key: "STORAGE_BACKEND",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidValue { key, value } => {
                write!(f, "Invalid value for {}: {:?}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Process configuration, read once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    pub database: DbConfig,
    pub telemetry: TelemetryConfig,
}

fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
        None => Ok(None),
    }
}

fn parse_flag<F>(lookup: &F, key: &'static str) -> Result<Option<bool>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" | "" => Ok(Some(false)),
            _ => Err(ConfigError::InvalidValue { key, value: raw }),
        },
        None => Ok(None),
    }
}

impl AppConfig {
    /// Read `HOST`, `PORT`, `STORAGE_BACKEND`, the pool settings and the
    /// telemetry switches. Unset variables take their defaults; set but
    /// unparsable ones are errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST")
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = parse_var(&lookup, "PORT")?.unwrap_or(DEFAULT_PORT);

        let storage = match lookup("STORAGE_BACKEND") {
            Some(raw) => raw.parse()?,
            None => StorageBackend::default(),
        };

        Ok(Self {
            host,
            port,
            storage,
            database: Self::database(&lookup)?,
            telemetry: Self::telemetry(&lookup)?,
        })
    }

    fn database<F>(lookup: &F) -> Result<DbConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = DbConfig::new();

        if let Some(url) = lookup("DATABASE_URL").filter(|u| !u.trim().is_empty()) {
            config = config.set_database_url(url);
        }
        if let Some(max) = parse_var(lookup, "DB_MAX_CONNECTIONS")? {
            config = config.set_max_connections(max);
        }
        if let Some(min) = parse_var(lookup, "DB_MIN_CONNECTIONS")? {
            config = config.set_min_connections(min);
        }
        if let Some(secs) = parse_var(lookup, "DB_CONNECT_TIMEOUT_SECS")? {
            config = config.set_connection_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = parse_var(lookup, "DB_IDLE_TIMEOUT_SECS")? {
            config = config.set_idle_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = parse_var(lookup, "DB_MAX_LIFETIME_SECS")? {
            config = config.set_max_lifetime(Duration::from_secs(secs));
        }

        if config.min_connections > config.max_connections {
            return Err(ConfigError::InvalidValue {
                key: "DB_MIN_CONNECTIONS",
                value: config.min_connections.to_string(),
            });
        }

        Ok(config)
    }

    fn telemetry<F>(lookup: &F) -> Result<TelemetryConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = TelemetryConfig::new();

        if let Some(name) = lookup("OTEL_SERVICE_NAME").filter(|n| !n.trim().is_empty()) {
            config = config.with_service_name(name);
        }
        if let Some(endpoint) = lookup("OTEL_EXPORTER_OTLP_ENDPOINT").filter(|e| !e.trim().is_empty()) {
            config = config.with_otlp_endpoint(endpoint);
        }
        if let Some(enable) = parse_flag(lookup, "OTEL_ENABLE_METRICS")? {
            config = config.with_metrics(enable);
        }
        if let Some(enable) = parse_flag(lookup, "OTEL_ENABLE_TRACING")? {
            config = config.with_tracing(enable);
        }
        if let Some(level) = lookup("RUST_LOG").filter(|l| !l.trim().is_empty()) {
            config = config.with_log_level(level);
        }
        if let Some(enable) = parse_flag(lookup, "LOG_JSON")? {
            config = config.with_json_logs(enable);
        }

        Ok(config)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
