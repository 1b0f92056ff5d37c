use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::recommend::ReasonLocale;

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
    pub recommend: RecommendConfig,
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

        let locale = match env::var("APP_REASON_LOCALE") {
            Ok(raw) => ReasonLocale::parse(&raw).ok_or(ConfigError::InvalidLocale { value: raw })?,
            Err(_) => ReasonLocale::default(),
        };
        let recommended_limit = positive_var("APP_RECOMMEND_LIMIT", DEFAULT_RECOMMENDED_LIMIT)
            .map_err(|value| ConfigError::InvalidLimit { value })?;
        let page_size = positive_var("APP_PAGE_SIZE", DEFAULT_PAGE_SIZE)
            .map_err(|value| ConfigError::InvalidPageSize { value })?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            recommend: RecommendConfig {
                locale,
                recommended_limit,
                page_size,
            },
        })
    }
}

fn positive_var(key: &str, default: usize) -> Result<usize, String> {
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<usize>() {
            Ok(value) if value > 0 => Ok(value),
            _ => Err(raw),
        },
        Err(_) => Ok(default),
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

pub const DEFAULT_RECOMMENDED_LIMIT: usize = 6;
pub const DEFAULT_PAGE_SIZE: usize = crate::catalog::query::DEFAULT_PAGE_SIZE;

/// Knobs for the recommendation endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendConfig {
    pub locale: ReasonLocale,
    pub recommended_limit: usize,
    pub page_size: usize,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            locale: ReasonLocale::default(),
            recommended_limit: DEFAULT_RECOMMENDED_LIMIT,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidLocale { value: String },
    InvalidLimit { value: String },
    InvalidPageSize { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidLocale { value } => {
                write!(f, "APP_REASON_LOCALE must be 'zh' or 'en', got '{value}'")
            }
            ConfigError::InvalidLimit { value } => {
                write!(f, "APP_RECOMMEND_LIMIT must be a positive integer, got '{value}'")
            }
            ConfigError::InvalidPageSize { value } => {
                write!(f, "APP_PAGE_SIZE must be a positive integer, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidLocale { .. }
            | ConfigError::InvalidLimit { .. }
            | ConfigError::InvalidPageSize { .. } => None,
        }
    }
}
