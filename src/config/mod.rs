use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::zoom::ZoomCredentials;

const DEFAULT_WORKSHOP_CAPACITY: u32 = 20;

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
    pub registration: RegistrationBackend,
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

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            registration: RegistrationBackend::from_env()?,
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Which store the registration and workshop ports talk to.
#[derive(Debug, Clone)]
pub enum RegistrationBackend {
    Memory { seed_path: Option<PathBuf> },
    Zoom(ZoomConfig),
}

impl RegistrationBackend {
    fn from_env() -> Result<Self, ConfigError> {
        let backend = env::var("REGISTRATION_BACKEND").unwrap_or_else(|_| "memory".to_string());

        match backend.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => Ok(Self::Memory {
                seed_path: env::var("REGISTRATION_SEED_PATH").ok().map(PathBuf::from),
            }),
            "zoom" => Ok(Self::Zoom(ZoomConfig::from_env()?)),
            _ => Err(ConfigError::UnknownBackend(backend)),
        }
    }
}

/// Zoom server-to-server OAuth app and endpoint settings.
#[derive(Debug, Clone)]
pub struct ZoomConfig {
    pub credentials: ZoomCredentials,
    pub user_id: String,
    pub api_base_url: String,
    pub oauth_url: String,
    pub default_capacity: u32,
}

impl ZoomConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let credentials = ZoomCredentials {
            account_id: required("ZOOM_ACCOUNT_ID")?,
            client_id: required("ZOOM_CLIENT_ID")?,
            client_secret: required("ZOOM_CLIENT_SECRET")?,
        };

        let default_capacity = match env::var("WORKSHOP_DEFAULT_CAPACITY") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidCapacity)?,
            Err(_) => DEFAULT_WORKSHOP_CAPACITY,
        };

        Ok(Self {
            credentials,
            user_id: env::var("ZOOM_USER_ID").unwrap_or_else(|_| "me".to_string()),
            api_base_url: env::var("ZOOM_API_BASE_URL")
                .unwrap_or_else(|_| crate::zoom::DEFAULT_API_BASE_URL.to_string()),
            oauth_url: env::var("ZOOM_OAUTH_URL")
                .unwrap_or_else(|_| crate::zoom::DEFAULT_OAUTH_URL.to_string()),
            default_capacity,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::MissingVar(name))
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidCapacity,
    UnknownBackend(String),
    MissingVar(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidCapacity => {
                write!(f, "WORKSHOP_DEFAULT_CAPACITY must be a non-negative integer")
            }
            ConfigError::UnknownBackend(value) => write!(
                f,
                "REGISTRATION_BACKEND '{}' is not one of 'memory' or 'zoom'",
                value
            ),
            ConfigError::MissingVar(name) => {
                write!(f, "{} is required for the zoom backend", name)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidCapacity
            | ConfigError::UnknownBackend(_)
            | ConfigError::MissingVar(_) => None,
        }
    }
}
