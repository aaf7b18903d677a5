use crate::config::ConfigError;
use crate::infra::SeedError;
use crate::telemetry::TelemetryError;
use crate::workflows::registration::{RepositoryError, UnmappedStatus};
use crate::zoom::ZoomApiError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Seed(SeedError),
    Zoom(ZoomApiError),
    Registration(RepositoryError),
    Task(tokio::task::JoinError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Seed(err) => write!(f, "seed data error: {}", err),
            AppError::Zoom(err) => write!(f, "zoom client error: {}", err),
            AppError::Registration(err) => write!(f, "registration error: {}", err),
            AppError::Task(err) => write!(f, "background task failed: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Seed(err) => Some(err),
            AppError::Zoom(err) => Some(err),
            AppError::Registration(err) => Some(err),
            AppError::Task(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Registration(RepositoryError::RegistrationNotFound { .. }) => {
                StatusCode::NOT_FOUND
            }
            AppError::Registration(RepositoryError::UnmappedStatus(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Registration(
                RepositoryError::RemoteUnavailable(_) | RepositoryError::RemoteRejected(_),
            ) => StatusCode::BAD_GATEWAY,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Seed(_)
            | AppError::Zoom(_)
            | AppError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<SeedError> for AppError {
    fn from(value: SeedError) -> Self {
        Self::Seed(value)
    }
}

impl From<ZoomApiError> for AppError {
    fn from(value: ZoomApiError) -> Self {
        Self::Zoom(value)
    }
}

impl From<RepositoryError> for AppError {
    fn from(value: RepositoryError) -> Self {
        Self::Registration(value)
    }
}

impl From<UnmappedStatus> for AppError {
    fn from(value: UnmappedStatus) -> Self {
        Self::Registration(RepositoryError::UnmappedStatus(value))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::Task(value)
    }
}
