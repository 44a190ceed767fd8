use crate::catalog_import::CatalogImportError;
use crate::config::ConfigError;
use crate::ids::{EntityKind, MemberId};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

/// Rejections raised by the circulation services. None of them are transient;
/// callers surface them as-is.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LibraryError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },
    #[error("{0}")]
    InvalidInput(String),
    #[error("book not available for loan with ISBN: {isbn}")]
    BookNotAvailable { isbn: String },
    #[error("member {member_id} has exceeded loan limit of {limit} books")]
    LoanLimitExceeded { member_id: MemberId, limit: u32 },
}

impl LibraryError {
    pub(crate) fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            LibraryError::NotFound { .. } => StatusCode::NOT_FOUND,
            LibraryError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            LibraryError::BookNotAvailable { .. } | LibraryError::LoanLimitExceeded { .. } => {
                StatusCode::CONFLICT
            }
        }
    }
}

impl IntoResponse for LibraryError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status_code(), body).into_response()
    }
}

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Import(CatalogImportError),
    Library(LibraryError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Import(err) => write!(f, "catalog import error: {}", err),
            AppError::Library(err) => write!(f, "library error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Library(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Library(err) => err.status_code(),
            AppError::Import(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
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

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<CatalogImportError> for AppError {
    fn from(value: CatalogImportError) -> Self {
        Self::Import(value)
    }
}

impl From<LibraryError> for AppError {
    fn from(value: LibraryError) -> Self {
        Self::Library(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_errors_map_to_http_statuses() {
        let missing = LibraryError::not_found(EntityKind::Book, "9780134685991");
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(missing.to_string(), "book not found: 9780134685991");

        let limit = LibraryError::LoanLimitExceeded {
            member_id: MemberId::from("M-1"),
            limit: 5,
        };
        assert_eq!(limit.status_code(), StatusCode::CONFLICT);
        assert!(limit.to_string().contains("loan limit of 5"));

        assert_eq!(
            LibraryError::invalid("Loan is not active").status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn app_error_keeps_library_status() {
        let err = AppError::from(LibraryError::BookNotAvailable {
            isbn: "0306406152".to_string(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
