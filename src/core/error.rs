//! Typed error handling for careportal
//!
//! Every request-scoped failure is a [`PortalError`]. Each category knows its
//! HTTP status and a stable error code, and the whole type renders itself as a
//! JSON body through [`IntoResponse`].
//!
//! # Error Categories
//!
//! - [`RequestError`]: authentication, authorization and malformed requests
//! - [`ValidationError`]: field rule failures
//! - [`EntityError`]: missing or conflicting records
//! - [`ConfigError`]: configuration parsing
//! - [`StorageError`]: persistence backend failures

use crate::core::access::AccessError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// The main error type for careportal
#[derive(Debug, Error)]
pub enum PortalError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Entity(#[from] EntityError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Should not happen in normal operation
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Per-field failures, only for validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldValidationError>>,
}

impl PortalError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            PortalError::Request(e) => e.status_code(),
            PortalError::Validation(_) => StatusCode::BAD_REQUEST,
            PortalError::Entity(e) => e.status_code(),
            PortalError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PortalError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PortalError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            PortalError::Request(e) => e.error_code(),
            PortalError::Validation(_) => "VALIDATION_ERROR",
            PortalError::Entity(e) => e.error_code(),
            PortalError::Config(_) => "CONFIG_ERROR",
            PortalError::Storage(_) => "STORAGE_ERROR",
            PortalError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        match self {
            PortalError::Validation(ValidationError::FieldErrors(errors)) => ErrorResponse {
                success: false,
                code: self.error_code().to_string(),
                message: "Validation failed".to_string(),
                errors: Some(errors.clone()),
            },
            // Internal details stay in the logs
            PortalError::Config(_) | PortalError::Storage(_) | PortalError::Internal(_) => {
                ErrorResponse {
                    success: false,
                    code: self.error_code().to_string(),
                    message: "Internal server error".to_string(),
                    errors: None,
                }
            }
            _ => ErrorResponse {
                success: false,
                code: self.error_code().to_string(),
                message: self.to_string(),
                errors: None,
            },
        }
    }

    /// Shorthand for a list of field failures
    pub fn fields(errors: Vec<FieldValidationError>) -> Self {
        PortalError::Validation(ValidationError::FieldErrors(errors))
    }
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to HTTP requests
#[derive(Debug, Error)]
pub enum RequestError {
    /// No principal attached to the request
    #[error("Authentication required")]
    Unauthenticated,

    /// Principal lacks the required role or attribute
    #[error("Access denied")]
    Forbidden,

    /// Email/password pair did not match a user
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Body is not valid JSON or does not fit the expected shape
    #[error("Invalid request body: {message}")]
    InvalidBody { message: String },

    /// Path id is not a valid identifier
    #[error("Invalid id format: '{id}'")]
    InvalidId { id: String },

    /// Query string parameter has an unusable value
    #[error("Invalid query parameter '{name}': {message}")]
    InvalidQuery { name: String, message: String },
}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::Unauthenticated => StatusCode::UNAUTHORIZED,
            RequestError::Forbidden => StatusCode::FORBIDDEN,
            RequestError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            RequestError::InvalidBody { .. } => StatusCode::BAD_REQUEST,
            RequestError::InvalidId { .. } => StatusCode::BAD_REQUEST,
            RequestError::InvalidQuery { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::Unauthenticated => "UNAUTHENTICATED",
            RequestError::Forbidden => "FORBIDDEN",
            RequestError::InvalidCredentials => "INVALID_CREDENTIALS",
            RequestError::InvalidBody { .. } => "INVALID_BODY",
            RequestError::InvalidId { .. } => "INVALID_ID",
            RequestError::InvalidQuery { .. } => "INVALID_QUERY",
        }
    }
}

impl From<AccessError> for RequestError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::Unauthenticated => RequestError::Unauthenticated,
            AccessError::Forbidden => RequestError::Forbidden,
        }
    }
}

impl From<AccessError> for PortalError {
    fn from(err: AccessError) -> Self {
        PortalError::Request(err.into())
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl FieldValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors related to input validation
#[derive(Debug, Error)]
pub enum ValidationError {
    /// One or more field rules failed
    #[error("Validation errors: {}", format_fields(.0))]
    FieldErrors(Vec<FieldValidationError>),
}

fn format_fields(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to record operations
#[derive(Debug, Error)]
pub enum EntityError {
    #[error("{entity_type} with id '{id}' not found")]
    NotFound { entity_type: String, id: String },

    #[error("{entity_type} with {field} '{value}' already exists")]
    AlreadyExists {
        entity_type: String,
        field: String,
        value: String,
    },
}

impl EntityError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
            EntityError::AlreadyExists { .. } => StatusCode::CONFLICT,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ENTITY_NOT_FOUND",
            EntityError::AlreadyExists { .. } => "ENTITY_ALREADY_EXISTS",
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config{}: {message}", .file.as_ref().map(|f| format!(" file '{f}'")).unwrap_or_default())]
    ParseError {
        file: Option<String>,
        message: String,
    },

    #[error("Invalid value '{value}' for field '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    #[error("IO error: {message}")]
    IoError { message: String },
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{backend} query error: {message}")]
    QueryError { backend: String, message: String },

    #[error("Storage backend '{backend}' is unavailable")]
    Unavailable { backend: String },
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for PortalError {
    fn from(err: serde_json::Error) -> Self {
        PortalError::Request(RequestError::InvalidBody {
            message: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for PortalError {
    fn from(err: serde_yaml::Error) -> Self {
        PortalError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

impl From<std::io::Error> for PortalError {
    fn from(err: std::io::Error) -> Self {
        PortalError::Config(ConfigError::IoError {
            message: err.to_string(),
        })
    }
}

/// Repository failures surface as storage errors
impl From<anyhow::Error> for PortalError {
    fn from(err: anyhow::Error) -> Self {
        PortalError::Storage(StorageError::QueryError {
            backend: "repository".to_string(),
            message: err.to_string(),
        })
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for careportal operations
pub type PortalResult<T> = Result<T, PortalError>;
