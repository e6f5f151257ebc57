//! HTTP handlers for the portal routes
//!
//! Handlers only run after the access gate has let the request through, so
//! they never re-check roles; they only scope listings to the caller.

pub mod analyses;
pub mod appointments;
pub mod auth;
pub mod users;

use crate::config::ValidationSettings;
use crate::core::error::{PortalError, RequestError};
use crate::core::service::{Repository, SymptomAnalyzer};
use crate::entities::{Appointment, SymptomAnalysis, User};
use axum::Json;
use axum::extract::FromRef;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn Repository<User>>,
    pub appointments: Arc<dyn Repository<Appointment>>,
    pub analyses: Arc<dyn Repository<SymptomAnalysis>>,
    pub analyzer: Arc<dyn SymptomAnalyzer>,
    pub validation: ValidationSettings,
}

impl FromRef<AppState> for ValidationSettings {
    fn from_ref(state: &AppState) -> Self {
        state.validation.clone()
    }
}

/// Success envelope: `{"success": true, "data": ...}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

/// Parse a path id, rejecting malformed values with 400
pub fn parse_id(raw: &str) -> Result<Uuid, PortalError> {
    Uuid::parse_str(raw).map_err(|_| {
        RequestError::InvalidId {
            id: raw.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);

        let err = parse_id("abc").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "INVALID_ID");
    }

    #[test]
    fn test_envelope_shape() {
        let Json(body) = ApiResponse::ok(vec![1, 2]);
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": [1, 2]}));
    }
}
