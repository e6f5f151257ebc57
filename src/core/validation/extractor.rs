//! Axum extractor for validated request bodies
//!
//! This module provides the `Validated<T>` extractor that runs the rule set
//! of `T` over the JSON body and hands the handler a typed, sanitized value.

use super::rules::RuleSet;
use crate::config::ValidationSettings;
use crate::core::error::{PortalError, RequestError};
use axum::{
    Json,
    extract::{FromRef, FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Request bodies that declare a rule set
pub trait ValidatedBody: DeserializeOwned {
    /// Get the rule set for this body
    fn rule_set(settings: &ValidationSettings) -> RuleSet;
}

/// Axum extractor that validates, sanitizes and deserializes a JSON body
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn register(
///     State(state): State<AppState>,
///     Validated(payload): Validated<RegisterRequest>,
/// ) -> PortalResult<Json<User>> {
///     // payload passed every registration rule
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Validated<T>(pub T);

impl<T> Validated<T> {
    /// Get the inner payload
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Validated<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: ValidatedBody,
    ValidationSettings: FromRef<S>,
{
    type Rejection = PortalError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload): Json<Value> =
            Json::from_request(req, state)
                .await
                .map_err(|e| RequestError::InvalidBody {
                    message: e.body_text(),
                })?;

        let settings = ValidationSettings::from_ref(state);
        let sanitized = T::rule_set(&settings)
            .validate(payload)
            .map_err(PortalError::fields)?;

        let typed = serde_json::from_value(sanitized)?;
        Ok(Validated(typed))
    }
}
