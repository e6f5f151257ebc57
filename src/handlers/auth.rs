//! Registration and login

use super::{ApiResponse, AppState};
use crate::core::auth::{Principal, Role};
use crate::core::error::{EntityError, PortalError, RequestError};
use crate::core::validation::Validated;
use crate::entities::{LoginRequest, RegisterRequest, User};
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

/// Result of a successful login
#[derive(Debug, Serialize)]
pub struct Session {
    pub principal: Principal,
    pub user: User,
}

/// `POST /auth/register`
pub async fn register(
    State(state): State<AppState>,
    Validated(body): Validated<RegisterRequest>,
) -> Result<impl IntoResponse, PortalError> {
    let user = User::new(
        body.name,
        body.email,
        &body.password,
        body.role.unwrap_or(Role::Patient),
        body.phone,
    );
    let email = user.email.clone();
    let user = state
        .users
        .create_unless(user, &|u: &User| u.email == email)
        .await?
        .ok_or_else(|| EntityError::AlreadyExists {
            entity_type: "user".to_string(),
            field: "email".to_string(),
            value: email.clone(),
        })?;
    tracing::debug!(user_id = %user.id, role = %user.role, "user registered");

    Ok((StatusCode::CREATED, ApiResponse::ok(user)))
}

/// `POST /auth/login`
pub async fn login(
    State(state): State<AppState>,
    Validated(body): Validated<LoginRequest>,
) -> Result<Json<ApiResponse<Session>>, PortalError> {
    let user = state
        .users
        .list()
        .await?
        .into_iter()
        .find(|u| u.email == body.email && u.verify_password(&body.password))
        .ok_or(RequestError::InvalidCredentials)?;

    if !user.is_active {
        return Err(RequestError::Forbidden.into());
    }

    tracing::debug!(user_id = %user.id, "login succeeded");
    Ok(ApiResponse::ok(Session {
        principal: Principal::new(user.id, user.role),
        user,
    }))
}
