//! User administration, listing and dashboard figures

use super::{ApiResponse, AppState, parse_id};
use crate::core::auth::Role;
use crate::core::error::{EntityError, PortalError, RequestError};
use crate::core::validation::Validated;
use crate::entities::{UpdateUserRequest, User};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::Uri;
use chrono::{Datelike, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;

/// Number of calendar months reported by `GET /users/trends`
pub const TREND_MONTHS: u32 = 6;

/// Query string of `GET /users`
#[derive(Debug, Default, Deserialize)]
pub struct UserFilter {
    pub role: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_users: usize,
    pub active_users: usize,
    pub by_role: BTreeMap<Role, usize>,
    pub total_appointments: usize,
    pub total_analyses: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyCount {
    /// `YYYY-MM`
    pub month: String,
    pub count: usize,
}

/// `GET /users`
pub async fn list_users(
    State(state): State<AppState>,
    uri: Uri,
) -> Result<Json<ApiResponse<Vec<User>>>, PortalError> {
    let Query(filter) =
        Query::<UserFilter>::try_from_uri(&uri).map_err(|e| RequestError::InvalidQuery {
            name: "query".to_string(),
            message: e.body_text(),
        })?;
    let role = match filter.role.as_deref() {
        Some(raw) => Some(raw.parse::<Role>().map_err(|e| RequestError::InvalidQuery {
            name: "role".to_string(),
            message: e.to_string(),
        })?),
        None => None,
    };

    let mut users: Vec<User> = state
        .users
        .list()
        .await?
        .into_iter()
        .filter(|u| role.is_none_or(|r| u.role == r))
        .filter(|u| {
            filter
                .search
                .as_deref()
                .is_none_or(|term| u.matches_search(term))
        })
        .collect();
    users.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    tracing::debug!(count = users.len(), "listed users");
    Ok(ApiResponse::ok(users))
}

/// `GET /users/stats`
pub async fn stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<UserStats>>, PortalError> {
    let users = state.users.list().await?;

    let mut by_role: BTreeMap<Role, usize> = Role::ALL.iter().map(|r| (*r, 0)).collect();
    for user in &users {
        *by_role.entry(user.role).or_default() += 1;
    }

    Ok(ApiResponse::ok(UserStats {
        total_users: users.len(),
        active_users: users.iter().filter(|u| u.is_active).count(),
        by_role,
        total_appointments: state.appointments.count().await?,
        total_analyses: state.analyses.count().await?,
    }))
}

/// `GET /users/trends`
pub async fn trends(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<MonthlyCount>>>, PortalError> {
    let users = state.users.list().await?;
    let today = Utc::now().date_naive();
    let joined: Vec<NaiveDate> = users.iter().map(|u| u.created_at.date_naive()).collect();
    Ok(ApiResponse::ok(monthly_counts(&joined, today, TREND_MONTHS)))
}

/// Count dates per calendar month for the `months` months ending with the
/// month of `today`, oldest first
pub fn monthly_counts(dates: &[NaiveDate], today: NaiveDate, months: u32) -> Vec<MonthlyCount> {
    let Some(current) = today.with_day(1) else {
        return Vec::new();
    };

    (0..months)
        .rev()
        .filter_map(|back| current.checked_sub_months(Months::new(back)))
        .map(|start| {
            let count = dates
                .iter()
                .filter(|d| d.year() == start.year() && d.month() == start.month())
                .count();
            MonthlyCount {
                month: start.format("%Y-%m").to_string(),
                count,
            }
        })
        .collect()
}

/// `GET /users/{id}`
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<User>>, PortalError> {
    let id = parse_id(&id)?;
    let user = state.users.get(&id).await?.ok_or_else(|| not_found(&id))?;
    Ok(ApiResponse::ok(user))
}

/// `PUT /users/{id}`
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Validated(update): Validated<UpdateUserRequest>,
) -> Result<Json<ApiResponse<User>>, PortalError> {
    let id = parse_id(&id)?;
    let mut user = state.users.get(&id).await?.ok_or_else(|| not_found(&id))?;
    user.apply(update);
    let user = state
        .users
        .update(&id, user)
        .await?
        .ok_or_else(|| not_found(&id))?;

    tracing::debug!(user_id = %id, "user updated");
    Ok(ApiResponse::ok(user))
}

/// `DELETE /users/{id}`
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Value>>, PortalError> {
    let id = parse_id(&id)?;
    if !state.users.delete(&id).await? {
        return Err(not_found(&id));
    }

    tracing::debug!(user_id = %id, "user deleted");
    Ok(ApiResponse::ok(json!({ "id": id })))
}

fn not_found(id: &uuid::Uuid) -> PortalError {
    EntityError::NotFound {
        entity_type: "user".to_string(),
        id: id.to_string(),
    }
    .into()
}
