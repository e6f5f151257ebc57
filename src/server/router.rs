//! Router assembly for the portal routes

use crate::core::access::AccessGate;
use crate::core::auth::AuthProvider;
use crate::core::extractors::{authenticate, enforce_access};
use crate::handlers::{AppState, analyses, appointments, auth, users};
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the portal router
///
/// Routes:
/// - GET /health (outside the access gate)
/// - POST /auth/register, POST /auth/login
/// - GET /users, GET /users/stats, GET /users/trends
/// - GET|PUT|DELETE /users/{id}
/// - POST|GET /appointments
/// - POST|GET /analyses
///
/// Every route except `/health` goes through [`enforce_access`] before any
/// extractor runs, so an unauthenticated request is rejected before its body
/// is looked at.
pub fn build_portal_routes(
    state: AppState,
    gate: Arc<AccessGate>,
    provider: Arc<dyn AuthProvider>,
) -> Router {
    let gated = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/users", get(users::list_users))
        .route("/users/stats", get(users::stats))
        .route("/users/trends", get(users::trends))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/appointments",
            post(appointments::create_appointment).get(appointments::list_appointments),
        )
        .route(
            "/analyses",
            post(analyses::submit_analysis).get(analyses::list_analyses),
        )
        .route_layer(from_fn_with_state(gate, enforce_access))
        .layer(from_fn_with_state(provider, authenticate))
        .with_state(state);

    Router::new()
        .route("/health", get(health_check))
        .merge(gated)
        .layer(TraceLayer::new_for_http())
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "careportal"
    }))
}
