//! Axum middleware and extractors for the request pipeline
//!
//! - [`authenticate`] turns request headers into an [`AuthContext`] extension
//! - [`enforce_access`] runs the [`AccessGate`] against the matched route
//! - [`Principal`] can be extracted by handlers behind a non-public route

use crate::core::access::{AccessGate, RequestAttributes};
use crate::core::auth::{AuthContext, AuthProvider, Principal};
use crate::core::error::{PortalError, RequestError};
use axum::extract::{FromRequestParts, MatchedPath, Query, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use std::collections::HashMap;
use std::sync::Arc;

/// Attach the caller's [`AuthContext`] to the request
///
/// Missing or unusable identity headers yield [`AuthContext::Anonymous`]; the
/// gate then rejects the request unless its route is public.
pub async fn authenticate(
    State(provider): State<Arc<dyn AuthProvider>>,
    mut req: Request,
    next: Next,
) -> Response {
    let ctx = match provider.extract_context(req.headers()).await {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::debug!(error = %e, "ignoring unusable identity headers");
            AuthContext::Anonymous
        }
    };
    req.extensions_mut().insert(ctx);
    next.run(req).await
}

/// Run the access gate for the matched route
///
/// Must be installed with `route_layer` so the matched path template is known.
pub async fn enforce_access(
    State(gate): State<Arc<AccessGate>>,
    req: Request,
    next: Next,
) -> Result<Response, PortalError> {
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let ctx = req
        .extensions()
        .get::<AuthContext>()
        .cloned()
        .unwrap_or_default();
    let query = Query::<HashMap<String, String>>::try_from_uri(req.uri())
        .map(|Query(q)| q)
        .unwrap_or_default();

    gate.check(
        req.method().as_str(),
        &path,
        &ctx,
        &RequestAttributes::new(query),
    )?;

    Ok(next.run(req).await)
}

impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = PortalError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .and_then(AuthContext::principal)
            .cloned()
            .ok_or_else(|| RequestError::Unauthenticated.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auth::{HeaderAuthProvider, Role, USER_ID_HEADER, USER_ROLE_HEADER};
    use crate::core::access::{RolePolicy, RouteAccess};
    use axum::Router;
    use axum::body::Body;
    use axum::http::{self, StatusCode};
    use axum::middleware::from_fn_with_state;
    use axum::routing::get;
    use tower::ServiceExt;
    use uuid::Uuid;

    async fn whoami(principal: Principal) -> String {
        principal.role.to_string()
    }

    async fn open() -> &'static str {
        "open"
    }

    fn app() -> Router {
        let provider: Arc<dyn AuthProvider> = Arc::new(HeaderAuthProvider);
        let gate = Arc::new(AccessGate::portal_defaults().with_overrides(vec![
            RouteAccess::new("GET", "/open", RolePolicy::Public),
        ]));
        Router::new()
            .route("/open", get(open))
            .route("/users", get(whoami))
            .route("/users/{id}", get(whoami))
            .route_layer(from_fn_with_state(gate, enforce_access))
            .layer(from_fn_with_state(provider, authenticate))
    }

    fn request(uri: &str, role: Option<Role>) -> Request {
        let mut builder = http::Request::builder().uri(uri);
        if let Some(role) = role {
            builder = builder
                .header(USER_ID_HEADER, Uuid::new_v4().to_string())
                .header(USER_ROLE_HEADER, role.as_str());
        }
        builder.body(Body::empty()).expect("request")
    }

    #[tokio::test]
    async fn test_gate_uses_query_of_matched_route() {
        let resp = app()
            .oneshot(request("/users?role=doctor", Some(Role::Patient)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = app()
            .oneshot(request("/users", Some(Role::Patient)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_gate_uses_path_template() {
        let uri = format!("/users/{}", Uuid::new_v4());
        let resp = app().oneshot(request(&uri, Some(Role::Doctor))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = app().oneshot(request(&uri, Some(Role::Patient))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_anonymous_is_unauthenticated() {
        let resp = app().oneshot(request("/users?role=doctor", None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_malformed_identity_is_unauthenticated() {
        let req = http::Request::builder()
            .uri("/users")
            .header(USER_ID_HEADER, "nope")
            .header(USER_ROLE_HEADER, "admin")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unusable_identity_still_reaches_public_route() {
        let req = http::Request::builder()
            .uri("/open")
            .header(USER_ROLE_HEADER, "guest")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
