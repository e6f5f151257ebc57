//! Shared helpers for driving the portal router in-process

#![allow(dead_code)]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use careportal::config::PortalConfig;
use careportal::core::auth::{Principal, Role, USER_ID_HEADER, USER_ROLE_HEADER};
use careportal::server::ServerBuilder;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

pub fn app() -> Router {
    app_with(PortalConfig::default())
}

pub fn app_with(config: PortalConfig) -> Router {
    ServerBuilder::new()
        .with_config(config)
        .build()
        .expect("router builds")
}

pub fn principal(role: Role) -> Principal {
    Principal::new(Uuid::new_v4(), role)
}

/// Send one request and return status and parsed JSON body
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    as_principal: Option<&Principal>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(p) = as_principal {
        builder = builder
            .header(USER_ID_HEADER, p.id.to_string())
            .header(USER_ROLE_HEADER, p.role.as_str());
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).expect("request"))
        .await
        .expect("infallible");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

pub async fn get(app: &Router, uri: &str, p: Option<&Principal>) -> (StatusCode, Value) {
    send(app, Method::GET, uri, p, None).await
}

pub async fn post(app: &Router, uri: &str, p: Option<&Principal>, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, p, Some(body)).await
}

/// Field names cited by a validation failure body, in order
pub fn error_fields(body: &Value) -> Vec<String> {
    body["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e["field"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
