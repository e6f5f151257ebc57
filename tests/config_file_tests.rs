//! Tests for loading the portal configuration from YAML files

mod common;

use axum::http::StatusCode;
use careportal::config::PortalConfig;
use careportal::core::auth::Role;
use common::*;
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_from_file() {
    let file = write_config(
        r#"
server:
  listen: "0.0.0.0:9000"
validation:
  enforce_doctor_id_format: true
"#,
    );

    let config = PortalConfig::from_yaml_file(file.path().to_str().unwrap()).unwrap();
    assert_eq!(config.listen_addr().unwrap().port(), 9000);
    assert!(config.validation.enforce_doctor_id_format);
}

#[test]
fn test_missing_file_is_an_error() {
    let result = PortalConfig::from_yaml_file("/definitely/not/here/careportal.yaml");
    let message = result.unwrap_err().to_string();
    assert!(message.contains("IO error"), "{}", message);
}

#[test]
fn test_parse_error_names_the_file() {
    let file = write_config("server: [unterminated");
    let path = file.path().to_str().unwrap().to_string();

    let message = PortalConfig::from_yaml_file(&path).unwrap_err().to_string();
    assert!(message.contains(&path), "{}", message);
}

#[test]
fn test_relative_access_path_is_rejected() {
    let file = write_config(
        r#"
access:
  - method: GET
    path: users
    policy: authenticated
"#,
    );
    assert!(PortalConfig::from_yaml_file(file.path().to_str().unwrap()).is_err());
}

#[tokio::test]
async fn test_file_overrides_reach_the_router() {
    let file = write_config(
        r#"
validation:
  enforce_doctor_id_format: true
access:
  - method: POST
    path: /analyses
    policy: "role:patient"
"#,
    );
    let app = app_with(PortalConfig::from_yaml_file(file.path().to_str().unwrap()).unwrap());

    let (status, _) = post(
        &app,
        "/analyses",
        Some(&principal(Role::Doctor)),
        json!({"symptoms": "recurring migraines"}),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = post(
        &app,
        "/appointments",
        Some(&principal(Role::Patient)),
        json!({"doctor": "dr-house", "appointmentDate": "2026-11-02", "appointmentTime": "10:00"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), vec!["doctor"]);
}
