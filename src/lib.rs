//! # careportal
//!
//! REST backend of a healthcare portal: patients book appointments and submit
//! symptoms for analysis, doctors and admins manage users.
//!
//! ## Features
//!
//! - **Access gate**: per-route role allow-lists with ordered attribute-based
//!   exceptions, evaluated before any handler or body parsing
//! - **Declarative validation**: per-field rule chains of sanitizers and
//!   checks, reporting every failure at once
//! - **Typed errors**: every failure renders as a `{success, code, message}`
//!   JSON body with the right status
//! - **Pluggable collaborators**: identity provider, repositories and symptom
//!   analyzer are traits with in-memory defaults
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use careportal::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     ServerBuilder::new()
//!         .with_config(PortalConfig::from_env()?)
//!         .serve()
//!         .await
//! }
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod handlers;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        access::{AccessGate, AccessRule, Condition, Effect, RequestAttributes, RolePolicy, RouteAccess},
        auth::{AuthContext, AuthProvider, HeaderAuthProvider, NoAuthProvider, Principal, Role},
        error::{PortalError, PortalResult},
        service::{AnalysisOutcome, DeferredAnalyzer, Record, Repository, SymptomAnalyzer},
        validation::{FieldRule, RuleSet, Validated, ValidatedBody},
    };

    // === Entities ===
    pub use crate::entities::{Appointment, SymptomAnalysis, User};

    // === Storage ===
    pub use crate::storage::InMemoryRepository;

    // === Config ===
    pub use crate::config::{PortalConfig, ServerConfig, ValidationSettings};

    // === Server ===
    pub use crate::handlers::AppState;
    pub use crate::server::ServerBuilder;

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use uuid::Uuid;
}
