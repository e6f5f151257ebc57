//! Core module containing the access gate, identities, validation and errors

pub mod access;
pub mod auth;
pub mod error;
pub mod extractors;
pub mod service;
pub mod validation;

pub use access::{AccessError, AccessGate, RequestAttributes, RolePolicy, RouteAccess};
pub use auth::{AuthContext, AuthProvider, HeaderAuthProvider, NoAuthProvider, Principal, Role};
pub use error::{PortalError, PortalResult};
pub use service::{Record, Repository, SymptomAnalyzer};
