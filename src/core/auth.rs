//! Authentication context for careportal
//!
//! The identity of the caller is established by an [`AuthProvider`] before any
//! gate runs. Downstream stages only ever read the resulting [`AuthContext`]:
//! - `Principal` for an authenticated actor with a role
//! - `Anonymous` when no identity was presented

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Header carrying the authenticated user id
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header carrying the authenticated user role
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Role of a principal
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
    Admin,
}

impl Role {
    /// All known roles, in declaration order
    pub const ALL: [Role; 3] = [Role::Patient, Role::Doctor, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Doctor => "doctor",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "patient" => Ok(Role::Patient),
            "doctor" => Ok(Role::Doctor),
            "admin" => Ok(Role::Admin),
            other => Err(anyhow!("Unknown role: {}", other)),
        }
    }
}

/// Authenticated actor attached to a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub id: Uuid,
    pub role: Role,
}

impl Principal {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }
}

/// Authorization context extracted from a request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthContext {
    /// Authenticated user
    Principal(Principal),

    /// No identity presented
    #[default]
    Anonymous,
}

impl AuthContext {
    /// Get the principal if the request is authenticated
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            AuthContext::Principal(p) => Some(p),
            AuthContext::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthContext::Principal(_))
    }

    /// Get the role if the request is authenticated
    pub fn role(&self) -> Option<Role> {
        self.principal().map(|p| p.role)
    }
}

/// Trait for auth providers
///
/// Session issuance and credential checks live outside this crate; a provider
/// only turns whatever the upstream layer attached into an [`AuthContext`].
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Extract auth context from request headers
    ///
    /// Returns `Ok(AuthContext::Anonymous)` when no identity is presented and
    /// an error when an identity is presented but malformed.
    async fn extract_context(&self, headers: &HeaderMap) -> Result<AuthContext>;
}

/// Provider trusting identity headers set by an upstream gateway
///
/// Reads [`USER_ID_HEADER`] and [`USER_ROLE_HEADER`]. Both absent means
/// anonymous; one without the other, or unparsable values, is an error.
#[derive(Debug, Clone, Default)]
pub struct HeaderAuthProvider;

#[async_trait]
impl AuthProvider for HeaderAuthProvider {
    async fn extract_context(&self, headers: &HeaderMap) -> Result<AuthContext> {
        let id = headers.get(USER_ID_HEADER);
        let role = headers.get(USER_ROLE_HEADER);

        match (id, role) {
            (None, None) => Ok(AuthContext::Anonymous),
            (Some(id), Some(role)) => {
                let id = Uuid::parse_str(id.to_str()?.trim())?;
                let role = role.to_str()?.trim().to_ascii_lowercase().parse()?;
                Ok(AuthContext::Principal(Principal::new(id, role)))
            }
            _ => Err(anyhow!(
                "Both {} and {} headers are required",
                USER_ID_HEADER,
                USER_ROLE_HEADER
            )),
        }
    }
}

/// Provider that never authenticates anyone
pub struct NoAuthProvider;

#[async_trait]
impl AuthProvider for NoAuthProvider {
    async fn extract_context(&self, _headers: &HeaderMap) -> Result<AuthContext> {
        Ok(AuthContext::Anonymous)
    }
}
