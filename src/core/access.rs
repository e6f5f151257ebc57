//! Access-control gate
//!
//! Every routed request is checked against a [`RouteAccess`] entry before its
//! handler runs. Evaluation order:
//!
//! 1. `public` routes always proceed.
//! 2. No principal: [`AccessError::Unauthenticated`].
//! 3. The route's exception rules, first match wins.
//! 4. The route's fallback [`RolePolicy`].
//!
//! The gate is a pure decision: it never logs, audits or mutates state.

use crate::core::auth::{AuthContext, Principal, Role};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Rejection produced by the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("access denied")]
    Forbidden,
}

/// Request attributes visible to access rules
#[derive(Debug, Clone, Default)]
pub struct RequestAttributes {
    pub query: HashMap<String, String>,
}

impl RequestAttributes {
    pub fn new(query: HashMap<String, String>) -> Self {
        Self { query }
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }
}

/// Fallback allow-list of a route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RolePolicy {
    /// No principal required
    Public,

    /// Any authenticated principal
    Authenticated,

    /// Principal role must be one of these
    HasRole(Vec<Role>),
}

impl RolePolicy {
    /// Check if a principal satisfies this policy
    pub fn check(&self, principal: &Principal) -> bool {
        match self {
            RolePolicy::Public | RolePolicy::Authenticated => true,
            RolePolicy::HasRole(roles) => roles.contains(&principal.role),
        }
    }

    /// Parse policy from string (for YAML config)
    ///
    /// Accepts `public`, `authenticated`, `admin_only`, `role:<role>` and
    /// `roles:<role>,<role>,...`. Anything else is rejected.
    pub fn parse_policy(s: &str) -> Option<Self> {
        match s.trim() {
            "public" => Some(RolePolicy::Public),
            "authenticated" => Some(RolePolicy::Authenticated),
            "admin_only" => Some(RolePolicy::HasRole(vec![Role::Admin])),
            s => {
                let list = s
                    .strip_prefix("roles:")
                    .or_else(|| s.strip_prefix("role:"))?;
                let roles = list
                    .split(',')
                    .map(|r| r.trim().parse::<Role>().ok())
                    .collect::<Option<Vec<_>>>()?;
                if roles.is_empty() {
                    None
                } else {
                    Some(RolePolicy::HasRole(roles))
                }
            }
        }
    }

    fn as_policy_string(&self) -> String {
        match self {
            RolePolicy::Public => "public".to_string(),
            RolePolicy::Authenticated => "authenticated".to_string(),
            RolePolicy::HasRole(roles) => {
                let names: Vec<&str> = roles.iter().map(Role::as_str).collect();
                format!("roles:{}", names.join(","))
            }
        }
    }
}

impl Serialize for RolePolicy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_policy_string())
    }
}

impl<'de> Deserialize<'de> for RolePolicy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        RolePolicy::parse_policy(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid access policy: {raw}")))
    }
}

/// Outcome of a matching exception rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    Allow,
    Deny,
}

/// Predicate over principal role and request attributes
///
/// Every populated field must match. Query values are compared exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub query: BTreeMap<String, String>,
}

impl Condition {
    pub fn role(role: Role) -> Self {
        Self {
            role: Some(role),
            query: BTreeMap::new(),
        }
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    pub fn matches(&self, principal: &Principal, attrs: &RequestAttributes) -> bool {
        if self.role.is_some_and(|role| role != principal.role) {
            return false;
        }
        self.query
            .iter()
            .all(|(name, expected)| attrs.query_param(name) == Some(expected.as_str()))
    }
}

/// Route-specific exception evaluated ahead of the allow-list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRule {
    pub when: Condition,
    pub effect: Effect,
}

impl AccessRule {
    pub fn allow(when: Condition) -> Self {
        Self {
            when,
            effect: Effect::Allow,
        }
    }

    pub fn deny(when: Condition) -> Self {
        Self {
            when,
            effect: Effect::Deny,
        }
    }
}

/// Access configuration of one route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteAccess {
    /// HTTP method, uppercase
    pub method: String,

    /// Path template as registered on the router (e.g. `/users/{id}`)
    pub path: String,

    /// Fallback allow-list
    pub policy: RolePolicy,

    /// Ordered exceptions, first match wins
    #[serde(default)]
    pub exceptions: Vec<AccessRule>,
}

impl RouteAccess {
    pub fn new(method: &str, path: &str, policy: RolePolicy) -> Self {
        Self {
            method: method.to_ascii_uppercase(),
            path: path.to_string(),
            policy,
            exceptions: Vec::new(),
        }
    }

    pub fn with_exception(mut self, rule: AccessRule) -> Self {
        self.exceptions.push(rule);
        self
    }

    /// Decide whether the request may proceed
    pub fn evaluate(&self, ctx: &AuthContext, attrs: &RequestAttributes) -> Result<(), AccessError> {
        if self.policy == RolePolicy::Public {
            return Ok(());
        }

        let principal = ctx.principal().ok_or(AccessError::Unauthenticated)?;

        if let Some(rule) = self
            .exceptions
            .iter()
            .find(|rule| rule.when.matches(principal, attrs))
        {
            return match rule.effect {
                Effect::Allow => Ok(()),
                Effect::Deny => Err(AccessError::Forbidden),
            };
        }

        if self.policy.check(principal) {
            Ok(())
        } else {
            Err(AccessError::Forbidden)
        }
    }
}

/// Table of route access rules
#[derive(Debug, Clone)]
pub struct AccessGate {
    routes: Vec<RouteAccess>,
}

impl AccessGate {
    pub fn new(routes: Vec<RouteAccess>) -> Self {
        Self { routes }
    }

    /// The portal's built-in access table
    pub fn portal_defaults() -> Self {
        use RolePolicy::{Authenticated, HasRole, Public};

        Self::new(vec![
            RouteAccess::new("POST", "/auth/register", Public),
            RouteAccess::new("POST", "/auth/login", Public),
            RouteAccess::new("GET", "/users/stats", Authenticated),
            RouteAccess::new("GET", "/users/trends", Authenticated),
            RouteAccess::new("GET", "/users", HasRole(vec![Role::Admin, Role::Doctor]))
                .with_exception(AccessRule::allow(
                    Condition::role(Role::Patient).with_query("role", "doctor"),
                )),
            RouteAccess::new("GET", "/users/{id}", HasRole(vec![Role::Admin, Role::Doctor])),
            RouteAccess::new("PUT", "/users/{id}", HasRole(vec![Role::Admin])),
            RouteAccess::new("DELETE", "/users/{id}", HasRole(vec![Role::Admin])),
            RouteAccess::new("POST", "/appointments", Authenticated),
            RouteAccess::new("GET", "/appointments", Authenticated),
            RouteAccess::new("POST", "/analyses", Authenticated),
            RouteAccess::new("GET", "/analyses", Authenticated),
        ])
    }

    /// Replace or append route entries
    pub fn with_overrides(mut self, overrides: Vec<RouteAccess>) -> Self {
        for mut entry in overrides {
            entry.method = entry.method.to_ascii_uppercase();
            match self
                .routes
                .iter_mut()
                .find(|r| r.method == entry.method && r.path == entry.path)
            {
                Some(existing) => *existing = entry,
                None => self.routes.push(entry),
            }
        }
        self
    }

    pub fn policy_for(&self, method: &str, path: &str) -> Option<&RouteAccess> {
        self.routes
            .iter()
            .find(|r| r.method.eq_ignore_ascii_case(method) && r.path == path)
    }

    /// Check a request against the table
    ///
    /// Routes missing from the table require an authenticated principal.
    pub fn check(
        &self,
        method: &str,
        path: &str,
        ctx: &AuthContext,
        attrs: &RequestAttributes,
    ) -> Result<(), AccessError> {
        match self.policy_for(method, path) {
            Some(route) => route.evaluate(ctx, attrs),
            None => ctx.principal().map(|_| ()).ok_or(AccessError::Unauthenticated),
        }
    }

    pub fn routes(&self) -> &[RouteAccess] {
        &self.routes
    }
}

impl Default for AccessGate {
    fn default() -> Self {
        Self::portal_defaults()
    }
}
