//! Portal users and the request bodies that create or change them

use crate::config::ValidationSettings;
use crate::core::auth::Role;
use crate::core::service::Record;
use crate::core::validation::{RuleSet, ValidatedBody, rule_sets};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// A registered portal user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub is_active: bool,
    #[serde(default, skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create an active user, hashing the password
    pub fn new(name: String, email: String, password: &str, role: Role, phone: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            role,
            phone,
            is_active: true,
            password_hash: hash_password(password),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn verify_password(&self, password: &str) -> bool {
        verify_password(&self.password_hash, password)
    }

    /// Apply a profile update, refreshing `updated_at`
    pub fn apply(&mut self, update: UpdateUserRequest) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(role) = update.role {
            self.role = role;
        }
        if let Some(phone) = update.phone {
            self.phone = Some(phone);
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
        self.updated_at = Utc::now();
    }

    /// Case-insensitive substring match on name or email
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term) || self.email.to_lowercase().contains(&term)
    }
}

impl Record for User {
    const TYPE_NAME: &'static str = "user";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Salted SHA-256, stored as `<salt>$<hex digest>`
pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    format!("{}${}", salt, digest(&salt, password))
}

pub fn verify_password(stored: &str, password: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, expected)) => digest(salt, password) == expected,
        None => false,
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Body of `POST /auth/register`
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl ValidatedBody for RegisterRequest {
    fn rule_set(_: &ValidationSettings) -> RuleSet {
        rule_sets::registration()
    }
}

/// Body of `POST /auth/login`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl ValidatedBody for LoginRequest {
    fn rule_set(_: &ValidationSettings) -> RuleSet {
        rule_sets::login()
    }
}

/// Body of `PUT /users/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl ValidatedBody for UpdateUserRequest {
    fn rule_set(_: &ValidationSettings) -> RuleSet {
        rule_sets::profile_update()
    }
}
