//! Reusable field validators
//!
//! Each validator is a closure `(field, value) -> Result<(), message>`. String
//! validators reject values that are not JSON strings; `null` is left to
//! [`not_empty`].

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use uuid::Uuid;
use validator::ValidateEmail;

static LOWERCASE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z]").expect("valid regex"));
static UPPERCASE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Z]").expect("valid regex"));
static DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d").expect("valid regex"));

/// Optional leading `+`, then digits, spaces, dashes, dots and parentheses,
/// ending with a digit.
static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?[\d(][\d\s\-().]{5,20}\d$").expect("valid regex")
});

/// Validator: field is present and, for strings, not empty
pub fn not_empty() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value {
        Value::Null => Err(format!("'{}' is required", field)),
        Value::String(s) if s.is_empty() => Err(format!("'{}' must not be empty", field)),
        _ => Ok(()),
    }
}

/// Validator: value is a JSON string
pub fn string() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value {
        Value::Null | Value::String(_) => Ok(()),
        _ => Err(format!("'{}' must be a string", field)),
    }
}

/// Validator: string length (in characters) must be within range
pub fn string_length(
    min: usize,
    max: usize,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| match value {
        Value::Null => Ok(()),
        Value::String(s) => {
            let len = s.chars().count();
            if len < min {
                Err(format!(
                    "'{}' must be at least {} characters (currently: {})",
                    field, min, len
                ))
            } else if len > max {
                Err(format!(
                    "'{}' must not exceed {} characters (currently: {})",
                    field, max, len
                ))
            } else {
                Ok(())
            }
        }
        _ => Err(format!("'{}' must be a string", field)),
    }
}

/// Validator: string length must not exceed maximum
pub fn max_length(max: usize) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    string_length(0, max)
}

/// Validator: string length must reach minimum
pub fn min_length(min: usize) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    string_length(min, usize::MAX)
}

/// Validator: value must be in allowed list
pub fn one_of(
    allowed: &'static [&'static str],
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| match value {
        Value::Null => Ok(()),
        Value::String(s) if allowed.contains(&s.as_str()) => Ok(()),
        other => Err(format!(
            "'{}' must be one of: {:?} (current value: {})",
            field, allowed, other
        )),
    }
}

/// Validator: value must be a JSON boolean
pub fn boolean() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value {
        Value::Null | Value::Bool(_) => Ok(()),
        _ => Err(format!("'{}' must be a boolean", field)),
    }
}

/// Validator: string must be a syntactically valid email address
pub fn email() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value {
        Value::Null => Ok(()),
        Value::String(s) if s.validate_email() => Ok(()),
        _ => Err(format!("'{}' must be a valid email address", field)),
    }
}

/// Validator: password contains a lowercase letter, an uppercase letter and a digit
pub fn password_strength() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value {
        Value::Null => Ok(()),
        Value::String(s) if LOWERCASE.is_match(s) && UPPERCASE.is_match(s) && DIGIT.is_match(s) => {
            Ok(())
        }
        _ => Err(format!(
            "'{}' must contain a lowercase letter, an uppercase letter and a digit",
            field
        )),
    }
}

/// Validator: string looks like a phone number
pub fn phone() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value {
        Value::Null => Ok(()),
        Value::String(s) if PHONE.is_match(s) => Ok(()),
        _ => Err(format!("'{}' must be a valid phone number", field)),
    }
}

/// Validator: string parses as a calendar date
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and naive ISO 8601 date-times.
pub fn calendar_date() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value {
        Value::Null => Ok(()),
        Value::String(s) if parse_calendar_date(s).is_some() => Ok(()),
        _ => Err(format!("'{}' must be a valid date", field)),
    }
}

/// Validator: string is a record identifier (UUID)
pub fn identifier() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value {
        Value::Null => Ok(()),
        Value::String(s) if Uuid::parse_str(s).is_ok() => Ok(()),
        _ => Err(format!("'{}' must be a valid identifier", field)),
    }
}

/// Parse the date part of any accepted date representation
pub fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}
