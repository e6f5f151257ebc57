//! Reusable field filters
//!
//! These filters transform field values before the following checks run

use anyhow::Result;
use serde_json::Value;

/// Domains whose local part ignores dots and `+tag` suffixes
const GMAIL_DOMAINS: [&str; 2] = ["gmail.com", "googlemail.com"];

/// Filter: trim whitespace from string
pub fn trim() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| {
        if let Some(s) = value.as_str() {
            Ok(Value::String(s.trim().to_string()))
        } else {
            Ok(value)
        }
    }
}

/// Filter: canonicalize an email address
///
/// Trims and lowercases the whole address. For Gmail addresses the dots and
/// any `+tag` suffix are removed from the local part and `googlemail.com` is
/// rewritten to `gmail.com`. Strings without a single `@` are only trimmed
/// and lowercased.
pub fn normalize_email() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| {
        let Some(s) = value.as_str() else {
            return Ok(value);
        };
        let lowered = s.trim().to_lowercase();
        let Some((local, domain)) = lowered.split_once('@') else {
            return Ok(Value::String(lowered));
        };
        if domain.contains('@') {
            return Ok(Value::String(lowered));
        }

        if GMAIL_DOMAINS.contains(&domain) {
            let local = local.split('+').next().unwrap_or_default().replace('.', "");
            Ok(Value::String(format!("{}@gmail.com", local)))
        } else {
            Ok(Value::String(format!("{}@{}", local, domain)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // === trim() ===

    #[test]
    fn test_trim_removes_whitespace() {
        let f = trim();
        let result = f("name", json!("  hello  ")).expect("should not fail");
        assert_eq!(result, json!("hello"));
    }

    #[test]
    fn test_trim_non_string_passthrough() {
        let f = trim();
        assert_eq!(f("age", json!(42)).expect("should not fail"), json!(42));
        assert_eq!(f("name", json!(null)).expect("should not fail"), json!(null));
    }

    #[test]
    fn test_trim_whitespace_only() {
        let f = trim();
        assert_eq!(f("name", json!("   ")).expect("should not fail"), json!(""));
    }

    // === normalize_email() ===

    #[test]
    fn test_normalize_email_lowercases() {
        let f = normalize_email();
        let result = f("email", json!("  Jane.Doe@Clinic.Example.ORG ")).expect("should not fail");
        assert_eq!(result, json!("jane.doe@clinic.example.org"));
    }

    #[test]
    fn test_normalize_email_gmail_rules() {
        let f = normalize_email();
        assert_eq!(
            f("email", json!("John.Smith+portal@GoogleMail.com")).expect("should not fail"),
            json!("johnsmith@gmail.com")
        );
    }

    #[test]
    fn test_normalize_email_keeps_plus_outside_gmail() {
        let f = normalize_email();
        assert_eq!(
            f("email", json!("a+b@y.com")).expect("should not fail"),
            json!("a+b@y.com")
        );
    }

    #[test]
    fn test_normalize_email_non_address_passthrough() {
        let f = normalize_email();
        assert_eq!(f("email", json!("NOPE")).expect("should not fail"), json!("nope"));
        assert_eq!(f("email", json!(7)).expect("should not fail"), json!(7));
    }
}
