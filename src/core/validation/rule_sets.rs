//! Rule sets declared per endpoint

use super::rules::{FieldRule, RuleSet};
use super::{filters, validators};
use crate::config::ValidationSettings;

/// Values accepted for a user role
pub const ROLES: &[&str] = &["patient", "doctor", "admin"];

/// `POST /auth/register`
pub fn registration() -> RuleSet {
    RuleSet::new("registration")
        .field(
            FieldRule::new("name")
                .sanitize(filters::trim())
                .check(validators::not_empty())
                .with_message("Name is required")
                .check(validators::max_length(100))
                .with_message("Name cannot exceed 100 characters"),
        )
        .field(
            FieldRule::new("email")
                .check(validators::not_empty())
                .with_message("Email is required")
                .check(validators::email())
                .with_message("Please provide a valid email")
                .sanitize(filters::normalize_email()),
        )
        .field(password_rule())
        .field(role_rule())
        .field(phone_rule())
}

/// `POST /auth/login`
pub fn login() -> RuleSet {
    RuleSet::new("login")
        .field(
            FieldRule::new("email")
                .check(validators::not_empty())
                .with_message("Email is required")
                .check(validators::email())
                .with_message("Please provide a valid email")
                .sanitize(filters::normalize_email()),
        )
        .field(
            FieldRule::new("password")
                .check(validators::string())
                .with_message("Password must be a string")
                .check(validators::not_empty())
                .with_message("Password is required"),
        )
}

/// `POST /appointments`
///
/// The doctor identifier format is only checked when
/// `enforce_doctor_id_format` is set; otherwise any non-empty string passes.
pub fn appointment(settings: &ValidationSettings) -> RuleSet {
    let mut doctor = FieldRule::new("doctor")
        .sanitize(filters::trim())
        .check(validators::string())
        .with_message("Doctor must be a string")
        .check(validators::not_empty())
        .with_message("Doctor is required");
    if settings.enforce_doctor_id_format {
        doctor = doctor
            .check(validators::identifier())
            .with_message("Valid doctor ID is required");
    }

    RuleSet::new("appointment")
        .field(doctor)
        .field(
            FieldRule::new("appointmentDate")
                .check(validators::not_empty())
                .with_message("Appointment date is required")
                .check(validators::calendar_date())
                .with_message("Please provide a valid date"),
        )
        .field(
            FieldRule::new("appointmentTime")
                .sanitize(filters::trim())
                .check(validators::string())
                .with_message("Appointment time must be a string")
                .check(validators::not_empty())
                .with_message("Appointment time is required"),
        )
        .field(
            FieldRule::new("reason")
                .optional()
                .sanitize(filters::trim())
                .check(validators::max_length(500))
                .with_message("Reason cannot exceed 500 characters"),
        )
}

/// `POST /analyses`
pub fn symptoms() -> RuleSet {
    RuleSet::new("symptoms").field(
        FieldRule::new("symptoms")
            .sanitize(filters::trim())
            .check(validators::not_empty())
            .with_message("Symptoms are required")
            .check(validators::string_length(10, 2000))
            .with_message("Symptoms must be between 10 and 2000 characters"),
    )
}

/// `PUT /users/{id}`
pub fn profile_update() -> RuleSet {
    RuleSet::new("profile_update")
        .field(
            FieldRule::new("name")
                .optional()
                .sanitize(filters::trim())
                .check(validators::string_length(1, 100))
                .with_message("Name must be between 1 and 100 characters"),
        )
        .field(role_rule())
        .field(phone_rule())
        .field(
            FieldRule::new("isActive")
                .optional()
                .check(validators::boolean())
                .with_message("isActive must be a boolean"),
        )
}

fn password_rule() -> FieldRule {
    FieldRule::new("password")
        .check(validators::not_empty())
        .with_message("Password is required")
        .check(validators::min_length(8))
        .with_message("Password must be at least 8 characters")
        .check(validators::password_strength())
        .with_message(
            "Password must contain at least one lowercase letter, one uppercase letter, and one number",
        )
}

fn role_rule() -> FieldRule {
    FieldRule::new("role")
        .optional()
        .check(validators::one_of(ROLES))
        .with_message("Invalid role")
}

fn phone_rule() -> FieldRule {
    FieldRule::new("phone")
        .optional()
        .sanitize(filters::trim())
        .check(validators::phone())
        .with_message("Please provide a valid phone number")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn failed_fields(result: Result<serde_json::Value, Vec<crate::core::error::FieldValidationError>>) -> Vec<String> {
        result
            .expect_err("validation should fail")
            .into_iter()
            .map(|e| e.field)
            .collect()
    }

    #[test]
    fn test_registration_minimal_valid() {
        let body = registration()
            .validate(json!({"name": "A", "email": "x@y.com", "password": "Abcdef12"}))
            .expect("valid registration");
        assert_eq!(body["email"], "x@y.com");
        assert!(body.get("role").is_none());
    }

    #[test]
    fn test_registration_weak_password() {
        let fields = failed_fields(registration().validate(
            json!({"name": "A", "email": "x@y.com", "password": "abcdefgh"}),
        ));
        assert_eq!(fields, vec!["password"]);
    }

    #[test]
    fn test_registration_reports_every_failure() {
        let errors = registration()
            .validate(json!({
                "name": "   ",
                "email": "nope",
                "password": "short",
                "role": "nurse",
                "phone": "call me"
            }))
            .expect_err("invalid");
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["name", "email", "password", "password", "role", "phone"]
        );
    }

    #[test]
    fn test_registration_name_limit() {
        let long = "x".repeat(101);
        let fields = failed_fields(registration().validate(
            json!({"name": long, "email": "x@y.com", "password": "Abcdef12"}),
        ));
        assert_eq!(fields, vec!["name"]);

        let ok = "x".repeat(100);
        assert!(registration()
            .validate(json!({"name": ok, "email": "x@y.com", "password": "Abcdef12"}))
            .is_ok());
    }

    #[test]
    fn test_registration_normalizes_email() {
        let body = registration()
            .validate(json!({"name": "A", "email": "X@Y.COM", "password": "Abcdef12"}))
            .expect("valid");
        assert_eq!(body["email"], "x@y.com");
    }

    #[test]
    fn test_login_requires_password_only_present() {
        assert!(login()
            .validate(json!({"email": "x@y.com", "password": "a"}))
            .is_ok());
        let fields = failed_fields(login().validate(json!({"email": "x@y.com"})));
        assert_eq!(fields, vec!["password"]);
    }

    #[test]
    fn test_appointment_invalid_date() {
        let fields = failed_fields(appointment(&ValidationSettings::default()).validate(json!({
            "doctor": "dr-who",
            "appointmentDate": "not-a-date",
            "appointmentTime": "10:00"
        })));
        assert_eq!(fields, vec!["appointmentDate"]);
    }

    #[test]
    fn test_appointment_doctor_format_toggle() {
        let body = json!({
            "doctor": "not-an-identifier",
            "appointmentDate": "2026-11-02",
            "appointmentTime": "10:00"
        });

        assert!(appointment(&ValidationSettings::default())
            .validate(body.clone())
            .is_ok());

        let strict = ValidationSettings {
            enforce_doctor_id_format: true,
        };
        let fields = failed_fields(appointment(&strict).validate(body));
        assert_eq!(fields, vec!["doctor"]);
    }

    #[test]
    fn test_appointment_missing_fields() {
        let fields = failed_fields(
            appointment(&ValidationSettings::default())
                .validate(json!({"doctor": "  ", "appointmentTime": " "})),
        );
        assert_eq!(
            fields,
            vec!["doctor", "appointmentDate", "appointmentTime"]
        );
    }

    #[test]
    fn test_appointment_reason_limit() {
        let fields = failed_fields(appointment(&ValidationSettings::default()).validate(json!({
            "doctor": "d",
            "appointmentDate": "2026-11-02",
            "appointmentTime": "10:00",
            "reason": "r".repeat(501)
        })));
        assert_eq!(fields, vec!["reason"]);
    }

    #[test]
    fn test_symptoms_boundaries() {
        let fields = failed_fields(symptoms().validate(json!({"symptoms": "123456789"})));
        assert_eq!(fields, vec!["symptoms"]);

        assert!(symptoms().validate(json!({"symptoms": "1234567890"})).is_ok());
        assert!(symptoms().validate(json!({"symptoms": "s".repeat(2000)})).is_ok());
        assert!(symptoms().validate(json!({"symptoms": "s".repeat(2001)})).is_err());
    }

    #[test]
    fn test_symptoms_trimmed_before_length_check() {
        assert!(symptoms()
            .validate(json!({"symptoms": "   123456789   "}))
            .is_err());
    }

    #[test]
    fn test_profile_update_all_optional() {
        assert!(profile_update().validate(json!({})).is_ok());
        let fields = failed_fields(profile_update().validate(json!({"role": "root", "isActive": "yes"})));
        assert_eq!(fields, vec!["role", "isActive"]);
    }

    #[test]
    fn test_non_string_values_fail_validation() {
        let mut fields = failed_fields(registration().validate(
            json!({"name": 1, "email": 2, "password": 3, "role": 4, "phone": 5}),
        ));
        fields.dedup();
        assert_eq!(fields, vec!["name", "email", "password", "role", "phone"]);

        let fields = failed_fields(login().validate(json!({"email": 1, "password": 12345678})));
        assert_eq!(fields, vec!["email", "password"]);

        let fields = failed_fields(appointment(&ValidationSettings::default()).validate(json!({
            "doctor": 42,
            "appointmentDate": 20261102,
            "appointmentTime": 1030,
            "reason": false
        })));
        assert_eq!(
            fields,
            vec!["doctor", "appointmentDate", "appointmentTime", "reason"]
        );

        let fields = failed_fields(symptoms().validate(json!({"symptoms": 1234567890})));
        assert_eq!(fields, vec!["symptoms"]);
    }
}
