//! Declarative field rules
//!
//! A [`RuleSet`] is an ordered list of [`FieldRule`]s. Each field rule holds an
//! ordered list of steps: sanitizers rewrite the value seen by later steps,
//! checks record a failure and let the chain continue.
//!
//! ```rust,ignore
//! let rules = RuleSet::new("registration")
//!     .field(
//!         FieldRule::new("name")
//!             .sanitize(filters::trim())
//!             .check(validators::not_empty())
//!             .with_message("Name is required"),
//!     );
//!
//! let body = rules.validate(payload)?;
//! ```

use crate::core::error::FieldValidationError;
use serde_json::{Map, Value};
use std::sync::Arc;

type CheckFn = Arc<dyn Fn(&str, &Value) -> Result<(), String> + Send + Sync>;
type FilterFn = Arc<dyn Fn(&str, Value) -> anyhow::Result<Value> + Send + Sync>;

#[derive(Clone)]
enum Step {
    Sanitize(FilterFn),
    Check {
        check: CheckFn,
        message: Option<String>,
    },
}

/// Ordered validation chain for one field
#[derive(Clone)]
pub struct FieldRule {
    field: String,
    optional: bool,
    steps: Vec<Step>,
}

impl FieldRule {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            optional: false,
            steps: Vec::new(),
        }
    }

    /// Skip every step of this field when it is absent or `null`
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Append a sanitizer
    pub fn sanitize<F>(mut self, filter: F) -> Self
    where
        F: Fn(&str, Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.steps.push(Step::Sanitize(Arc::new(filter)));
        self
    }

    /// Append a check
    pub fn check<F>(mut self, check: F) -> Self
    where
        F: Fn(&str, &Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.steps.push(Step::Check {
            check: Arc::new(check),
            message: None,
        });
        self
    }

    /// Replace the failure message of the most recently added check
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        if let Some(Step::Check { message: slot, .. }) = self
            .steps
            .iter_mut()
            .rev()
            .find(|s| matches!(s, Step::Check { .. }))
        {
            *slot = Some(message.into());
        }
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Run the chain on one value
    ///
    /// Returns the sanitized value, or `None` when the field is optional and
    /// absent. Failures are appended to `errors` in step order.
    fn apply(&self, value: Option<Value>, errors: &mut Vec<FieldValidationError>) -> Option<Value> {
        let absent = matches!(value, None | Some(Value::Null));
        if self.optional && absent {
            return None;
        }

        let mut current = value.unwrap_or(Value::Null);
        for step in &self.steps {
            match step {
                Step::Sanitize(filter) => match filter(&self.field, current.clone()) {
                    Ok(next) => current = next,
                    Err(e) => errors.push(FieldValidationError::new(&self.field, e.to_string())),
                },
                Step::Check { check, message } => {
                    if let Err(default_message) = check(&self.field, &current) {
                        let message = message.clone().unwrap_or(default_message);
                        errors.push(FieldValidationError::new(&self.field, message));
                    }
                }
            }
        }
        Some(current)
    }
}

impl std::fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRule")
            .field("field", &self.field)
            .field("optional", &self.optional)
            .field("steps", &self.steps.len())
            .finish()
    }
}

/// Ordered collection of field rules for one endpoint
#[derive(Debug, Clone)]
pub struct RuleSet {
    name: &'static str,
    rules: Vec<FieldRule>,
}

impl RuleSet {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            rules: Vec::new(),
        }
    }

    pub fn field(mut self, rule: FieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Validate and sanitize a payload
    ///
    /// Every rule runs; all failures are returned together in declaration
    /// order. On success the payload comes back with sanitized values written
    /// over the originals. Keys without a rule are kept as they are. A
    /// non-object payload is validated as an empty object.
    pub fn validate(&self, payload: Value) -> Result<Value, Vec<FieldValidationError>> {
        let mut object = match payload {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let mut errors = Vec::new();

        for rule in &self.rules {
            let value = object.get(rule.field()).cloned();
            if let Some(sanitized) = rule.apply(value, &mut errors) {
                if !sanitized.is_null() {
                    object.insert(rule.field().to_string(), sanitized);
                }
            }
        }

        if errors.is_empty() {
            Ok(Value::Object(object))
        } else {
            Err(errors)
        }
    }
}
