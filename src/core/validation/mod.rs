//! Validation and filtering system
//!
//! This module provides a declarative approach to validating and sanitizing
//! request bodies before they reach the handlers.

pub mod extractor;
pub mod filters;
pub mod rule_sets;
pub mod rules;
pub mod validators;

pub use extractor::{Validated, ValidatedBody};
pub use rules::{FieldRule, RuleSet};
