//! Field rule set
//!
//! Static per-field constraints of a customer draft:
//! - required text fields (phone, names, street, city, state)
//! - email syntax
//! - the country-dependent postal-code rule ([`PostalCodeRules`])
//!
//! `organization` and `address.country` carry no rule.

pub mod postal;

pub use postal::PostalCodeRules;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::FieldPath;

pub const INVALID_EMAIL: &str = "Invalid email format";
pub const INVALID_POSTAL_CODE: &str = "Invalid zip/postal code";

/// What a rule checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Value must be a non-empty string
    Required { message: &'static str },
    /// Required, and must be a syntactically valid email address
    Email { required_message: &'static str },
    /// Must match the pattern registered for the draft's current country
    PostalCode,
}

/// A constraint attached to one field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub field: FieldPath,
    pub kind: RuleKind,
}

const fn required(field: FieldPath, message: &'static str) -> FieldRule {
    FieldRule {
        field,
        kind: RuleKind::Required { message },
    }
}

/// Rules of a customer draft, in form order
pub const CUSTOMER_RULES: &[FieldRule] = &[
    required(FieldPath::PhoneNumber, "Phone number is required"),
    required(FieldPath::FirstName, "First name is required"),
    required(FieldPath::LastName, "Last name is required"),
    FieldRule {
        field: FieldPath::Email,
        kind: RuleKind::Email {
            required_message: "Email is required",
        },
    },
    required(FieldPath::Street, "Street is required"),
    required(FieldPath::City, "City is required"),
    required(FieldPath::State, "State is required"),
    FieldRule {
        field: FieldPath::ZipCode,
        kind: RuleKind::PostalCode,
    },
];

// WHATWG "valid e-mail address" grammar
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
});

/// Whether `value` is a syntactically valid email address
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Rule attached to `field`, if any
pub fn rule_for(field: FieldPath) -> Option<&'static FieldRule> {
    CUSTOMER_RULES.iter().find(|rule| rule.field == field)
}
