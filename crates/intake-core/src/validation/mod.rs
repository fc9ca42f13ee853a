//! Record validator
//!
//! Validation is a pure function of the whole draft: the postal-code rule
//! reads the sibling `address.country` field, so every call re-evaluates
//! every rule against the draft as it is *now*. Nothing is cached between
//! calls and no rule short-circuits another, so a caller always receives
//! all errors at once.

pub mod form;

pub use form::{DraftForm, FieldView};

use std::collections::BTreeMap;

use crate::model::{CustomerDraft, DEFAULT_COUNTRY, FieldPath};
use crate::rules::{self, CUSTOMER_RULES, PostalCodeRules, RuleKind};

/// Per-field outcome of validating a draft
///
/// Holds one entry for every rule-bearing field; an entry is `None` when
/// the field passed. The draft is valid iff no entry carries a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    fields: BTreeMap<FieldPath, Option<String>>,
}

impl ValidationResult {
    /// Whether every rule passed
    pub fn is_valid(&self) -> bool {
        self.fields.values().all(Option::is_none)
    }

    /// Error message for a field, if it failed
    pub fn error(&self, field: FieldPath) -> Option<&str> {
        self.fields.get(&field).and_then(|message| message.as_deref())
    }

    /// Failing fields with their messages, in form order
    pub fn errors(&self) -> impl Iterator<Item = (FieldPath, &str)> {
        self.fields
            .iter()
            .filter_map(|(field, message)| message.as_deref().map(|m| (*field, m)))
    }

    /// Number of failing fields
    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    /// Fields that were checked, whether they passed or not
    pub fn checked_fields(&self) -> impl Iterator<Item = FieldPath> + '_ {
        self.fields.keys().copied()
    }

    fn record(&mut self, field: FieldPath, message: Option<&str>) {
        self.fields.insert(field, message.map(str::to_string));
    }
}

/// Runs the field rule set against drafts
#[derive(Debug, Clone)]
pub struct RecordValidator {
    postal: PostalCodeRules,
    default_country: String,
}

impl RecordValidator {
    /// Validator with the built-in postal table and default country
    pub fn new() -> Self {
        Self::with_rules(PostalCodeRules::standard(), DEFAULT_COUNTRY)
    }

    /// Validator with a custom postal table and fallback country
    pub fn with_rules(postal: PostalCodeRules, default_country: impl Into<String>) -> Self {
        Self {
            postal,
            default_country: default_country.into(),
        }
    }

    /// Country the postal rule applies to for this draft
    ///
    /// The draft's own `address.country`, or the default when it is empty.
    pub fn country_of<'a>(&'a self, draft: &'a CustomerDraft) -> &'a str {
        if draft.address.country.is_empty() {
            &self.default_country
        } else {
            &draft.address.country
        }
    }

    pub fn default_country(&self) -> &str {
        &self.default_country
    }

    pub fn postal_rules(&self) -> &PostalCodeRules {
        &self.postal
    }

    /// Evaluate every rule against `draft`
    pub fn validate(&self, draft: &CustomerDraft) -> ValidationResult {
        let mut result = ValidationResult::default();
        let country = self.country_of(draft);

        for rule in CUSTOMER_RULES {
            let value = draft.get(rule.field);
            let message = match rule.kind {
                RuleKind::Required { message } => value.is_empty().then_some(message),
                RuleKind::Email { required_message } => {
                    if value.is_empty() {
                        Some(required_message)
                    } else if !rules::is_valid_email(value) {
                        Some(rules::INVALID_EMAIL)
                    } else {
                        None
                    }
                }
                RuleKind::PostalCode => {
                    (!self.postal.accepts(country, value)).then_some(rules::INVALID_POSTAL_CODE)
                }
            };
            result.record(rule.field, message);
        }

        result
    }
}

impl Default for RecordValidator {
    fn default() -> Self {
        Self::new()
    }
}
