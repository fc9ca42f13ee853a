// # Draft Form
//
// Presentation-facing state of one draft.
//
// The rendering layer feeds raw input in field by field and reads back
// `{value, error}` pairs. Every change re-runs the validator over the whole
// draft, so changing `address.country` immediately re-judges the postal
// code without any other field changing.

use crate::model::{CustomerDraft, FieldPath};
use crate::validation::{RecordValidator, ValidationResult};

/// Value and current error of one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView<'a> {
    pub value: &'a str,
    pub error: Option<&'a str>,
}

/// A draft plus its live validation state
#[derive(Debug, Clone)]
pub struct DraftForm {
    validator: RecordValidator,
    draft: CustomerDraft,
    result: ValidationResult,
}

impl DraftForm {
    /// Empty form whose country starts at the validator's default
    pub fn new(validator: RecordValidator) -> Self {
        let draft = CustomerDraft::with_country(validator.default_country());
        let result = validator.validate(&draft);
        Self {
            validator,
            draft,
            result,
        }
    }

    /// Apply raw input to one field and re-validate
    pub fn set_field(&mut self, field: FieldPath, value: impl Into<String>) -> &ValidationResult {
        self.draft.set(field, value);
        self.revalidate()
    }

    /// Replace the whole draft (e.g. loaded from a file) and re-validate
    ///
    /// A draft without a country takes the validator's default, as a
    /// freshly created form would.
    pub fn load(&mut self, mut draft: CustomerDraft) -> &ValidationResult {
        if draft.address.country.is_empty() {
            draft.address.country = self.validator.default_country().to_string();
        }
        self.draft = draft;
        self.revalidate()
    }

    /// Re-run every rule against the current draft
    pub fn revalidate(&mut self) -> &ValidationResult {
        self.result = self.validator.validate(&self.draft);
        &self.result
    }

    /// Clear every field back to the empty initial state
    pub fn reset(&mut self) {
        self.draft = CustomerDraft::with_country(self.validator.default_country());
        self.result = self.validator.validate(&self.draft);
    }

    pub fn field(&self, field: FieldPath) -> FieldView<'_> {
        FieldView {
            value: self.draft.get(field),
            error: self.result.error(field),
        }
    }

    pub fn draft(&self) -> &CustomerDraft {
        &self.draft
    }

    pub fn validation(&self) -> &ValidationResult {
        &self.result
    }

    pub fn is_valid(&self) -> bool {
        self.result.is_valid()
    }

    pub fn validator(&self) -> &RecordValidator {
        &self.validator
    }

    /// Whether the draft is still in its initial empty state
    pub fn is_pristine(&self) -> bool {
        self.draft == CustomerDraft::with_country(self.validator.default_country())
    }
}
