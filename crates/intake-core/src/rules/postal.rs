// # Postal Code Rules
//
// Country-indexed postal-code patterns.
//
// The table is an explicit finite mapping: supporting a new country means
// registering a pattern, never touching the validator. Countries without a
// registered pattern accept any postal code.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{Error, Result};

/// Built-in patterns, keyed by country code
const STANDARD_PATTERNS: &[(&str, &str)] = &[
    ("US", r"^[0-9]{5}(-[0-9]{4})?$"),
    ("CA", r"^[A-Za-z]\d[A-Za-z][ -]?\d[A-Za-z]\d$"),
    ("UK", r"^([A-Z]{1,2}\d[A-Z\d]? \d[A-Z]{2}|GIR 0AA)$"),
    ("DE", r"^\d{5}$"),
    ("FR", r"^\d{5}$"),
    ("AU", r"^\d{4}$"),
    ("IN", r"^\d{6}$"),
];

static STANDARD: Lazy<BTreeMap<String, Arc<Regex>>> = Lazy::new(|| {
    STANDARD_PATTERNS
        .iter()
        .map(|(country, pattern)| {
            let regex = Regex::new(pattern).unwrap_or_else(|error| {
                panic!("postal pattern for {country} failed to compile: {error}")
            });
            (country.to_string(), Arc::new(regex))
        })
        .collect()
});

/// Country code → postal-code pattern table
#[derive(Debug, Clone)]
pub struct PostalCodeRules {
    patterns: BTreeMap<String, Arc<Regex>>,
}

impl PostalCodeRules {
    /// Table with the built-in countries (US, CA, UK, DE, FR, AU, IN)
    pub fn standard() -> Self {
        Self {
            patterns: (*STANDARD).clone(),
        }
    }

    /// Table with no registered countries (every postal code accepted)
    pub fn empty() -> Self {
        Self {
            patterns: BTreeMap::new(),
        }
    }

    /// Register or replace the pattern for a country
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `pattern` is not a valid regex.
    pub fn with_pattern(mut self, country: impl Into<String>, pattern: &str) -> Result<Self> {
        let country = country.into();
        let regex = Regex::new(pattern).map_err(|e| {
            Error::config(format!("Invalid postal pattern for {}: {}", country, e))
        })?;
        self.patterns.insert(country, Arc::new(regex));
        Ok(self)
    }

    /// Pattern registered for `country`, or `None` when unconstrained
    ///
    /// Country codes are matched exactly.
    pub fn pattern_for(&self, country: &str) -> Option<&Regex> {
        self.patterns.get(country).map(|regex| regex.as_ref())
    }

    /// Whether `zip_code` is acceptable for `country`
    pub fn accepts(&self, country: &str, zip_code: &str) -> bool {
        match self.pattern_for(country) {
            Some(pattern) => pattern.is_match(zip_code),
            None => true,
        }
    }

    /// Registered country codes, sorted
    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.patterns.keys().map(String::as_str)
    }
}

impl Default for PostalCodeRules {
    fn default() -> Self {
        Self::standard()
    }
}
