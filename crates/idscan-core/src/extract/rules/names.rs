//! Given name and last name extraction.
//!
//! The two fields are matched independently: a card whose given name cannot
//! be located may still yield a last name and vice versa.

use regex::Regex;

use super::patterns::{given_name_pattern, GIVEN_NAME, LAST_NAME};
use super::{trimmed, ExtractionMatch, FieldExtractor};
use crate::error::ExtractionError;

/// Given name extractor.
#[derive(Debug, Clone)]
pub struct GivenNameExtractor {
    pattern: Regex,
}

impl GivenNameExtractor {
    /// Extractor accepting the default honorifics ("Miss", "Mr").
    pub fn new() -> Self {
        Self {
            pattern: GIVEN_NAME.clone(),
        }
    }

    /// Extractor accepting a custom set of honorifics.
    pub fn with_honorifics<S: AsRef<str>>(honorifics: &[S]) -> Result<Self, ExtractionError> {
        let pattern = given_name_pattern(honorifics).map_err(|e| ExtractionError::Pattern {
            field: "givenName".to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { pattern })
    }
}

impl Default for GivenNameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for GivenNameExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        capture_all(&self.pattern, text)
    }
}

/// Last name extractor.
#[derive(Debug, Default)]
pub struct LastNameExtractor;

impl LastNameExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for LastNameExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        capture_all(&LAST_NAME, text)
    }
}

/// Collect group 1 of every match. A match whose capture trims to nothing
/// ends the search: the first occurrence decides the field.
fn capture_all(pattern: &Regex, text: &str) -> Vec<ExtractionMatch<String>> {
    let mut results = Vec::new();

    for caps in pattern.captures_iter(text) {
        let (Some(full), Some(group)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        match trimmed(group.as_str()) {
            Some(value) => results.push(
                ExtractionMatch::new(value, full.as_str()).with_position(full.start(), full.end()),
            ),
            None if results.is_empty() => break,
            None => {}
        }
    }

    results
}

/// Extract the given name from text.
pub fn extract_given_name(text: &str) -> Option<String> {
    GivenNameExtractor::new().extract(text).map(|m| m.value)
}

/// Extract the last name from text.
pub fn extract_last_name(text: &str) -> Option<String> {
    LastNameExtractor::new().extract(text).map(|m| m.value)
}
