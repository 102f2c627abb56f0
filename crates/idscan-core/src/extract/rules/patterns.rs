//! Common regex patterns for identity card extraction.
//!
//! Labels are matched case-sensitively, the way they are printed on the card.

use lazy_static::lazy_static;
use regex::Regex;

/// Honorifics accepted between the "Name" label and the given name.
pub const DEFAULT_HONORIFICS: [&str; 2] = ["Miss", "Mr"];

lazy_static! {
    // Identification number: digit groups of 1-2, 4, 5, 2 and 1 separated by single spaces
    pub static ref ID_NUMBER: Regex = Regex::new(
        r"[0-9]{1,2} [0-9]{4} [0-9]{5} [0-9]{2} [0-9]"
    ).unwrap();

    // Given name between the "Name" and "Last name" labels
    pub static ref GIVEN_NAME: Regex = given_name_pattern(&DEFAULT_HONORIFICS).unwrap();

    // Rest of the line after the "Last name" label
    pub static ref LAST_NAME: Regex = Regex::new(
        r"Last name\s*([^\n]+)"
    ).unwrap();

    // "15 Mar 2015", "1 March, 2015", "01 Sep. 2030"
    // Word boundaries are ASCII-only so Thai text may touch the date.
    pub static ref CARD_DATE: Regex = Regex::new(
        r"(?-u:\b)([0-9]{1,2})\s+(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[A-Za-z0-9_]*\.?,?\s+([0-9]{4})(?-u:\b)"
    ).unwrap();
}

/// Build the given-name pattern for a set of honorifics.
///
/// With no honorifics the optional honorific group is left out entirely.
pub fn given_name_pattern<S: AsRef<str>>(honorifics: &[S]) -> Result<Regex, regex::Error> {
    let alternatives: Vec<String> = honorifics
        .iter()
        .map(|h| h.as_ref().trim())
        .filter(|h| !h.is_empty())
        .map(regex::escape)
        .collect();

    if alternatives.is_empty() {
        Regex::new(r"Name\s*(\S+)\s*Last name")
    } else {
        Regex::new(&format!(
            r"Name\s*(?:(?:{})\s+)?(\S+)\s*Last name",
            alternatives.join("|")
        ))
    }
}
