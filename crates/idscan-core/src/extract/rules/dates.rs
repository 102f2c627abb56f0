//! Date extraction and role assignment for identity cards.
//!
//! Card dates are printed without reliable labels, but they are always
//! ordered: birth < issue < expiry. Every date-shaped substring is collected,
//! sorted chronologically and assigned to roles by position.

use chrono::NaiveDate;
use tracing::{debug, warn};

use super::patterns::CARD_DATE;
use super::{ExtractionMatch, FieldExtractor};

/// Number of date roles on a card (birth, issue, expiry).
pub const DATE_ROLES: usize = 3;

/// Date extractor.
///
/// Each match carries the parsed calendar date, or `None` when the matched
/// text is date-shaped but not a real date (e.g. `31 Feb 2020`).
#[derive(Debug, Default)]
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<Option<NaiveDate>>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        CARD_DATE
            .find_iter(text)
            .map(|m| {
                ExtractionMatch::new(parse_card_date(m.as_str()), m.as_str())
                    .with_position(m.start(), m.end())
            })
            .collect()
    }
}

/// Parse a card date such as `15 Mar 2015`, `1 March, 2015` or `01 Sep. 2030`.
///
/// The month is taken from its three-letter abbreviation. Returns `None` for
/// text that does not have the card date shape or is not a calendar date.
pub fn parse_card_date(text: &str) -> Option<NaiveDate> {
    let caps = CARD_DATE.captures(text)?;
    let day: u32 = caps[1].parse().ok()?;
    let month = month_abbreviation_to_number(&caps[2])?;
    let year: i32 = caps[3].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Dates assigned to their roles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateRoles {
    /// Earliest date.
    pub date_of_birth: Option<String>,
    /// Second earliest date.
    pub date_of_issue: Option<String>,
    /// Third earliest date.
    pub date_of_expiry: Option<String>,
    /// Date-shaped text that is not a calendar date, left out of the ordering.
    pub unparseable: Vec<String>,
    /// Valid dates beyond the third, in chronological order.
    pub discarded: Vec<String>,
}

/// Sort date matches chronologically and assign them to roles.
///
/// Equal dates keep their order of appearance. Unparseable dates are
/// excluded from the ordering and never fill a role.
pub fn assign_date_roles(matches: Vec<ExtractionMatch<Option<NaiveDate>>>) -> DateRoles {
    let mut roles = DateRoles::default();
    let mut dated: Vec<(NaiveDate, String)> = Vec::with_capacity(matches.len());

    for m in matches {
        match m.value {
            Some(date) => dated.push((date, m.source)),
            None => {
                warn!("Ignoring unparseable date {:?}", m.source);
                roles.unparseable.push(m.source);
            }
        }
    }

    // Stable: ties keep their textual order.
    dated.sort_by_key(|(date, _)| *date);

    let mut ordered = dated.into_iter().map(|(_, text)| text);
    roles.date_of_birth = ordered.next();
    roles.date_of_issue = ordered.next();
    roles.date_of_expiry = ordered.next();
    roles.discarded = ordered.collect();

    if !roles.discarded.is_empty() {
        debug!(
            "Discarding {} extra dates beyond the {} card roles",
            roles.discarded.len(),
            DATE_ROLES
        );
    }

    roles
}

/// Extract all card dates from text and assign them to roles.
pub fn extract_date_roles(text: &str) -> DateRoles {
    assign_date_roles(DateExtractor::new().extract_all(text))
}

fn month_abbreviation_to_number(month: &str) -> Option<u32> {
    let number = match month {
        "Jan" => 1,
        "Feb" => 2,
        "Mar" => 3,
        "Apr" => 4,
        "May" => 5,
        "Jun" => 6,
        "Jul" => 7,
        "Aug" => 8,
        "Sep" => 9,
        "Oct" => 10,
        "Nov" => 11,
        "Dec" => 12,
        _ => return None,
    };
    Some(number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_card_date_variants() {
        assert_eq!(parse_card_date("15 Mar 2015"), Some(date(2015, 3, 15)));
        assert_eq!(parse_card_date("1 March 2015"), Some(date(2015, 3, 1)));
        assert_eq!(parse_card_date("01 Sep. 2030"), Some(date(2030, 9, 1)));
        assert_eq!(parse_card_date("9 Dec, 1985"), Some(date(1985, 12, 9)));
        assert_eq!(parse_card_date("21 Jun.,  2001"), Some(date(2001, 6, 21)));
    }

    #[test]
    fn test_parse_card_date_invalid() {
        assert_eq!(parse_card_date("31 Feb 2020"), None);
        assert_eq!(parse_card_date("0 Jan 2020"), None);
        assert_eq!(parse_card_date("15 mar 2015"), None);
        assert_eq!(parse_card_date("15/03/2015"), None);
        assert_eq!(parse_card_date(""), None);
    }

    #[test]
    fn test_extract_all_in_order_of_appearance() {
        let text = "Expiry 15 Mar 2025\nBirth 01 Jan 1990\nIssue 15 Mar 2015";
        let matches = DateExtractor::new().extract_all(text);

        let sources: Vec<&str> = matches.iter().map(|m| m.source.as_str()).collect();
        assert_eq!(sources, vec!["15 Mar 2025", "01 Jan 1990", "15 Mar 2015"]);
        assert_eq!(matches[0].position, Some((7, 18)));
    }

    #[test]
    fn test_roles_follow_chronology_not_position() {
        let roles = extract_date_roles("15 Mar 2025 01 Jan 1990 15 Mar 2015");

        assert_eq!(roles.date_of_birth.as_deref(), Some("01 Jan 1990"));
        assert_eq!(roles.date_of_issue.as_deref(), Some("15 Mar 2015"));
        assert_eq!(roles.date_of_expiry.as_deref(), Some("15 Mar 2025"));
    }

    #[test]
    fn test_two_dates_leave_expiry_empty() {
        let roles = extract_date_roles("Issued 4 Jul. 2019, born 12 Oct 1975");

        assert_eq!(roles.date_of_birth.as_deref(), Some("12 Oct 1975"));
        assert_eq!(roles.date_of_issue.as_deref(), Some("4 Jul. 2019"));
        assert_eq!(roles.date_of_expiry, None);
    }

    #[test]
    fn test_duplicates_fill_adjacent_roles() {
        let roles = extract_date_roles("01 Jan 1990 then 05 May 2020 and 05 May 2020");

        assert_eq!(roles.date_of_birth.as_deref(), Some("01 Jan 1990"));
        assert_eq!(roles.date_of_issue.as_deref(), Some("05 May 2020"));
        assert_eq!(roles.date_of_expiry.as_deref(), Some("05 May 2020"));
    }

    #[test]
    fn test_equal_dates_keep_textual_order() {
        // Same calendar date, different spellings.
        let roles = extract_date_roles("3 March 2010 / 03 Mar 2010 / 1 Jan 1980");

        assert_eq!(roles.date_of_birth.as_deref(), Some("1 Jan 1980"));
        assert_eq!(roles.date_of_issue.as_deref(), Some("3 March 2010"));
        assert_eq!(roles.date_of_expiry.as_deref(), Some("03 Mar 2010"));
    }

    #[test]
    fn test_extra_dates_are_discarded() {
        let roles = extract_date_roles("1 Jan 2000 1 Jan 2001 1 Jan 2002 1 Jan 2003 1 Jan 1999");

        assert_eq!(roles.date_of_birth.as_deref(), Some("1 Jan 1999"));
        assert_eq!(roles.date_of_issue.as_deref(), Some("1 Jan 2000"));
        assert_eq!(roles.date_of_expiry.as_deref(), Some("1 Jan 2001"));
        assert_eq!(roles.discarded, vec!["1 Jan 2002", "1 Jan 2003"]);
    }

    #[test]
    fn test_unparseable_dates_are_excluded() {
        let roles = extract_date_roles("30 Feb 1990 01 Jan 1990 15 Mar 2015");

        assert_eq!(roles.date_of_birth.as_deref(), Some("01 Jan 1990"));
        assert_eq!(roles.date_of_issue.as_deref(), Some("15 Mar 2015"));
        assert_eq!(roles.date_of_expiry, None);
        assert_eq!(roles.unparseable, vec!["30 Feb 1990"]);
    }

    #[test]
    fn test_thai_text_adjacent_to_dates() {
        let roles = extract_date_roles("วันเกิด14 Aug. 1977\nวันออกบัตร 1 Feb. 2015วันหมดอายุ\n13 Aug. 2024");

        assert_eq!(roles.date_of_birth.as_deref(), Some("14 Aug. 1977"));
        assert_eq!(roles.date_of_issue.as_deref(), Some("1 Feb. 2015"));
        assert_eq!(roles.date_of_expiry.as_deref(), Some("13 Aug. 2024"));
    }

    #[test]
    fn test_no_dates() {
        assert_eq!(extract_date_roles(""), DateRoles::default());
        assert_eq!(extract_date_roles("Date of Birth: unknown"), DateRoles::default());
    }
}
