//! Identification number extraction.

use super::patterns::ID_NUMBER;
use super::{ExtractionMatch, FieldExtractor};

/// Identification number extractor.
///
/// Matches the grouped shape `D{1,2} D{4} D{5} D{2} D{1}` and keeps the
/// matched text verbatim, spaces included.
#[derive(Debug, Default)]
pub struct IdNumberExtractor;

impl IdNumberExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for IdNumberExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        ID_NUMBER.find(text).map(|m| {
            ExtractionMatch::new(m.as_str().to_string(), m.as_str()).with_position(m.start(), m.end())
        })
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        ID_NUMBER
            .find_iter(text)
            .map(|m| {
                ExtractionMatch::new(m.as_str().to_string(), m.as_str())
                    .with_position(m.start(), m.end())
            })
            .collect()
    }
}

/// Extract the first identification number from text.
pub fn extract_identification_number(text: &str) -> Option<String> {
    IdNumberExtractor::new().extract(text).map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_id_number() {
        let text = "Identification Number\n1 1037 02214 81 4\nThai National ID Card";
        assert_eq!(
            extract_identification_number(text),
            Some("1 1037 02214 81 4".to_string())
        );
    }

    #[test]
    fn test_two_digit_leading_group() {
        assert_eq!(
            extract_identification_number("ID 12 3456 78901 23 4"),
            Some("12 3456 78901 23 4".to_string())
        );
    }

    #[test]
    fn test_first_match_wins() {
        let text = "1 1111 11111 11 1 and later 2 2222 22222 22 2";
        assert_eq!(
            extract_identification_number(text),
            Some("1 1111 11111 11 1".to_string())
        );

        let all = IdNumberExtractor::new().extract_all(text);
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].value, "2 2222 22222 22 2");
        assert_eq!(all[0].position, Some((0, 17)));
    }

    #[test]
    fn test_wrong_grouping_is_ignored() {
        assert_eq!(extract_identification_number("1 103 02214 81 4"), None);
        assert_eq!(extract_identification_number("1-1037-02214-81-4"), None);
        assert_eq!(extract_identification_number("1103702214814"), None);
        assert_eq!(extract_identification_number(""), None);
    }
}
