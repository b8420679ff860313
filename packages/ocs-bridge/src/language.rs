use std::fmt;
use std::str::FromStr;

use crate::error::OcrError;

pub const SEPARATOR: &str = "+";

/// Recognition languages in priority order, e.g. `en-US+de-DE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageList(Vec<String>);

impl LanguageList {
    pub fn parse(input: &str) -> Result<Self, OcrError> {
        let mut tags = Vec::new();
        for tag in input.split(SEPARATOR).filter(|t| !t.is_empty()) {
            if tag.chars().any(|c| c.is_whitespace() || c.is_control()) {
                return Err(OcrError::InvalidLanguages(format!(
                    "malformed language tag {tag:?}"
                )));
            }
            tags.push(tag.to_string());
        }

        if tags.is_empty() {
            return Err(OcrError::InvalidLanguages(format!(
                "no language tags in {input:?}"
            )));
        }
        Ok(Self(tags))
    }

    pub fn tags(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a parsed list.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for LanguageList {
    type Err = OcrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for LanguageList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(SEPARATOR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_tag() {
        let list = LanguageList::parse("en-US").unwrap();
        assert_eq!(list.tags(), ["en-US"]);
    }

    #[test]
    fn parses_joined_tags_in_order() {
        let list: LanguageList = "en-US+ru-RU+de-DE".parse().unwrap();
        assert_eq!(list.tags(), ["en-US", "ru-RU", "de-DE"]);
        assert_eq!(list.to_string(), "en-US+ru-RU+de-DE");
    }

    #[test]
    fn skips_empty_segments() {
        let list = LanguageList::parse("+en++fr+").unwrap();
        assert_eq!(list.tags(), ["en", "fr"]);
    }

    #[test]
    fn rejects_empty_and_separator_only() {
        for input in ["", "+", "+++"] {
            let err = LanguageList::parse(input).unwrap_err();
            assert!(err.is_input_error(), "{input:?}");
        }
    }

    #[test]
    fn rejects_whitespace_inside_tag() {
        assert!(matches!(
            LanguageList::parse("en US"),
            Err(OcrError::InvalidLanguages(_))
        ));
        assert!(LanguageList::parse("en+ fr").is_err());
    }
}
