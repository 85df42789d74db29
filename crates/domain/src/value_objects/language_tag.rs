//! Language tag value object
//!
//! A light BCP-47 shape check: a 2-8 letter primary subtag followed by
//! optional 1-8 character alphanumeric subtags separated by `-`.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::errors::DomainError;

/// Language used when neither the caller nor the vendor specifies one
const DEFAULT_LANGUAGE: &str = "en";

/// A validated language tag such as `en`, `de` or `pt-BR`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageTag(String);

impl LanguageTag {
    /// Parse and validate a language tag
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidLanguageTag` for empty or malformed tags.
    pub fn parse(tag: &str) -> Result<Self, DomainError> {
        let tag = tag.trim();
        let mut subtags = tag.split('-');

        let primary_ok = subtags.next().is_some_and(|primary| {
            (2..=8).contains(&primary.len()) && primary.chars().all(|c| c.is_ascii_alphabetic())
        });
        let rest_ok = subtags.all(|subtag| {
            (1..=8).contains(&subtag.len()) && subtag.chars().all(|c| c.is_ascii_alphanumeric())
        });

        if primary_ok && rest_ok {
            Ok(Self(tag.to_string()))
        } else {
            Err(DomainError::InvalidLanguageTag(tag.to_string()))
        }
    }

    /// English, the vendor-neutral default
    #[must_use]
    pub fn english() -> Self {
        Self(DEFAULT_LANGUAGE.to_string())
    }

    /// Get the tag as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Primary language subtag (`pt` for `pt-BR`)
    #[must_use]
    pub fn primary(&self) -> &str {
        self.0.split('-').next().unwrap_or(DEFAULT_LANGUAGE)
    }
}

impl Default for LanguageTag {
    fn default() -> Self {
        Self::english()
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LanguageTag {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for LanguageTag {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LanguageTag> for String {
    fn from(tag: LanguageTag) -> Self {
        tag.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_and_regional_tags() {
        assert_eq!(LanguageTag::parse("en").unwrap().as_str(), "en");
        assert_eq!(LanguageTag::parse("pt-BR").unwrap().as_str(), "pt-BR");
        assert_eq!(LanguageTag::parse(" de ").unwrap().as_str(), "de");
        assert!(LanguageTag::parse("zh-Hant-TW").is_ok());
    }

    #[test]
    fn rejects_malformed_tags() {
        assert!(LanguageTag::parse("").is_err());
        assert!(LanguageTag::parse("e").is_err());
        assert!(LanguageTag::parse("en_US").is_err());
        assert!(LanguageTag::parse("en-").is_err());
        assert!(LanguageTag::parse("12").is_err());
    }

    #[test]
    fn default_is_english() {
        assert_eq!(LanguageTag::default().as_str(), "en");
    }

    #[test]
    fn primary_subtag() {
        assert_eq!(LanguageTag::parse("pt-BR").unwrap().primary(), "pt");
        assert_eq!(LanguageTag::english().primary(), "en");
    }

    #[test]
    fn serde_validates_on_deserialize() {
        let tag: LanguageTag = serde_json::from_str(r#""ru""#).unwrap();
        assert_eq!(tag.as_str(), "ru");
        assert!(serde_json::from_str::<LanguageTag>(r#""not a tag""#).is_err());
        assert_eq!(serde_json::to_string(&tag).unwrap(), r#""ru""#);
    }
}
