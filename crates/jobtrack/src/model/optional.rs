//! Normalization of optional fields.
//!
//! Form input and stored rows express "no value" three ways: a missing
//! field, an explicit `null`, or an empty string. All three collapse to
//! `None` here so the rest of the crate only ever sees `Option<T>`.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

/// Collapses empty and whitespace-only text to `None`, trimming the rest.
pub fn normalize_text(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == v.len() {
            Some(v)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Parses an ISO `YYYY-MM-DD` date, treating blank input as unset.
pub fn parse_optional_date(value: Option<&str>) -> Result<Option<NaiveDate>, chrono::ParseError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").map(Some),
    }
}

pub(crate) fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(normalize_text(Option::<String>::deserialize(deserializer)?))
}

/// Present-but-blank becomes `Some(None)` (clear); absence is handled by
/// `#[serde(default)]` on the field.
pub(crate) fn patch_text<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Some(normalize_text(Option::<String>::deserialize(
        deserializer,
    )?)))
}

pub(crate) fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    parse_optional_date(raw.as_deref()).map_err(serde::de::Error::custom)
}

pub(crate) fn patch_date<'de, D>(deserializer: D) -> Result<Option<Option<NaiveDate>>, D::Error>
where
    D: Deserializer<'de>,
{
    optional_date(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_forms_are_equal() {
        assert_eq!(normalize_text(None), None);
        assert_eq!(normalize_text(Some(String::new())), None);
        assert_eq!(normalize_text(Some("   ".to_string())), None);
    }

    #[test]
    fn test_text_is_trimmed() {
        assert_eq!(
            normalize_text(Some("  Remote ".to_string())),
            Some("Remote".to_string())
        );
        assert_eq!(
            normalize_text(Some("Berlin".to_string())),
            Some("Berlin".to_string())
        );
    }

    #[test]
    fn test_parse_optional_date() {
        assert_eq!(parse_optional_date(None).unwrap(), None);
        assert_eq!(parse_optional_date(Some("")).unwrap(), None);
        assert_eq!(
            parse_optional_date(Some("2026-03-14")).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 14)
        );
        assert!(parse_optional_date(Some("14/03/2026")).is_err());
    }
}
