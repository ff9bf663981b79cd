//! Tolerant date handling for provider payloads.
//!
//! The provider sends `""` or omits the field for unreleased titles, so
//! anything that is not a `YYYY-MM-DD` string collapses to `None`.

use chrono::NaiveDate;
use serde::Deserialize;

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

pub fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_date))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_rejects_blank_and_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("   "), None);
        assert_eq!(parse_date("1999-13-40"), None);
        assert_eq!(
            parse_date(" 1999-03-31 "),
            NaiveDate::from_ymd_opt(1999, 3, 31)
        );
    }
}
