//! Serde utilities for backend rows.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Deserializes row identifiers that may be UUID strings or integer keys.
pub mod string_or_number {
    use super::{Deserializer, Visitor, de, fmt};

    /// Deserializes a string from a string or number.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is neither a string nor a number.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct StringOrNumberVisitor;

        impl Visitor<'_> for StringOrNumberVisitor {
            type Value = String;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or integer row id")
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(value.to_string())
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(value.to_string())
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(value.to_string())
            }
        }

        deserializer.deserialize_any(StringOrNumberVisitor)
    }
}

/// Deserializes a nullable array of strings, treating `null` as empty.
///
/// # Errors
///
/// Returns an error if the value is neither `null` nor an array of strings.
pub fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(with = "string_or_number")]
        id: String,
        #[serde(default, deserialize_with = "null_as_empty")]
        media_urls: Vec<String>,
    }

    #[test]
    fn test_numeric_id() {
        let row: Row = serde_json::from_str(r#"{"id": 42, "media_urls": ["a.jpg"]}"#).unwrap();
        assert_eq!(row.id, "42");
        assert_eq!(row.media_urls, vec!["a.jpg"]);
    }

    #[test]
    fn test_string_id_and_null_media() {
        let row: Row =
            serde_json::from_str(r#"{"id": "5b0c-uuid", "media_urls": null}"#).unwrap();
        assert_eq!(row.id, "5b0c-uuid");
        assert!(row.media_urls.is_empty());
    }

    #[test]
    fn test_missing_media() {
        let row: Row = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert!(row.media_urls.is_empty());
    }

    #[test]
    fn test_rejects_object_id() {
        let result = serde_json::from_str::<Row>(r#"{"id": {}, "media_urls": []}"#);
        assert!(result.is_err());
    }
}
