//! Serde helpers for backend identifiers.
//!
//! The backend is not consistent about id types: customers come back with
//! numeric ids, pricing records with string ids. Both decode to `String`.

use serde::de::{self, Deserializer, Visitor};
use std::fmt;

struct IdVisitor;

impl<'de> Visitor<'de> for IdVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string or integer id")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
        Ok(v.to_string())
    }
}

/// Deserializes a required id from a JSON string or integer.
pub fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    deserializer.deserialize_any(IdVisitor)
}

/// Deserializes an optional id from a JSON string, integer or null.
pub fn option_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    struct OptionIdVisitor;

    impl<'de> Visitor<'de> for OptionIdVisitor {
        type Value = Option<String>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an optional string or integer id")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            id(d).map(Some)
        }
    }

    deserializer.deserialize_option(OptionIdVisitor)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Record {
        #[serde(deserialize_with = "super::id")]
        id: String,
        #[serde(default, deserialize_with = "super::option_id")]
        parent: Option<String>,
    }

    #[test]
    fn test_numeric_and_string_ids() {
        let r: Record = serde_json::from_str(r#"{"id": 42, "parent": "abc"}"#).unwrap();
        assert_eq!(r.id, "42");
        assert_eq!(r.parent.as_deref(), Some("abc"));

        let r: Record = serde_json::from_str(r#"{"id": "x-1", "parent": null}"#).unwrap();
        assert_eq!(r.id, "x-1");
        assert!(r.parent.is_none());

        let r: Record = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        assert!(r.parent.is_none());
    }
}
