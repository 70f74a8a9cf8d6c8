//! Snowflake ID wire format
//!
//! IDs are sent to clients as strings because they exceed the integer
//! range JavaScript can represent exactly. Request bodies accept either a
//! string or a number.

use serde::de::{self, Deserializer, Visitor};
use std::fmt;

struct IdVisitor;

impl<'de> Visitor<'de> for IdVisitor {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an ID as a string or integer")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
        i64::try_from(v).map_err(|_| E::custom("ID out of range"))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
        v.trim()
            .parse()
            .map_err(|_| E::custom(format!("invalid ID '{}'", v)))
    }
}

/// Deserialize an ID sent as `"123"` or `123`.
pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(IdVisitor)
}

/// Like [`deserialize`] for optional fields; `null` yields `None`.
pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(serde::Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "deserialize")] i64);

    let wrapper: Option<Wrapper> = serde::Deserialize::deserialize(deserializer)?;
    Ok(wrapper.map(|Wrapper(id)| id))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Body {
        #[serde(deserialize_with = "super::deserialize")]
        id: i64,
        #[serde(default, deserialize_with = "super::deserialize_option")]
        other: Option<i64>,
    }

    #[test]
    fn test_accepts_string_and_number() {
        let body: Body = serde_json::from_str(r#"{"id": "7212345678901234567"}"#).unwrap();
        assert_eq!(body.id, 7212345678901234567);
        assert_eq!(body.other, None);

        let body: Body = serde_json::from_str(r#"{"id": 42, "other": "5"}"#).unwrap();
        assert_eq!(body.id, 42);
        assert_eq!(body.other, Some(5));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(serde_json::from_str::<Body>(r#"{"id": "abc"}"#).is_err());
    }
}
