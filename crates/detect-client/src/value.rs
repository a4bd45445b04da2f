//! Decoders for the device's string-encoded JSON values.
//!
//! The detection service writes almost every leaf as a string
//! (`"True"`, `"0.5"`, `"12"`), but older firmware emits plain JSON
//! numbers and booleans. Everything here accepts both.

use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

/// Interpret a JSON value as a float.
///
/// Strings are trimmed before parsing. Empty strings, `null` and
/// unparsable input yield `None`.
pub fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.parse::<f64>().ok().filter(|v| v.is_finite())
        }
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Interpret a JSON value as an integer, truncating any fraction.
pub fn as_i64(value: &Value) -> Option<i64> {
    if let Value::Number(n) = value {
        if let Some(i) = n.as_i64() {
            return Some(i);
        }
    }
    as_f64(value).map(|v| v.trunc() as i64)
}

/// Interpret a JSON value as a flag. Only `true` / `"true"` (any case) is set.
pub fn as_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// `deserialize_with` target: float, 0.0 when missing or unparsable.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(as_f64(&value).unwrap_or(0.0))
}

/// `deserialize_with` target: integer, 0 when missing or unparsable.
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(as_i64(&value).unwrap_or(0))
}

/// `deserialize_with` target: optional float (`None` for null, empty or garbage).
pub fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(as_f64(&value))
}

/// `"true"` / `"false"` on the wire, `bool` in Rust.
pub mod flag {
    use super::*;

    pub fn serialize<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(if *value { "true" } else { "false" })
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(as_flag(&value))
    }
}

/// Optional float written back as its shortest string form (`0.5`, `1`).
pub mod opt_number {
    use super::*;

    pub fn serialize<S>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(v) => serializer.serialize_str(&v.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        lenient_opt_f64(deserializer)
    }
}

/// Optional non-negative integer written back as a decimal string.
pub mod opt_count {
    use super::*;

    pub fn serialize<S>(value: &Option<u32>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(v) => serializer.serialize_str(&v.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(as_i64(&value).and_then(|v| u32::try_from(v).ok()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn as_f64_accepts_strings_and_numbers() {
        assert_eq!(as_f64(&json!("0.25")), Some(0.25));
        assert_eq!(as_f64(&json!(" 42 ")), Some(42.0));
        assert_eq!(as_f64(&json!(3.5)), Some(3.5));
        assert_eq!(as_f64(&json!("")), None);
        assert_eq!(as_f64(&json!("abc")), None);
        assert_eq!(as_f64(&Value::Null), None);
    }

    #[test]
    fn as_i64_truncates_fractional_strings() {
        assert_eq!(as_i64(&json!("3.7")), Some(3));
        assert_eq!(as_i64(&json!(12)), Some(12));
        assert_eq!(as_i64(&json!("-2")), Some(-2));
    }

    #[test]
    fn as_flag_is_case_insensitive() {
        assert!(as_flag(&json!("True")));
        assert!(as_flag(&json!("TRUE")));
        assert!(as_flag(&json!(true)));
        assert!(!as_flag(&json!("False")));
        assert!(!as_flag(&json!("yes")));
        assert!(!as_flag(&Value::Null));
    }

    #[derive(Debug, serde::Serialize, serde::Deserialize)]
    struct Sample {
        #[serde(default, with = "flag")]
        enabled: bool,
        #[serde(default, with = "opt_number", skip_serializing_if = "Option::is_none")]
        threshold: Option<f64>,
        #[serde(default, with = "opt_count", skip_serializing_if = "Option::is_none")]
        count: Option<u32>,
    }

    #[test]
    fn string_encoded_fields_are_written_as_strings() {
        let sample = Sample {
            enabled: true,
            threshold: Some(1.0),
            count: Some(20),
        };
        let out = serde_json::to_value(&sample).unwrap();
        assert_eq!(out, json!({ "enabled": "true", "threshold": "1", "count": "20" }));
    }

    #[test]
    fn missing_and_empty_fields_decode_to_none() {
        let parsed: Sample = serde_json::from_str(r#"{ "threshold": "", "count": "-1" }"#).unwrap();
        assert!(!parsed.enabled);
        assert_eq!(parsed.threshold, None);
        assert_eq!(parsed.count, None);
    }
}
