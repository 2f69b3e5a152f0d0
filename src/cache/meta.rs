//! Data-version metadata keys
//!
//! The updater stores these once per data release, unversioned and wrapped
//! in the usual `{"content": ...}` envelope.

use serde_json::Value;

/// Key holding the integer data version
pub const VERSION_KEY: &str = "browscap.version";

/// Key holding the release date string
pub const RELEASE_DATE_KEY: &str = "browscap.releaseDate";

/// Key holding the data type string (e.g. `FULL`, `LITE`)
pub const TYPE_KEY: &str = "browscap.type";

/// Default expiration bound by the proxy: ten years, effectively never
pub const DEFAULT_EXPIRATION: u64 = 315_360_000;

/// Coerce a stored version to an integer.
///
/// Numbers are truncated, numeric strings are parsed from their leading
/// digits, booleans map to 0/1. Anything else is 0.
pub fn coerce_version(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => leading_int(s.trim()),
        Value::Bool(b) => i64::from(*b),
        _ => 0,
    }
}

/// Coerce a stored scalar to a string; `None` for arrays and objects
pub fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) | Value::Null => Some(String::new()),
        _ => None,
    }
}

fn leading_int(s: &str) -> i64 {
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().map(|n| sign * n).unwrap_or(0)
}
