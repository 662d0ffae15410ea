//! Lenient numeric decoding for values typed into property panels

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Read a finite number from a JSON number or a numeric string
pub fn number_from_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// Deserialize an optional number; empty strings and garbage decode as `None`.
pub fn option_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(value) => {
            let number = number_from_value(&value);
            if number.is_none() {
                tracing::warn!(value = %value, "Ignoring non-numeric value");
            }
            number
        }
    })
}
