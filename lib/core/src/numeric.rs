use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+(?:\.[0-9]*)?").expect("static number pattern"));

/// Numeric quantity carried by an attribute value
///
/// Numbers pass through as `f64`. Strings yield their leftmost digit run,
/// including an optional fractional part (`"12.5 kg"` -> `12.5`,
/// `"5. items"` -> `5.0`). Everything else, and strings without digits,
/// yield `None`.
pub fn extract_numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => extract_numeric_str(s),
        _ => None,
    }
}

/// String form of [`extract_numeric`]
pub fn extract_numeric_str(text: &str) -> Option<f64> {
    LEADING_NUMBER
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}
