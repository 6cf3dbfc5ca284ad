//! Coercion of heterogeneous monetary representations to a plain `f64`.
//!
//! Upstream APIs disagree on how a price looks: a bare number, a decimal
//! string (sometimes with a trailing currency code), a `{"value": ...}`
//! wrapper, or a `{"amount": {"value": ...}}` wrapper two levels deep.
//! Each shape is classified into [`MoneyShape`] and matched exhaustively —
//! no silent fallthrough on unrecognized structures, which normalize to 0.

use serde_json::Value;

/// The documented money wrappings unwrap at most two levels
/// (`{"amount": {"value": "5"}}` where the inner value is itself wrapped
/// once more is the deepest real-world shape observed).
const MAX_UNWRAP_DEPTH: u8 = 2;

/// The recognized upstream money shapes.
#[derive(Debug)]
enum MoneyShape<'a> {
    Number(f64),
    Text(&'a str),
    ValueWrapped(&'a Value),
    AmountWrapped(&'a Value),
    Unrecognized,
}

fn classify(value: &Value) -> MoneyShape<'_> {
    match value {
        Value::Number(n) => MoneyShape::Number(n.as_f64().unwrap_or(0.0)),
        Value::String(s) => MoneyShape::Text(s),
        Value::Object(map) => {
            if let Some(inner) = map.get("value") {
                MoneyShape::ValueWrapped(inner)
            } else if let Some(inner) = map.get("amount").and_then(|a| a.get("value")) {
                MoneyShape::AmountWrapped(inner)
            } else {
                MoneyShape::Unrecognized
            }
        }
        Value::Null | Value::Bool(_) | Value::Array(_) => MoneyShape::Unrecognized,
    }
}

/// Normalizes any of the documented money shapes to a finite `f64`.
///
/// Absent, null, unparsable, and unrecognized inputs all normalize to
/// `0.0` — never NaN, never an error.
#[must_use]
pub fn normalize_money(value: Option<&Value>) -> f64 {
    value.map_or(0.0, |v| normalize_at_depth(v, 0))
}

fn normalize_at_depth(value: &Value, depth: u8) -> f64 {
    if depth > MAX_UNWRAP_DEPTH {
        return 0.0;
    }

    match classify(value) {
        MoneyShape::Number(n) => {
            if n.is_finite() {
                n
            } else {
                0.0
            }
        }
        MoneyShape::Text(s) => parse_money_text(s),
        MoneyShape::ValueWrapped(inner) | MoneyShape::AmountWrapped(inner) => {
            normalize_at_depth(inner, depth + 1)
        }
        MoneyShape::Unrecognized => 0.0,
    }
}

/// Parses the leading numeric portion of a money string.
///
/// Tolerates a trailing currency code (`"10.50 USD"`); a string with no
/// leading number parses to 0.
fn parse_money_text(raw: &str) -> f64 {
    let trimmed = raw.trim();
    let numeric_len = trimmed
        .char_indices()
        .take_while(|&(i, c)| c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+')))
        .count();

    trimmed[..numeric_len]
        .parse::<f64>()
        .ok()
        .filter(|parsed| parsed.is_finite())
        .unwrap_or(0.0)
}
