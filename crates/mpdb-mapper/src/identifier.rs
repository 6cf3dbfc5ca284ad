//! Deterministic dedup identifiers for canonical purchases.
//!
//! An identifier is computed purely from the order's stable attributes —
//! no randomness, no processing timestamp — so re-ingesting the same order
//! always yields the same key and the persistence layer dedups on it.

use chrono::{DateTime, NaiveDate};

/// Maximum length of the title slug component. Keeps identifiers bounded
/// and legible; the order id plus date carries the collision resistance.
const SLUG_MAX_LEN: usize = 20;

/// Date component used when the order date is absent or unparsable. A
/// fixed string keeps the identifier deterministic; substituting the
/// processing time would mint a new identifier on every sync.
const FALLBACK_DATE: &str = "00000000";

/// Builds the identifier
/// `source-slug(title)-yyyymmdd-(order id | "order_" + index)`, with runs
/// of repeated `-` collapsed to one.
#[must_use]
pub fn generate_identifier(
    source: &str,
    title: &str,
    order_date: &str,
    native_order_id: Option<&str>,
    index: usize,
) -> String {
    let slug = slugify(title, SLUG_MAX_LEN);
    let date = compact_date(order_date);
    let tail = native_order_id.map_or_else(|| format!("order_{index}"), str::to_string);

    collapse_hyphen_runs(&format!("{source}-{slug}-{date}-{tail}"))
}

/// Lowercase, alphanumeric-and-hyphen slug of a listing title, truncated
/// to `max_len` characters without a trailing hyphen.
fn slugify(title: &str, max_len: usize) -> String {
    let full: String = title
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else if c == ' ' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|&c| c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    full.chars()
        .take(max_len)
        .collect::<String>()
        .trim_end_matches('-')
        .to_string()
}

/// Renders an order date as `YYYYMMDD`. Accepts RFC 3339 timestamps and
/// bare `YYYY-MM-DD` prefixes; anything else renders [`FALLBACK_DATE`].
fn compact_date(raw: &str) -> String {
    let trimmed = raw.trim();

    if let Ok(stamp) = DateTime::parse_from_rfc3339(trimmed) {
        return stamp.format("%Y%m%d").to_string();
    }

    if let Some(prefix) = trimmed.get(..10) {
        if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            return date.format("%Y%m%d").to_string();
        }
    }

    FALLBACK_DATE.to_string()
}

fn collapse_hyphen_runs(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last_was_hyphen = false;
    for c in raw.chars() {
        if c == '-' {
            if !last_was_hyphen {
                out.push(c);
            }
            last_was_hyphen = true;
        } else {
            out.push(c);
            last_was_hyphen = false;
        }
    }
    out
}
