//! Dotted/bracketed path lookup over arbitrary JSON.
//!
//! A path string like `"a.b[0].c"` is parsed once into a [`PathExpr`] and
//! reused for every lookup; candidate lists in the mapper compile all of
//! their paths up front.

use serde_json::Value;

/// One step of a path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Plain object key.
    Key(String),
    /// Object key addressing an array, plus an element index: `key[2]`.
    Index { key: String, index: usize },
}

/// A pre-parsed path expression over nested JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpr {
    segments: Vec<Segment>,
}

impl PathExpr {
    /// Parses a dotted path, where a segment may carry a bracketed
    /// non-negative index (`"transactionArray.transaction[0].price"`).
    ///
    /// A bracket suffix that is not a valid index is treated as part of a
    /// literal key rather than rejected — candidate paths are declared in
    /// code and an unusual key name must still be addressable.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        PathExpr {
            segments: raw.split('.').map(parse_segment).collect(),
        }
    }

    /// Walks the expression against `root`.
    ///
    /// Any step that hits `null`, a missing key, a non-object where a key
    /// is needed, a non-array where an index is needed, or an out-of-range
    /// index yields `None`. A final value of `null` also yields `None` —
    /// callers treat explicit null the same as absent. Never panics, never
    /// mutates.
    #[must_use]
    pub fn resolve<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        let mut current = root;
        for segment in &self.segments {
            current = match segment {
                Segment::Key(key) => current.get(key.as_str())?,
                Segment::Index { key, index } => {
                    current.get(key.as_str())?.as_array()?.get(*index)?
                }
            };
            if current.is_null() {
                return None;
            }
        }
        Some(current)
    }
}

fn parse_segment(raw: &str) -> Segment {
    if let Some(open) = raw.find('[') {
        if let Some(body) = raw[open + 1..].strip_suffix(']') {
            if let Ok(index) = body.parse::<usize>() {
                return Segment::Index {
                    key: raw[..open].to_string(),
                    index,
                };
            }
        }
    }
    Segment::Key(raw.to_string())
}

/// Parse-and-resolve convenience for one-off lookups.
#[must_use]
pub fn resolve_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    PathExpr::parse(path).resolve(root)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn resolves_nested_indexed_path() {
        let value = json!({"a": {"b": [{"c": 1}]}});
        assert_eq!(resolve_path(&value, "a.b[0].c"), Some(&json!(1)));
    }

    #[test]
    fn missing_key_resolves_to_none() {
        let value = json!({});
        assert_eq!(resolve_path(&value, "a.b.c"), None);
    }

    #[test]
    fn null_mid_path_resolves_to_none() {
        let value = json!({"a": null});
        assert_eq!(resolve_path(&value, "a.b"), None);
    }

    #[test]
    fn null_leaf_resolves_to_none() {
        let value = json!({"a": {"b": null}});
        assert_eq!(resolve_path(&value, "a.b"), None);
    }

    #[test]
    fn index_into_non_array_resolves_to_none() {
        let value = json!({"a": {"b": "scalar"}});
        assert_eq!(resolve_path(&value, "a.b[0]"), None);
    }

    #[test]
    fn index_out_of_range_resolves_to_none() {
        let value = json!({"a": {"b": [1]}});
        assert_eq!(resolve_path(&value, "a.b[3]"), None);
    }

    #[test]
    fn key_lookup_on_scalar_resolves_to_none() {
        let value = json!(42);
        assert_eq!(resolve_path(&value, "a"), None);
    }

    #[test]
    fn non_numeric_bracket_is_a_literal_key() {
        let value = json!({"weird[key]": 7});
        assert_eq!(resolve_path(&value, "weird[key]"), Some(&json!(7)));
    }

    #[test]
    fn resolve_does_not_mutate_input() {
        let value = json!({"a": {"b": [{"c": 1}]}});
        let before = value.clone();
        let _ = resolve_path(&value, "a.b[0].c");
        let _ = resolve_path(&value, "a.b[9].c");
        assert_eq!(value, before);
    }

    #[test]
    fn parse_is_reusable_across_lookups() {
        let expr = PathExpr::parse("items[1].sku");
        let first = json!({"items": [{"sku": "A"}, {"sku": "B"}]});
        let second = json!({"items": [{"sku": "X"}]});
        assert_eq!(expr.resolve(&first), Some(&json!("B")));
        assert_eq!(expr.resolve(&second), None);
    }
}
