//! First-non-empty field resolution across ordered candidate paths.
//!
//! Every canonical field is declared as a [`FieldSpec`]: an explicit,
//! auditable list of candidate paths in priority order plus the sentinel
//! default used when nothing resolves. Specs are compiled once into
//! [`CompiledField`]s so path strings are parsed a single time per mapper.

use serde_json::Value;

use crate::money::normalize_money;
use crate::path::PathExpr;

/// Static declaration of one canonical field's candidate paths.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Canonical field name, for diagnostics.
    pub name: &'static str,
    /// Candidate paths in priority order (highest first).
    pub candidates: &'static [&'static str],
    /// Sentinel returned when no candidate qualifies.
    pub default: &'static str,
}

/// A [`FieldSpec`] with its candidate paths pre-parsed.
#[derive(Debug, Clone)]
pub struct CompiledField {
    name: &'static str,
    candidates: Vec<PathExpr>,
    default: &'static str,
}

impl CompiledField {
    #[must_use]
    pub fn compile(spec: &FieldSpec) -> Self {
        CompiledField {
            name: spec.name,
            candidates: spec.candidates.iter().map(|p| PathExpr::parse(p)).collect(),
            default: spec.default,
        }
    }

    /// The canonical field name this resolver serves.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Resolves the first candidate that yields a non-empty string after
    /// trimming, or the spec's sentinel default.
    ///
    /// Candidates are walked path-major: each path is tried against the
    /// primary object and then the secondary before moving on, so declared
    /// path priority dominates source priority.
    #[must_use]
    pub fn resolve(&self, primary: &Value, secondary: Option<&Value>) -> String {
        self.resolve_first(primary, secondary, trimmed_string)
            .unwrap_or_else(|| self.default.to_string())
    }

    /// Like [`resolve`](Self::resolve) but with no sentinel: absent stays
    /// `None`. Used for optional string fields.
    #[must_use]
    pub fn resolve_opt(&self, primary: &Value, secondary: Option<&Value>) -> Option<String> {
        self.resolve_first(primary, secondary, trimmed_string)
    }

    /// Identifier variant: additionally accepts JSON numbers and renders
    /// them as strings. Upstream ids flip between string and number
    /// depending on API vintage.
    #[must_use]
    pub fn resolve_id(&self, primary: &Value, secondary: Option<&Value>) -> Option<String> {
        self.resolve_first(primary, secondary, |value| match value {
            Value::String(_) => trimmed_string(value),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    /// Monetary variant: the first candidate that resolves to any value
    /// wins and is normalized, even when it normalizes to 0 — a resolved
    /// unparsable price is still that field's value.
    #[must_use]
    pub fn resolve_money(&self, primary: &Value, secondary: Option<&Value>) -> f64 {
        self.resolve_first(primary, secondary, |value| Some(normalize_money(Some(value))))
            .unwrap_or(0.0)
    }

    /// Walks candidates path-major and returns the first value `extract`
    /// accepts.
    pub fn resolve_first<T, F>(
        &self,
        primary: &Value,
        secondary: Option<&Value>,
        extract: F,
    ) -> Option<T>
    where
        F: Fn(&Value) -> Option<T>,
    {
        for path in &self.candidates {
            if let Some(found) = path.resolve(primary).and_then(&extract) {
                return Some(found);
            }
            if let Some(found) = secondary
                .and_then(|source| path.resolve(source))
                .and_then(&extract)
            {
                return Some(found);
            }
        }
        None
    }
}

fn trimmed_string(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
