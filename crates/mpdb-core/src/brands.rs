//! Keyword-driven brand and model inference from free-text listing titles.
//!
//! The rule table is configuration data (`config/brands.yaml`), not code:
//! adding a brand or model keyword must never require recompilation. The
//! built-in table carries only the keywords observed in real order data so
//! far, so inference is strictly best-effort.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// A model name matched by one or more lowercase title keywords.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelRule {
    pub name: String,
    pub keywords: Vec<String>,
}

/// A brand matched by one or more lowercase title keywords, with optional
/// per-model sub-rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandRule {
    pub brand: String,
    pub keywords: Vec<String>,
    #[serde(default)]
    pub models: Vec<ModelRule>,
}

/// Result of matching a title against the rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandMatch {
    pub brand: String,
    /// Empty when the brand matched but no model keyword did.
    pub model: String,
}

/// The ordered brand rule table. Earlier rules win.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandTable {
    pub rules: Vec<BrandRule>,
}

impl BrandTable {
    /// Returns the rule table shipped with the engine.
    ///
    /// Contains only keywords observed in real order titles; callers
    /// wanting broader coverage load an external table with
    /// [`load_brand_table`].
    #[must_use]
    pub fn builtin() -> Self {
        BrandTable {
            rules: vec![
                BrandRule {
                    brand: "Sonos".to_string(),
                    keywords: vec!["sonos".to_string()],
                    models: vec![
                        ModelRule {
                            name: "Play:5".to_string(),
                            keywords: vec!["play5".to_string(), "play:5".to_string()],
                        },
                        ModelRule {
                            name: "Play:1".to_string(),
                            keywords: vec!["play1".to_string(), "play:1".to_string()],
                        },
                        ModelRule {
                            name: "Beam".to_string(),
                            keywords: vec!["beam".to_string()],
                        },
                    ],
                },
                BrandRule {
                    brand: "Bose".to_string(),
                    keywords: vec!["bose".to_string()],
                    models: vec![ModelRule {
                        name: "SoundLink".to_string(),
                        keywords: vec!["soundlink".to_string()],
                    }],
                },
            ],
        }
    }

    /// Matches a free-text title against the table.
    ///
    /// The title is lowercased once; the first rule with any keyword
    /// contained in it wins, and within that rule the first model with a
    /// matching keyword wins. Returns `None` when no brand keyword matches.
    #[must_use]
    pub fn infer(&self, title: &str) -> Option<BrandMatch> {
        let lower = title.to_lowercase();

        for rule in &self.rules {
            if !rule.keywords.iter().any(|k| lower.contains(k.as_str())) {
                continue;
            }

            let model = rule
                .models
                .iter()
                .find(|m| m.keywords.iter().any(|k| lower.contains(k.as_str())))
                .map(|m| m.name.clone())
                .unwrap_or_default();

            return Some(BrandMatch {
                brand: rule.brand.clone(),
                model,
            });
        }

        None
    }
}

/// Load and validate a brand rule table from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation.
pub fn load_brand_table(path: &Path) -> Result<BrandTable, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::BrandsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let table: BrandTable = serde_yaml::from_str(&content)?;

    validate_table(&table)?;

    Ok(table)
}

fn validate_table(table: &BrandTable) -> Result<(), ConfigError> {
    let mut seen_brands = HashSet::new();

    for rule in &table.rules {
        if rule.brand.trim().is_empty() {
            return Err(ConfigError::Validation(
                "brand name must be non-empty".to_string(),
            ));
        }

        if rule.keywords.is_empty() || rule.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "brand '{}' must have at least one non-empty keyword",
                rule.brand
            )));
        }

        let lower_brand = rule.brand.to_lowercase();
        if !seen_brands.insert(lower_brand) {
            return Err(ConfigError::Validation(format!(
                "duplicate brand: '{}'",
                rule.brand
            )));
        }

        for model in &rule.models {
            if model.name.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "brand '{}' has a model with an empty name",
                    rule.brand
                )));
            }
            if model.keywords.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "model '{}' of brand '{}' has no keywords",
                    model.name, rule.brand
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_from_yaml(yaml: &str) -> BrandTable {
        serde_yaml::from_str(yaml).expect("test yaml must parse")
    }

    #[test]
    fn infer_matches_brand_and_model() {
        let table = BrandTable::builtin();
        let matched = table.infer("Sonos Play5 Speaker").expect("should match");
        assert_eq!(matched.brand, "Sonos");
        assert_eq!(matched.model, "Play:5");
    }

    #[test]
    fn infer_matches_brand_without_model() {
        let table = BrandTable::builtin();
        let matched = table.infer("SONOS wireless speaker").expect("should match");
        assert_eq!(matched.brand, "Sonos");
        assert_eq!(matched.model, "");
    }

    #[test]
    fn infer_is_case_insensitive() {
        let table = BrandTable::builtin();
        let matched = table.infer("sOnOs PLAY:5").expect("should match");
        assert_eq!(matched.model, "Play:5");
    }

    #[test]
    fn infer_returns_none_for_unknown_title() {
        let table = BrandTable::builtin();
        assert!(table.infer("Vintage ceramic mug").is_none());
    }

    #[test]
    fn infer_first_rule_wins() {
        let table = table_from_yaml(
            r"
rules:
  - brand: First
    keywords: [widget]
  - brand: Second
    keywords: [widget]
",
        );
        let matched = table.infer("blue widget").expect("should match");
        assert_eq!(matched.brand, "First");
    }

    #[test]
    fn validate_rejects_empty_brand_name() {
        let table = table_from_yaml(
            r"
rules:
  - brand: '  '
    keywords: [x]
",
        );
        let err = validate_table(&table).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn validate_rejects_missing_keywords() {
        let table = table_from_yaml(
            r"
rules:
  - brand: Sonos
    keywords: []
",
        );
        assert!(validate_table(&table).is_err());
    }

    #[test]
    fn validate_rejects_duplicate_brands() {
        let table = table_from_yaml(
            r"
rules:
  - brand: Sonos
    keywords: [sonos]
  - brand: SONOS
    keywords: [speaker]
",
        );
        let err = validate_table(&table).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(msg) if msg.contains("duplicate")));
    }

    #[test]
    fn validate_rejects_model_without_keywords() {
        let table = table_from_yaml(
            r"
rules:
  - brand: Sonos
    keywords: [sonos]
    models:
      - name: Beam
        keywords: []
",
        );
        assert!(validate_table(&table).is_err());
    }

    #[test]
    fn builtin_table_passes_validation() {
        assert!(validate_table(&BrandTable::builtin()).is_ok());
    }

    #[test]
    fn yaml_roundtrip_preserves_rules() {
        let table = BrandTable::builtin();
        let yaml = serde_yaml::to_string(&table).expect("serialization failed");
        let decoded: BrandTable = serde_yaml::from_str(&yaml).expect("deserialization failed");
        assert_eq!(decoded.rules.len(), table.rules.len());
        assert_eq!(decoded.rules[0].brand, "Sonos");
        assert_eq!(decoded.rules[0].models[0].name, "Play:5");
    }
}
