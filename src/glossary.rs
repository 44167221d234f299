//! Glossary term source used by the coverage check.

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// The set of known glossary terms.
///
/// Loaded once at engine construction from a JSON file of the form
/// `{"terms": {"EDGE": ..., "MASK": ...}}`; only the term keys matter here.
#[derive(Debug, Clone, Default)]
pub struct Glossary {
    terms: BTreeSet<String>,
}

impl Glossary {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read glossary: {}", path.display()))?;
        let value: Value = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse glossary as JSON: {}", path.display()))?;
        Ok(Self::from_value(&value))
    }

    pub fn from_value(value: &Value) -> Self {
        let terms = value
            .get("terms")
            .and_then(Value::as_object)
            .map(|terms| terms.keys().cloned().collect())
            .unwrap_or_default();
        Self { terms }
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains(term)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_collects_term_keys() {
        let glossary = Glossary::from_value(&json!({
            "terms": {"EDGE": {"definition": "boundary"}, "MASK": "layer"}
        }));
        assert_eq!(glossary.len(), 2);
        assert!(glossary.contains("EDGE"));
        assert!(!glossary.contains("BLUR"));
    }

    #[test]
    fn test_from_value_without_terms_is_empty() {
        let glossary = Glossary::from_value(&json!({"version": 1}));
        assert!(glossary.is_empty());
    }
}
