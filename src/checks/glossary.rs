//! Glossary coverage check, gated by the document's glossary policy.

use crate::contract::ContractDoc;
use crate::finding::Finding;
use crate::glossary::Glossary;

/// Verify the module's short code is a known glossary term.
///
/// Runs only when the engine was given a glossary and the document's
/// policy is not "off". Under the "strict" policy an unknown code is an
/// error; under any other enabled policy it is a warning.
pub fn coverage(doc: &ContractDoc, glossary: &Glossary) -> Vec<Finding> {
    let policy = doc.glossary_policy();
    if policy == "off" {
        return Vec::new();
    }

    let abbr = doc.str_field("module_abbr");
    if abbr.is_empty() || glossary.contains(abbr) {
        return Vec::new();
    }

    let message = format!("module_abbr '{abbr}' not in glossary");
    if policy == "strict" {
        vec![Finding::error("E100", message, "$.module_abbr")]
    } else {
        vec![Finding::warning("W101", message, "$.module_abbr")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn glossary() -> Glossary {
        Glossary::from_value(&json!({"terms": {"EDGE": {}}}))
    }

    fn doc(abbr: &str, policy: &str) -> ContractDoc {
        ContractDoc::from_value(json!({
            "module_abbr": abbr,
            "policies": {"glossary_policy": policy}
        }))
        .unwrap()
    }

    #[test]
    fn test_off_policy_skips_check() {
        assert!(coverage(&doc("MASK", "off"), &glossary()).is_empty());
    }

    #[test]
    fn test_known_term_is_clean() {
        assert!(coverage(&doc("EDGE", "strict"), &glossary()).is_empty());
    }

    #[test]
    fn test_strict_policy_unknown_term_is_error() {
        let findings = coverage(&doc("MASK", "strict"), &glossary());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].code, "E100");
        assert_eq!(findings[0].severity, crate::finding::Severity::Error);
    }

    #[test]
    fn test_lenient_policy_unknown_term_is_warning() {
        let findings = coverage(&doc("MASK", "warn"), &glossary());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].code, "W101");
        assert_eq!(findings[0].severity, crate::finding::Severity::Warning);
    }
}
