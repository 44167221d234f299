//! Cross-reference checks between constraints, validation rules, and the
//! error-code registry.
//!
//! Every code referenced from a constraint or validation rule must resolve
//! to a registry entry, and registry entries must carry a severity level
//! consistent with their code prefix.

use serde_json::Value;
use std::collections::HashSet;

use crate::contract::{str_of, ContractDoc};
use crate::finding::Finding;
use crate::rules::{Rules, REQUIRED_CODE_FIELDS, REQUIRED_RULE_FIELDS};

/// Constraint well-formedness: expression present, error code present,
/// well-formed, and registered.
pub fn constraints(doc: &ContractDoc, rules: &Rules) -> Vec<Finding> {
    let constraints = match doc.field("constraints") {
        Some(Value::Array(constraints)) if !constraints.is_empty() => constraints,
        _ => {
            return vec![Finding::error(
                "E030",
                "constraints must be a non-empty array",
                "$.constraints",
            )];
        }
    };

    let declared = doc.declared_codes();
    let mut findings = Vec::new();
    for (i, constraint) in constraints.iter().enumerate() {
        let constraint = match constraint.as_object() {
            Some(constraint) => constraint,
            None => {
                findings.push(Finding::error(
                    "E030",
                    format!("Constraint [{i}] must be an object"),
                    format!("$.constraints[{i}]"),
                ));
                continue;
            }
        };

        if !constraint.contains_key("expr") {
            findings.push(Finding::error(
                "E030",
                format!("Constraint [{i}] missing 'expr'"),
                format!("$.constraints[{i}].expr"),
            ));
        }

        // One finding per constraint code: missing, malformed, or unregistered.
        let code = str_of(constraint, "error_code");
        if code.is_empty() {
            findings.push(Finding::error(
                "E030",
                format!("Constraint [{i}] missing 'error_code'"),
                format!("$.constraints[{i}].error_code"),
            ));
        } else if !rules.error_code.is_match(code) {
            findings.push(Finding::error(
                "E030",
                format!("Constraint [{i}] error_code must match E### format"),
                format!("$.constraints[{i}].error_code"),
            ));
        } else if !declared.contains(code) {
            findings.push(Finding::error(
                "E031",
                format!("Constraint error_code {code} not defined in error_codes"),
                format!("$.constraints[{i}].error_code"),
            ));
        }
    }

    findings
}

/// Validation-rule well-formedness: required fields, severity fixed to
/// "warning", and a registered warning code.
pub fn validation_rules(doc: &ContractDoc, rules: &Rules) -> Vec<Finding> {
    let rule_list = match doc.field("validation").and_then(|v| v.get("rules")) {
        Some(Value::Array(rule_list)) => rule_list,
        Some(_) => {
            return vec![Finding::error(
                "E040",
                "validation.rules must be an array",
                "$.validation.rules",
            )];
        }
        None => return Vec::new(),
    };

    let declared = doc.declared_codes();
    let mut findings = Vec::new();
    for (i, rule) in rule_list.iter().enumerate() {
        let rule = match rule.as_object() {
            Some(rule) => rule,
            None => continue,
        };

        for field in REQUIRED_RULE_FIELDS {
            if !rule.contains_key(*field) {
                findings.push(Finding::error(
                    "E040",
                    format!("Validation rule [{i}] missing '{field}'"),
                    format!("$.validation.rules[{i}].{field}"),
                ));
            }
        }

        if str_of(rule, "severity") != "warning" {
            findings.push(Finding::error(
                "E040",
                format!("Validation rule [{i}] severity must be 'warning'"),
                format!("$.validation.rules[{i}].severity"),
            ));
        }

        let code = str_of(rule, "error_code");
        if !code.is_empty() && !rules.warning_code.is_match(code) {
            findings.push(Finding::error(
                "E040",
                format!("Validation rule [{i}] error_code must match W### format"),
                format!("$.validation.rules[{i}].error_code"),
            ));
        } else if !code.is_empty() && !declared.contains(code) {
            findings.push(Finding::error(
                "E041",
                format!("Validation warning code {code} not defined in error_codes"),
                format!("$.validation.rules[{i}].error_code"),
            ));
        }
    }

    findings
}

/// The error-code registry itself: entry completeness, code format,
/// prefix/severity consistency, and pairwise uniqueness.
pub fn error_code_registry(doc: &ContractDoc, rules: &Rules) -> Vec<Finding> {
    let entries = match doc.field("error_codes") {
        Some(Value::Array(entries)) if !entries.is_empty() => entries,
        _ => {
            return vec![Finding::error(
                "E050",
                "error_codes must be a non-empty array",
                "$.error_codes",
            )];
        }
    };

    let mut findings = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for (i, entry) in entries.iter().enumerate() {
        let entry = match entry.as_object() {
            Some(entry) => entry,
            None => continue,
        };

        let code = str_of(entry, "code");
        let level = str_of(entry, "level");

        for field in REQUIRED_CODE_FIELDS {
            if !entry.contains_key(*field) {
                findings.push(Finding::error(
                    "E050",
                    format!("Error code [{i}] missing '{field}'"),
                    format!("$.error_codes[{i}].{field}"),
                ));
            }
        }

        if !code.is_empty()
            && !rules.error_code.is_match(code)
            && !rules.warning_code.is_match(code)
        {
            findings.push(Finding::error(
                "E050",
                format!("Error code [{i}] code must match E### or W### format"),
                format!("$.error_codes[{i}].code"),
            ));
        }

        if code.starts_with('E') && level != "error" {
            findings.push(Finding::error(
                "E050",
                format!("Error code {code} must have level 'error'"),
                format!("$.error_codes[{i}].level"),
            ));
        }
        if code.starts_with('W') && level != "warning" {
            findings.push(Finding::error(
                "E050",
                format!("Warning code {code} must have level 'warning'"),
                format!("$.error_codes[{i}].level"),
            ));
        }

        // The first occurrence is not flagged; every later one is.
        if !code.is_empty() && !seen.insert(code) {
            findings.push(Finding::error(
                "E051",
                format!("Duplicate error code: {code}"),
                format!("$.error_codes[{i}].code"),
            ));
        }
    }

    findings
}
