//! Static lint configuration: identifier patterns and allowed value sets.
//!
//! The allowed-value sets are process-wide constants; the compiled regex
//! patterns live in [`Rules`], owned by the engine instance rather than
//! held in module-level state.

use anyhow::Result;
use regex::Regex;

/// Required top-level contract fields.
pub const REQUIRED_FIELDS: &[&str] = &[
    "_schema",
    "module_id",
    "module_abbr",
    "module_type",
    "module_name",
    "version",
    "description",
    "io_contract",
    "parameters",
    "parameter_groups",
    "constraints",
    "validation",
    "error_codes",
    "algorithm",
    "relations",
    "test_cases",
    "policies",
];

/// Required fields of the `_schema` metadata block.
pub const REQUIRED_META_FIELDS: &[&str] = &[
    "name",
    "version",
    "stage",
    "maturity_stage",
    "static_frame_only",
    "underpainting_intent",
    "created_at",
    "updated_at",
];

/// Fixed contract format identifiers carried in the metadata block.
pub const META_NAME: &str = "A-PRACTICAL.contract";
pub const META_STAGE: &str = "A.contract_only";

pub const MODULE_TYPES: &[&str] = &["RULESET", "PROCESS", "BRIDGE"];
pub const MATURITY_STAGES: &[&str] = &["pilot", "draft", "stable"];
pub const UNDERPAINTING_INTENTS: &[&str] = &[
    "structure_only",
    "structure_plus_masks",
    "structure_plus_metadata",
];
pub const PARAM_TYPES: &[&str] = &["float", "int", "boolean", "enum", "string"];
pub const STEP_TYPES: &[&str] = &[
    "load",
    "transform",
    "filter",
    "validate",
    "normalize",
    "classify",
    "export",
    "validate_module",
];
pub const TEST_TYPES: &[&str] = &["positive", "negative", "warning"];

pub const REQUIRED_STEP_FIELDS: &[&str] = &["id", "name", "type", "uses", "produces", "description"];
pub const REQUIRED_RULE_FIELDS: &[&str] = &["name", "condition", "severity", "message", "error_code"];
pub const REQUIRED_CODE_FIELDS: &[&str] = &["code", "level", "title", "message"];
pub const REQUIRED_TEST_FIELDS: &[&str] = &["id", "type", "name", "input", "expected"];
pub const REQUIRED_IO_FIELDS: &[&str] = &["artifact_id", "type", "scope"];
pub const REQUIRED_POLICY_FIELDS: &[&str] =
    &["unit_policy", "constraints_dsl", "glossary_policy", "i18n_policy"];
pub const RELATION_FIELDS: &[&str] = &["depends_on", "influences", "conflicts_with"];

/// Compiled identifier patterns used across the checks.
///
/// Compiled once at engine construction and borrowed by every check.
#[derive(Debug)]
pub struct Rules {
    /// Stage-prefixed roman numeral plus sequence: `A-IV-7` or `A-IV-7.2`.
    pub module_id: Regex,
    /// 2-8 uppercase alphanumeric characters.
    pub module_abbr: Regex,
    /// Three dot-separated non-negative integers.
    pub semver: Regex,
    /// ISO 8601 with the fixed `+02:00` offset.
    pub timestamp: Regex,
    pub error_code: Regex,
    pub warning_code: Regex,
    pub step_id: Regex,
}

impl Rules {
    pub fn new() -> Result<Self> {
        Ok(Self {
            module_id: Regex::new(r"^A-[IVXLCDM]+-\d+(?:\.\d+)?$")?,
            module_abbr: Regex::new(r"^[A-Z0-9]{2,8}$")?,
            semver: Regex::new(r"^\d+\.\d+\.\d+$")?,
            timestamp: Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\+02:00$")?,
            error_code: Regex::new(r"^E\d{3}$")?,
            warning_code: Regex::new(r"^W\d{3}$")?,
            step_id: Regex::new(r"^S\d{3}$")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_id_pattern() {
        let rules = Rules::new().unwrap();
        assert!(rules.module_id.is_match("A-IV-7"));
        assert!(rules.module_id.is_match("A-XII-3.1"));
        assert!(!rules.module_id.is_match("B-IV-7"));
        assert!(!rules.module_id.is_match("A-IV"));
        assert!(!rules.module_id.is_match("A-4-7"));
    }

    #[test]
    fn test_module_abbr_pattern() {
        let rules = Rules::new().unwrap();
        assert!(rules.module_abbr.is_match("EDGE"));
        assert!(rules.module_abbr.is_match("A1"));
        assert!(!rules.module_abbr.is_match("X"));
        assert!(!rules.module_abbr.is_match("TOOLONGNAME"));
        assert!(!rules.module_abbr.is_match("edge"));
    }

    #[test]
    fn test_timestamp_requires_fixed_offset() {
        let rules = Rules::new().unwrap();
        assert!(rules.timestamp.is_match("2025-03-01T10:00:00+02:00"));
        assert!(!rules.timestamp.is_match("2025-03-01T10:00:00Z"));
        assert!(!rules.timestamp.is_match("2025-03-01T10:00:00+01:00"));
    }

    #[test]
    fn test_code_patterns() {
        let rules = Rules::new().unwrap();
        assert!(rules.error_code.is_match("E201"));
        assert!(!rules.error_code.is_match("E20"));
        assert!(!rules.error_code.is_match("W201"));
        assert!(rules.warning_code.is_match("W201"));
        assert!(rules.step_id.is_match("S001"));
        assert!(!rules.step_id.is_match("S1"));
    }
}
