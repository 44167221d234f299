//! Structural checks: field presence, shapes, and enumerated values for
//! each top-level contract section.
//!
//! Each missing or malformed field yields exactly one error finding naming
//! the dotted path to the offending field. A malformed section never stops
//! the remaining checks from running.

use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::contract::{str_of, ContractDoc};
use crate::finding::Finding;
use crate::rules::{
    Rules, MATURITY_STAGES, META_NAME, META_STAGE, MODULE_TYPES, PARAM_TYPES, RELATION_FIELDS,
    REQUIRED_FIELDS, REQUIRED_IO_FIELDS, REQUIRED_META_FIELDS, REQUIRED_POLICY_FIELDS,
    REQUIRED_TEST_FIELDS, TEST_TYPES, UNDERPAINTING_INTENTS,
};

/// Every top-level required field must be present.
pub fn required_fields(doc: &ContractDoc) -> Vec<Finding> {
    REQUIRED_FIELDS
        .iter()
        .filter(|field| doc.field(field).is_none())
        .map(|field| {
            Finding::error(
                "E010",
                format!("Missing required field: {field}"),
                format!("$.{field}"),
            )
        })
        .collect()
}

/// The `_schema` metadata block: required fields, fixed identifiers,
/// enumerated values, and timestamp format.
pub fn meta_block(doc: &ContractDoc, rules: &Rules) -> Vec<Finding> {
    let empty = Map::new();
    let meta = match doc.field("_schema") {
        Some(Value::Object(meta)) => meta,
        Some(_) => {
            return vec![Finding::error("E011", "_schema must be an object", "$._schema")];
        }
        // Absence is reported field by field, on top of the E010 above.
        None => &empty,
    };

    let mut findings = Vec::new();
    for field in REQUIRED_META_FIELDS {
        if !meta.contains_key(*field) {
            findings.push(Finding::error(
                "E011",
                format!("Missing _schema.{field}"),
                format!("$._schema.{field}"),
            ));
        }
    }

    if str_of(meta, "name") != META_NAME {
        findings.push(Finding::error(
            "E011",
            format!("_schema.name must be '{META_NAME}'"),
            "$._schema.name",
        ));
    }
    if str_of(meta, "stage") != META_STAGE {
        findings.push(Finding::error(
            "E011",
            format!("_schema.stage must be '{META_STAGE}'"),
            "$._schema.stage",
        ));
    }
    if !MATURITY_STAGES.contains(&str_of(meta, "maturity_stage")) {
        findings.push(Finding::error(
            "E011",
            format!("_schema.maturity_stage must be one of {MATURITY_STAGES:?}"),
            "$._schema.maturity_stage",
        ));
    }
    if !UNDERPAINTING_INTENTS.contains(&str_of(meta, "underpainting_intent")) {
        findings.push(Finding::error(
            "E011",
            format!("_schema.underpainting_intent must be one of {UNDERPAINTING_INTENTS:?}"),
            "$._schema.underpainting_intent",
        ));
    }

    for ts_field in ["created_at", "updated_at"] {
        let ts = str_of(meta, ts_field);
        if !ts.is_empty() && !rules.timestamp.is_match(ts) {
            findings.push(Finding::error(
                "E012",
                format!("_schema.{ts_field} must be ISO 8601 with +02:00 offset"),
                format!("$._schema.{ts_field}"),
            ));
        }
    }

    findings
}

/// Module identity: id, short code, kind, version, and localized name.
pub fn module_identity(doc: &ContractDoc, rules: &Rules) -> Vec<Finding> {
    let mut findings = Vec::new();

    let module_id = doc.str_field("module_id");
    if !rules.module_id.is_match(module_id) {
        findings.push(Finding::error(
            "E013",
            format!("Invalid module_id format: {module_id}"),
            "$.module_id",
        ));
    }

    let abbr = doc.str_field("module_abbr");
    if !rules.module_abbr.is_match(abbr) {
        findings.push(Finding::error(
            "E013",
            format!("Invalid module_abbr format: {abbr}"),
            "$.module_abbr",
        ));
    }

    let module_type = doc.str_field("module_type");
    if !MODULE_TYPES.contains(&module_type) {
        findings.push(Finding::error(
            "E013",
            format!("Invalid module_type: {module_type}"),
            "$.module_type",
        ));
    }

    let version = doc.str_field("version");
    if !rules.semver.is_match(version) {
        findings.push(Finding::error(
            "E013",
            format!("Invalid version format: {version}"),
            "$.version",
        ));
    }

    let has_locales = doc
        .object("module_name")
        .map(|name| name.contains_key("uk") && name.contains_key("en"))
        .unwrap_or(false);
    if !has_locales {
        findings.push(Finding::error(
            "E014",
            "module_name must have 'uk' and 'en' keys",
            "$.module_name",
        ));
    }

    findings
}

/// Parameter completeness plus the non-fatal group-coverage cross-check.
pub fn parameters(doc: &ContractDoc) -> Vec<Finding> {
    let params = match doc.field("parameters") {
        Some(Value::Object(params)) if !params.is_empty() => params,
        _ => {
            return vec![Finding::error(
                "E020",
                "parameters must be a non-empty object",
                "$.parameters",
            )];
        }
    };

    let mut findings = Vec::new();
    for (name, param) in params {
        let param = match param.as_object() {
            Some(param) => param,
            None => {
                findings.push(Finding::error(
                    "E020",
                    format!("Parameter {name} must be an object"),
                    format!("$.parameters.{name}"),
                ));
                continue;
            }
        };

        for field in ["type", "unit", "description"] {
            if !param.contains_key(field) {
                findings.push(Finding::error(
                    "E020",
                    format!("Parameter {name} missing '{field}'"),
                    format!("$.parameters.{name}.{field}"),
                ));
            }
        }

        let param_type = str_of(param, "type");
        if !PARAM_TYPES.contains(&param_type) {
            findings.push(Finding::error(
                "E021",
                format!("Parameter {name} has invalid type: {param_type}"),
                format!("$.parameters.{name}.type"),
            ));
        }
        if param_type == "enum" && !param.contains_key("enum") {
            findings.push(Finding::error(
                "E021",
                format!("Parameter {name} with type 'enum' must have 'enum' array"),
                format!("$.parameters.{name}.enum"),
            ));
        }
    }

    // Grouping is organizational, not correctness-affecting: a parameter
    // outside every group is a warning, not an error.
    let mut grouped: HashSet<&str> = HashSet::new();
    if let Some(groups) = doc.object("parameter_groups") {
        for members in groups.values() {
            if let Some(members) = members.as_array() {
                grouped.extend(members.iter().filter_map(Value::as_str));
            }
        }
    }
    for name in params.keys() {
        if !grouped.contains(name.as_str()) {
            findings.push(Finding::warning(
                "W020",
                format!("Parameter {name} not in any parameter_group"),
                format!("$.parameters.{name}"),
            ));
        }
    }

    findings
}

/// I/O contract completeness; every output must be public.
pub fn io_contract(doc: &ContractDoc) -> Vec<Finding> {
    let empty = Map::new();
    let io = match doc.field("io_contract") {
        Some(Value::Object(io)) => io,
        Some(_) => {
            return vec![Finding::error(
                "E015",
                "io_contract must be an object",
                "$.io_contract",
            )];
        }
        None => &empty,
    };

    let mut findings = Vec::new();
    for direction in ["inputs", "outputs"] {
        let artifacts = match io.get(direction).and_then(Value::as_array) {
            Some(artifacts) if !artifacts.is_empty() => artifacts,
            _ => {
                findings.push(Finding::error(
                    "E015",
                    format!("io_contract.{direction} must be non-empty array"),
                    format!("$.io_contract.{direction}"),
                ));
                continue;
            }
        };

        for (i, artifact) in artifacts.iter().enumerate() {
            let artifact = match artifact.as_object() {
                Some(artifact) => artifact,
                None => {
                    findings.push(Finding::error(
                        "E015",
                        format!("io_contract.{direction}[{i}] must be an object"),
                        format!("$.io_contract.{direction}[{i}]"),
                    ));
                    continue;
                }
            };

            for field in REQUIRED_IO_FIELDS {
                if !artifact.contains_key(*field) {
                    findings.push(Finding::error(
                        "E015",
                        format!("io_contract.{direction}[{i}] missing '{field}'"),
                        format!("$.io_contract.{direction}[{i}].{field}"),
                    ));
                }
            }

            // An output exists to be consumed downstream; a non-public
            // scope is a contract defect.
            if direction == "outputs" && str_of(artifact, "scope") != "public" {
                let id = str_of(artifact, "artifact_id");
                findings.push(Finding::error(
                    "E071",
                    format!("Output {id} must have scope 'public'"),
                    format!("$.io_contract.outputs[{i}].scope"),
                ));
            }
        }
    }

    findings
}

/// Test-case minimum count and kind coverage.
pub fn test_cases(doc: &ContractDoc) -> Vec<Finding> {
    let tests = match doc.array("test_cases") {
        Some(tests) if tests.len() >= 3 => tests,
        _ => {
            return vec![Finding::error(
                "E080",
                "test_cases must have at least 3 cases",
                "$.test_cases",
            )];
        }
    };

    let mut findings = Vec::new();
    let mut kinds: HashSet<&str> = HashSet::new();
    for (i, case) in tests.iter().enumerate() {
        let case = match case.as_object() {
            Some(case) => case,
            None => continue,
        };

        for field in REQUIRED_TEST_FIELDS {
            if !case.contains_key(*field) {
                findings.push(Finding::error(
                    "E080",
                    format!("Test case [{i}] missing '{field}'"),
                    format!("$.test_cases[{i}].{field}"),
                ));
            }
        }

        let kind = str_of(case, "type");
        if !TEST_TYPES.contains(&kind) {
            findings.push(Finding::error(
                "E080",
                format!("Test case [{i}] invalid type: {kind}"),
                format!("$.test_cases[{i}].type"),
            ));
        }
        kinds.insert(kind);
    }

    if !kinds.contains("positive") {
        findings.push(Finding::error(
            "E080",
            "test_cases must include at least one 'positive' case",
            "$.test_cases",
        ));
    }
    if !kinds.contains("negative") {
        findings.push(Finding::error(
            "E080",
            "test_cases must include at least one 'negative' case",
            "$.test_cases",
        ));
    }
    if !kinds.contains("warning") {
        findings.push(Finding::warning(
            "W081",
            "test_cases should include a 'warning' case",
            "$.test_cases",
        ));
    }

    findings
}

/// Policy block completeness; the unit policy is fixed to "strict".
pub fn policies(doc: &ContractDoc) -> Vec<Finding> {
    let empty = Map::new();
    let policies = match doc.field("policies") {
        Some(Value::Object(policies)) => policies,
        Some(_) => {
            return vec![Finding::error("E016", "policies must be an object", "$.policies")];
        }
        None => &empty,
    };

    let mut findings = Vec::new();
    for field in REQUIRED_POLICY_FIELDS {
        if !policies.contains_key(*field) {
            findings.push(Finding::error(
                "E016",
                format!("policies missing '{field}'"),
                format!("$.policies.{field}"),
            ));
        }
    }
    if str_of(policies, "unit_policy") != "strict" {
        findings.push(Finding::error(
            "E016",
            "policies.unit_policy must be 'strict'",
            "$.policies.unit_policy",
        ));
    }

    findings
}

/// Relations block: three named relation lists, each an array, possibly empty.
pub fn relations(doc: &ContractDoc) -> Vec<Finding> {
    let empty = Map::new();
    let relations = match doc.field("relations") {
        Some(Value::Object(relations)) => relations,
        Some(_) => {
            return vec![Finding::error("E017", "relations must be an object", "$.relations")];
        }
        None => &empty,
    };

    let mut findings = Vec::new();
    for field in RELATION_FIELDS {
        match relations.get(*field) {
            None => {
                findings.push(Finding::error(
                    "E017",
                    format!("relations missing '{field}'"),
                    format!("$.relations.{field}"),
                ));
            }
            Some(value) if !value.is_array() => {
                findings.push(Finding::error(
                    "E017",
                    format!("relations.{field} must be an array"),
                    format!("$.relations.{field}"),
                ));
            }
            Some(_) => {}
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> ContractDoc {
        ContractDoc::from_value(value).unwrap()
    }

    #[test]
    fn test_required_fields_reports_each_missing_field() {
        let findings = required_fields(&doc(json!({"module_id": "A-IV-7"})));
        assert_eq!(findings.len(), REQUIRED_FIELDS.len() - 1);
        assert!(findings.iter().all(|f| f.code == "E010"));
        assert!(findings.iter().any(|f| f.path == "$.version"));
        assert!(!findings.iter().any(|f| f.path == "$.module_id"));
    }

    #[test]
    fn test_meta_block_rejects_non_object() {
        let findings = meta_block(&doc(json!({"_schema": "v4"})), &Rules::new().unwrap());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].code, "E011");
        assert_eq!(findings[0].path, "$._schema");
    }

    #[test]
    fn test_meta_block_checks_fixed_values_and_timestamps() {
        let rules = Rules::new().unwrap();
        let findings = meta_block(
            &doc(json!({"_schema": {
                "name": "A-PRACTICAL.contract",
                "version": "4.0.0",
                "stage": "B.wrong",
                "maturity_stage": "stable",
                "static_frame_only": true,
                "underpainting_intent": "structure_only",
                "created_at": "2025-03-01T10:00:00Z",
                "updated_at": "2025-03-01T10:00:00+02:00"
            }})),
            &rules,
        );
        assert_eq!(findings.len(), 2);
        assert!(findings.iter().any(|f| f.code == "E011" && f.path == "$._schema.stage"));
        assert!(findings.iter().any(|f| f.code == "E012" && f.path == "$._schema.created_at"));
    }

    #[test]
    fn test_module_identity_formats() {
        let rules = Rules::new().unwrap();
        let findings = module_identity(
            &doc(json!({
                "module_id": "A-IV-7",
                "module_abbr": "edge",
                "module_type": "PIPELINE",
                "version": "1.0",
                "module_name": {"en": "Edge detector"}
            })),
            &rules,
        );
        let codes: Vec<_> = findings.iter().map(|f| f.code.as_str()).collect();
        assert_eq!(codes, vec!["E013", "E013", "E013", "E014"]);
        assert!(findings.iter().any(|f| f.path == "$.module_abbr"));
        assert!(findings.iter().any(|f| f.path == "$.module_type"));
        assert!(findings.iter().any(|f| f.path == "$.version"));
    }

    #[test]
    fn test_parameters_must_be_non_empty() {
        let findings = parameters(&doc(json!({"parameters": {}})));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].code, "E020");

        let findings = parameters(&doc(json!({})));
        assert_eq!(findings[0].code, "E020");
    }

    #[test]
    fn test_parameter_missing_type_yields_both_findings() {
        // Missing 'type' is a completeness error, and the empty type is
        // also not an allowed type.
        let findings = parameters(&doc(json!({
            "parameters": {"threshold": {"unit": "ratio", "description": "d"}},
            "parameter_groups": {"tuning": ["threshold"]}
        })));
        assert!(findings
            .iter()
            .any(|f| f.code == "E020" && f.path == "$.parameters.threshold.type"));
        assert!(findings
            .iter()
            .any(|f| f.code == "E021" && f.path == "$.parameters.threshold.type"));
    }

    #[test]
    fn test_enum_parameter_requires_value_set() {
        let findings = parameters(&doc(json!({
            "parameters": {"mode": {"type": "enum", "unit": "none", "description": "d"}},
            "parameter_groups": {"main": ["mode"]}
        })));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].code, "E021");
        assert_eq!(findings[0].path, "$.parameters.mode.enum");
    }

    #[test]
    fn test_ungrouped_parameter_is_warning_only() {
        let findings = parameters(&doc(json!({
            "parameters": {"threshold": {"type": "float", "unit": "ratio", "description": "d"}},
            "parameter_groups": {}
        })));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].code, "W020");
        assert_eq!(findings[0].severity, crate::finding::Severity::Warning);
    }

    #[test]
    fn test_io_contract_requires_non_empty_directions() {
        let findings = io_contract(&doc(json!({"io_contract": {"inputs": []}})));
        assert_eq!(findings.len(), 2);
        assert!(findings.iter().all(|f| f.code == "E015"));
    }

    #[test]
    fn test_non_public_output_scope_is_error() {
        let findings = io_contract(&doc(json!({"io_contract": {
            "inputs": [{"artifact_id": "img", "type": "raster", "scope": "public"}],
            "outputs": [{"artifact_id": "mask", "type": "raster", "scope": "internal"}]
        }})));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].code, "E071");
        assert_eq!(findings[0].path, "$.io_contract.outputs[0].scope");
    }

    #[test]
    fn test_test_cases_minimum_and_coverage() {
        let findings = test_cases(&doc(json!({"test_cases": [
            {"id": "T1", "type": "positive", "name": "n", "input": {}, "expected": "ok"},
            {"id": "T2", "type": "positive", "name": "n", "input": {}, "expected": "ok"}
        ]})));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].code, "E080");

        let findings = test_cases(&doc(json!({"test_cases": [
            {"id": "T1", "type": "positive", "name": "n", "input": {}, "expected": "ok"},
            {"id": "T2", "type": "positive", "name": "n", "input": {}, "expected": "ok"},
            {"id": "T3", "type": "positive", "name": "n", "input": {}, "expected": "ok"}
        ]})));
        // Missing negative case is an error, missing warning case only a warning.
        assert_eq!(findings.len(), 2);
        assert!(findings
            .iter()
            .any(|f| f.code == "E080" && f.message.contains("negative")));
        assert!(findings.iter().any(|f| f.code == "W081"));
    }

    #[test]
    fn test_policies_unit_policy_must_be_strict() {
        let findings = policies(&doc(json!({"policies": {
            "unit_policy": "lenient",
            "constraints_dsl": "simple-expr",
            "glossary_policy": "off",
            "i18n_policy": "uk_en"
        }})));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].code, "E016");
        assert_eq!(findings[0].path, "$.policies.unit_policy");
    }

    #[test]
    fn test_relations_lists_must_be_arrays() {
        let findings = relations(&doc(json!({"relations": {
            "depends_on": [],
            "influences": "A-IV-2"
        }})));
        assert_eq!(findings.len(), 2);
        assert!(findings
            .iter()
            .any(|f| f.path == "$.relations.influences" && f.message.contains("array")));
        assert!(findings
            .iter()
            .any(|f| f.path == "$.relations.conflicts_with" && f.message.contains("missing")));
    }
}
