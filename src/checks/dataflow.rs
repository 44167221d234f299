//! Data-flow validation of the algorithm block.
//!
//! A single forward pass over the ordered step list with a growing set of
//! available artifacts. Declaration order is the execution order contract:
//! a forward reference is an error even when a later step produces the id,
//! and a step can never consume its own output because produces become
//! visible only after the step's uses are checked.

use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::contract::{str_of, ContractDoc};
use crate::finding::Finding;
use crate::rules::{Rules, REQUIRED_STEP_FIELDS, STEP_TYPES};

pub fn algorithm(doc: &ContractDoc, rules: &Rules) -> Vec<Finding> {
    let empty = Map::new();
    let algorithm = match doc.field("algorithm") {
        Some(Value::Object(algorithm)) => algorithm,
        Some(_) => {
            return vec![Finding::error("E060", "algorithm must be an object", "$.algorithm")];
        }
        None => &empty,
    };

    let steps = match algorithm.get("steps").and_then(Value::as_array) {
        Some(steps) if !steps.is_empty() => steps,
        _ => {
            return vec![Finding::error(
                "E060",
                "algorithm.steps must be non-empty",
                "$.algorithm.steps",
            )];
        }
    };

    // Seed availability from declared contract inputs and parameter names.
    let mut available: HashSet<&str> = HashSet::new();
    if let Some(inputs) = doc.io_artifacts("inputs") {
        available.extend(
            inputs
                .iter()
                .filter_map(|artifact| artifact.get("artifact_id").and_then(Value::as_str)),
        );
    }
    if let Some(params) = doc.object("parameters") {
        available.extend(params.keys().map(String::as_str));
    }

    let mut findings = Vec::new();
    let mut produced: HashSet<&str> = HashSet::new();

    for (i, step) in steps.iter().enumerate() {
        let step = match step.as_object() {
            Some(step) => step,
            None => continue,
        };

        for field in REQUIRED_STEP_FIELDS {
            if !step.contains_key(*field) {
                findings.push(Finding::error(
                    "E063",
                    format!("Step [{i}] missing '{field}'"),
                    format!("$.algorithm.steps[{i}].{field}"),
                ));
            }
        }

        let step_id = str_of(step, "id");
        if !step_id.is_empty() && !rules.step_id.is_match(step_id) {
            findings.push(Finding::error(
                "E063",
                format!("Step [{i}] id must match S### format"),
                format!("$.algorithm.steps[{i}].id"),
            ));
        }

        let step_type = str_of(step, "type");
        if !step_type.is_empty() && !STEP_TYPES.contains(&step_type) {
            findings.push(Finding::error(
                "E063",
                format!("Step [{i}] invalid type: {step_type}"),
                format!("$.algorithm.steps[{i}].type"),
            ));
        }

        match step.get("uses") {
            Some(Value::Array(uses)) => {
                if uses.iter().any(|v| !v.is_string()) {
                    findings.push(Finding::error(
                        "E063",
                        format!("Step [{i}] uses entries must be strings"),
                        format!("$.algorithm.steps[{i}].uses"),
                    ));
                }
                for artifact in uses.iter().filter_map(Value::as_str) {
                    if !available.contains(artifact) && !produced.contains(artifact) {
                        findings.push(Finding::error(
                            "E061",
                            format!("Step [{i}] uses unknown artifact: {artifact}"),
                            format!("$.algorithm.steps[{i}].uses"),
                        ));
                    }
                }
            }
            Some(_) => {
                findings.push(Finding::error(
                    "E063",
                    format!("Step [{i}] uses must be an array"),
                    format!("$.algorithm.steps[{i}].uses"),
                ));
            }
            // Absence is already an E063 from the required-field pass.
            None => {}
        }

        // Produces become visible only now, after the uses check.
        match step.get("produces") {
            Some(Value::Array(produces)) => {
                if produces.iter().any(|v| !v.is_string()) {
                    findings.push(Finding::error(
                        "E063",
                        format!("Step [{i}] produces entries must be strings"),
                        format!("$.algorithm.steps[{i}].produces"),
                    ));
                }
                produced.extend(produces.iter().filter_map(Value::as_str));
            }
            Some(_) => {
                findings.push(Finding::error(
                    "E063",
                    format!("Step [{i}] produces must be an array"),
                    format!("$.algorithm.steps[{i}].produces"),
                ));
            }
            None => {}
        }
    }

    // Every declared output must be produced by some step and documented
    // in the artifact registry; these are two distinct defects.
    let registry_ids: HashSet<&str> = algorithm
        .get("artifact_registry")
        .and_then(Value::as_array)
        .map(|registry| {
            registry
                .iter()
                .filter_map(|entry| entry.get("artifact_id").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();

    let mut checked: HashSet<&str> = HashSet::new();
    if let Some(outputs) = doc.io_artifacts("outputs") {
        for output in outputs
            .iter()
            .filter_map(|artifact| artifact.get("artifact_id").and_then(Value::as_str))
        {
            if !checked.insert(output) {
                continue;
            }
            if !produced.contains(output) {
                findings.push(Finding::error(
                    "E062",
                    format!("Output {output} not produced by any step"),
                    "$.io_contract.outputs",
                ));
            }
            if !registry_ids.contains(output) {
                findings.push(Finding::error(
                    "E070",
                    format!("Output {output} not in artifact_registry"),
                    "$.algorithm.artifact_registry",
                ));
            }
        }
    }

    findings
}
