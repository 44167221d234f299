//! Lint check functions over a loaded contract document.
//!
//! Checks are independent: each scans the document on its own and returns
//! findings, so a malformed section never prevents later checks from
//! running and a single validation call surfaces the maximal defect set.
//! Only the data-flow pass is order-sensitive internally, by design.

pub mod crossref;
pub mod dataflow;
pub mod glossary;
pub mod structure;

use crate::contract::ContractDoc;
use crate::finding::Finding;
use crate::glossary::Glossary;
use crate::rules::Rules;

/// Run every check and collect all findings.
pub fn run_all(
    doc: &ContractDoc,
    rules: &Rules,
    schema: &jsonschema::Validator,
    glossary: Option<&Glossary>,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    findings.extend(schema_conformance(doc, schema));
    findings.extend(structure::required_fields(doc));
    findings.extend(structure::meta_block(doc, rules));
    findings.extend(structure::module_identity(doc, rules));
    findings.extend(structure::parameters(doc));
    findings.extend(crossref::constraints(doc, rules));
    findings.extend(crossref::validation_rules(doc, rules));
    findings.extend(crossref::error_code_registry(doc, rules));
    findings.extend(dataflow::algorithm(doc, rules));
    findings.extend(structure::io_contract(doc));
    findings.extend(structure::test_cases(doc));
    findings.extend(structure::policies(doc));
    findings.extend(structure::relations(doc));
    if let Some(terms) = glossary {
        findings.extend(glossary::coverage(doc, terms));
    }

    findings
}

/// JSON Schema conformance of the whole document; one error finding per
/// violation, located by instance path.
pub fn schema_conformance(doc: &ContractDoc, schema: &jsonschema::Validator) -> Vec<Finding> {
    schema
        .iter_errors(doc.root())
        .map(|error| {
            let pointer = error.instance_path.to_string();
            let path = if pointer.is_empty() {
                "$".to_string()
            } else {
                format!("${pointer}")
            };
            Finding::error("E001", format!("Schema violation: {error}"), path)
        })
        .collect()
}
