//! Contract file discovery for batch validation.

use anyhow::{Context, Result};
use glob::glob;
use std::path::{Path, PathBuf};

/// Decide whether a file name looks like a contract document.
///
/// Contract directories also hold catalog, glossary, and schema data files
/// plus previously generated lint reports; none of those are contracts.
pub fn is_contract_file(name: &str) -> bool {
    if name.starts_with("catalog_")
        || name.starts_with("glossary_")
        || name.starts_with("schema_")
        || name.starts_with("contract_schema_")
    {
        return false;
    }
    if name.ends_with("_lint.json")
        || name.ends_with("_report.json")
        || name.ends_with("summary.json")
    {
        return false;
    }
    name.ends_with(".json") && name.contains("_contract")
}

/// Find contract files under `root`, recursively, in sorted order.
///
/// Files inside `exclude` (typically the report output directory) are
/// skipped so a batch run never re-validates its own output.
pub fn find_contracts(root: &Path, exclude: Option<&Path>) -> Result<Vec<PathBuf>> {
    let pattern = root.join("**").join("*.json");
    let pattern = pattern.to_string_lossy().into_owned();

    let mut contracts = Vec::new();
    for entry in glob(&pattern).with_context(|| format!("Invalid glob pattern: {pattern}"))? {
        let path = entry.context("Failed to read directory entry")?;
        if exclude.is_some_and(|dir| path.starts_with(dir)) {
            continue;
        }
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => continue,
        };
        if is_contract_file(name) {
            contracts.push(path);
        }
    }
    contracts.sort();
    Ok(contracts)
}
