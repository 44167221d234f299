//! The contract lint engine.

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::checks;
use crate::contract::ContractDoc;
use crate::discovery;
use crate::glossary::Glossary;
use crate::report::{self, LintReport};
use crate::rules::Rules;

/// Validates contract documents against the schema, lint rules, and
/// optional glossary supplied at construction.
///
/// The engine holds only immutable reference data, so a single instance
/// can validate any number of documents, sequentially or from independent
/// call sites; calls do not interact.
pub struct ContractLinter {
    schema: jsonschema::Validator,
    glossary: Option<Glossary>,
    rules: Rules,
}

impl ContractLinter {
    /// Build an engine from a schema file and an optional glossary file.
    ///
    /// Fails when the schema cannot be read or compiled. A glossary path
    /// that does not exist is ignored rather than treated as fatal.
    pub fn new(schema_path: &Path, glossary_path: Option<&Path>) -> Result<Self> {
        let schema = load_schema(schema_path)?;
        let glossary = match glossary_path {
            Some(path) if path.exists() => Some(Glossary::load(path)?),
            _ => None,
        };
        Ok(Self {
            schema,
            glossary,
            rules: Rules::new()?,
        })
    }

    /// Validate a single contract file.
    ///
    /// Fails only when the file cannot be read or parsed; a merely invalid
    /// document always comes back as a report carrying its findings.
    pub fn validate(&self, path: &Path) -> Result<LintReport> {
        let doc = ContractDoc::load(path)?;
        Ok(self.validate_doc(&path.display().to_string(), &doc))
    }

    /// Validate an already-loaded document. Never fails.
    pub fn validate_doc(&self, source: &str, doc: &ContractDoc) -> LintReport {
        let findings = checks::run_all(doc, &self.rules, &self.schema, self.glossary.as_ref());
        report::aggregate(source, findings)
    }

    /// Validate and fail on any error finding, for pipeline/CI gating.
    pub fn validate_strict(&self, path: &Path) -> Result<()> {
        let report = self.validate(path)?;
        if !report.passed {
            let errors: Vec<String> = report.errors.iter().map(ToString::to_string).collect();
            bail!(
                "{} failed validation:\n{}",
                path.display(),
                errors.join("\n")
            );
        }
        Ok(())
    }

    /// Validate a contract and persist its report as `<stem>_lint.json`
    /// under `out`.
    ///
    /// A contract that cannot be loaded becomes a zero-score FATAL report
    /// rather than an error, so a batch run keeps going past it; only a
    /// failure to write the report file is fatal.
    pub fn validate_to_file(&self, path: &Path, out: &Path) -> Result<LintReport> {
        let report = match self.validate(path) {
            Ok(report) => report,
            Err(e) => report::load_failure(&path.display().to_string(), &format!("{e:#}")),
        };
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("contract");
        report::write_json(&out.join(format!("{stem}_lint.json")), &report)?;
        Ok(report)
    }

    /// Validate every contract file found under a root directory.
    pub fn validate_dir(&self, root: &Path) -> Result<Vec<LintReport>> {
        if !root.is_dir() {
            bail!("Directory not found: {}", root.display());
        }
        discovery::find_contracts(root, None)?
            .iter()
            .map(|path| self.validate(path))
            .collect()
    }
}

/// Load and compile a JSON schema from a file path.
fn load_schema(path: &Path) -> Result<jsonschema::Validator> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema file: {}", path.display()))?;
    let schema: Value = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse schema as JSON: {}", path.display()))?;
    jsonschema::validator_for(&schema)
        .map_err(|e| anyhow::anyhow!("Failed to compile JSON schema: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_permissive_schema(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("contract_schema_v1.json");
        fs::write(&path, r#"{"type": "object"}"#).unwrap();
        path
    }

    #[test]
    fn test_construction_fails_for_missing_schema() {
        let result = ContractLinter::new(Path::new("/nonexistent/schema.json"), None);
        assert!(result.is_err());
    }

    #[test]
    fn test_construction_fails_for_malformed_schema() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("schema.json");
        fs::write(&path, "not json").unwrap();
        assert!(ContractLinter::new(&path, None).is_err());
    }

    #[test]
    fn test_missing_glossary_path_is_ignored() {
        let tmp = TempDir::new().unwrap();
        let schema = write_permissive_schema(tmp.path());
        let linter =
            ContractLinter::new(&schema, Some(Path::new("/nonexistent/glossary.json"))).unwrap();
        assert!(linter.glossary.is_none());
    }

    #[test]
    fn test_validate_missing_contract_is_load_error() {
        let tmp = TempDir::new().unwrap();
        let schema = write_permissive_schema(tmp.path());
        let linter = ContractLinter::new(&schema, None).unwrap();
        assert!(linter.validate(&tmp.path().join("absent.json")).is_err());
    }

    #[test]
    fn test_invalid_document_returns_report_not_error() {
        let tmp = TempDir::new().unwrap();
        let schema = write_permissive_schema(tmp.path());
        let contract = tmp.path().join("empty_contract.json");
        fs::write(&contract, "{}").unwrap();

        let linter = ContractLinter::new(&schema, None).unwrap();
        let report = linter.validate(&contract).unwrap();
        assert!(!report.passed);
        assert!(!report.errors.is_empty());
        assert_eq!(report.score, 0);
    }

    #[test]
    fn test_validate_strict_bails_with_error_list() {
        let tmp = TempDir::new().unwrap();
        let schema = write_permissive_schema(tmp.path());
        let contract = tmp.path().join("empty_contract.json");
        fs::write(&contract, "{}").unwrap();

        let linter = ContractLinter::new(&schema, None).unwrap();
        let err = linter.validate_strict(&contract).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("failed validation"));
        assert!(message.contains("E010"));
    }

    #[test]
    fn test_validate_to_file_writes_fatal_report_for_unreadable_contract() {
        let tmp = TempDir::new().unwrap();
        let schema = write_permissive_schema(tmp.path());
        let out = tmp.path().join("_reports");
        fs::create_dir_all(&out).unwrap();
        let contract = tmp.path().join("bad_contract.json");
        fs::write(&contract, "{ not json").unwrap();

        let linter = ContractLinter::new(&schema, None).unwrap();
        let report = linter.validate_to_file(&contract, &out).unwrap();
        assert!(!report.passed);
        assert_eq!(report.score, 0);
        assert_eq!(report.errors[0].code, "FATAL");

        let raw = fs::read_to_string(out.join("bad_contract_lint.json")).unwrap();
        assert!(raw.contains("FATAL"));
    }

    #[test]
    fn test_validate_dir_requires_directory() {
        let tmp = TempDir::new().unwrap();
        let schema = write_permissive_schema(tmp.path());
        let linter = ContractLinter::new(&schema, None).unwrap();
        assert!(linter.validate_dir(&tmp.path().join("missing")).is_err());
    }
}
