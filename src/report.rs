//! Result aggregation, scoring, and report persistence.
//!
//! The aggregator is pure: the same findings always produce the same
//! report, and a report is never mutated after it is built.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::finding::{Finding, Severity};

/// Result of linting one contract document.
#[derive(Debug, Clone, Serialize)]
pub struct LintReport {
    /// Path (or label) of the validated document.
    pub source: String,
    /// True iff there are zero error findings. Warnings never fail a contract.
    pub passed: bool,
    /// Quality score, 0-100.
    pub score: u32,
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
}

/// Partition findings by severity, score them, and build the report.
pub fn aggregate(source: &str, findings: Vec<Finding>) -> LintReport {
    let (errors, warnings): (Vec<_>, Vec<_>) = findings
        .into_iter()
        .partition(|f| f.severity == Severity::Error);
    LintReport {
        source: source.to_string(),
        passed: errors.is_empty(),
        score: score(errors.len(), warnings.len()),
        errors,
        warnings,
    }
}

/// Quality score for a finding tally.
///
/// Any error caps the score below 50 and drives it toward 0 as errors
/// accumulate; an error-free document never scores below 70 regardless
/// of warning volume.
pub fn score(error_count: usize, warning_count: usize) -> u32 {
    if error_count > 0 {
        50u32.saturating_sub(error_count as u32 * 10)
    } else {
        100u32.saturating_sub(warning_count as u32 * 5).max(70)
    }
}

/// Report for a contract that could not be loaded during a batch run.
///
/// Batch validation keeps going past unreadable files; the failure is
/// recorded as a zero-score report instead of aborting the whole run.
pub fn load_failure(source: &str, message: &str) -> LintReport {
    LintReport {
        source: source.to_string(),
        passed: false,
        score: 0,
        errors: vec![Finding::error("FATAL", message, "$")],
        warnings: Vec::new(),
    }
}

/// Summary of a batch validation run, persisted next to per-file reports.
#[derive(Debug, Serialize)]
pub struct BatchSummary {
    pub timestamp: String,
    pub contracts_root: String,
    pub schema: String,
    pub glossary: Option<String>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: String,
    pub failed_files: Vec<String>,
    pub results: Vec<LintReport>,
}

impl BatchSummary {
    pub fn new(
        contracts_root: &Path,
        schema: &Path,
        glossary: Option<&Path>,
        results: Vec<LintReport>,
    ) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        let failed = total - passed;
        let failed_files = results
            .iter()
            .filter(|r| !r.passed)
            .map(|r| r.source.clone())
            .collect();
        let pass_rate = if total > 0 {
            format!("{:.1}%", passed as f64 / total as f64 * 100.0)
        } else {
            "0.0%".to_string()
        };
        Self {
            timestamp: crate::utc_now_iso(),
            contracts_root: contracts_root.display().to_string(),
            schema: schema.display().to_string(),
            glossary: glossary.map(|p| p.display().to_string()),
            total,
            passed,
            failed,
            pass_rate,
            failed_files,
            results,
        }
    }
}

/// Write a value as pretty-printed JSON with a trailing newline.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize report: {}", path.display()))?;
    fs::write(path, json + "\n")
        .with_context(|| format!("Failed to write report: {}", path.display()))
}
