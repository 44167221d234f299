//! # contract-lint
//!
//! Lint engine for processing-module contract documents.
//!
//! ## Overview
//!
//! Contracts are JSON documents describing a processing module: its
//! parameters, constraints, declared error codes, and an ordered algorithm
//! of steps that consume and produce named artifacts. The engine checks
//! each document structurally (field presence, shapes, enumerated values)
//! and semantically (artifact data flow, error-code cross references,
//! optional glossary coverage), then scores the result 0-100.
//!
//! Invalidity is never a failure: a readable document always yields a
//! [`report::LintReport`] carrying its findings. Only an unreadable or
//! unparseable document (or reference file) aborts a call.
//!
//! ## Modules
//!
//! - [`linter`] - The [`linter::ContractLinter`] engine and its operations
//! - [`contract`] - Document loading and typed access to contract sections
//! - [`checks`] - The individual lint check functions
//! - [`finding`] - Findings and severities
//! - [`report`] - Result aggregation, scoring, and report persistence
//! - [`rules`] - Identifier patterns and allowed value sets
//! - [`glossary`] - Glossary term source for the coverage check
//! - [`discovery`] - Contract file discovery for batch validation
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use contract_lint::linter::ContractLinter;
//!
//! let linter = ContractLinter::new(Path::new("schema/contract_schema.json"), None)
//!     .expect("Failed to load schema");
//!
//! let report = linter
//!     .validate(Path::new("contracts/edge_detect_contract.json"))
//!     .expect("Failed to read contract");
//!
//! if !report.passed {
//!     for finding in &report.errors {
//!         eprintln!("{}: {} ({})", finding.code, finding.message, finding.path);
//!     }
//! }
//! ```

pub mod checks;
pub mod contract;
pub mod discovery;
pub mod finding;
pub mod glossary;
pub mod linter;
pub mod report;
pub mod rules;

/// Generate a UTC timestamp in ISO 8601 format: `YYYY-MM-DDTHH:MM:SSZ`
///
/// Uses `chrono::Utc::now()` so the timestamp is truly in UTC, not local
/// time with a misleading `Z` suffix.
pub fn utc_now_iso() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
