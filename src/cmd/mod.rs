//! Command handlers for the contract-lint CLI.
//!
//! Exit code contract: 0 = all passed, 1 = lint failures, 2 = fatal
//! (unreadable inputs, bad arguments). Fatal conditions surface as `Err`
//! and are mapped to 2 by `main`.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;

use contract_lint::discovery;
use contract_lint::linter::ContractLinter;
use contract_lint::report::{self, BatchSummary, LintReport};

/// Validate a single contract and print its report.
pub fn cmd_check(
    contract: &Path,
    schema: &Path,
    glossary: Option<&Path>,
    json: bool,
    strict: bool,
) -> Result<i32> {
    let linter = ContractLinter::new(schema, glossary)?;
    let report = linter.validate(contract)?;

    if strict {
        if !report.passed {
            eprintln!("{} {} failed validation:", "✗".red(), contract.display());
            for finding in &report.errors {
                eprintln!("  {finding}");
            }
            return Ok(1);
        }
        println!("{} {}", "✓".green(), contract.display());
        return Ok(0);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(if report.passed { 0 } else { 1 })
}

/// Validate every contract under a root directory, writing one report per
/// file plus a summary, and print a per-file status line.
pub fn cmd_batch(
    root: &Path,
    schema: &Path,
    glossary: Option<&Path>,
    out: &Path,
    strict: bool,
    verbose: bool,
) -> Result<i32> {
    if !root.is_dir() {
        anyhow::bail!("Contracts root not found: {}", root.display());
    }
    let linter = ContractLinter::new(schema, glossary)?;
    fs::create_dir_all(out)
        .with_context(|| format!("Failed to create report directory: {}", out.display()))?;

    let contracts = discovery::find_contracts(root, Some(out))?;

    print_banner(schema, glossary, contracts.len());
    if contracts.is_empty() {
        eprintln!("{} No contracts found in: {}", "⚠".yellow(), root.display());
        let summary = BatchSummary::new(root, schema, glossary, Vec::new());
        report::write_json(&out.join("summary.json"), &summary)?;
        return Ok(0);
    }

    let mut reports: Vec<LintReport> = Vec::new();
    for path in &contracts {
        let report = linter.validate_to_file(path, out)?;

        print_status_line(path, &report);
        if strict && !report.passed {
            // The CI gate wants the complete picture, not a preview.
            for finding in &report.errors {
                println!("      {finding}");
            }
        } else if verbose && !report.passed {
            for finding in report.errors.iter().take(5) {
                println!("      {finding}");
            }
            if report.errors.len() > 5 {
                println!("      ... and {} more errors", report.errors.len() - 5);
            }
        }

        reports.push(report);
    }

    let summary = BatchSummary::new(root, schema, glossary, reports);
    print_summary(&summary);
    report::write_json(&out.join("summary.json"), &summary)?;
    println!("Reports saved to: {}", out.display());

    Ok(if summary.failed == 0 { 0 } else { 1 })
}

fn print_banner(schema: &Path, glossary: Option<&Path>, count: usize) {
    println!("{}", "━".repeat(60).cyan());
    println!("Contract validation");
    println!("{}", "━".repeat(60).cyan());
    println!("Schema: {}", schema.display());
    match glossary {
        Some(path) => println!("Glossary: {}", path.display()),
        None => println!("Glossary: N/A"),
    }
    println!("Contracts: {count}");
    println!("{}", "━".repeat(60).cyan());
}

fn print_status_line(path: &Path, report: &LintReport) {
    let status = if report.passed {
        "✓ PASS".green()
    } else {
        "✗ FAIL".red()
    };
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(&report.source);
    let warnings = if report.warnings.is_empty() {
        String::new()
    } else {
        format!(" ({} warnings)", report.warnings.len())
    };
    println!("{status} [{}/100] {name}{warnings}", report.score);
}

fn print_report(report: &LintReport) {
    let status = if report.passed {
        "✓ PASS".green()
    } else {
        "✗ FAIL".red()
    };
    println!("{status} [{}/100] {}", report.score, report.source);
    for finding in &report.errors {
        println!("  {} {} ({})", "✗".red(), finding, finding.path);
    }
    for finding in &report.warnings {
        println!("  {} {} ({})", "⚠".yellow(), finding, finding.path);
    }
}

fn print_summary(summary: &BatchSummary) {
    println!("{}", "━".repeat(60).cyan());
    println!("Summary: {}/{} passed", summary.passed, summary.total);
    if summary.failed > 0 {
        println!("Failed contracts:");
        for source in &summary.failed_files {
            println!("  - {source}");
        }
    }
    println!("{}", "━".repeat(60).cyan());
}
