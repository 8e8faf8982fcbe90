//! `validate` command: check every citation in a markdown file.
//!
//! ```bash
//! citation-manager validate docs/plan.md
//! citation-manager validate docs/plan.md --scope docs --format json
//! citation-manager validate docs/plan.md --lines 10-40
//! ```
//!
//! Exits non-zero when any citation is broken.

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use std::ops::RangeInclusive;
use std::path::PathBuf;

use super::common::{Pipeline, effective_scope};
use crate::config::Config;
use crate::models::ValidationStatus;
use crate::validator::ValidationReport;

/// Output format for validation results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Colored, human-readable report
    Text,
    /// The full report as JSON
    Json,
}

/// Validate citations in a markdown file.
#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Markdown file to validate
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Directory searched when a linked file is not where the link says
    #[arg(long, value_name = "DIR")]
    pub scope: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Only report citations on these lines (`A-B` or a single line)
    #[arg(long, value_name = "A-B", value_parser = parse_line_range)]
    pub lines: Option<RangeInclusive<usize>>,
}

impl ValidateCommand {
    /// Run validation and print the report.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be parsed or when any citation is broken.
    pub async fn execute(self, config: &Config, quiet: bool) -> Result<()> {
        let scope = effective_scope(self.scope, config);
        let pipeline = Pipeline::new(scope.as_deref(), config);

        let mut report = pipeline.validator.validate_file(&self.file).await?;
        if let Some(lines) = &self.lines {
            report = report.restrict_to_lines(lines);
        }

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            OutputFormat::Text if !quiet => print_text(&report),
            OutputFormat::Text => {}
        }

        if report.has_errors() {
            bail!(
                "Validation failed: {} of {} citations are broken",
                report.summary.errors,
                report.summary.total
            );
        }
        Ok(())
    }
}

fn print_text(report: &ValidationReport) {
    println!("{} {}", "Citation validation:".bold(), report.file.display());
    println!();

    for citation in &report.citations {
        let Some(validation) = &citation.validation else {
            continue;
        };
        let symbol = match validation.status() {
            ValidationStatus::Valid => "✓".green(),
            ValidationStatus::Warning => "⚠".yellow(),
            ValidationStatus::Error => "✗".red(),
        };
        println!("  {symbol} line {}: {}", citation.line, citation.full_match);
        if let Some(message) = validation.message() {
            println!("      {message}");
        }
        if let Some(suggestion) = validation.suggestion() {
            println!("      {} {suggestion}", "Suggestion:".cyan());
        }
    }

    let summary = &report.summary;
    println!();
    println!(
        "{} {} total, {} valid, {} warnings, {} errors",
        "Summary:".bold(),
        summary.total,
        summary.valid.to_string().green(),
        summary.warnings.to_string().yellow(),
        summary.errors.to_string().red()
    );
}

/// Parse `A-B` or `A` into an inclusive line range.
fn parse_line_range(value: &str) -> Result<RangeInclusive<usize>, String> {
    let parse = |s: &str| {
        s.trim()
            .parse::<usize>()
            .map_err(|_| format!("invalid line number '{s}'"))
    };

    let (start, end) = match value.split_once('-') {
        Some((start, end)) => (parse(start)?, parse(end)?),
        None => {
            let line = parse(value)?;
            (line, line)
        }
    };

    if start == 0 || start > end {
        return Err(format!("invalid line range '{value}'"));
    }
    Ok(start..=end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_range() {
        assert_eq!(parse_line_range("10-40"), Ok(10..=40));
        assert_eq!(parse_line_range("7"), Ok(7..=7));
        assert!(parse_line_range("40-10").is_err());
        assert!(parse_line_range("0-3").is_err());
        assert!(parse_line_range("a-b").is_err());
    }
}
