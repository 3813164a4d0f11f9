//! Validate command - surface data quality issues without assessing the return

use super::{config_for, ReturnArgs};
use crate::core::{check_return, AssessmentConfig, ReturnIssue, TaxYear};
use clap::Args;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    #[command(flatten)]
    source: ReturnArgs,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// JSON output structure
#[derive(Debug, Serialize)]
struct ValidationOutput<'a> {
    tax_year: String,
    issue_count: usize,
    issues: &'a [ReturnIssue],
}

impl ValidateCommand {
    pub fn exec(&self, config: Option<&AssessmentConfig>) -> anyhow::Result<()> {
        let input = self.source.read()?;
        let config = config_for(config, input.tax_year)?;
        let issues = check_return(&input, &config);

        if self.json {
            let output = ValidationOutput {
                tax_year: input.tax_year.to_string(),
                issue_count: issues.len(),
                issues: &issues,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_text(&issues, input.tax_year);
        }

        // Exit with code 1 if issues found
        if !issues.is_empty() {
            std::process::exit(1);
        }
        Ok(())
    }
}

fn print_text(issues: &[ReturnIssue], year: TaxYear) {
    println!();
    println!("VALIDATION RESULTS ({})", year);
    println!();

    if issues.is_empty() {
        println!("\u{2713} No issues found.");
        return;
    }

    println!("\u{26A0} {} issue(s) found:", issues.len());
    println!();
    for (i, issue) in issues.iter().enumerate() {
        let line = issue
            .line
            .map_or_else(String::new, |l| format!(" line {}", l));
        println!("  {}. [{:?}] {}{}", i + 1, issue.kind, issue.source, line);
        println!("     {}", issue.message);
        println!();
    }
}
