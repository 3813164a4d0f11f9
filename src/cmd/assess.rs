//! Assess command - the consolidated tax return

use super::{config_for, ReturnArgs};
use crate::core::{
    format_amount, format_rate, AssessmentConfig, AssessmentOutcome, AssessmentResult,
    InvestmentKind, SourceKind, TaxYear,
};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

/// Exit code when one or more sources are missing
pub const EXIT_INCOMPLETE: i32 = 2;

#[derive(Args, Debug)]
pub struct AssessCommand {
    #[command(flatten)]
    source: ReturnArgs,

    /// Output as JSON instead of formatted text
    #[arg(long, conflicts_with = "csv")]
    json: bool,

    /// Output the return line items as CSV
    #[arg(long)]
    csv: bool,
}

impl AssessCommand {
    pub fn exec(&self, config: Option<&AssessmentConfig>) -> anyhow::Result<()> {
        let input = self.source.read()?;
        let config = config_for(config, input.tax_year)?;
        input.validate()?;

        let outcome = input.assess(&config);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }

        let result = match &outcome {
            AssessmentOutcome::Complete(result) => result,
            AssessmentOutcome::Incomplete { missing } => {
                if !self.json {
                    print_incomplete(input.tax_year, missing);
                }
                std::process::exit(EXIT_INCOMPLETE);
            }
        };

        log::info!(
            "Assessed {}: liability {}, balance {}",
            result.tax_year,
            result.total_tax_liability,
            result.balance
        );

        if self.csv {
            write_csv(result, std::io::stdout())?;
        } else if !self.json {
            print_text(result)?;
        }
        Ok(())
    }
}

fn print_incomplete(tax_year: TaxYear, missing: &[SourceKind]) {
    println!();
    println!("TAX RETURN ({}) - INCOMPLETE", tax_year);
    println!();
    println!("The return cannot be assessed until every source is recorded. Missing:");
    for kind in missing {
        println!("  - {}", kind);
    }
    println!();
}

#[derive(Debug, Clone, Tabled)]
struct LineRow {
    #[tabled(rename = "Item")]
    item: &'static str,
    #[tabled(rename = "Amount")]
    amount: String,
}

type Line = (&'static str, Decimal);

fn line_rows(lines: Vec<Line>) -> Vec<LineRow> {
    lines
        .into_iter()
        .map(|(item, amount)| LineRow {
            item,
            amount: format_amount(amount),
        })
        .collect()
}

#[derive(Debug, Clone, Tabled)]
struct BandRow {
    #[tabled(rename = "Band")]
    band: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Taxable")]
    amount: String,
    #[tabled(rename = "Tax")]
    tax: String,
}

fn print_table<T: Tabled>(title: &str, rows: Vec<T>, numeric_from: usize) {
    println!("{}", title);
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(numeric_from..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
    println!();
}

fn income_lines(result: &AssessmentResult) -> Vec<Line> {
    let investment = &result.investment_by_type;
    vec![
        ("Employment income", result.employment_income),
        ("Business net income", result.business_net),
        ("Rent", investment.rent.amount),
        ("Interest", investment.interest.amount),
        ("Other investment income", investment.other.amount),
        ("Total assessable income", result.total_assessable),
    ]
}

fn relief_lines(result: &AssessmentResult) -> Vec<Line> {
    vec![
        ("Personal relief", result.personal_relief),
        ("Rental relief", result.rental_relief),
        ("Qualifying payments", result.qualifying_relief),
        ("Total reliefs", result.total_reliefs),
        ("Taxable income", result.taxable_income),
    ]
}

fn credit_lines(result: &AssessmentResult) -> Vec<Line> {
    vec![
        ("PAYE", result.total_paye),
        ("Withholding tax", result.total_withholding),
        ("Tax paid", result.total_tax_paid),
        ("Total credits", result.total_credits),
    ]
}

fn print_text(result: &AssessmentResult) -> anyhow::Result<()> {
    println!();
    println!("TAX RETURN ({})", result.tax_year);
    println!();

    print_table("Income", line_rows(income_lines(result)), 1);
    let dividend = result.investment_by_type.get(InvestmentKind::Dividend);
    if !dividend.amount.is_zero() {
        println!(
            "Dividends of {} taxed at source ({} withheld, not creditable)",
            format_amount(dividend.amount),
            format_amount(dividend.withholding)
        );
        println!();
    }

    print_table("Reliefs", line_rows(relief_lines(result)), 1);

    let bands: Vec<BandRow> = result
        .slab_breakdown
        .iter()
        .map(|b| BandRow {
            band: b.label(),
            rate: format_rate(b.rate),
            amount: format_amount(b.amount),
            tax: format_amount(b.tax),
        })
        .collect();
    print_table("Tax", bands, 1);
    println!("Total tax liability: {}", format_amount(result.total_tax_liability));
    println!();

    print_table("Credits", line_rows(credit_lines(result)), 1);

    if result.is_refund() {
        println!("REFUND DUE: {}", format_amount(-result.balance));
    } else {
        println!("BALANCE PAYABLE: {}", format_amount(result.balance));
    }
    println!();

    if !result.warnings.is_empty() {
        println!("\u{26A0} {} warning(s):", result.warnings.len());
        for warning in &result.warnings {
            println!("  - {}", warning);
        }
        println!();
    }

    println!("Fingerprint: {}", result.fingerprint()?);
    Ok(())
}

#[derive(Serialize)]
struct CsvRecord {
    section: &'static str,
    item: String,
    amount: Decimal,
    tax: Option<Decimal>,
}

fn write_lines<W: Write>(
    wtr: &mut csv::Writer<W>,
    section: &'static str,
    lines: Vec<Line>,
) -> csv::Result<()> {
    for (item, amount) in lines {
        wtr.serialize(CsvRecord {
            section,
            item: item.to_string(),
            amount,
            tax: None,
        })?;
    }
    Ok(())
}

/// One record per return line, in return order
pub fn write_csv<W: Write>(result: &AssessmentResult, writer: W) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    write_lines(&mut wtr, "income", income_lines(result))?;
    write_lines(&mut wtr, "relief", relief_lines(result))?;
    for band in &result.slab_breakdown {
        wtr.serialize(CsvRecord {
            section: "band",
            item: band.label(),
            amount: band.amount,
            tax: Some(band.tax),
        })?;
    }
    write_lines(&mut wtr, "credit", credit_lines(result))?;
    write_lines(
        &mut wtr,
        "total",
        vec![
            ("Total tax liability", result.total_tax_liability),
            ("Balance", result.balance),
        ],
    )?;
    wtr.flush()?;
    Ok(())
}
