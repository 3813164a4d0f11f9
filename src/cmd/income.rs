//! Income command - per-source overview of a return, complete or not

use super::{config_for, ReturnArgs};
use crate::core::{
    business_totals, employment_totals, format_amount, investment_totals, payment_totals,
    qualifying_totals, AssessmentConfig, EmploymentRecord, InvestmentKind, MonthEntry,
    PaymentPeriod, QualifyingKind, SourceKind, TaxReturnInput, TaxYear, MONTH_NAMES,
};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct IncomeCommand {
    #[command(flatten)]
    source: ReturnArgs,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// Summary of one source
#[derive(Debug, Clone, Serialize)]
pub struct SourceSummary {
    pub source: SourceKind,
    pub recorded: bool,
    pub records: usize,
    /// Named subtotals in display order
    pub lines: Vec<SummaryLine>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryLine {
    pub label: String,
    pub amount: Decimal,
}

#[derive(Debug, Serialize)]
struct IncomeOutput {
    tax_year: String,
    sources: Vec<SourceSummary>,
}

impl IncomeCommand {
    pub fn exec(&self, config: Option<&AssessmentConfig>) -> anyhow::Result<()> {
        let input = self.source.read()?;
        // the configuration only matters for its year check here
        config_for(config, input.tax_year)?;
        input.validate()?;

        let sources = summarize(&input);
        if self.json {
            let output = IncomeOutput {
                tax_year: input.tax_year.to_string(),
                sources,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_text(&input, &sources);
        }
        Ok(())
    }
}

fn line(label: impl Into<String>, amount: Decimal) -> SummaryLine {
    SummaryLine {
        label: label.into(),
        amount,
    }
}

/// Subtotals for every source kind, in fixed order; absent sources have no lines
pub fn summarize(input: &TaxReturnInput) -> Vec<SourceSummary> {
    SourceKind::ALL
        .iter()
        .map(|kind| {
            let (records, lines) = match kind {
                SourceKind::Employment => input.employment.as_ref().map(|e| {
                    let totals = employment_totals(e);
                    let mut lines = vec![
                        line("Gross income", totals.gross),
                        line("PAYE", totals.tax),
                    ];
                    if totals.months_with_actuals > 0 {
                        lines.push(line(
                            "Months with actual figures",
                            Decimal::from(totals.months_with_actuals),
                        ));
                    }
                    (totals.months_recorded, lines)
                }),
                SourceKind::Business => input.business.as_ref().map(|b| {
                    let totals = business_totals(b);
                    let mut lines = vec![
                        line("Income", totals.income),
                        line("Expenses", totals.expense),
                        line("Net", totals.net),
                    ];
                    let mut by_category: BTreeMap<(String, String), Decimal> = BTreeMap::new();
                    for tx in &b.transactions {
                        let kind = format!("{:?}", tx.kind);
                        *by_category.entry((kind, tx.category_name())).or_default() += tx.amount;
                    }
                    lines.extend(by_category.into_iter().map(|((kind, name), amount)| {
                        line(format!("{}: {}", kind, name), amount)
                    }));
                    (b.transactions.len(), lines)
                }),
                SourceKind::Investment => input.investment.as_ref().map(|i| {
                    let totals = investment_totals(i);
                    let mut lines = Vec::new();
                    for kind in InvestmentKind::ALL {
                        let group = totals.get(kind);
                        lines.push(line(format!("{:?}", kind), group.amount));
                        lines.push(line(format!("{:?} withholding", kind), group.withholding));
                    }
                    lines.push(line("Total investment income", totals.total_amount()));
                    (i.lines.len(), lines)
                }),
                SourceKind::QualifyingPayments => input.qualifying_payments.as_ref().map(|q| {
                    let totals = qualifying_totals(q);
                    let mut lines: Vec<SummaryLine> = QualifyingKind::ALL
                        .iter()
                        .map(|k| line(format!("{:?} (deductible)", k), totals.get(*k).deductible))
                        .collect();
                    lines.push(line("Total paid", totals.total_amount()));
                    (q.lines.len(), lines)
                }),
                SourceKind::TaxPayments => input.tax_payments.as_ref().map(|p| {
                    let totals = payment_totals(p);
                    let mut lines: Vec<SummaryLine> = PaymentPeriod::ALL
                        .iter()
                        .map(|period| line(period.to_string(), totals.get(*period)))
                        .collect();
                    lines.push(line("Total", totals.total()));
                    (p.payments.len(), lines)
                }),
            }
            .map_or((0, None), |(n, lines)| (n, Some(lines)));

            SourceSummary {
                source: *kind,
                recorded: lines.is_some(),
                records,
                lines: lines.unwrap_or_default(),
            }
        })
        .collect()
}

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "Item")]
    label: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

fn print_text(input: &TaxReturnInput, sources: &[SourceSummary]) {
    println!();
    println!("INCOME OVERVIEW ({})", input.tax_year);
    println!();

    for summary in sources {
        if !summary.recorded {
            println!("{}: not recorded", summary.source);
            println!();
            continue;
        }
        println!("{} ({} record(s))", summary.source, summary.records);
        let rows: Vec<Row> = summary
            .lines
            .iter()
            .map(|l| Row {
                label: l.label.clone(),
                amount: format_amount(l.amount),
            })
            .collect();
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
        println!();
    }

    if let Some(employment) = &input.employment {
        print_months(input.tax_year, employment);
    }
}

#[derive(Tabled)]
struct MonthRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Gross")]
    gross: String,
    #[tabled(rename = "PAYE")]
    tax: String,
    #[tabled(rename = "Figures")]
    figures: &'static str,
}

fn print_months(tax_year: TaxYear, employment: &EmploymentRecord) {
    let mut months: Vec<&MonthEntry> = employment.months.iter().collect();
    months.sort_by_key(|m| m.month_index);

    let rows: Vec<MonthRow> = months
        .iter()
        .map(|m| MonthRow {
            month: tax_year
                .month_start(m.month_index)
                .map_or_else(|| m.month_name().to_string(), |d| d.format("%b %Y").to_string()),
            gross: format_amount(m.effective_gross()),
            tax: format_amount(m.effective_tax()),
            figures: if m.has_actuals() { "actual" } else { "estimated" },
        })
        .collect();

    if !rows.is_empty() {
        println!("{} by month", employment.company_name);
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(1..3)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
        println!();
    }

    let missing = employment.missing_months();
    if !missing.is_empty() {
        let names: Vec<&str> = missing
            .iter()
            .map(|i| MONTH_NAMES[usize::from(*i)])
            .collect();
        println!("\u{26A0} No employment entry for: {}", names.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::read_return_json;
    use rust_decimal_macros::dec;
    use std::io::Cursor;

    #[test]
    fn absent_sources_reported_as_not_recorded() {
        let json = r#"{
            "tax_year": "2025-26",
            "business": {
                "transactions": [
                    { "type": "income", "amount": 1000, "date": "2025-05-01" },
                    { "type": "expense", "amount": 400, "date": "2025-05-02" }
                ]
            }
        }"#;
        let input = read_return_json(Cursor::new(json)).unwrap();
        let sources = summarize(&input);

        assert_eq!(sources.len(), 5);
        let business = &sources[1];
        assert!(business.recorded);
        assert_eq!(business.records, 2);
        assert_eq!(business.lines[2].label, "Net");
        assert_eq!(business.lines[2].amount, dec!(600));
        assert_eq!(business.lines[3].label, "Expense: Sales");
        assert_eq!(business.lines[4].label, "Income: Sales");
        assert!(sources
            .iter()
            .filter(|s| s.source != SourceKind::Business)
            .all(|s| !s.recorded && s.lines.is_empty()));
    }
}
