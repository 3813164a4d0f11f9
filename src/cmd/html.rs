//! HTML return generation
//!
//! Generates a self-contained HTML file with embedded CSS.

use super::{config_for, ReturnArgs};
use crate::core::{
    format_amount, format_rate, AssessmentConfig, AssessmentOutcome, AssessmentResult,
    InvestmentKind, QualifyingKind,
};
use clap::Args;
use rust_decimal::Decimal;
use std::fmt::Write as _;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct HtmlCommand {
    #[command(flatten)]
    source: ReturnArgs,

    /// Output file path (default: opens in browser)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl HtmlCommand {
    pub fn exec(&self, config: Option<&AssessmentConfig>) -> anyhow::Result<()> {
        let input = self.source.read()?;
        let config = config_for(config, input.tax_year)?;
        input.validate()?;

        let result = match input.assess(&config) {
            AssessmentOutcome::Complete(result) => result,
            AssessmentOutcome::Incomplete { missing } => {
                let names: Vec<String> = missing.iter().map(|k| k.to_string()).collect();
                anyhow::bail!(
                    "return for {} is incomplete, missing: {}",
                    input.tax_year,
                    names.join(", ")
                );
            }
        };

        let html = generate(&result)?;

        if let Some(ref output_path) = self.output {
            std::fs::write(output_path, &html)?;
            println!("HTML return written to: {}", output_path.display());
        } else {
            // Write to temp file and open in browser
            let temp_path = std::env::temp_dir().join("taxret-return.html");
            std::fs::write(&temp_path, &html)?;
            opener::open(&temp_path)?;
            println!("Opened HTML return in browser: {}", temp_path.display());
        }

        Ok(())
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn amount_class(amount: Decimal) -> &'static str {
    if amount < Decimal::ZERO {
        "amount negative"
    } else {
        "amount"
    }
}

/// A titled two-column table; the last row is emphasised when `total` is set
fn section(html: &mut String, title: &str, rows: &[(&str, Decimal)], total: bool) {
    let _ = writeln!(html, "<section><h2>{}</h2><table>", escape(title));
    for (i, (label, amount)) in rows.iter().enumerate() {
        let row_class = if total && i + 1 == rows.len() { " class=\"total\"" } else { "" };
        let _ = writeln!(
            html,
            "<tr{}><td>{}</td><td class=\"{}\">{}</td></tr>",
            row_class,
            escape(label),
            amount_class(*amount),
            format_amount(*amount)
        );
    }
    html.push_str("</table></section>\n");
}

/// Render a complete return as HTML
pub fn generate(result: &AssessmentResult) -> anyhow::Result<String> {
    let mut body = String::new();
    let investment = &result.investment_by_type;

    section(
        &mut body,
        "Income",
        &[
            ("Employment income", result.employment_income),
            ("Business net income", result.business_net),
            ("Rent", investment.rent.amount),
            ("Interest", investment.interest.amount),
            ("Other investment income", investment.other.amount),
            ("Total assessable income", result.total_assessable),
        ],
        true,
    );

    let dividend = investment.get(InvestmentKind::Dividend);
    if !dividend.amount.is_zero() {
        let _ = writeln!(
            body,
            "<p class=\"note\">Dividends of {} were taxed at source ({} withheld) and are not assessable.</p>",
            format_amount(dividend.amount),
            format_amount(dividend.withholding)
        );
    }

    let qualifying: Vec<(String, Decimal)> = QualifyingKind::ALL
        .iter()
        .map(|k| {
            let group = result.qualifying_payments.get(*k);
            (
                format!("{:?} (paid {})", k, format_amount(group.amount)),
                group.deductible,
            )
        })
        .collect();
    let mut reliefs: Vec<(&str, Decimal)> = vec![
        ("Personal relief", result.personal_relief),
        ("Rental relief", result.rental_relief),
    ];
    reliefs.extend(qualifying.iter().map(|(l, a)| (l.as_str(), *a)));
    reliefs.push(("Total reliefs", result.total_reliefs));
    section(&mut body, "Reliefs", &reliefs, true);

    body.push_str("<section><h2>Tax</h2><table>\n");
    body.push_str("<tr><th>Band</th><th>Rate</th><th>Taxable</th><th>Tax</th></tr>\n");
    for band in &result.slab_breakdown {
        let class = if band.is_used() { "" } else { " class=\"unused\"" };
        let upper = band.upper.map_or_else(|| "and above".to_string(), format_amount);
        let _ = writeln!(
            body,
            "<tr{}><td>{} - {}</td><td>{}</td><td class=\"amount\">{}</td><td class=\"amount\">{}</td></tr>",
            class,
            format_amount(band.lower),
            escape(&upper),
            format_rate(band.rate),
            format_amount(band.amount),
            format_amount(band.tax)
        );
    }
    let _ = writeln!(
        body,
        "<tr class=\"total\"><td>Taxable income {}</td><td></td><td></td><td class=\"amount\">{}</td></tr>",
        format_amount(result.taxable_income),
        format_amount(result.total_tax_liability)
    );
    body.push_str("</table></section>\n");

    section(
        &mut body,
        "Credits",
        &[
            ("PAYE", result.total_paye),
            ("Withholding tax", result.total_withholding),
            ("Tax paid", result.total_tax_paid),
            ("Total credits", result.total_credits),
        ],
        true,
    );

    let (balance_label, balance_class) = if result.is_refund() {
        ("Refund due", "balance refund")
    } else {
        ("Balance payable", "balance payable")
    };
    let _ = writeln!(
        body,
        "<section class=\"{}\"><h2>{}</h2><p>{}</p></section>",
        balance_class,
        balance_label,
        format_amount(result.balance.abs())
    );

    if !result.warnings.is_empty() {
        body.push_str("<section class=\"warnings\"><h2>Warnings</h2><ul>\n");
        for warning in &result.warnings {
            let _ = writeln!(body, "<li>{}</li>", escape(&warning.to_string()));
        }
        body.push_str("</ul></section>\n");
    }

    Ok(format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Tax Return {year}</title>
    <style>
{css}
    </style>
</head>
<body>
    <header>
        <h1>Tax Return {year}</h1>
    </header>
    <main>
{body}
    </main>
    <footer>Fingerprint {fingerprint}</footer>
</body>
</html>"##,
        year = result.tax_year,
        css = CSS,
        body = body,
        fingerprint = result.fingerprint()?
    ))
}

const CSS: &str = r#"
:root {
    --primary: #2563eb;
    --success: #16a34a;
    --danger: #dc2626;
    --gray-100: #f3f4f6;
    --gray-200: #e5e7eb;
    --gray-500: #6b7280;
    --gray-900: #111827;
}

* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif;
    color: var(--gray-900);
    background: var(--gray-100);
    line-height: 1.5;
}

header {
    background: var(--primary);
    color: white;
    padding: 1.5rem 2rem;
}

main {
    max-width: 56rem;
    margin: 2rem auto;
    padding: 0 1rem;
}

section {
    background: white;
    border-radius: 0.5rem;
    padding: 1rem 1.5rem;
    margin-bottom: 1.5rem;
    box-shadow: 0 1px 2px rgba(0, 0, 0, 0.05);
}

h2 {
    font-size: 1.1rem;
    margin-bottom: 0.5rem;
}

table {
    width: 100%;
    border-collapse: collapse;
}

th, td {
    padding: 0.4rem 0.5rem;
    border-bottom: 1px solid var(--gray-200);
    text-align: left;
}

td.amount {
    text-align: right;
    font-variant-numeric: tabular-nums;
}

td.negative {
    color: var(--danger);
}

tr.total td {
    font-weight: 600;
    border-top: 2px solid var(--gray-900);
}

tr.unused td {
    color: var(--gray-500);
}

.note {
    color: var(--gray-500);
    margin: -1rem 0 1.5rem 0.5rem;
}

.balance p {
    font-size: 1.75rem;
    font-weight: 700;
}

.balance.refund p {
    color: var(--success);
}

.balance.payable p {
    color: var(--danger);
}

.warnings li {
    margin-left: 1.25rem;
}

footer {
    text-align: center;
    color: var(--gray-500);
    font-size: 0.75rem;
    padding-bottom: 2rem;
}
"#;
