use super::assessment::{compute_assessment, AssessmentOutcome};
use super::business::BusinessDocument;
use super::config::AssessmentConfig;
use super::employment::EmploymentRecord;
use super::investment::{InvestmentDocument, InvestmentLine};
use super::payments::TaxPaymentsDocument;
use super::qualifying::{QualifyingPaymentLine, QualifyingPaymentsDocument};
use super::source::{SourceDocument, SourceError, SourceKind};
use super::year::TaxYear;
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// A tax return file: the year and whichever sources have been recorded so far
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TaxReturnInput {
    pub tax_year: TaxYear,
    #[serde(default)]
    pub employment: Option<EmploymentRecord>,
    #[serde(default)]
    pub business: Option<BusinessDocument>,
    #[serde(default)]
    pub investment: Option<InvestmentDocument>,
    #[serde(default)]
    pub qualifying_payments: Option<QualifyingPaymentsDocument>,
    #[serde(default)]
    pub tax_payments: Option<TaxPaymentsDocument>,
}

impl TaxReturnInput {
    pub fn is_present(&self, kind: SourceKind) -> bool {
        match kind {
            SourceKind::Employment => self.employment.is_some(),
            SourceKind::Business => self.business.is_some(),
            SourceKind::Investment => self.investment.is_some(),
            SourceKind::QualifyingPayments => self.qualifying_payments.is_some(),
            SourceKind::TaxPayments => self.tax_payments.is_some(),
        }
    }

    /// Structural checks on every present source
    pub fn validate(&self) -> Result<(), SourceError> {
        if let Some(employment) = &self.employment {
            employment.validate()?;
        }
        if let Some(business) = &self.business {
            business.validate()?;
        }
        if let Some(investment) = &self.investment {
            investment.validate()?;
        }
        if let Some(qualifying) = &self.qualifying_payments {
            qualifying.validate()?;
        }
        if let Some(payments) = &self.tax_payments {
            payments.validate()?;
        }
        Ok(())
    }

    pub fn assess(&self, config: &AssessmentConfig) -> AssessmentOutcome {
        compute_assessment(
            self.tax_year,
            config,
            self.employment.as_ref(),
            self.business.as_ref(),
            self.investment.as_ref(),
            self.qualifying_payments.as_ref(),
            self.tax_payments.as_ref(),
        )
    }
}

/// Read a return file from JSON; unknown category tags are rejected here.
/// An employment record with only a regular salary gets its months generated.
pub fn read_return_json<R: Read>(reader: R) -> anyhow::Result<TaxReturnInput> {
    let mut input: TaxReturnInput = serde_json::from_reader(reader)?;
    let tax_year = input.tax_year;
    input.employment = input
        .employment
        .map(|employment| employment.with_generated_months(tax_year));
    log::info!(
        "Loaded return for {}: {} of {} sources present",
        input.tax_year,
        SourceKind::ALL.iter().filter(|k| input.is_present(**k)).count(),
        SourceKind::ALL.len()
    );
    Ok(input)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IssueKind {
    MalformedRecord,
    WrongTaxYear,
    DateOutsideTaxYear,
    WithholdingMismatch,
    DeductibleAboveCap,
}

/// A data quality problem found in a return file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReturnIssue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub source: SourceKind,
    /// 1-based line within the source, when the issue is about a single record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub message: String,
}

impl ReturnIssue {
    fn new(kind: IssueKind, source: SourceKind, line: Option<usize>, message: String) -> Self {
        ReturnIssue {
            kind,
            source,
            line,
            message,
        }
    }
}

fn check_document<D: SourceDocument>(
    document: &D,
    structure: Result<(), SourceError>,
    tax_year: TaxYear,
    issues: &mut Vec<ReturnIssue>,
) {
    if let Err(e) = structure {
        issues.push(ReturnIssue::new(IssueKind::MalformedRecord, D::KIND, None, e.to_string()));
    }
    if !document.applies_to(tax_year) {
        let keyed = document.tax_year().map_or_else(String::new, |y| y.to_string());
        issues.push(ReturnIssue::new(
            IssueKind::WrongTaxYear,
            D::KIND,
            None,
            format!("document is for {} but the return is for {}", keyed, tax_year),
        ));
    }
}

fn check_dates<'a>(
    source: SourceKind,
    dates: impl Iterator<Item = &'a NaiveDate>,
    tax_year: TaxYear,
    issues: &mut Vec<ReturnIssue>,
) {
    for (i, date) in dates.enumerate() {
        if !tax_year.contains(*date) {
            issues.push(ReturnIssue::new(
                IssueKind::DateOutsideTaxYear,
                source,
                Some(i + 1),
                format!(
                    "{} is outside {} ({} to {})",
                    date,
                    tax_year,
                    tax_year.start_date(),
                    tax_year.end_date()
                ),
            ));
        }
    }
}

/// Collect every issue in a return against the rules in `config`
pub fn check_return(input: &TaxReturnInput, config: &AssessmentConfig) -> Vec<ReturnIssue> {
    let year = input.tax_year;
    let mut issues = Vec::new();

    if let Some(employment) = &input.employment {
        check_document(employment, employment.validate(), year, &mut issues);
    }

    if let Some(business) = &input.business {
        check_document(business, business.validate(), year, &mut issues);
        check_dates(
            SourceKind::Business,
            business.transactions.iter().map(|t| &t.date),
            year,
            &mut issues,
        );
    }

    if let Some(investment) = &input.investment {
        check_document(investment, investment.validate(), year, &mut issues);
        check_dates(
            SourceKind::Investment,
            investment.lines.iter().map(|l| &l.date),
            year,
            &mut issues,
        );
        let rates = &config.withholding_rates;
        for (i, line) in investment.lines.iter().enumerate() {
            let expected = InvestmentLine::new(line.kind, line.amount, line.date, rates);
            if line.withholding_tax != expected.withholding_tax {
                issues.push(ReturnIssue::new(
                    IssueKind::WithholdingMismatch,
                    SourceKind::Investment,
                    Some(i + 1),
                    format!(
                        "{:?} withholding {} does not match {} at {}",
                        line.kind,
                        line.withholding_tax,
                        expected.withholding_tax,
                        super::format::format_rate(rates.rate(line.kind))
                    ),
                ));
            }
        }
    }

    if let Some(qualifying) = &input.qualifying_payments {
        check_document(qualifying, qualifying.validate(), year, &mut issues);
        check_dates(
            SourceKind::QualifyingPayments,
            qualifying.lines.iter().map(|l| &l.date),
            year,
            &mut issues,
        );
        let caps = &config.qualifying_caps;
        for (i, line) in qualifying.lines.iter().enumerate() {
            let entered = QualifyingPaymentLine::new(line.kind, line.amount, line.date, caps);
            if line.deductible > entered.deductible {
                issues.push(ReturnIssue::new(
                    IssueKind::DeductibleAboveCap,
                    SourceKind::QualifyingPayments,
                    Some(i + 1),
                    format!(
                        "{:?} deductible {} exceeds the allowed {}",
                        line.kind, line.deductible, entered.deductible
                    ),
                ));
            }
        }
    }

    if let Some(payments) = &input.tax_payments {
        check_document(payments, payments.validate(), year, &mut issues);
        check_dates(
            SourceKind::TaxPayments,
            payments.payments.iter().map(|p| &p.date),
            year,
            &mut issues,
        );
    }

    issues
}
