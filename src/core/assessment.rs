use super::business::{business_totals, BusinessDocument, BusinessTotals};
use super::config::AssessmentConfig;
use super::credits::net_credits;
use super::employment::{employment_totals, EmploymentRecord, EmploymentTotals};
use super::investment::{investment_totals, InvestmentDocument, InvestmentTotals};
use super::payments::{payment_totals, PaymentTotals, TaxPaymentsDocument};
use super::qualifying::{qualifying_totals, QualifyingPaymentsDocument, QualifyingTotals};
use super::relief::calculate_reliefs;
use super::slabs::BandResult;
use super::source::{SourceDocument, SourceKind};
use super::warnings::Warning;
use super::year::{TaxYear, MONTH_NAMES};
use rust_decimal::Decimal;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Consolidated tax return for one year
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssessmentResult {
    pub tax_year: TaxYear,
    pub employment_income: Decimal,
    pub employment: EmploymentTotals,
    pub business_net: Decimal,
    pub business: BusinessTotals,
    pub investment_by_type: InvestmentTotals,
    pub qualifying_payments: QualifyingTotals,
    pub total_assessable: Decimal,
    pub personal_relief: Decimal,
    pub rental_relief: Decimal,
    pub qualifying_relief: Decimal,
    pub total_reliefs: Decimal,
    pub taxable_income: Decimal,
    pub slab_breakdown: Vec<BandResult>,
    pub total_tax_liability: Decimal,
    pub total_paye: Decimal,
    pub total_withholding: Decimal,
    pub tax_payments: PaymentTotals,
    pub total_tax_paid: Decimal,
    pub total_credits: Decimal,
    /// Positive is payable, negative is a refund
    pub balance: Decimal,
    pub warnings: Vec<Warning>,
}

impl AssessmentResult {
    /// SHA-256 of the result's JSON form; equal results give equal fingerprints
    pub fn fingerprint(&self) -> anyhow::Result<String> {
        let bytes = serde_json::to_vec(self)?;
        Ok(hex::encode(Sha256::digest(&bytes)))
    }

    pub fn is_refund(&self) -> bool {
        self.balance < Decimal::ZERO
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AssessmentOutcome {
    Complete(Box<AssessmentResult>),
    /// Sources not yet available; not a zero result
    Incomplete { missing: Vec<SourceKind> },
}

#[cfg(test)]
impl AssessmentOutcome {
    pub fn result(&self) -> Option<&AssessmentResult> {
        match self {
            AssessmentOutcome::Complete(result) => Some(result),
            AssessmentOutcome::Incomplete { .. } => None,
        }
    }
}

/// Drop a document keyed to a different tax year and record it as missing
fn resolve<'a, D: SourceDocument>(
    document: Option<&'a D>,
    tax_year: TaxYear,
    missing: &mut Vec<SourceKind>,
) -> Option<&'a D> {
    match document {
        Some(doc) if doc.applies_to(tax_year) => Some(doc),
        Some(doc) => {
            log::warn!(
                "{} is for tax year {}, not {}; treating it as absent",
                D::KIND,
                doc.tax_year().map_or_else(String::new, |y| y.to_string()),
                tax_year
            );
            missing.push(D::KIND);
            None
        }
        None => {
            missing.push(D::KIND);
            None
        }
    }
}

/// Assess a return from all five sources.
///
/// Returns `Incomplete` listing every absent source when any one of them is
/// missing. Otherwise the result depends only on the arguments.
pub fn compute_assessment(
    tax_year: TaxYear,
    config: &AssessmentConfig,
    employment: Option<&EmploymentRecord>,
    business: Option<&BusinessDocument>,
    investment: Option<&InvestmentDocument>,
    qualifying: Option<&QualifyingPaymentsDocument>,
    payments: Option<&TaxPaymentsDocument>,
) -> AssessmentOutcome {
    let mut missing = Vec::new();
    let employment = resolve(employment, tax_year, &mut missing);
    let business = resolve(business, tax_year, &mut missing);
    let investment = resolve(investment, tax_year, &mut missing);
    let qualifying = resolve(qualifying, tax_year, &mut missing);
    let payments = resolve(payments, tax_year, &mut missing);

    let (Some(employment), Some(business), Some(investment), Some(qualifying), Some(payments)) =
        (employment, business, investment, qualifying, payments)
    else {
        log::debug!("Assessment for {} incomplete, missing {:?}", tax_year, missing);
        return AssessmentOutcome::Incomplete { missing };
    };

    let mut warnings = Vec::new();

    let employment_totals = employment_totals(employment);
    let missing_months = employment.missing_months();
    if !missing_months.is_empty() {
        warnings.push(Warning::MissingEmploymentMonths {
            months: missing_months
                .iter()
                .map(|i| MONTH_NAMES[usize::from(*i)].to_string())
                .collect(),
        });
    }

    let business_totals = business_totals(business);
    let investment_totals = investment_totals(investment);
    let qualifying_totals = qualifying_totals(qualifying);
    let payment_totals = payment_totals(payments);

    let total_assessable =
        employment_totals.gross + business_totals.net + investment_totals.assessable_amount();
    if total_assessable < Decimal::ZERO {
        warnings.push(Warning::NegativePersonalRelief {
            assessable: total_assessable,
        });
    }

    let reliefs = calculate_reliefs(
        total_assessable,
        investment_totals.rent.amount,
        qualifying_totals.total_deductible(),
        &config.reliefs,
    );

    let net_income = total_assessable - reliefs.total;
    if net_income < Decimal::ZERO && total_assessable >= Decimal::ZERO {
        warnings.push(Warning::UnusedRelief {
            amount: -net_income,
        });
    }
    let taxable_income = net_income.max(Decimal::ZERO);
    let slabs = config.slabs.apply(taxable_income);

    let credits = net_credits(
        employment_totals.tax,
        &investment_totals,
        &payment_totals,
        slabs.total_tax,
    );

    log::debug!(
        "Assessment for {}: assessable={}, taxable={}, liability={}, balance={}",
        tax_year,
        total_assessable,
        taxable_income,
        slabs.total_tax,
        credits.balance
    );

    AssessmentOutcome::Complete(Box::new(AssessmentResult {
        tax_year,
        employment_income: employment_totals.gross,
        employment: employment_totals,
        business_net: business_totals.net,
        business: business_totals,
        investment_by_type: investment_totals,
        qualifying_payments: qualifying_totals,
        total_assessable,
        personal_relief: reliefs.personal,
        rental_relief: reliefs.rental,
        qualifying_relief: reliefs.qualifying,
        total_reliefs: reliefs.total,
        taxable_income,
        slab_breakdown: slabs.bands,
        total_tax_liability: slabs.total_tax,
        total_paye: credits.paye,
        total_withholding: credits.withholding,
        tax_payments: payment_totals,
        total_tax_paid: credits.tax_paid,
        total_credits: credits.total,
        balance: credits.balance,
        warnings,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::business::{BusinessCategory, BusinessTransaction, TransactionKind};
    use crate::core::employment::MonthEntry;
    use crate::core::investment::{InvestmentKind, InvestmentLine};
    use crate::core::payments::{PaymentPeriod, TaxPaymentRecord};
    use crate::core::qualifying::{QualifyingKind, QualifyingPaymentLine};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    const YEAR: TaxYear = TaxYear(2026);

    struct Fixture {
        config: AssessmentConfig,
        employment: EmploymentRecord,
        business: BusinessDocument,
        investment: InvestmentDocument,
        qualifying: QualifyingPaymentsDocument,
        payments: TaxPaymentsDocument,
    }

    impl Fixture {
        fn new() -> Self {
            let config = AssessmentConfig::for_year(YEAR).unwrap();
            let date = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
            let rates = &config.withholding_rates;
            Fixture {
                employment: EmploymentRecord::from_regular_salary(
                    YEAR,
                    "Acme",
                    dec!(150000),
                    dec!(3000),
                ),
                business: BusinessDocument {
                    tax_year: Some(YEAR),
                    transactions: vec![
                        BusinessTransaction {
                            kind: TransactionKind::Income,
                            category: BusinessCategory::Services,
                            label: None,
                            amount: dec!(600000),
                            date,
                            description: None,
                        },
                        BusinessTransaction {
                            kind: TransactionKind::Expense,
                            category: BusinessCategory::Supplies,
                            label: None,
                            amount: dec!(200000),
                            date,
                            description: None,
                        },
                    ],
                },
                investment: InvestmentDocument {
                    tax_year: Some(YEAR),
                    lines: vec![
                        InvestmentLine::new(InvestmentKind::Rent, dec!(500000), date, rates),
                        InvestmentLine::new(InvestmentKind::Dividend, dec!(100000), date, rates),
                    ],
                },
                qualifying: QualifyingPaymentsDocument {
                    tax_year: Some(YEAR),
                    lines: vec![QualifyingPaymentLine::new(
                        QualifyingKind::Charity,
                        dec!(100000),
                        date,
                        &config.qualifying_caps,
                    )],
                },
                payments: TaxPaymentsDocument {
                    tax_year: Some(YEAR),
                    payments: vec![TaxPaymentRecord {
                        period: PaymentPeriod::Q1,
                        amount: dec!(50000),
                        date,
                        reference: None,
                    }],
                },
                config,
            }
        }

        fn assess(&self) -> AssessmentOutcome {
            compute_assessment(
                YEAR,
                &self.config,
                Some(&self.employment),
                Some(&self.business),
                Some(&self.investment),
                Some(&self.qualifying),
                Some(&self.payments),
            )
        }
    }

    #[test]
    fn full_return() {
        let fixture = Fixture::new();
        let outcome = fixture.assess();
        let result = outcome.result().unwrap();

        assert_eq!(result.employment_income, dec!(1800000));
        assert_eq!(result.business_net, dec!(400000));
        // dividends are not assessable
        assert_eq!(result.total_assessable, dec!(2700000));
        assert_eq!(result.personal_relief, dec!(1800000));
        assert_eq!(result.rental_relief, dec!(125000));
        assert_eq!(result.qualifying_relief, dec!(75000));
        assert_eq!(result.total_reliefs, dec!(2000000));
        assert_eq!(result.taxable_income, dec!(700000));
        assert_eq!(result.total_tax_liability, dec!(42000));
        assert_eq!(result.slab_breakdown.len(), 5);
        assert_eq!(result.total_paye, dec!(36000));
        // rent 50,000 creditable, dividend 15,000 final
        assert_eq!(result.total_withholding, dec!(50000));
        assert_eq!(result.total_tax_paid, dec!(50000));
        assert_eq!(result.total_credits, dec!(136000));
        assert_eq!(result.balance, dec!(-94000));
        assert!(result.is_refund());
        assert_eq!(result.warnings, vec![]);
    }

    #[test]
    fn repeated_assessment_is_identical() {
        let fixture = Fixture::new();
        let first = fixture.assess();
        let second = fixture.assess();
        assert_eq!(first, second);
        assert_eq!(
            first.result().unwrap().fingerprint().unwrap(),
            second.result().unwrap().fingerprint().unwrap()
        );
    }

    #[test]
    fn fingerprint_changes_with_input() {
        let mut fixture = Fixture::new();
        let before = fixture.assess().result().unwrap().fingerprint().unwrap();
        fixture.payments.payments[0].amount = dec!(50001);
        let after = fixture.assess().result().unwrap().fingerprint().unwrap();
        assert_ne!(before, after);
        assert_eq!(before.len(), 64);
    }

    #[test]
    fn any_absent_source_is_incomplete() {
        let f = Fixture::new();
        for kind in SourceKind::ALL {
            let outcome = compute_assessment(
                YEAR,
                &f.config,
                Some(&f.employment).filter(|_| kind != SourceKind::Employment),
                Some(&f.business).filter(|_| kind != SourceKind::Business),
                Some(&f.investment).filter(|_| kind != SourceKind::Investment),
                Some(&f.qualifying).filter(|_| kind != SourceKind::QualifyingPayments),
                Some(&f.payments).filter(|_| kind != SourceKind::TaxPayments),
            );
            assert_eq!(outcome, AssessmentOutcome::Incomplete { missing: vec![kind] });
        }
    }

    #[test]
    fn all_sources_absent_lists_all() {
        let config = AssessmentConfig::for_year(YEAR).unwrap();
        let outcome = compute_assessment(YEAR, &config, None, None, None, None, None);
        assert_eq!(
            outcome,
            AssessmentOutcome::Incomplete {
                missing: SourceKind::ALL.to_vec()
            }
        );
    }

    #[test]
    fn empty_sources_are_complete() {
        let fixture = Fixture::new();
        let employment = EmploymentRecord {
            months: vec![],
            ..fixture.employment.clone()
        };
        let outcome = compute_assessment(
            YEAR,
            &fixture.config,
            Some(&employment),
            Some(&BusinessDocument::default()),
            Some(&InvestmentDocument::default()),
            Some(&QualifyingPaymentsDocument::default()),
            Some(&TaxPaymentsDocument::default()),
        );
        let result = outcome.result().unwrap();
        assert_eq!(result.total_assessable, Decimal::ZERO);
        assert_eq!(result.total_tax_liability, Decimal::ZERO);
        assert_eq!(result.balance, Decimal::ZERO);
        assert!(matches!(
            result.warnings.as_slice(),
            [Warning::MissingEmploymentMonths { months }] if months.len() == 12
        ));
    }

    #[test]
    fn document_for_other_year_is_absent() {
        let mut fixture = Fixture::new();
        fixture.business.tax_year = Some(TaxYear(2025));
        assert_eq!(
            fixture.assess(),
            AssessmentOutcome::Incomplete {
                missing: vec![SourceKind::Business]
            }
        );
    }

    #[test]
    fn business_loss_gives_negative_relief_warning() {
        let mut fixture = Fixture::new();
        fixture.employment.months.clear();
        fixture.investment.lines.clear();
        fixture.business.transactions[1].amount = dec!(900000);
        let outcome = fixture.assess();
        let result = outcome.result().unwrap();

        assert_eq!(result.total_assessable, dec!(-300000));
        assert_eq!(result.personal_relief, dec!(-300000));
        assert_eq!(result.taxable_income, Decimal::ZERO);
        assert!(result.warnings.contains(&Warning::NegativePersonalRelief {
            assessable: dec!(-300000)
        }));
    }

    #[test]
    fn excess_relief_reported() {
        let mut fixture = Fixture::new();
        fixture.employment =
            EmploymentRecord::from_regular_salary(YEAR, "Acme", dec!(50000), Decimal::ZERO);
        let outcome = fixture.assess();
        let result = outcome.result().unwrap();
        // assessable 600,000 + 400,000 + 500,000 = 1,500,000; reliefs 1,500,000 + 125,000 + 75,000
        assert_eq!(result.taxable_income, Decimal::ZERO);
        assert_eq!(
            result.warnings,
            vec![Warning::UnusedRelief {
                amount: dec!(200000)
            }]
        );
    }
}
