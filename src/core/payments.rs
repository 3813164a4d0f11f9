use super::source::{SourceDocument, SourceError, SourceKind};
use super::year::TaxYear;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Advance instalments and the final settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum PaymentPeriod {
    Q1,
    Q2,
    Q3,
    Q4,
    Final,
}

impl PaymentPeriod {
    pub const ALL: [PaymentPeriod; 5] = [
        PaymentPeriod::Q1,
        PaymentPeriod::Q2,
        PaymentPeriod::Q3,
        PaymentPeriod::Q4,
        PaymentPeriod::Final,
    ];
}

impl FromStr for PaymentPeriod {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "Q1" => Ok(PaymentPeriod::Q1),
            "Q2" => Ok(PaymentPeriod::Q2),
            "Q3" => Ok(PaymentPeriod::Q3),
            "Q4" => Ok(PaymentPeriod::Q4),
            "FINAL" => Ok(PaymentPeriod::Final),
            _ => Err(SourceError::UnknownPaymentPeriod(s.to_string())),
        }
    }
}

impl std::fmt::Display for PaymentPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TaxPaymentRecord {
    #[serde(rename = "type")]
    pub period: PaymentPeriod,
    #[schemars(with = "f64")]
    pub amount: Decimal,
    #[schemars(with = "String")]
    pub date: NaiveDate,
    /// Receipt or bank reference
    #[serde(default)]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TaxPaymentsDocument {
    #[serde(default)]
    pub tax_year: Option<TaxYear>,
    #[serde(default)]
    pub payments: Vec<TaxPaymentRecord>,
}

impl TaxPaymentsDocument {
    pub fn validate(&self) -> Result<(), SourceError> {
        for (i, payment) in self.payments.iter().enumerate() {
            if payment.amount < Decimal::ZERO {
                return Err(SourceError::NegativeAmount {
                    source_kind: SourceKind::TaxPayments,
                    line: i + 1,
                    amount: payment.amount,
                });
            }
        }
        Ok(())
    }
}

impl SourceDocument for TaxPaymentsDocument {
    const KIND: SourceKind = SourceKind::TaxPayments;

    fn tax_year(&self) -> Option<TaxYear> {
        self.tax_year
    }
}

/// Tax already paid, per period
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PaymentTotals {
    pub q1: Decimal,
    pub q2: Decimal,
    pub q3: Decimal,
    pub q4: Decimal,
    #[serde(rename = "final")]
    pub final_payment: Decimal,
}

impl PaymentTotals {
    pub fn get(&self, period: PaymentPeriod) -> Decimal {
        match period {
            PaymentPeriod::Q1 => self.q1,
            PaymentPeriod::Q2 => self.q2,
            PaymentPeriod::Q3 => self.q3,
            PaymentPeriod::Q4 => self.q4,
            PaymentPeriod::Final => self.final_payment,
        }
    }

    pub fn total(&self) -> Decimal {
        PaymentPeriod::ALL.iter().map(|p| self.get(*p)).sum()
    }
}

pub fn payment_totals(document: &TaxPaymentsDocument) -> PaymentTotals {
    let mut totals = PaymentTotals::default();
    for payment in &document.payments {
        let bucket = match payment.period {
            PaymentPeriod::Q1 => &mut totals.q1,
            PaymentPeriod::Q2 => &mut totals.q2,
            PaymentPeriod::Q3 => &mut totals.q3,
            PaymentPeriod::Q4 => &mut totals.q4,
            PaymentPeriod::Final => &mut totals.final_payment,
        };
        *bucket += payment.amount;
    }

    log::debug!(
        "Tax payments: q1={}, q2={}, q3={}, q4={}, final={}, total={}",
        totals.q1,
        totals.q2,
        totals.q3,
        totals.q4,
        totals.final_payment,
        totals.total()
    );
    totals
}
