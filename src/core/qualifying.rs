use super::config::{check_non_negative, ConfigError};
use super::source::{SourceDocument, SourceError, SourceKind};
use super::year::TaxYear;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Payment types that reduce taxable income
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum QualifyingKind {
    Solar,
    Charity,
    Government,
}

impl QualifyingKind {
    pub const ALL: [QualifyingKind; 3] = [
        QualifyingKind::Solar,
        QualifyingKind::Charity,
        QualifyingKind::Government,
    ];
}

/// Per-type deductible caps; `None` means uncapped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct QualifyingCaps {
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub solar: Option<Decimal>,
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub charity: Option<Decimal>,
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub government: Option<Decimal>,
}

impl QualifyingCaps {
    pub fn cap(&self, kind: QualifyingKind) -> Option<Decimal> {
        match kind {
            QualifyingKind::Solar => self.solar,
            QualifyingKind::Charity => self.charity,
            QualifyingKind::Government => self.government,
        }
    }

    /// Deductible portion of a payment of `amount`
    pub fn deductible(&self, kind: QualifyingKind, amount: Decimal) -> Decimal {
        self.cap(kind).map_or(amount, |cap| amount.min(cap))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, cap) in [
            ("solar cap", self.solar),
            ("charity cap", self.charity),
            ("government cap", self.government),
        ] {
            if let Some(cap) = cap {
                check_non_negative(name, cap)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct QualifyingPaymentLine {
    #[serde(rename = "type")]
    pub kind: QualifyingKind,
    #[schemars(with = "f64")]
    pub amount: Decimal,
    /// Portion allowed as relief, capped when the line was entered
    #[schemars(with = "f64")]
    pub deductible: Decimal,
    #[schemars(with = "String")]
    pub date: NaiveDate,
}

impl QualifyingPaymentLine {
    pub fn new(
        kind: QualifyingKind,
        amount: Decimal,
        date: NaiveDate,
        caps: &QualifyingCaps,
    ) -> Self {
        QualifyingPaymentLine {
            kind,
            amount,
            deductible: caps.deductible(kind, amount),
            date,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct QualifyingPaymentsDocument {
    #[serde(default)]
    pub tax_year: Option<TaxYear>,
    #[serde(default)]
    pub lines: Vec<QualifyingPaymentLine>,
}

impl QualifyingPaymentsDocument {
    pub fn validate(&self) -> Result<(), SourceError> {
        for (i, line) in self.lines.iter().enumerate() {
            for amount in [line.amount, line.deductible] {
                if amount < Decimal::ZERO {
                    return Err(SourceError::NegativeAmount {
                        source_kind: SourceKind::QualifyingPayments,
                        line: i + 1,
                        amount,
                    });
                }
            }
        }
        Ok(())
    }
}

impl SourceDocument for QualifyingPaymentsDocument {
    const KIND: SourceKind = SourceKind::QualifyingPayments;

    fn tax_year(&self) -> Option<TaxYear> {
        self.tax_year
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QualifyingSubtotal {
    pub amount: Decimal,
    pub deductible: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QualifyingTotals {
    pub solar: QualifyingSubtotal,
    pub charity: QualifyingSubtotal,
    pub government: QualifyingSubtotal,
}

impl QualifyingTotals {
    pub fn get(&self, kind: QualifyingKind) -> &QualifyingSubtotal {
        match kind {
            QualifyingKind::Solar => &self.solar,
            QualifyingKind::Charity => &self.charity,
            QualifyingKind::Government => &self.government,
        }
    }

    pub fn total_amount(&self) -> Decimal {
        QualifyingKind::ALL.iter().map(|k| self.get(*k).amount).sum()
    }

    pub fn total_deductible(&self) -> Decimal {
        QualifyingKind::ALL.iter().map(|k| self.get(*k).deductible).sum()
    }
}

/// Group payments by type; stored deductibles are summed as entered, not recapped
pub fn qualifying_totals(document: &QualifyingPaymentsDocument) -> QualifyingTotals {
    let mut totals = QualifyingTotals::default();
    for line in &document.lines {
        let group = match line.kind {
            QualifyingKind::Solar => &mut totals.solar,
            QualifyingKind::Charity => &mut totals.charity,
            QualifyingKind::Government => &mut totals.government,
        };
        group.amount += line.amount;
        group.deductible += line.deductible;
    }

    log::debug!(
        "Qualifying payments: solar={}, charity={}, government={}, deductible={}",
        totals.solar.amount,
        totals.charity.amount,
        totals.government.amount,
        totals.total_deductible()
    );
    totals
}
