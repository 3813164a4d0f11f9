use super::config::{check_rate, ConfigError};
use super::source::{SourceDocument, SourceError, SourceKind};
use super::year::TaxYear;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum InvestmentKind {
    Rent,
    Interest,
    /// Withholding on dividends is a final tax
    Dividend,
    Other,
}

impl InvestmentKind {
    pub const ALL: [InvestmentKind; 4] = [
        InvestmentKind::Rent,
        InvestmentKind::Interest,
        InvestmentKind::Dividend,
        InvestmentKind::Other,
    ];

    /// Whether this income is part of assessable income (and its WHT creditable)
    pub fn is_assessable(&self) -> bool {
        !matches!(self, InvestmentKind::Dividend)
    }
}

/// Withholding tax rates applied when an investment line is entered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WithholdingRates {
    #[schemars(with = "f64")]
    pub rent: Decimal,
    #[schemars(with = "f64")]
    pub interest: Decimal,
    #[schemars(with = "f64")]
    pub dividend: Decimal,
    #[schemars(with = "f64")]
    pub other: Decimal,
}

impl WithholdingRates {
    pub fn rate(&self, kind: InvestmentKind) -> Decimal {
        match kind {
            InvestmentKind::Rent => self.rent,
            InvestmentKind::Interest => self.interest,
            InvestmentKind::Dividend => self.dividend,
            InvestmentKind::Other => self.other,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_rate("rent withholding rate", self.rent)?;
        check_rate("interest withholding rate", self.interest)?;
        check_rate("dividend withholding rate", self.dividend)?;
        check_rate("other withholding rate", self.other)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct InvestmentLine {
    #[serde(rename = "type")]
    pub kind: InvestmentKind,
    #[schemars(with = "f64")]
    pub amount: Decimal,
    /// Tax withheld at source, fixed when the line was entered
    #[serde(alias = "wht")]
    #[schemars(with = "f64")]
    pub withholding_tax: Decimal,
    #[schemars(with = "String")]
    pub date: NaiveDate,
    /// Free-text description for `Other` income
    #[serde(default)]
    pub category: Option<String>,
}

impl InvestmentLine {
    /// New line with withholding computed from the rate table
    pub fn new(
        kind: InvestmentKind,
        amount: Decimal,
        date: NaiveDate,
        rates: &WithholdingRates,
    ) -> Self {
        InvestmentLine {
            kind,
            amount,
            withholding_tax: expected_withholding(kind, amount, rates),
            date,
            category: None,
        }
    }
}

/// Withholding due on an amount at entry time
fn expected_withholding(
    kind: InvestmentKind,
    amount: Decimal,
    rates: &WithholdingRates,
) -> Decimal {
    (amount * rates.rate(kind)).round_dp(2)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct InvestmentDocument {
    #[serde(default)]
    pub tax_year: Option<TaxYear>,
    #[serde(default)]
    pub lines: Vec<InvestmentLine>,
}

impl InvestmentDocument {
    pub fn validate(&self) -> Result<(), SourceError> {
        for (i, line) in self.lines.iter().enumerate() {
            for amount in [line.amount, line.withholding_tax] {
                if amount < Decimal::ZERO {
                    return Err(SourceError::NegativeAmount {
                        source_kind: SourceKind::Investment,
                        line: i + 1,
                        amount,
                    });
                }
            }
        }
        Ok(())
    }
}

impl SourceDocument for InvestmentDocument {
    const KIND: SourceKind = SourceKind::Investment;

    fn tax_year(&self) -> Option<TaxYear> {
        self.tax_year
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InvestmentSubtotal {
    pub amount: Decimal,
    pub withholding: Decimal,
}

/// Investment income grouped into the four fixed types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InvestmentTotals {
    pub rent: InvestmentSubtotal,
    pub interest: InvestmentSubtotal,
    pub dividend: InvestmentSubtotal,
    pub other: InvestmentSubtotal,
}

impl InvestmentTotals {
    pub fn get(&self, kind: InvestmentKind) -> &InvestmentSubtotal {
        match kind {
            InvestmentKind::Rent => &self.rent,
            InvestmentKind::Interest => &self.interest,
            InvestmentKind::Dividend => &self.dividend,
            InvestmentKind::Other => &self.other,
        }
    }

    fn get_mut(&mut self, kind: InvestmentKind) -> &mut InvestmentSubtotal {
        match kind {
            InvestmentKind::Rent => &mut self.rent,
            InvestmentKind::Interest => &mut self.interest,
            InvestmentKind::Dividend => &mut self.dividend,
            InvestmentKind::Other => &mut self.other,
        }
    }

    /// Rent + Interest + Other; dividends are taxed finally at source
    pub fn assessable_amount(&self) -> Decimal {
        InvestmentKind::ALL
            .iter()
            .filter(|k| k.is_assessable())
            .map(|k| self.get(*k).amount)
            .sum()
    }

    /// Withholding that may be credited against liability (dividend WHT excluded)
    pub fn creditable_withholding(&self) -> Decimal {
        InvestmentKind::ALL
            .iter()
            .filter(|k| k.is_assessable())
            .map(|k| self.get(*k).withholding)
            .sum()
    }

    pub fn total_amount(&self) -> Decimal {
        InvestmentKind::ALL.iter().map(|k| self.get(*k).amount).sum()
    }
}

/// Group lines by type and sum amount and stored withholding
pub fn investment_totals(document: &InvestmentDocument) -> InvestmentTotals {
    let mut totals = InvestmentTotals::default();
    for line in &document.lines {
        let group = totals.get_mut(line.kind);
        group.amount += line.amount;
        group.withholding += line.withholding_tax;
    }

    log::debug!(
        "Investment: rent={}, interest={}, dividend={}, other={}",
        totals.rent.amount,
        totals.interest.amount,
        totals.dividend.amount,
        totals.other.amount
    );
    totals
}
