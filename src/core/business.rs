use super::source::{SourceDocument, SourceError, SourceKind};
use super::year::TaxYear;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Direction of a business transaction; amounts are always entered positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum BusinessCategory {
    #[default]
    Sales,
    Services,
    Supplies,
    Rent,
    Utilities,
    Travel,
    Wages,
    /// Anything else; the transaction `label` names it
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BusinessTransaction {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default)]
    pub category: BusinessCategory,
    /// Free-text category for `Other`
    #[serde(default)]
    pub label: Option<String>,
    #[schemars(with = "f64")]
    pub amount: Decimal,
    #[schemars(with = "String")]
    pub date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
}

impl BusinessTransaction {
    pub fn category_name(&self) -> String {
        match (self.category, &self.label) {
            (BusinessCategory::Other, Some(label)) if !label.trim().is_empty() => label.clone(),
            (category, _) => format!("{:?}", category),
        }
    }
}

/// Business transactions for one tax year
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BusinessDocument {
    #[serde(default)]
    pub tax_year: Option<TaxYear>,
    #[serde(default)]
    pub transactions: Vec<BusinessTransaction>,
}

impl BusinessDocument {
    pub fn validate(&self) -> Result<(), SourceError> {
        for (i, tx) in self.transactions.iter().enumerate() {
            if tx.amount < Decimal::ZERO {
                return Err(SourceError::NegativeAmount {
                    source_kind: SourceKind::Business,
                    line: i + 1,
                    amount: tx.amount,
                });
            }
        }
        Ok(())
    }
}

impl SourceDocument for BusinessDocument {
    const KIND: SourceKind = SourceKind::Business;

    fn tax_year(&self) -> Option<TaxYear> {
        self.tax_year
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BusinessTotals {
    pub income: Decimal,
    pub expense: Decimal,
    /// Income less expense, negative for a loss
    pub net: Decimal,
}

/// Partition transactions by kind and net them
pub fn business_totals(document: &BusinessDocument) -> BusinessTotals {
    let (income, expense) = document.transactions.iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(income, expense), tx| match tx.kind {
            TransactionKind::Income => (income + tx.amount, expense),
            TransactionKind::Expense => (income, expense + tx.amount),
        },
    );

    let totals = BusinessTotals {
        income,
        expense,
        net: income - expense,
    };
    log::debug!(
        "Business: income={}, expense={}, net={}",
        totals.income,
        totals.expense,
        totals.net
    );
    totals
}
