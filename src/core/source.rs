use super::year::TaxYear;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The five datasets a return is assembled from
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Employment,
    Business,
    Investment,
    QualifyingPayments,
    TaxPayments,
}

impl SourceKind {
    pub const ALL: [SourceKind; 5] = [
        SourceKind::Employment,
        SourceKind::Business,
        SourceKind::Investment,
        SourceKind::QualifyingPayments,
        SourceKind::TaxPayments,
    ];

    pub fn display(&self) -> &'static str {
        match self {
            SourceKind::Employment => "Employment income",
            SourceKind::Business => "Business income",
            SourceKind::Investment => "Investment income",
            SourceKind::QualifyingPayments => "Qualifying payments",
            SourceKind::TaxPayments => "Tax payments",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Malformed source records, raised where records enter the system
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("month index {0} recorded more than once")]
    DuplicateMonth(u8),
    #[error("month index {0} is outside 0..=11")]
    MonthOutOfRange(u8),
    #[error("unknown tax payment period '{0}', expected Q1, Q2, Q3, Q4 or Final")]
    UnknownPaymentPeriod(String),
    #[error("{source_kind} line {line}: negative amount {amount}")]
    NegativeAmount {
        source_kind: SourceKind,
        line: usize,
        amount: Decimal,
    },
}

/// A yearly document owned by one source module
pub trait SourceDocument {
    const KIND: SourceKind;

    /// Tax year the document is keyed to, if it carries one
    fn tax_year(&self) -> Option<TaxYear>;

    /// Whether the document may be used for an assessment of `year`
    fn applies_to(&self, year: TaxYear) -> bool {
        self.tax_year().is_none_or(|y| y == year)
    }
}
