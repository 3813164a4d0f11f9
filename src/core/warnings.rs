use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Non-fatal findings emitted while assessing a return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum Warning {
    /// Employment months with no entry; they were counted as zero.
    MissingEmploymentMonths { months: Vec<String> },
    /// Assessable income was negative, so personal relief is negative too.
    NegativePersonalRelief {
        #[schemars(with = "f64")]
        assessable: Decimal,
    },
    /// Reliefs exceed assessable income; the excess is lost.
    UnusedRelief {
        #[schemars(with = "f64")]
        amount: Decimal,
    },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::MissingEmploymentMonths { months } => {
                write!(f, "no employment entry for {}", months.join(", "))
            }
            Warning::NegativePersonalRelief { assessable } => write!(
                f,
                "assessable income {} is negative; personal relief follows it",
                super::format::format_amount(*assessable)
            ),
            Warning::UnusedRelief { amount } => write!(
                f,
                "reliefs exceed assessable income by {}",
                super::format::format_amount(*amount)
            ),
        }
    }
}
