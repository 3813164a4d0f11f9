pub mod assessment;
pub mod business;
pub mod config;
pub mod credits;
pub mod employment;
pub mod format;
pub mod input;
pub mod investment;
pub mod payments;
pub mod qualifying;
pub mod relief;
pub mod slabs;
pub mod source;
pub mod warnings;
pub mod year;

// Flat public surface for domain types and functions.
pub use assessment::{AssessmentOutcome, AssessmentResult};
#[allow(unused_imports)]
pub use assessment::compute_assessment;
#[allow(unused_imports)]
pub use business::{
    business_totals, BusinessCategory, BusinessDocument, BusinessTotals, BusinessTransaction,
    TransactionKind,
};
pub use config::AssessmentConfig;
#[allow(unused_imports)]
pub use config::{read_config_json, ConfigError};
#[allow(unused_imports)]
pub use credits::{net_credits, Credits};
#[allow(unused_imports)]
pub use employment::{employment_totals, EmploymentRecord, EmploymentTotals, MonthEntry};
pub use format::{format_amount, format_rate};
#[allow(unused_imports)]
pub use input::{check_return, read_return_json, IssueKind, ReturnIssue, TaxReturnInput};
#[allow(unused_imports)]
pub use investment::{
    investment_totals, InvestmentDocument, InvestmentKind, InvestmentLine, InvestmentTotals,
    WithholdingRates,
};
#[allow(unused_imports)]
pub use payments::{
    payment_totals, PaymentPeriod, PaymentTotals, TaxPaymentRecord, TaxPaymentsDocument,
};
#[allow(unused_imports)]
pub use qualifying::{
    qualifying_totals, QualifyingCaps, QualifyingKind, QualifyingPaymentLine,
    QualifyingPaymentsDocument, QualifyingTotals,
};
#[allow(unused_imports)]
pub use relief::{calculate_reliefs, ReliefConfig, Reliefs};
#[allow(unused_imports)]
pub use slabs::{BandResult, Slab, SlabAssessment, SlabTable};
#[allow(unused_imports)]
pub use source::{SourceDocument, SourceError, SourceKind};
#[allow(unused_imports)]
pub use warnings::Warning;
pub use year::{TaxYear, MONTH_NAMES};
