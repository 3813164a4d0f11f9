use super::investment::InvestmentTotals;
use super::payments::PaymentTotals;
use rust_decimal::Decimal;
use serde::Serialize;

/// Tax already borne against the liability
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Credits {
    pub paye: Decimal,
    pub withholding: Decimal,
    pub tax_paid: Decimal,
    pub total: Decimal,
    /// Liability less credits; negative is a refund
    pub balance: Decimal,
}

pub fn net_credits(
    paye: Decimal,
    investment: &InvestmentTotals,
    payments: &PaymentTotals,
    liability: Decimal,
) -> Credits {
    let withholding = investment.creditable_withholding();
    let tax_paid = payments.total();
    let total = paye + withholding + tax_paid;
    let credits = Credits {
        paye,
        withholding,
        tax_paid,
        total,
        balance: liability - total,
    };

    log::debug!(
        "Credits: paye={}, withholding={}, paid={}, balance={}",
        credits.paye,
        credits.withholding,
        credits.tax_paid,
        credits.balance
    );
    credits
}
