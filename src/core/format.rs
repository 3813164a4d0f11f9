use rust_decimal::Decimal;

/// Format an amount with thousands separators, e.g. "1,234,567" or "-10,000.50"
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let abs = rounded.abs();
    let whole = abs.trunc().normalize().to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let fraction = abs - abs.trunc();
    if !fraction.is_zero() {
        let cents = format!("{:.2}", fraction);
        grouped.push_str(&cents[1..]);
    }

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Rate as a percentage, e.g. 0.25 -> "25%"
pub fn format_rate(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_amount(dec!(0)), "0");
        assert_eq!(format_amount(dec!(999)), "999");
        assert_eq!(format_amount(dec!(1000)), "1,000");
        assert_eq!(format_amount(dec!(1800000)), "1,800,000");
        assert_eq!(format_amount(dec!(96000.00)), "96,000");
    }

    #[test]
    fn keeps_cents() {
        assert_eq!(format_amount(dec!(1234.5)), "1,234.50");
        assert_eq!(format_amount(dec!(0.125)), "0.12");
    }

    #[test]
    fn negative_amounts() {
        assert_eq!(format_amount(dec!(-10000)), "-10,000");
        assert_eq!(format_amount(dec!(-0.001)), "0");
    }

    #[test]
    fn rates_as_percent() {
        assert_eq!(format_rate(dec!(0.25)), "25%");
        assert_eq!(format_rate(dec!(0.05)), "5%");
        assert_eq!(format_rate(dec!(0.0875)), "8.75%");
    }
}
