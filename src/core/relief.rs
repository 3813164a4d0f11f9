use super::config::{check_non_negative, check_rate, ConfigError};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReliefConfig {
    #[schemars(with = "f64")]
    pub personal_relief_cap: Decimal,
    /// Share of gross rent allowed as relief
    #[schemars(with = "f64")]
    pub rental_relief_rate: Decimal,
}

impl ReliefConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_non_negative("personal relief cap", self.personal_relief_cap)?;
        check_rate("rental relief rate", self.rental_relief_rate)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Reliefs {
    pub personal: Decimal,
    pub rental: Decimal,
    pub qualifying: Decimal,
    pub total: Decimal,
}

/// Personal, rental and qualifying-payment relief.
///
/// Personal relief is `min(total_assessable, cap)` and follows a negative
/// assessable income below zero.
pub fn calculate_reliefs(
    total_assessable: Decimal,
    rent_amount: Decimal,
    qualifying_deductible: Decimal,
    config: &ReliefConfig,
) -> Reliefs {
    let personal = total_assessable.min(config.personal_relief_cap);
    let rental = rent_amount * config.rental_relief_rate;
    let reliefs = Reliefs {
        personal,
        rental,
        qualifying: qualifying_deductible,
        total: personal + rental + qualifying_deductible,
    };

    log::debug!(
        "Reliefs: personal={}, rental={}, qualifying={}, total={}",
        reliefs.personal,
        reliefs.rental,
        reliefs.qualifying,
        reliefs.total
    );
    reliefs
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn config() -> ReliefConfig {
        ReliefConfig {
            personal_relief_cap: dec!(1800000),
            rental_relief_rate: dec!(0.25),
        }
    }

    #[test]
    fn personal_relief_capped() {
        let reliefs = calculate_reliefs(dec!(3000000), Decimal::ZERO, Decimal::ZERO, &config());
        assert_eq!(reliefs.personal, dec!(1800000));
    }

    #[test]
    fn personal_relief_equals_income_below_cap() {
        let reliefs = calculate_reliefs(dec!(900000), Decimal::ZERO, Decimal::ZERO, &config());
        assert_eq!(reliefs.personal, dec!(900000));
    }

    #[test]
    fn rental_relief_is_quarter_of_rent() {
        let reliefs = calculate_reliefs(dec!(2500000), dec!(500000), Decimal::ZERO, &config());
        assert_eq!(reliefs.rental, dec!(125000));
    }

    #[test]
    fn total_is_sum_of_parts() {
        let reliefs = calculate_reliefs(dec!(2500000), dec!(500000), dec!(75000), &config());
        assert_eq!(
            reliefs,
            Reliefs {
                personal: dec!(1800000),
                rental: dec!(125000),
                qualifying: dec!(75000),
                total: dec!(2000000),
            }
        );
    }

    #[test]
    fn negative_assessable_gives_negative_personal_relief() {
        let reliefs = calculate_reliefs(dec!(-200000), Decimal::ZERO, Decimal::ZERO, &config());
        assert_eq!(reliefs.personal, dec!(-200000));
    }
}
