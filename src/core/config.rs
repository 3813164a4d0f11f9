use super::investment::WithholdingRates;
use super::qualifying::QualifyingCaps;
use super::relief::ReliefConfig;
use super::slabs::{Slab, SlabTable};
use super::year::TaxYear;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::Read;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("slab table is empty")]
    EmptySlabTable,
    #[error("slab {} upper bound {bound} is not above the previous bound {previous}", .index + 1)]
    NonIncreasingBound {
        index: usize,
        bound: Decimal,
        previous: Decimal,
    },
    #[error("slab {} is unbounded but is not the last slab", .index + 1)]
    UnboundedSlabNotLast { index: usize },
    #[error("the last slab must be unbounded")]
    MissingUnboundedSlab,
    #[error("{name} {rate} is outside [0, 1]")]
    RateOutOfRange { name: String, rate: Decimal },
    #[error("{name} {amount} is negative")]
    NegativeAmount { name: String, amount: Decimal },
    #[error("no built-in parameters for tax year {0}, supply a configuration file")]
    UnsupportedYear(TaxYear),
    #[error("configuration is for tax year {config} but the return is for {requested}")]
    YearMismatch {
        config: TaxYear,
        requested: TaxYear,
    },
}

pub(crate) fn check_rate(name: &str, rate: Decimal) -> Result<(), ConfigError> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(ConfigError::RateOutOfRange {
            name: name.to_string(),
            rate,
        });
    }
    Ok(())
}

pub(crate) fn check_non_negative(name: &str, amount: Decimal) -> Result<(), ConfigError> {
    if amount < Decimal::ZERO {
        return Err(ConfigError::NegativeAmount {
            name: name.to_string(),
            amount,
        });
    }
    Ok(())
}

/// Fixed parameters for one assessment year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AssessmentConfig {
    pub tax_year: TaxYear,
    pub reliefs: ReliefConfig,
    pub withholding_rates: WithholdingRates,
    pub qualifying_caps: QualifyingCaps,
    pub slabs: SlabTable,
}

impl AssessmentConfig {
    /// Built-in parameters for a tax year
    pub fn for_year(tax_year: TaxYear) -> Result<Self, ConfigError> {
        match tax_year.0 {
            // 2025-26
            2026 => Ok(AssessmentConfig {
                tax_year,
                reliefs: ReliefConfig {
                    personal_relief_cap: dec!(1800000),
                    rental_relief_rate: dec!(0.25),
                },
                withholding_rates: WithholdingRates {
                    rent: dec!(0.10),
                    interest: dec!(0.05),
                    dividend: dec!(0.15),
                    other: Decimal::ZERO,
                },
                qualifying_caps: QualifyingCaps {
                    solar: Some(dec!(600000)),
                    charity: Some(dec!(75000)),
                    government: None,
                },
                slabs: SlabTable::new(vec![
                    Slab::bounded(dec!(1000000), dec!(0.06)),
                    Slab::bounded(dec!(1500000), dec!(0.18)),
                    Slab::bounded(dec!(2000000), dec!(0.24)),
                    Slab::bounded(dec!(2500000), dec!(0.30)),
                    Slab::unbounded(dec!(0.36)),
                ])?,
            }),
            _ => Err(ConfigError::UnsupportedYear(tax_year)),
        }
    }

    /// Check every parameter; a failure here is a deployment mistake, not a runtime condition
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.reliefs.validate()?;
        self.withholding_rates.validate()?;
        self.qualifying_caps.validate()?;
        self.slabs.validate()
    }

    /// Ensure these parameters apply to the year being assessed
    pub fn check_year(&self, requested: TaxYear) -> Result<(), ConfigError> {
        if self.tax_year != requested {
            return Err(ConfigError::YearMismatch {
                config: self.tax_year,
                requested,
            });
        }
        Ok(())
    }
}

/// Read and validate a configuration from JSON
pub fn read_config_json<R: Read>(reader: R) -> anyhow::Result<AssessmentConfig> {
    let config: AssessmentConfig = serde_json::from_reader(reader)?;
    config.validate()?;
    Ok(config)
}
