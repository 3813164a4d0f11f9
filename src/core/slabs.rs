use super::config::ConfigError;
use super::format::{format_amount, format_rate};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One progressive band: income up to `up_to` (from the previous bound) is taxed at `rate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Slab {
    /// Upper bound of the band; absent for the final, unbounded band
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub up_to: Option<Decimal>,
    /// Rate applied to income falling in this band (0.06 = 6%)
    #[schemars(with = "f64")]
    pub rate: Decimal,
}

impl Slab {
    pub fn bounded(up_to: Decimal, rate: Decimal) -> Self {
        Slab {
            up_to: Some(up_to),
            rate,
        }
    }

    pub fn unbounded(rate: Decimal) -> Self {
        Slab { up_to: None, rate }
    }
}

/// Ordered slab table, strictly increasing bounds, last slab unbounded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct SlabTable {
    slabs: Vec<Slab>,
}

/// Tax computed for a single band of the table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BandResult {
    pub lower: Decimal,
    pub upper: Option<Decimal>,
    pub rate: Decimal,
    /// Portion of taxable income falling in this band
    pub amount: Decimal,
    pub tax: Decimal,
}

impl BandResult {
    pub fn is_used(&self) -> bool {
        !self.amount.is_zero()
    }

    /// Display label such as "1,000,000 - 1,500,000 @ 18%"
    pub fn label(&self) -> String {
        let upper = self.upper.map_or_else(|| "∞".to_string(), format_amount);
        format!(
            "{} - {} @ {}",
            format_amount(self.lower),
            upper,
            format_rate(self.rate)
        )
    }
}

/// Result of apportioning taxable income across the slab table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlabAssessment {
    /// One entry per configured slab, including zero-amount bands
    pub bands: Vec<BandResult>,
    pub total_tax: Decimal,
}

impl SlabTable {
    /// Build a validated table
    pub fn new(slabs: Vec<Slab>) -> Result<Self, ConfigError> {
        let table = SlabTable { slabs };
        table.validate()?;
        Ok(table)
    }

    #[cfg(test)]
    pub fn slabs(&self) -> &[Slab] {
        &self.slabs
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slabs.is_empty() {
            return Err(ConfigError::EmptySlabTable);
        }

        let last = self.slabs.len() - 1;
        let mut previous = Decimal::ZERO;

        for (index, slab) in self.slabs.iter().enumerate() {
            super::config::check_rate(&format!("slab {} rate", index + 1), slab.rate)?;

            match slab.up_to {
                Some(bound) => {
                    if bound <= previous {
                        return Err(ConfigError::NonIncreasingBound {
                            index,
                            bound,
                            previous,
                        });
                    }
                    previous = bound;
                }
                None if index != last => return Err(ConfigError::UnboundedSlabNotLast { index }),
                None => {}
            }
        }

        if self.slabs[last].up_to.is_some() {
            return Err(ConfigError::MissingUnboundedSlab);
        }
        Ok(())
    }

    /// Apportion taxable income across every band in ascending order
    pub fn apply(&self, taxable_income: Decimal) -> SlabAssessment {
        let mut remaining = taxable_income.max(Decimal::ZERO);
        let mut lower = Decimal::ZERO;
        let mut total_tax = Decimal::ZERO;
        let mut bands = Vec::with_capacity(self.slabs.len());

        for slab in &self.slabs {
            // once `remaining` is exhausted every later band is zero
            let amount = match slab.up_to {
                Some(upper) => remaining.min(upper - lower),
                None => remaining,
            };
            let tax = amount * slab.rate;

            log::debug!(
                "Band {} - {:?} @ {}: amount={}, tax={}",
                lower,
                slab.up_to,
                slab.rate,
                amount,
                tax
            );

            bands.push(BandResult {
                lower,
                upper: slab.up_to,
                rate: slab.rate,
                amount,
                tax,
            });

            total_tax += tax;
            remaining -= amount;
            if let Some(upper) = slab.up_to {
                lower = upper;
            }
        }

        SlabAssessment { bands, total_tax }
    }
}
