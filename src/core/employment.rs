use super::source::{SourceDocument, SourceError, SourceKind};
use super::year::{TaxYear, MONTH_NAMES};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One month of employment income; actual figures override the estimate once known
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MonthEntry {
    /// Month within the tax year, 0 = April .. 11 = March
    pub month_index: u8,
    #[schemars(with = "f64")]
    pub estimated_gross: Decimal,
    /// Estimated PAYE deducted by the employer
    #[serde(default)]
    #[schemars(with = "f64")]
    pub estimated_tax: Decimal,
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub actual_gross: Option<Decimal>,
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub actual_tax: Option<Decimal>,
}

impl MonthEntry {
    pub fn estimated(month_index: u8, gross: Decimal, tax: Decimal) -> Self {
        MonthEntry {
            month_index,
            estimated_gross: gross,
            estimated_tax: tax,
            actual_gross: None,
            actual_tax: None,
        }
    }

    pub fn effective_gross(&self) -> Decimal {
        self.actual_gross.unwrap_or(self.estimated_gross)
    }

    pub fn effective_tax(&self) -> Decimal {
        self.actual_tax.unwrap_or(self.estimated_tax)
    }

    pub fn has_actuals(&self) -> bool {
        self.actual_gross.is_some() || self.actual_tax.is_some()
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES
            .get(usize::from(self.month_index))
            .copied()
            .unwrap_or("?")
    }
}

/// Employment income for one employer over a tax year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EmploymentRecord {
    #[serde(default)]
    pub tax_year: Option<TaxYear>,
    pub company_name: String,
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub regular_monthly_salary: Option<Decimal>,
    /// PAYE expected on the regular salary, used when months are generated
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub regular_monthly_tax: Option<Decimal>,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub months: Vec<MonthEntry>,
}

impl EmploymentRecord {
    /// Twelve months estimated from a regular salary and monthly PAYE
    pub fn from_regular_salary(
        tax_year: TaxYear,
        company_name: &str,
        monthly_salary: Decimal,
        monthly_tax: Decimal,
    ) -> Self {
        EmploymentRecord {
            tax_year: Some(tax_year),
            company_name: company_name.to_string(),
            employee_id: None,
            regular_monthly_salary: Some(monthly_salary),
            regular_monthly_tax: Some(monthly_tax),
            is_primary: true,
            months: (0..12)
                .map(|i| MonthEntry::estimated(i, monthly_salary, monthly_tax))
                .collect(),
        }
    }

    /// Fill an empty month list with the estimated schedule for the regular salary.
    /// Records that already carry months, or have no regular salary, are unchanged.
    pub fn with_generated_months(self, tax_year: TaxYear) -> Self {
        let salary = match self.regular_monthly_salary {
            Some(salary) if self.months.is_empty() => salary,
            _ => return self,
        };
        let generated = EmploymentRecord::from_regular_salary(
            self.tax_year.unwrap_or(tax_year),
            &self.company_name,
            salary,
            self.regular_monthly_tax.unwrap_or_default(),
        );
        log::info!(
            "Generated {} estimated months for {} from a regular salary of {}",
            generated.months.len(),
            self.company_name,
            salary
        );
        EmploymentRecord {
            months: generated.months,
            ..self
        }
    }

    /// At most one entry per month index, each within 0..=11
    pub fn validate(&self) -> Result<(), SourceError> {
        let mut seen = BTreeSet::new();
        for (line, month) in self.months.iter().enumerate() {
            if month.month_index > 11 {
                return Err(SourceError::MonthOutOfRange(month.month_index));
            }
            if !seen.insert(month.month_index) {
                return Err(SourceError::DuplicateMonth(month.month_index));
            }
            for amount in [
                Some(month.estimated_gross),
                Some(month.estimated_tax),
                month.actual_gross,
                month.actual_tax,
            ]
            .into_iter()
            .flatten()
            {
                if amount < Decimal::ZERO {
                    return Err(SourceError::NegativeAmount {
                        source_kind: SourceKind::Employment,
                        line: line + 1,
                        amount,
                    });
                }
            }
        }
        Ok(())
    }

    /// Month indexes with no entry
    pub fn missing_months(&self) -> Vec<u8> {
        let recorded: BTreeSet<u8> = self.months.iter().map(|m| m.month_index).collect();
        (0..12).filter(|i| !recorded.contains(i)).collect()
    }
}

impl SourceDocument for EmploymentRecord {
    const KIND: SourceKind = SourceKind::Employment;

    fn tax_year(&self) -> Option<TaxYear> {
        self.tax_year
    }
}

/// Employment subtotals for the year
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EmploymentTotals {
    pub gross: Decimal,
    /// PAYE withheld by the employer
    pub tax: Decimal,
    pub months_recorded: usize,
    pub months_with_actuals: usize,
}

/// Sum effective gross and PAYE across the recorded months; missing months count as zero
pub fn employment_totals(record: &EmploymentRecord) -> EmploymentTotals {
    let totals = record
        .months
        .iter()
        .fold(EmploymentTotals::default(), |mut acc, m| {
            acc.gross += m.effective_gross();
            acc.tax += m.effective_tax();
            acc.months_recorded += 1;
            if m.has_actuals() {
                acc.months_with_actuals += 1;
            }
            acc
        });

    log::debug!(
        "Employment {}: gross={}, paye={}, months={}",
        record.company_name,
        totals.gross,
        totals.tax,
        totals.months_recorded
    );
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(months: Vec<MonthEntry>) -> EmploymentRecord {
        EmploymentRecord {
            tax_year: Some(TaxYear(2026)),
            company_name: "Acme".to_string(),
            employee_id: None,
            regular_monthly_salary: None,
            regular_monthly_tax: None,
            is_primary: true,
            months,
        }
    }

    #[test]
    fn actual_figures_override_estimates() {
        let mut months: Vec<MonthEntry> = (0..12)
            .map(|i| MonthEntry::estimated(i, dec!(80000), dec!(2000)))
            .collect();
        for m in months.iter_mut().take(3) {
            m.actual_gross = Some(dec!(100000));
        }

        let totals = employment_totals(&record(months));
        // 3 x 100,000 + 9 x 80,000
        assert_eq!(totals.gross, dec!(1020000));
        assert_eq!(totals.tax, dec!(24000));
        assert_eq!(totals.months_recorded, 12);
        assert_eq!(totals.months_with_actuals, 3);
    }

    #[test]
    fn actual_tax_overrides_estimated_tax() {
        let mut month = MonthEntry::estimated(0, dec!(100000), dec!(5000));
        month.actual_tax = Some(dec!(4200));
        assert_eq!(month.effective_tax(), dec!(4200));
        assert_eq!(month.effective_gross(), dec!(100000));
    }

    #[test]
    fn missing_months_count_as_zero() {
        let months = vec![
            MonthEntry::estimated(0, dec!(50000), dec!(0)),
            MonthEntry::estimated(5, dec!(50000), dec!(0)),
        ];
        let record = record(months);
        let totals = employment_totals(&record);
        assert_eq!(totals.gross, dec!(100000));
        assert_eq!(record.missing_months(), vec![1, 2, 3, 4, 6, 7, 8, 9, 10, 11]);
        assert_eq!(record.validate(), Ok(()));
    }

    #[test]
    fn totals_independent_of_month_order() {
        let forward: Vec<MonthEntry> = (0..12)
            .map(|i| MonthEntry::estimated(i, Decimal::from(i) * dec!(1000), dec!(10)))
            .collect();
        let mut reversed = forward.clone();
        reversed.reverse();
        assert_eq!(
            employment_totals(&record(forward)),
            employment_totals(&record(reversed))
        );
    }

    #[test]
    fn duplicate_month_rejected() {
        let months = vec![
            MonthEntry::estimated(2, dec!(1), dec!(0)),
            MonthEntry::estimated(2, dec!(1), dec!(0)),
        ];
        assert_eq!(record(months).validate(), Err(SourceError::DuplicateMonth(2)));
    }

    #[test]
    fn month_out_of_range_rejected() {
        let months = vec![MonthEntry::estimated(12, dec!(1), dec!(0))];
        assert_eq!(record(months).validate(), Err(SourceError::MonthOutOfRange(12)));
    }

    #[test]
    fn negative_amount_rejected() {
        let mut month = MonthEntry::estimated(0, dec!(1000), dec!(0));
        month.actual_tax = Some(dec!(-5));
        assert!(matches!(
            record(vec![month]).validate(),
            Err(SourceError::NegativeAmount { line: 1, .. })
        ));
    }

    #[test]
    fn regular_salary_schedule() {
        let record =
            EmploymentRecord::from_regular_salary(TaxYear(2026), "Acme", dec!(150000), dec!(6000));
        assert_eq!(record.months.len(), 12);
        assert_eq!(record.months[9].month_name(), "Jan");
        let totals = employment_totals(&record);
        assert_eq!(totals.gross, dec!(1800000));
        assert_eq!(totals.tax, dec!(72000));
        assert!(record.missing_months().is_empty());
    }

    #[test]
    fn months_generated_from_regular_salary() {
        let json = r#"{
            "company_name": "Acme",
            "employee_id": "E-17",
            "regular_monthly_salary": 120000,
            "regular_monthly_tax": 4000
        }"#;
        let record: EmploymentRecord = serde_json::from_str(json).unwrap();
        assert!(record.months.is_empty());

        let record = record.with_generated_months(TaxYear(2026));
        assert_eq!(record.tax_year, None);
        assert_eq!(record.employee_id.as_deref(), Some("E-17"));
        assert!(record.missing_months().is_empty());
        let totals = employment_totals(&record);
        assert_eq!(totals.gross, dec!(1440000));
        assert_eq!(totals.tax, dec!(48000));
    }

    #[test]
    fn recorded_months_not_regenerated() {
        let mut record = record(vec![MonthEntry::estimated(0, dec!(90000), dec!(0))]);
        record.regular_monthly_salary = Some(dec!(120000));
        let record = record.with_generated_months(TaxYear(2026));
        assert_eq!(record.months.len(), 1);
        assert_eq!(employment_totals(&record).gross, dec!(90000));
    }

    #[test]
    fn optional_fields_default() {
        let json = r#"{
            "company_name": "Acme",
            "months": [
                { "month_index": 0, "estimated_gross": 100000, "estimated_tax": 1000, "actual_gross": 110000 }
            ]
        }"#;
        let record: EmploymentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.tax_year, None);
        assert_eq!(record.months[0].effective_gross(), dec!(110000));
        assert_eq!(record.months[0].actual_tax, None);
    }
}
