use chrono::{Datelike, NaiveDate};
use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// Short month labels in tax-year order (month index 0 is April)
pub const MONTH_NAMES: [&str; 12] = [
    "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec", "Jan", "Feb", "Mar",
];

/// Assessment year (runs 1 April to 31 March)
/// The year value represents the end year (e.g., 2026 = 2025-26 tax year)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaxYear(pub i32);

/// Range of end years accepted from text; every date in it is representable
const END_YEARS: std::ops::RangeInclusive<i32> = 1901..=9999;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid tax year '{0}', expected e.g. 2025-26 or 2026 (1900-01 to 9998-99)")]
pub struct TaxYearParseError(String);

impl TaxYear {
    /// Tax year containing the given date
    pub fn from_date(date: NaiveDate) -> Self {
        if date.month() >= 4 {
            TaxYear(date.year() + 1)
        } else {
            TaxYear(date.year())
        }
    }

    fn bounded(end_year: i32) -> Option<Self> {
        END_YEARS.contains(&end_year).then_some(TaxYear(end_year))
    }

    /// 1 April of the starting calendar year
    pub fn start_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.0 - 1, 4, 1).expect("1 April is a valid date")
    }

    /// 31 March of the ending calendar year
    pub fn end_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.0, 3, 31).expect("31 March is a valid date")
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        TaxYear::from_date(date) == *self
    }

    /// First day of the calendar month for a month index (0 = April .. 11 = March)
    pub fn month_start(&self, month_index: u8) -> Option<NaiveDate> {
        if month_index > 11 {
            return None;
        }
        let month = (u32::from(month_index) + 3) % 12 + 1;
        let year = if month >= 4 { self.0 - 1 } else { self.0 };
        NaiveDate::from_ymd_opt(year, month, 1)
    }

    /// Display as "2025-26" format
    pub fn display(&self) -> String {
        format!("{}-{:02}", self.0 - 1, self.0 % 100)
    }
}

impl std::fmt::Display for TaxYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl FromStr for TaxYear {
    type Err = TaxYearParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || TaxYearParseError(s.to_string());

        match s.split_once(|c: char| c == '-' || c == '/') {
            Some((start, end)) => {
                let start: i32 = start.parse().map_err(|_| err())?;
                let end: i32 = end.parse().map_err(|_| err())?;
                let year = start.checked_add(1).ok_or_else(err)?;
                if end != year % 100 {
                    return Err(err());
                }
                TaxYear::bounded(year).ok_or_else(err)
            }
            None => s.parse().ok().and_then(TaxYear::bounded).ok_or_else(err),
        }
    }
}

impl Serialize for TaxYear {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.display())
    }
}

impl<'de> Deserialize<'de> for TaxYear {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl JsonSchema for TaxYear {
    fn schema_name() -> String {
        "TaxYear".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        String::json_schema(gen)
    }
}
