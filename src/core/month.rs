//! Production month handling.
//!
//! Every costing run is scoped to one calendar month. Months travel through the
//! API and the database as `YYYY-MM` text, which sorts chronologically, so the
//! "latest at or before" lookups can compare the stored strings directly.

use crate::errors::{Error, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A calendar month, stored as the first day of that month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductionMonth(NaiveDate);

impl ProductionMonth {
    /// Builds a month from year and month number (1-12).
    #[must_use]
    pub fn from_ym(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    #[must_use]
    pub fn month(self) -> u32 {
        self.0.month()
    }

    /// The `YYYY-MM` key used by the month columns.
    #[must_use]
    pub fn key(self) -> String {
        self.0.format("%Y-%m").to_string()
    }
}

impl fmt::Display for ProductionMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m"))
    }
}

impl FromStr for ProductionMonth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        // `%Y` alone would also accept signed and short years
        let well_formed = trimmed.len() == 7
            && trimmed.as_bytes().get(4) == Some(&b'-')
            && trimmed
                .bytes()
                .enumerate()
                .all(|(i, b)| i == 4 || b.is_ascii_digit());

        if !well_formed {
            return Err(invalid_month(trimmed));
        }

        NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d")
            .map(Self)
            .map_err(|_| invalid_month(trimmed))
    }
}

impl TryFrom<String> for ProductionMonth {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ProductionMonth> for String {
    fn from(value: ProductionMonth) -> Self {
        value.key()
    }
}

fn invalid_month(value: &str) -> Error {
    Error::InvalidParameter {
        name: "productionMonth".to_string(),
        reason: format!("expected YYYY-MM, got '{value}'"),
    }
}
