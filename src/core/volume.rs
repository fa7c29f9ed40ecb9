//! Volume signals used to weight cost allocation.
//!
//! A costing run distributes shared pools by either units sold or units produced
//! during the month. The signal is loaded once per run and then read by product id.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Which monthly quantity weights the allocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionMethod {
    /// Quantities from `monthly_sales`
    #[default]
    Sales,
    /// Quantities from `monthly_production`
    Production,
}

impl DistributionMethod {
    /// Label reported alongside each allocation to say where volumes came from.
    #[must_use]
    pub const fn data_source(self) -> &'static str {
        match self {
            Self::Sales => "monthly_sales",
            Self::Production => "monthly_production",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sales => "sales",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for DistributionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistributionMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sales" => Ok(Self::Sales),
            "production" => Ok(Self::Production),
            other => Err(Error::InvalidParameter {
                name: "distributionMethod".to_string(),
                reason: format!("expected 'sales' or 'production', got '{other}'"),
            }),
        }
    }
}

/// Per-product quantities for one month under one distribution method.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VolumeSignal {
    method: DistributionMethod,
    quantities: HashMap<i64, f64>,
}

impl VolumeSignal {
    #[must_use]
    pub fn new(method: DistributionMethod) -> Self {
        Self {
            method,
            quantities: HashMap::new(),
        }
    }

    /// Builds a signal from `(product_id, quantity)` rows; repeated products are summed.
    #[must_use]
    pub fn from_rows<I>(method: DistributionMethod, rows: I) -> Self
    where
        I: IntoIterator<Item = (i64, f64)>,
    {
        let mut signal = Self::new(method);
        for (product_id, quantity) in rows {
            signal.record(product_id, quantity);
        }
        signal
    }

    pub fn record(&mut self, product_id: i64, quantity: f64) {
        *self.quantities.entry(product_id).or_insert(0.0) += quantity;
    }

    /// Volume for a product; products with no rows moved zero units.
    #[must_use]
    pub fn volume_for(&self, product_id: i64) -> f64 {
        self.quantities.get(&product_id).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub const fn data_source(&self) -> &'static str {
        self.method.data_source()
    }

    /// True when at least one product recorded a positive quantity.
    #[must_use]
    pub fn has_any_data(&self) -> bool {
        self.quantities.values().any(|q| *q > 0.0)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_parse_distribution_method() {
        assert_eq!("sales".parse::<DistributionMethod>().unwrap(), DistributionMethod::Sales);
        assert_eq!(
            "Production".parse::<DistributionMethod>().unwrap(),
            DistributionMethod::Production
        );
        assert!(matches!(
            "volume".parse::<DistributionMethod>(),
            Err(Error::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_data_source_labels() {
        assert_eq!(DistributionMethod::Sales.data_source(), "monthly_sales");
        assert_eq!(DistributionMethod::Production.data_source(), "monthly_production");
    }

    #[test]
    fn test_repeated_rows_are_summed() {
        let signal = VolumeSignal::from_rows(
            DistributionMethod::Sales,
            [(1, 10.0), (2, 5.0), (1, 2.5)],
        );
        assert_eq!(signal.volume_for(1), 12.5);
        assert_eq!(signal.volume_for(2), 5.0);
        assert_eq!(signal.volume_for(3), 0.0);
        assert!(signal.has_any_data());
    }

    #[test]
    fn test_all_zero_rows_have_no_data() {
        let signal = VolumeSignal::from_rows(DistributionMethod::Production, [(1, 0.0)]);
        assert!(!signal.has_any_data());
        assert_eq!(signal.data_source(), "monthly_production");
    }
}
