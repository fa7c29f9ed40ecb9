//! Core costing logic - framework-agnostic materials, allocation and pricing.
//!
//! Only [`snapshot`] talks to the database; every other module is a pure
//! computation over the rows it loads.

pub mod allocation;
pub mod employee;
pub mod indirect;
pub mod materials;
pub mod month;
pub mod pricing;
pub mod snapshot;
pub mod volume;
pub mod warning;

pub use month::ProductionMonth;
pub use pricing::{PriceReport, ProductCostReport, calculate_product_prices};
pub use snapshot::CostingScope;
pub use volume::DistributionMethod;
