//! Warnings attached to a costing result.
//!
//! Missing data never aborts a costing run. Instead each fallback the engine takes
//! is recorded here so callers can tell a normally computed figure from one that
//! was defaulted.

use serde::Serialize;
use std::fmt;

/// The two shared cost pools spread across products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolKind {
    /// Named monthly overhead records
    Indirect,
    /// Payroll grouped by employee category
    Employee,
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Indirect => "indirect",
            Self::Employee => "employee",
        })
    }
}

/// A fallback taken while costing one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AllocationWarning {
    /// No active recipe; materials cost is the product's stored unit cost
    NoRecipe,
    /// Recipe output is not positive; materials cost is the stored unit cost
    InvalidRecipeYield { recipe_id: i64, output_quantity: f64 },
    /// No price at or before the month; the item contributed 0
    MissingSupplyPrice {
        supply_id: i64,
        supply_name: Option<String>,
    },
    /// The pool had no entries for the month
    NoCostPools { pool: PoolKind },
    /// Nothing in the pool is configured to reach this product's category
    NoDistributionConfig { pool: PoolKind, category_id: i64 },
    /// The category has rules, but none of their pool entries has an amount this month
    NoPoolAmount { pool: PoolKind, category_id: i64 },
    /// The category had no volume, so its pool was split evenly
    EqualSplit { pool: PoolKind, category_id: i64 },
    /// The product received a share but moved no units, so its per-unit cost is 0
    ZeroVolume { pool: PoolKind, assigned_amount: f64 },
    /// The computed total was not a finite number; stored cost fields were used
    NonFiniteCost,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_warning_serializes_with_kind_tag() {
        let warning = AllocationWarning::EqualSplit {
            pool: PoolKind::Employee,
            category_id: 4,
        };
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["kind"], "equal_split");
        assert_eq!(json["pool"], "employee");
        assert_eq!(json["category_id"], 4);
    }

    #[test]
    fn test_unit_warning_serializes_as_tag_only() {
        let json = serde_json::to_value(AllocationWarning::NoRecipe).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "no_recipe" }));
    }
}
